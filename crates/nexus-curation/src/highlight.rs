//! Recall highlighting
//!
//! A node is highlighted by the bricks the last recall returned. Only the
//! explicit anchor partition counts; the legacy `bricks` list never does.

use nexus_model::{ConceptNode, GraphSnapshot};
use std::collections::HashSet;
use std::fmt;
use std::hash::BuildHasher;

/// Highlight strength of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HighlightLevel {
    /// A hard anchor was recalled
    Strong,
    /// A soft anchor was recalled
    Weak,
    /// Nothing anchored to this node was recalled
    None,
}

impl HighlightLevel {
    /// Every level, strongest first
    pub const ALL: [HighlightLevel; 3] = [Self::Strong, Self::Weak, Self::None];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Weak => "weak",
            Self::None => "none",
        }
    }

    /// Legend caption
    #[must_use]
    pub fn legend(self) -> &'static str {
        match self {
            Self::Strong => "Strong (Hard Anchor Match)",
            Self::Weak => "Weak (Soft Anchor Match)",
            Self::None => "Neutral",
        }
    }
}

impl fmt::Display for HighlightLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classifies one node against the recalled brick ids
#[must_use]
pub fn classify<S: BuildHasher>(node: &ConceptNode, recalled: &HashSet<String, S>) -> HighlightLevel {
    if recalled.is_empty() {
        return HighlightLevel::None;
    }
    if node.hard_anchors().iter().any(|b| recalled.contains(b)) {
        HighlightLevel::Strong
    } else if node.soft_anchors().iter().any(|b| recalled.contains(b)) {
        HighlightLevel::Weak
    } else {
        HighlightLevel::None
    }
}

/// Classifies every node of a snapshot, in node order
#[must_use]
pub fn classify_all<S: BuildHasher>(
    snapshot: &GraphSnapshot,
    recalled: &HashSet<String, S>,
) -> Vec<(String, HighlightLevel)> {
    snapshot
        .nodes()
        .iter()
        .map(|n| (n.id.clone(), classify(n, recalled)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn recalled(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn hard_beats_soft() {
        let node = ConceptNode::new("c1", "Budget").with_anchors(&["b1"], &["b2"]);
        assert_eq!(classify(&node, &recalled(&["b1", "b2"])), HighlightLevel::Strong);
        assert_eq!(classify(&node, &recalled(&["b2"])), HighlightLevel::Weak);
        assert_eq!(classify(&node, &recalled(&["b9"])), HighlightLevel::None);
    }

    #[test]
    fn legacy_bricks_never_highlight() {
        let node = ConceptNode::new("c1", "Budget").with_bricks(&["b1"]);
        assert_eq!(classify(&node, &recalled(&["b1"])), HighlightLevel::None);
    }

    #[test]
    fn empty_recall_is_neutral() {
        let node = ConceptNode::new("c1", "Budget").with_anchors(&["b1"], &[]);
        assert_eq!(classify(&node, &HashSet::new()), HighlightLevel::None);
    }

    #[test]
    fn classify_all_follows_node_order() {
        let snapshot = GraphSnapshot::new(
            vec![
                ConceptNode::new("c1", "a").with_anchors(&[], &["b1"]),
                ConceptNode::new("c2", "b").with_anchors(&["b1"], &[]),
            ],
            vec![],
        );
        let levels = classify_all(&snapshot, &recalled(&["b1"]));
        assert_eq!(
            levels,
            vec![
                ("c1".to_string(), HighlightLevel::Weak),
                ("c2".to_string(), HighlightLevel::Strong),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_strong_iff_hard_hit(
            hard in proptest::collection::vec("[a-e]", 0..4),
            soft in proptest::collection::vec("[f-j]", 0..4),
            hits in proptest::collection::hash_set("[a-j]", 0..6),
        ) {
            let hard_refs: Vec<&str> = hard.iter().map(String::as_str).collect();
            let soft_refs: Vec<&str> = soft.iter().map(String::as_str).collect();
            let node = ConceptNode::new("c", "c").with_anchors(&hard_refs, &soft_refs);
            let level = classify(&node, &hits);
            let hard_hit = hard.iter().any(|b| hits.contains(b));
            let soft_hit = soft.iter().any(|b| hits.contains(b));
            prop_assert_eq!(level == HighlightLevel::Strong, hard_hit);
            prop_assert_eq!(level == HighlightLevel::Weak, !hard_hit && soft_hit);
        }
    }
}
