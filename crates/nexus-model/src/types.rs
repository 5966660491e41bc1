//! Core types for the concept graph
//!
//! Defines the entities exchanged with the backend:
//! - Bricks and their provenance
//! - Concept nodes with hard/soft anchor partitions
//! - Directed concept edges
//! - Durable anchor overrides

use crate::lifecycle::Lifecycle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the abbreviated id shown in lists and drawers
pub const SHORT_ID_LEN: usize = 8;

/// Abbreviates an id for display (`abcdefgh...`)
#[must_use]
pub fn short_id(id: &str) -> String {
    let prefix: String = id.chars().take(SHORT_ID_LEN).collect();
    format!("{prefix}...")
}

/// Atomic unit of extracted content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Opaque stable identifier
    #[serde(alias = "brick_id")]
    pub id: String,
    /// Originating file
    #[serde(default)]
    pub source_file: Option<String>,
    /// Location inside the source, opaque here
    #[serde(default)]
    pub source_span: serde_json::Value,
    /// Short excerpt
    #[serde(default)]
    pub text_sample: Option<String>,
    /// Full content, loaded lazily
    #[serde(default)]
    pub full_text: Option<String>,
    /// Recall confidence in `[0, 1]`
    #[serde(default)]
    pub confidence: f64,
    /// Promotion state
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Brick {
    /// Create a loose brick with no provenance
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: id.into(),
            source_file: None,
            source_span: serde_json::Value::Null,
            text_sample: None,
            full_text: None,
            confidence,
            lifecycle: Lifecycle::Loose,
        }
    }

    /// With lifecycle
    #[inline]
    #[must_use]
    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }
}

/// Concept variant tag (`type` on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// Extracted fact
    Fact,
    /// Formula or equation
    Formula,
    /// Plan or procedure
    Plan,
    /// Brick promoted to a graph vertex
    Brick,
    /// Topic grouping
    Topic,
    /// No tag supplied
    #[default]
    Default,
    /// Any other tag, kept verbatim
    Other(String),
}

impl NodeKind {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Fact => "fact",
            Self::Formula => "formula",
            Self::Plan => "plan",
            Self::Brick => "brick",
            Self::Topic => "topic",
            Self::Default => "default",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "fact" => Self::Fact,
            "formula" => Self::Formula,
            "plan" => Self::Plan,
            "brick" => Self::Brick,
            "topic" => Self::Topic,
            "" | "default" => Self::Default,
            _ => Self::Other(tag),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Hard/soft partition of a concept's bricks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchors {
    /// Ledger-confirmed, immutable from the UI
    #[serde(default)]
    pub hard: Vec<String>,
    /// Candidates, subject to promote/reject
    #[serde(default)]
    pub soft: Vec<String>,
}

impl Anchors {
    /// Create a partition
    #[inline]
    #[must_use]
    pub fn new(hard: Vec<String>, soft: Vec<String>) -> Self {
        Self { hard, soft }.normalized()
    }

    /// Enforces the partition invariant: duplicates collapse and an id that
    /// is both hard and soft stays hard only.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut hard: Vec<String> = Vec::with_capacity(self.hard.len());
        for id in self.hard {
            if !hard.contains(&id) {
                hard.push(id);
            }
        }
        let mut soft: Vec<String> = Vec::with_capacity(self.soft.len());
        for id in self.soft {
            if hard.contains(&id) {
                tracing::debug!(brick_id = %id, "dropping soft anchor already held as hard");
                continue;
            }
            if !soft.contains(&id) {
                soft.push(id);
            }
        }
        Self { hard, soft }
    }

    /// Whether the brick is held in either set
    #[must_use]
    pub fn contains(&self, brick_id: &str) -> bool {
        self.hard.iter().any(|id| id == brick_id) || self.soft.iter().any(|id| id == brick_id)
    }
}

#[derive(Deserialize)]
struct RawNode {
    id: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<NodeKind>,
    #[serde(default)]
    anchors: Option<Anchors>,
    #[serde(default)]
    bricks: Option<Vec<String>>,
    #[serde(default)]
    lifecycle: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default, alias = "sourceCount")]
    source_count: Option<u32>,
    #[serde(default, alias = "lastUpdatedAt")]
    last_updated_at: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

/// Vertex of the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode")]
pub struct ConceptNode {
    /// Stable identifier
    pub id: String,
    /// Display label
    pub label: String,
    /// Variant tag
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Anchor partition, absent on legacy payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchors: Option<Anchors>,
    /// Legacy flat brick list
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bricks: Vec<String>,
    /// Promotion state
    pub lifecycle: Lifecycle,
    /// Derived confidence
    pub confidence: f64,
    /// Number of contributing sources
    pub source_count: u32,
    /// Last update, preformatted
    pub last_updated_at: Option<String>,
    /// Short text for wall cards
    pub summary: Option<String>,
}

impl From<RawNode> for ConceptNode {
    fn from(raw: RawNode) -> Self {
        let label = raw
            .label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| raw.id.chars().take(SHORT_ID_LEN).collect());
        let lifecycle = match raw.lifecycle.as_deref().map(str::parse::<Lifecycle>) {
            Some(Ok(state)) => state,
            Some(Err(err)) => {
                tracing::debug!(node_id = %raw.id, %err, "treating unknown lifecycle as LOOSE");
                Lifecycle::Loose
            }
            None => Lifecycle::Loose,
        };

        Self {
            label,
            kind: raw.kind.unwrap_or_default(),
            anchors: raw.anchors.map(Anchors::normalized),
            bricks: raw.bricks.unwrap_or_default(),
            lifecycle,
            confidence: raw.confidence.unwrap_or(0.0),
            source_count: raw.source_count.unwrap_or(0),
            last_updated_at: raw.last_updated_at.or(raw.created_at),
            summary: raw.summary,
            id: raw.id,
        }
    }
}

impl ConceptNode {
    /// Create a loose node with no anchors
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: NodeKind::Default,
            anchors: None,
            bricks: Vec::new(),
            lifecycle: Lifecycle::Loose,
            confidence: 0.0,
            source_count: 0,
            last_updated_at: None,
            summary: None,
        }
    }

    /// With variant tag
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// With anchor partition
    #[inline]
    #[must_use]
    pub fn with_anchors(mut self, hard: &[&str], soft: &[&str]) -> Self {
        self.anchors = Some(Anchors::new(
            hard.iter().map(|s| (*s).to_string()).collect(),
            soft.iter().map(|s| (*s).to_string()).collect(),
        ));
        self
    }

    /// With legacy flat bricks
    #[inline]
    #[must_use]
    pub fn with_bricks(mut self, bricks: &[&str]) -> Self {
        self.bricks = bricks.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// With lifecycle
    #[inline]
    #[must_use]
    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// With confidence
    #[inline]
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Hard anchors, empty when the node has no partition
    #[must_use]
    pub fn hard_anchors(&self) -> &[String] {
        self.anchors
            .as_ref()
            .map(|a| a.hard.as_slice())
            .unwrap_or_default()
    }

    /// Soft anchors from the partition only (no legacy fallback)
    #[must_use]
    pub fn soft_anchors(&self) -> &[String] {
        self.anchors
            .as_ref()
            .map(|a| a.soft.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Endpoint {
    Id(String),
    Node { id: String },
}

impl Endpoint {
    fn into_id(self) -> String {
        match self {
            Self::Id(id) | Self::Node { id } => id,
        }
    }
}

#[derive(Deserialize)]
struct RawEdge {
    source: Endpoint,
    target: Endpoint,
    #[serde(default, rename = "type")]
    edge_type: Option<String>,
}

/// Directed relation between two concepts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawEdge")]
pub struct ConceptEdge {
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Relation name
    #[serde(rename = "type")]
    pub edge_type: String,
}

impl From<RawEdge> for ConceptEdge {
    fn from(raw: RawEdge) -> Self {
        Self {
            source: raw.source.into_id(),
            target: raw.target.into_id(),
            edge_type: raw
                .edge_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "related".to_string()),
        }
    }
}

impl ConceptEdge {
    /// Create an edge
    #[inline]
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type: edge_type.into(),
        }
    }

    /// Whether either endpoint is `node_id`
    #[inline]
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// The endpoint that is not `node_id` (the node itself on self-loops)
    #[must_use]
    pub fn other_end(&self, node_id: &str) -> &str {
        if self.source == node_id {
            &self.target
        } else {
            &self.source
        }
    }
}

/// Anchor curation decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorAction {
    /// Move a soft anchor to hard
    Promote,
    /// Drop a soft anchor
    Reject,
}

impl fmt::Display for AnchorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Promote => "promote",
            Self::Reject => "reject",
        })
    }
}

/// Past curation decision persisted by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorOverride {
    /// Concept the decision belongs to
    pub concept_id: String,
    /// Brick the decision is about
    pub brick_id: String,
    /// Decision
    pub action: AnchorAction,
    /// Backend status string
    #[serde(default)]
    pub status: String,
}

/// Top-level view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Query box and recalled bricks
    #[default]
    Ask,
    /// Interactive force-directed graph
    Explore,
    /// Hierarchical graph
    Visualize,
    /// Lifecycle lanes
    Wall,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn node_defaults_label_from_id() {
        let node: ConceptNode = serde_json::from_value(json!({ "id": "0123456789abcdef" })).unwrap();
        assert_eq!(node.label, "01234567");
        assert_eq!(node.kind, NodeKind::Default);
        assert_eq!(node.lifecycle, Lifecycle::Loose);
        assert!(node.anchors.is_none());
    }

    #[test]
    fn node_reads_lowercase_lifecycle_and_tags() {
        let node: ConceptNode = serde_json::from_value(json!({
            "id": "n1",
            "label": "Budget",
            "type": "Formula",
            "lifecycle": "frozen",
            "sourceCount": 3,
            "created_at": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(node.kind, NodeKind::Formula);
        assert_eq!(node.lifecycle, Lifecycle::Frozen);
        assert_eq!(node.source_count, 3);
        assert_eq!(node.last_updated_at.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn unknown_tag_kept_verbatim() {
        let node: ConceptNode =
            serde_json::from_value(json!({ "id": "n1", "type": "Hypothesis" })).unwrap();
        assert_eq!(node.kind, NodeKind::Other("Hypothesis".to_string()));
        assert_eq!(serde_json::to_value(&node.kind).unwrap(), json!("Hypothesis"));
    }

    #[test]
    fn anchors_enforce_partition() {
        let node: ConceptNode = serde_json::from_value(json!({
            "id": "n1",
            "anchors": { "hard": ["b1", "b1"], "soft": ["b1", "b2", "b2"] }
        }))
        .unwrap();
        assert_eq!(node.hard_anchors(), ["b1".to_string()]);
        assert_eq!(node.soft_anchors(), ["b2".to_string()]);
    }

    #[test]
    fn edge_endpoints_accept_objects() {
        let edge: ConceptEdge = serde_json::from_value(json!({
            "source": { "id": "a" },
            "target": "b",
            "type": "supports"
        }))
        .unwrap();
        assert_eq!(edge, ConceptEdge::new("a", "b", "supports"));
        assert_eq!(edge.other_end("a"), "b");
        assert_eq!(edge.other_end("b"), "a");
    }

    #[test]
    fn short_id_abbreviates() {
        assert_eq!(short_id("abcdefghijkl"), "abcdefgh...");
        assert_eq!(short_id("abc"), "abc...");
    }
}
