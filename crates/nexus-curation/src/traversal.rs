//! Neighbor expansion and anchor drawers
//!
//! Expanding a node reveals its edge neighbors for context only; none of
//! this touches recall or highlighting.

use crate::ledger::{AnchorIntent, AnchorLedger};
use nexus_model::{short_id, ConceptEdge, ConceptNode, GraphSnapshot};
use std::collections::HashMap;

/// Note attached to every expanded neighbor
pub const CONTEXT_NOTE: &str = "Contextual — not recalled";

/// Ordered set of node ids
pub type NodeSet = im::OrdSet<String>;

/// Symmetric difference with `{id}`
#[must_use]
pub fn toggle(set: &NodeSet, id: &str) -> NodeSet {
    if set.contains(id) {
        set.without(id)
    } else {
        set.update(id.to_string())
    }
}

/// Which nodes have their neighbors and anchor drawers open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalState {
    /// Nodes showing their neighbor list
    pub expanded_neighbors: NodeSet,
    /// Nodes showing their anchor drawer
    pub show_anchors_for: NodeSet,
}

impl TraversalState {
    #[must_use]
    pub fn toggle_neighbors(&self, id: &str) -> Self {
        Self {
            expanded_neighbors: toggle(&self.expanded_neighbors, id),
            show_anchors_for: self.show_anchors_for.clone(),
        }
    }

    #[must_use]
    pub fn toggle_anchors(&self, id: &str) -> Self {
        Self {
            expanded_neighbors: self.expanded_neighbors.clone(),
            show_anchors_for: toggle(&self.show_anchors_for, id),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_neighbors.contains(id)
    }

    #[inline]
    #[must_use]
    pub fn shows_anchors(&self, id: &str) -> bool {
        self.show_anchors_for.contains(id)
    }

    /// Drops ids no longer present in `snapshot`
    #[must_use]
    pub fn retain_known(&self, snapshot: &GraphSnapshot) -> Self {
        let keep = |set: &NodeSet| -> NodeSet {
            set.iter().filter(|id| snapshot.contains(id)).cloned().collect()
        };
        Self {
            expanded_neighbors: keep(&self.expanded_neighbors),
            show_anchors_for: keep(&self.show_anchors_for),
        }
    }
}

/// Far end of an edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Neighbor<'a> {
    /// Resolves to a node of the graph
    Known(&'a ConceptNode),
    /// Dangling endpoint
    Unresolved(&'a str),
}

impl Neighbor<'_> {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Known(node) => &node.id,
            Self::Unresolved(id) => id,
        }
    }

    /// Node label, or the shortened id for dangling endpoints
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Known(node) => node.label.clone(),
            Self::Unresolved(id) => short_id(id),
        }
    }
}

/// One row of an expanded neighbor list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborEntry<'a> {
    /// Node on the other side of the edge
    pub neighbor: Neighbor<'a>,
    /// Edge relationship
    pub edge_type: &'a str,
}

impl NeighborEntry<'_> {
    /// Always [`CONTEXT_NOTE`]
    #[inline]
    #[must_use]
    pub fn note(&self) -> &'static str {
        CONTEXT_NOTE
    }
}

/// Neighbors of `node_id` in edge order
///
/// Every edge touching the node yields one entry, so parallel edges show up
/// twice. Endpoints that resolve to no node are kept as
/// [`Neighbor::Unresolved`].
pub fn neighbors_of<'a, E, N>(node_id: &str, edges: E, nodes: N) -> Vec<NeighborEntry<'a>>
where
    E: IntoIterator<Item = &'a ConceptEdge>,
    N: IntoIterator<Item = &'a ConceptNode>,
{
    let by_id: HashMap<&str, &ConceptNode> = nodes.into_iter().map(|n| (n.id.as_str(), n)).collect();
    edges
        .into_iter()
        .filter(|e| e.touches(node_id))
        .map(|e| {
            let other = e.other_end(node_id);
            let neighbor = by_id
                .get(other)
                .map_or(Neighbor::Unresolved(other), |n| Neighbor::Known(*n));
            NeighborEntry {
                neighbor,
                edge_type: &e.edge_type,
            }
        })
        .collect()
}

/// [`neighbors_of`] over a whole snapshot
#[must_use]
pub fn neighbors_in<'a>(snapshot: &'a GraphSnapshot, node_id: &str) -> Vec<NeighborEntry<'a>> {
    neighbors_of(node_id, snapshot.edges(), snapshot.nodes())
}

/// Hard anchor row; never actionable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardAnchorRow {
    /// Anchored brick
    pub brick_id: String,
}

impl HardAnchorRow {
    /// Shortened id for display
    #[must_use]
    pub fn display_id(&self) -> String {
        short_id(&self.brick_id)
    }
}

/// Soft anchor row with its intent, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftAnchorRow {
    /// Candidate brick
    pub brick_id: String,
    /// Decision already taken for this pair
    pub intent: Option<AnchorIntent>,
}

impl SoftAnchorRow {
    /// Promote/reject buttons are shown only while undecided
    #[inline]
    #[must_use]
    pub fn actions_available(&self) -> bool {
        self.intent.is_none()
    }

    /// Intent badge replacing the buttons
    #[must_use]
    pub fn badge(&self) -> Option<&'static str> {
        self.intent.as_ref().map(AnchorIntent::badge)
    }

    /// Shortened id for display
    #[must_use]
    pub fn display_id(&self) -> String {
        short_id(&self.brick_id)
    }
}

/// Contents of one node's anchor drawer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorDrawer {
    /// Locked rows
    pub hard: Vec<HardAnchorRow>,
    /// Actionable rows
    pub soft: Vec<SoftAnchorRow>,
}

impl AnchorDrawer {
    /// Builds the drawer for `node`
    ///
    /// Nodes without an anchor partition list their legacy bricks as soft
    /// candidates. This affects the drawer only, never highlighting.
    #[must_use]
    pub fn for_node(node: &ConceptNode, ledger: &AnchorLedger) -> Self {
        let (hard, soft): (&[String], &[String]) = match &node.anchors {
            Some(anchors) => (anchors.hard.as_slice(), anchors.soft.as_slice()),
            None => (&[], node.bricks.as_slice()),
        };

        Self {
            hard: hard
                .iter()
                .map(|b| HardAnchorRow { brick_id: b.clone() })
                .collect(),
            soft: soft
                .iter()
                .map(|b| SoftAnchorRow {
                    brick_id: b.clone(),
                    intent: ledger.intent_for(&node.id, b).cloned(),
                })
                .collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hard.is_empty() && self.soft.is_empty()
    }
}
