//! Graph snapshot and payload normalization
//!
//! The backend may send `nodes`/`edges` either as a plain array or wrapped
//! one level (`{"nodes": [...]}`). [`Shape::detect`] classifies the payload
//! once; everything past that point works on the canonical sequence.
//! Unrecognized shapes produce an empty sequence, elements that fail to
//! decode are skipped.

use crate::error::ModelError;
use crate::lifecycle::Lifecycle;
use crate::types::{AnchorOverride, ConceptEdge, ConceptNode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// How a sequence field arrived on the wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// `[...]`
    Direct(&'a [Value]),
    /// `{"<key>": [...]}`
    Wrapped(&'a [Value]),
    /// Missing, null, or anything else
    Unrecognized,
}

impl<'a> Shape<'a> {
    /// Classifies `raw` for the wrapper key `key`
    #[must_use]
    pub fn detect(raw: Option<&'a Value>, key: &str) -> Self {
        match raw {
            Some(Value::Array(items)) => Self::Direct(items),
            Some(Value::Object(map)) => match map.get(key) {
                Some(Value::Array(items)) => Self::Wrapped(items),
                _ => Self::Unrecognized,
            },
            _ => Self::Unrecognized,
        }
    }

    /// Canonical element slice
    #[must_use]
    pub fn items(self) -> &'a [Value] {
        match self {
            Self::Direct(items) | Self::Wrapped(items) => items,
            Self::Unrecognized => &[],
        }
    }
}

fn decode_sequence<T: DeserializeOwned>(raw: Option<&Value>, key: &str) -> Vec<T> {
    let shape = Shape::detect(raw, key);
    if shape == Shape::Unrecognized && raw.is_some_and(|v| !v.is_null()) {
        tracing::warn!(field = key, "unrecognized payload shape, using empty sequence");
    }

    shape
        .items()
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(field = key, index, %err, "skipping undecodable element");
                None
            }
        })
        .collect()
}

/// Immutable graph state shared by every view for one render
///
/// Actions never mutate a snapshot; they return a new one with a higher
/// revision. Clones are cheap (structural sharing).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    nodes: im::Vector<ConceptNode>,
    edges: im::Vector<ConceptEdge>,
    revision: u64,
}

impl GraphSnapshot {
    /// Create snapshot from canonical sequences
    #[must_use]
    pub fn new(nodes: Vec<ConceptNode>, edges: Vec<ConceptEdge>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
            edges: edges.into_iter().collect(),
            revision: 0,
        }
    }

    /// With explicit revision
    #[inline]
    #[must_use]
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    /// Nodes in input order
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &im::Vector<ConceptNode> {
        &self.nodes
    }

    /// Edges in input order
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &im::Vector<ConceptEdge> {
        &self.edges
    }

    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&ConceptNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Whether an id resolves to a node
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Edges touching `id`, in input order
    pub fn edges_touching<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ConceptEdge> + 'a {
        self.edges.iter().filter(move |e| e.touches(id))
    }

    /// Structural identity of the node/edge set
    ///
    /// Lifecycle or label changes keep the fingerprint; adding, removing or
    /// rewiring nodes changes it.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.nodes.len().hash(&mut hasher);
        for node in &self.nodes {
            node.id.hash(&mut hasher);
        }
        self.edges.len().hash(&mut hasher);
        for edge in &self.edges {
            edge.source.hash(&mut hasher);
            edge.target.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// New snapshot with one node's lifecycle replaced
    ///
    /// # Errors
    /// [`ModelError::NodeNotFound`] when `node_id` is not in the snapshot;
    /// the receiver is left untouched either way.
    pub fn with_lifecycle(&self, node_id: &str, lifecycle: Lifecycle) -> Result<Self, ModelError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| ModelError::NodeNotFound(node_id.to_string()))?;

        let mut nodes = self.nodes.clone();
        let mut node = nodes[index].clone();
        node.lifecycle = lifecycle;
        nodes.set(index, node);

        Ok(Self {
            nodes,
            edges: self.edges.clone(),
            revision: self.revision + 1,
        })
    }
}

/// Normalizes a raw payload holding `nodes` and `edges`.
///
/// Never fails: unknown shapes yield empty sequences.
#[must_use]
pub fn normalize(raw: &Value) -> GraphSnapshot {
    let nodes: Vec<ConceptNode> = decode_sequence(raw.get("nodes"), "nodes");
    let edges: Vec<ConceptEdge> = decode_sequence(raw.get("edges"), "edges");
    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "normalized graph payload");
    GraphSnapshot::new(nodes, edges)
}

/// Normalized `/graph-index` response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphIndex {
    /// Canonical graph
    pub snapshot: GraphSnapshot,
    /// Human-curated index text, rendered elsewhere
    pub index_content: String,
    /// Durable anchor decisions to seed the ledger with
    pub anchor_overrides: Vec<AnchorOverride>,
}

impl GraphIndex {
    /// Normalizes a decoded response body
    #[must_use]
    pub fn from_value(raw: &Value) -> Self {
        let index_content = raw
            .get("index_content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let anchor_overrides = match raw.get("anchor_overrides") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match AnchorOverride::deserialize(item) {
                    Ok(o) => Some(o),
                    Err(err) => {
                        tracing::warn!(%err, "skipping undecodable anchor override");
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            snapshot: normalize(raw),
            index_content,
            anchor_overrides,
        }
    }

    /// Parses and normalizes a response body
    ///
    /// # Errors
    /// Only when the text is not JSON; shape problems degrade instead.
    pub fn from_json_str(text: &str) -> Result<Self, ModelError> {
        let raw: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&raw))
    }
}
