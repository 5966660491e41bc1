//! Nexus Model - canonical concept graph
//!
//! Everything downstream works on the shapes defined here:
//! - [`GraphSnapshot`]: immutable, structurally shared nodes + edges
//! - [`normalize`] / [`GraphIndex`]: the single boundary that absorbs payload
//!   shape ambiguity
//! - [`lifecycle`]: the LOOSE → FORMING → FROZEN / KILLED state machine
//! - [`wire`]: request/response bodies of the backend contract
//!
//! # Example
//!
//! ```rust
//! use nexus_model::{normalize, Lifecycle};
//! use serde_json::json;
//!
//! let snapshot = normalize(&json!({
//!     "nodes": { "nodes": [{ "id": "n1", "label": "Budget" }] },
//!     "edges": []
//! }));
//! assert_eq!(snapshot.nodes()[0].lifecycle, Lifecycle::Loose);
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod types;
pub mod wire;

pub use error::{LifecycleError, ModelError};
pub use graph::{normalize, GraphIndex, GraphSnapshot, Shape};
pub use lifecycle::{ControlButton, ControlSurface, Lifecycle, LifecycleAction};
pub use types::{
    short_id, AnchorAction, AnchorOverride, Anchors, Brick, ConceptEdge, ConceptNode, NodeKind,
    ViewMode,
};
pub use wire::{
    Ack, AnchorRequest, AskPreview, BrickFull, BrickHit, BrickMeta, KillRequest, PromoteRequest,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
