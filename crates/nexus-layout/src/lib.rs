//! Nexus Layout - positions for the concept graph
//!
//! Two strategies, picked by view mode:
//! - [`force`]: interactive force-directed simulation with drag pinning
//! - [`hierarchical`]: left-to-right ranks along edge direction
//!
//! [`LayoutEngine`] owns graph, viewport and strategy state; [`LayoutDriver`]
//! runs an engine on a tokio task and publishes [`Frame`]s.
//!
//! # Example
//!
//! ```rust
//! use nexus_layout::{LayoutConfig, LayoutEngine, LayoutMode, Viewport};
//! use nexus_model::{ConceptEdge, ConceptNode, GraphSnapshot};
//!
//! let snapshot = GraphSnapshot::new(
//!     vec![ConceptNode::new("a", "A"), ConceptNode::new("b", "B")],
//!     vec![ConceptEdge::new("a", "b", "related")],
//! );
//! let mut engine = LayoutEngine::new(LayoutMode::Hierarchical, LayoutConfig::default());
//! engine.set_graph(snapshot);
//! assert!(engine.frame().is_none()); // not measured yet
//!
//! engine.resize(Viewport::new(800.0, 600.0));
//! let frame = engine.frame().unwrap();
//! assert!(frame.positions[0].position.x < frame.positions[1].position.x);
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod force;
pub mod geometry;
pub mod hierarchical;

pub use config::{ForceConfig, HierarchicalConfig, LayoutConfig};
pub use driver::{LayoutCommand, LayoutDriver};
pub use engine::{Frame, LayoutEngine, LayoutMode};
pub use error::LayoutError;
pub use force::{tick, Body, SimulationState};
pub use geometry::{NodePosition, Point, Viewport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
