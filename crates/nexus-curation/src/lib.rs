//! Nexus Curation - the user's side of the concept graph
//!
//! Everything here is pure: operations take the current value and return a
//! new one, backed by `im` persistent collections.
//! - [`AnchorLedger`]: idempotent promote/reject intents per concept/brick
//! - [`highlight`]: strong/weak/none classification against a recall
//! - [`traversal`]: neighbor expansion and anchor drawers
//! - [`wall`]: lifecycle lanes ordered by state then confidence
//! - [`Session`]: navigation, recall and ticketed lifecycle transitions
//!
//! # Example
//!
//! ```rust
//! use nexus_curation::{Session, TransitionOutcome, TransitionRequest};
//! use nexus_model::{ConceptNode, GraphIndex, GraphSnapshot, Lifecycle};
//!
//! let index = GraphIndex {
//!     snapshot: GraphSnapshot::new(vec![ConceptNode::new("n1", "Budget")], vec![]),
//!     ..GraphIndex::default()
//! };
//! let session = Session::new().load_graph(index);
//!
//! let (pending, ticket) = session
//!     .begin_transition("n1", TransitionRequest::Promote, "me")
//!     .unwrap();
//! let done = pending.resolve_transition(&ticket, TransitionOutcome::Acknowledged);
//! assert_eq!(done.snapshot().unwrap().node("n1").unwrap().lifecycle, Lifecycle::Forming);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod highlight;
pub mod ledger;
pub mod recall;
pub mod session;
pub mod state;
pub mod traversal;
pub mod wall;

pub use error::CurationError;
pub use highlight::{classify, classify_all, HighlightLevel};
pub use ledger::{AnchorIntent, AnchorKey, AnchorLedger, IntentOrigin};
pub use recall::{BrickPanel, RecallStatus, RecallView};
pub use session::{
    BrickTicket, ControlStatus, ControlView, GraphView, RecallTicket, Session, TransitionBody,
    TransitionOutcome, TransitionRequest, TransitionTicket,
};
pub use state::{reduce, AppState, UiAction};
pub use traversal::{neighbors_of, toggle, AnchorDrawer, Neighbor, NeighborEntry, TraversalState};
pub use wall::{order, Wall, WallItem, WallOrder};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a curation session
    pub use crate::{
        AnchorLedger, AppState, CurationError, HighlightLevel, Session, TransitionOutcome,
        TransitionRequest, UiAction, Wall,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
