//! Curation errors
//!
//! Raised locally, before any request leaves the client.

use nexus_model::LifecycleError;

/// Curation error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurationError {
    /// The node's state does not accept the action
    #[error("lifecycle: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Kill without a reason
    #[error("a reason is required to kill a node")]
    MissingReason,

    /// No node with this id in the current graph
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// No graph loaded yet
    #[error("no graph loaded")]
    NoGraph,
}

impl CurationError {
    /// Whether the UI should show this inline next to the controls
    ///
    /// Lifecycle refusals are silent no-ops; the controls are not offered
    /// for terminal nodes in the first place.
    #[inline]
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::MissingReason)
    }
}
