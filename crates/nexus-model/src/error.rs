//! Error types for the graph model
//!
//! Normalization itself never fails; these errors only surface at the
//! boundaries that accept raw text or request an illegal lifecycle move.

use crate::lifecycle::{Lifecycle, LifecycleAction};

/// Errors raised while reading raw payloads
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Payload is not valid JSON at all
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Node referenced by an action is not part of the snapshot
    #[error("node not found: {0}")]
    NodeNotFound(String),
}

/// Lifecycle state machine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The current state does not accept the action
    #[error("cannot {action} a {state} node")]
    Terminal {
        /// State the node is in
        state: Lifecycle,
        /// Action that was requested
        action: LifecycleAction,
    },
}

impl LifecycleError {
    /// State that refused the action
    #[inline]
    #[must_use]
    pub fn state(&self) -> Lifecycle {
        match self {
            Self::Terminal { state, .. } => *state,
        }
    }
}
