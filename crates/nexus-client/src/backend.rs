//! Backend seam
//!
//! The explorer only ever talks to the knowledge backend through
//! [`CortexBackend`]; [`crate::HttpBackend`] is the production implementation
//! and tests substitute a scripted one.

use crate::error::BackendError;
use nexus_model::{
    Ack, AnchorRequest, AskPreview, BrickFull, BrickMeta, GraphIndex, KillRequest, PromoteRequest,
};

/// Knowledge backend operations
///
/// POST operations return `Ok` only for a genuine acknowledgment; an
/// acknowledgment carrying an `error` field surfaces as
/// [`BackendError::Rejected`].
#[async_trait::async_trait]
pub trait CortexBackend: Send + Sync {
    /// `GET /ask-preview`, hits sorted by confidence descending
    async fn ask_preview(&self, query: &str, use_genai: bool) -> Result<AskPreview, BackendError>;

    /// `GET /graph-index`, normalized
    async fn graph_index(&self) -> Result<GraphIndex, BackendError>;

    /// `GET /brick-meta`
    async fn brick_meta(&self, brick_id: &str) -> Result<BrickMeta, BackendError>;

    /// `GET /brick-full`
    async fn brick_full(&self, brick_id: &str) -> Result<BrickFull, BackendError>;

    /// `POST /anchor`
    async fn submit_anchor(&self, request: &AnchorRequest) -> Result<Ack, BackendError>;

    /// `POST /node/promote`
    async fn promote_node(&self, request: &PromoteRequest) -> Result<Ack, BackendError>;

    /// `POST /node/kill`
    async fn kill_node(&self, request: &KillRequest) -> Result<Ack, BackendError>;
}
