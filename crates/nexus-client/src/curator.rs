//! Session orchestration
//!
//! [`Curator`] pairs a [`Session`] with a [`CortexBackend`]: every operation
//! takes a ticket from the session, performs the request, and hands the
//! answer back to the session, which decides whether it still applies.
//! Failures end up in session state (status lines, inline control errors)
//! rather than tearing anything down.

use crate::backend::CortexBackend;
use crate::config::NexusConfig;
use crate::error::BackendError;
use nexus_curation::{
    CurationError, RecallStatus, Session, TransitionBody, TransitionOutcome, TransitionRequest,
    UiAction,
};
use nexus_model::AnchorAction;

/// Drives one curation session against a backend
#[derive(Debug)]
pub struct Curator<B> {
    backend: B,
    config: NexusConfig,
    session: Session,
}

impl<B: CortexBackend> Curator<B> {
    /// Create curator with an empty session
    #[must_use]
    pub fn new(backend: B, config: NexusConfig) -> Self {
        Self {
            backend,
            config,
            session: Session::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &NexusConfig {
        &self.config
    }

    /// Applies a navigation action
    pub fn dispatch(&mut self, action: UiAction) {
        self.session = self.session.dispatch(action);
    }

    /// Fetches the graph and starts a fresh ledger
    ///
    /// # Errors
    /// The backend error; the session shows the graph as unavailable and
    /// keeps whatever graph it had.
    pub async fn load_graph(&mut self) -> Result<(), BackendError> {
        match self.backend.graph_index().await {
            Ok(index) => {
                self.session = self.session.load_graph(index);
                Ok(())
            }
            Err(err) => {
                self.session = self.session.graph_failed(&err);
                Err(err)
            }
        }
    }

    /// Re-fetches the graph, keeping session intents
    ///
    /// # Errors
    /// As [`Curator::load_graph`].
    pub async fn refresh_graph(&mut self) -> Result<(), BackendError> {
        match self.backend.graph_index().await {
            Ok(index) => {
                self.session = self.session.refresh_graph(index);
                Ok(())
            }
            Err(err) => {
                self.session = self.session.graph_failed(&err);
                Err(err)
            }
        }
    }

    /// Runs a recall; `None` for a blank query
    pub async fn ask(&mut self, query: &str) -> Option<RecallStatus> {
        let (next, ticket) = self.session.begin_recall(query)?;
        self.session = next;
        let outcome = self.backend.ask_preview(&ticket.query, self.config.use_genai).await;
        self.session = self.session.resolve_recall(&ticket, outcome);
        Some(self.session.recall().status())
    }

    /// Selects a brick and loads its details
    ///
    /// Full text is only requested once the metadata arrived.
    pub async fn select_brick(&mut self, brick_id: Option<&str>) {
        let (next, ticket) = self.session.select_brick(brick_id);
        self.session = next;
        let Some(ticket) = ticket else {
            return;
        };

        let meta = self.backend.brick_meta(&ticket.brick_id).await;
        let loaded = meta.is_ok();
        self.session = self.session.resolve_brick_meta(&ticket, meta);
        if loaded {
            let full = self.backend.brick_full(&ticket.brick_id).await;
            self.session = self.session.resolve_brick_full(&ticket, full);
        }
    }

    /// Records an anchor decision and submits it
    ///
    /// Returns `false` when the pair was already decided and nothing was
    /// sent. A successful submission refreshes the graph.
    ///
    /// # Errors
    /// The submission error; the intent stays recorded and the error is
    /// shown next to the anchor.
    pub async fn anchor(
        &mut self,
        concept_id: &str,
        brick_id: &str,
        action: AnchorAction,
    ) -> Result<bool, BackendError> {
        let (next, request) = self.session.record_anchor(concept_id, brick_id, action);
        self.session = next;
        let Some(request) = request else {
            tracing::debug!(concept_id, brick_id, "anchor already decided");
            return Ok(false);
        };

        if let Err(err) = self.backend.submit_anchor(&request).await {
            self.session = self
                .session
                .anchor_failed(concept_id, brick_id, &err.user_message());
            return Err(err);
        }
        if let Err(err) = self.refresh_graph().await {
            tracing::warn!(%err, "refresh after anchor failed");
        }
        Ok(true)
    }

    /// Promotes a node one step
    ///
    /// # Errors
    /// Local refusals only; backend problems are reported in the outcome.
    pub async fn promote(&mut self, node_id: &str) -> Result<TransitionOutcome, CurationError> {
        self.transition(node_id, TransitionRequest::Promote).await
    }

    /// Kills a node
    ///
    /// # Errors
    /// [`CurationError::MissingReason`] for a blank reason (also shown on
    /// the node's controls), plus the refusals of [`Curator::promote`].
    pub async fn kill(
        &mut self,
        node_id: &str,
        reason: &str,
    ) -> Result<TransitionOutcome, CurationError> {
        let request = TransitionRequest::Kill {
            reason: reason.to_string(),
        };
        self.transition(node_id, request).await
    }

    async fn transition(
        &mut self,
        node_id: &str,
        request: TransitionRequest,
    ) -> Result<TransitionOutcome, CurationError> {
        let (pending, ticket) = match self
            .session
            .begin_transition(node_id, request, &self.config.actor)
        {
            Ok(started) => started,
            Err(err) => {
                if err.is_user_facing() {
                    self.session = self.session.control_failed(node_id, &err.to_string());
                }
                return Err(err);
            }
        };
        self.session = pending;

        let result = match &ticket.body {
            TransitionBody::Promote(body) => self.backend.promote_node(body).await,
            TransitionBody::Kill(body) => self.backend.kill_node(body).await,
        };
        let outcome = match result {
            Ok(_) => TransitionOutcome::Acknowledged,
            Err(BackendError::Rejected(message)) => TransitionOutcome::Rejected(message),
            Err(err) => TransitionOutcome::Failed(err.user_message()),
        };
        self.session = self.session.resolve_transition(&ticket, outcome.clone());
        Ok(outcome)
    }
}
