//! Curation session
//!
//! [`Session`] bundles navigation state, the current graph, the anchor
//! ledger, traversal sets, recall results and per-node control status.
//! Every field is persistent, so a session is cheap to clone and every
//! operation returns a new one.
//!
//! Requests are split in two halves: a `begin_*` call validates and returns
//! a ticket carrying the wire body, and the matching `resolve_*` call applies
//! the response. Tickets are stamped with the navigation epoch; a response
//! whose epoch no longer matches is dropped whole.

use crate::error::CurationError;
use crate::highlight::{classify_all, HighlightLevel};
use crate::ledger::{AnchorKey, AnchorLedger};
use crate::recall::{BrickPanel, RecallView};
use crate::state::{reduce, AppState, UiAction};
use crate::traversal::{neighbors_in, AnchorDrawer, NeighborEntry, TraversalState};
use crate::wall::Wall;
use nexus_model::lifecycle;
use nexus_model::{
    AnchorAction, AnchorRequest, AskPreview, BrickFull, BrickMeta, ConceptNode, ControlButton,
    ControlSurface, GraphIndex, GraphSnapshot, KillRequest, Lifecycle, LifecycleAction,
    PromoteRequest, ViewMode,
};
use std::fmt;

/// Status line when the graph could not be fetched
pub const GRAPH_UNAVAILABLE: &str = "Graph unavailable";

/// Loaded graph plus its index text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphView {
    /// Canonical graph
    pub snapshot: GraphSnapshot,
    /// Curated index text
    pub index_content: String,
}

/// State of one node's control strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlStatus {
    /// A transition request is in flight
    Pending {
        /// Ticket awaiting resolution
        ticket: u64,
        /// Requested action
        action: LifecycleAction,
    },
    /// Last request was rejected or failed
    Failed(String),
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionRequest {
    /// One step towards FROZEN
    Promote,
    /// Kill with a justification
    Kill {
        /// Free-text reason, must not be blank
        reason: String,
    },
}

impl TransitionRequest {
    /// Lifecycle action behind the request
    #[must_use]
    pub fn action(&self) -> LifecycleAction {
        match self {
            Self::Promote => LifecycleAction::Promote,
            Self::Kill { .. } => LifecycleAction::Kill,
        }
    }
}

/// Wire body of a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionBody {
    /// `POST /node/promote`
    Promote(PromoteRequest),
    /// `POST /node/kill`
    Kill(KillRequest),
}

/// In-flight lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTicket {
    /// Monotonic ticket id
    pub id: u64,
    /// Epoch the request was issued under
    pub epoch: u64,
    /// Node being transitioned
    pub node_id: String,
    /// Requested action
    pub action: LifecycleAction,
    /// State applied on acknowledgment
    pub target: Lifecycle,
    /// Body to send
    pub body: TransitionBody,
}

/// How the backend answered a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Accepted
    Acknowledged,
    /// Answered with an error body
    Rejected(String),
    /// Never answered (transport, timeout, bad status)
    Failed(String),
}

/// In-flight recall preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecallTicket {
    /// Sequence number; only the latest one applies
    pub seq: u64,
    /// Trimmed query
    pub query: String,
}

/// In-flight brick detail request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrickTicket {
    /// Epoch of the selection
    pub epoch: u64,
    /// Selected brick
    pub brick_id: String,
}

/// Control strip as rendered for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    /// Buttons or read-only status
    pub surface: ControlSurface,
    /// A request is in flight
    pub pending: bool,
    /// Inline error from the last request
    pub error: Option<String>,
}

impl ControlView {
    /// Buttons that may be pressed right now
    #[must_use]
    pub fn enabled_buttons(&self) -> Vec<ControlButton> {
        if self.pending {
            Vec::new()
        } else {
            self.surface.buttons()
        }
    }
}

/// One user's curation session
#[derive(Debug, Clone, Default)]
pub struct Session {
    app: AppState,
    graph: Option<GraphView>,
    graph_error: Option<String>,
    ledger: AnchorLedger,
    traversal: TraversalState,
    recall: RecallView,
    recall_seq: u64,
    brick: BrickPanel,
    controls: im::HashMap<String, ControlStatus>,
    anchor_errors: im::OrdMap<AnchorKey, String>,
    next_ticket: u64,
}

impl Session {
    /// Empty session in ask mode
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn app(&self) -> &AppState {
        &self.app
    }

    #[inline]
    #[must_use]
    pub fn graph(&self) -> Option<&GraphView> {
        self.graph.as_ref()
    }

    /// Current snapshot, if a graph is loaded
    #[must_use]
    pub fn snapshot(&self) -> Option<&GraphSnapshot> {
        self.graph.as_ref().map(|g| &g.snapshot)
    }

    /// Status line for the graph views
    #[must_use]
    pub fn graph_error(&self) -> Option<&str> {
        self.graph_error.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn ledger(&self) -> &AnchorLedger {
        &self.ledger
    }

    #[inline]
    #[must_use]
    pub fn traversal(&self) -> &TraversalState {
        &self.traversal
    }

    #[inline]
    #[must_use]
    pub fn recall(&self) -> &RecallView {
        &self.recall
    }

    #[inline]
    #[must_use]
    pub fn brick_panel(&self) -> &BrickPanel {
        &self.brick
    }

    /// Error from the last anchor submission for a pair
    #[must_use]
    pub fn anchor_error(&self, concept_id: &str, brick_id: &str) -> Option<&str> {
        self.anchor_errors
            .get(&AnchorKey::new(concept_id, brick_id))
            .map(String::as_str)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Applies a navigation action
    ///
    /// When the epoch moves, pending transitions are abandoned.
    #[must_use]
    pub fn dispatch(&self, action: UiAction) -> Self {
        let mut next = self.clone();
        next.app = reduce(&self.app, action);
        if next.app.epoch != self.app.epoch {
            next.controls = self
                .controls
                .iter()
                .filter(|(_, s)| !matches!(s, ControlStatus::Pending { .. }))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
        }
        next
    }

    /// Switches view mode
    #[must_use]
    pub fn set_mode(&self, mode: ViewMode) -> Self {
        self.dispatch(UiAction::SetMode(mode))
    }

    /// Selects a graph node
    #[must_use]
    pub fn select_node(&self, node_id: Option<&str>) -> Self {
        self.dispatch(UiAction::SelectNode(node_id.map(str::to_string)))
    }

    #[must_use]
    pub fn toggle_neighbors(&self, node_id: &str) -> Self {
        let mut next = self.clone();
        next.traversal = self.traversal.toggle_neighbors(node_id);
        next
    }

    #[must_use]
    pub fn toggle_anchors(&self, node_id: &str) -> Self {
        let mut next = self.clone();
        next.traversal = self.traversal.toggle_anchors(node_id);
        next
    }

    // ------------------------------------------------------------------
    // Graph
    // ------------------------------------------------------------------

    /// Installs a freshly fetched graph, starting a new ledger
    #[must_use]
    pub fn load_graph(&self, index: GraphIndex) -> Self {
        let ledger = self.ledger.reset().seed_from_overrides(&index.anchor_overrides);
        self.install_graph(index, ledger)
    }

    /// Installs a refreshed graph, keeping session intents and in-flight
    /// transitions
    #[must_use]
    pub fn refresh_graph(&self, index: GraphIndex) -> Self {
        let ledger = self.ledger.seed_from_overrides(&index.anchor_overrides);
        self.install_graph(index, ledger)
    }

    fn install_graph(&self, index: GraphIndex, ledger: AnchorLedger) -> Self {
        let revision = self.snapshot().map_or(0, |s| s.revision() + 1);
        let snapshot = index.snapshot.with_revision(revision);
        tracing::info!(
            nodes = snapshot.nodes().len(),
            edges = snapshot.edges().len(),
            revision,
            "graph installed"
        );

        let mut next = self.clone();
        next.traversal = self.traversal.retain_known(&snapshot);
        next.controls = self
            .controls
            .iter()
            .filter(|(id, status)| {
                matches!(status, ControlStatus::Pending { .. }) && snapshot.contains(id)
            })
            .map(|(id, status)| (id.clone(), status.clone()))
            .collect();
        next.graph = Some(GraphView {
            snapshot,
            index_content: index.index_content,
        });
        next.graph_error = None;
        next.ledger = ledger;
        next
    }

    /// Records a failed graph fetch; the previous graph stays visible
    #[must_use]
    pub fn graph_failed(&self, err: &dyn fmt::Display) -> Self {
        tracing::warn!(%err, "graph fetch failed");
        let mut next = self.clone();
        next.graph_error = Some(GRAPH_UNAVAILABLE.to_string());
        next
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Highlight level of every node against the current recall
    #[must_use]
    pub fn highlights(&self) -> Vec<(String, HighlightLevel)> {
        self.snapshot()
            .map(|s| classify_all(s, &self.recall.recalled_ids()))
            .unwrap_or_default()
    }

    /// Neighbors of an expanded node; empty while collapsed
    #[must_use]
    pub fn neighbors(&self, node_id: &str) -> Vec<NeighborEntry<'_>> {
        match self.snapshot() {
            Some(snapshot) if self.traversal.is_expanded(node_id) => neighbors_in(snapshot, node_id),
            _ => Vec::new(),
        }
    }

    /// Anchor drawer of an open node
    #[must_use]
    pub fn drawer(&self, node_id: &str) -> Option<AnchorDrawer> {
        if !self.traversal.shows_anchors(node_id) {
            return None;
        }
        let node = self.snapshot()?.node(node_id)?;
        Some(AnchorDrawer::for_node(node, &self.ledger))
    }

    /// Nodes laid out on the lifecycle wall
    #[must_use]
    pub fn wall(&self) -> Wall<&ConceptNode> {
        match self.snapshot() {
            Some(snapshot) => Wall::new(snapshot.nodes().iter()),
            None => Wall::new(std::iter::empty()),
        }
    }

    /// Control strip for a node
    #[must_use]
    pub fn control_view(&self, node_id: &str) -> Option<ControlView> {
        let node = self.snapshot()?.node(node_id)?;
        let (pending, error) = match self.controls.get(node_id) {
            Some(ControlStatus::Pending { .. }) => (true, None),
            Some(ControlStatus::Failed(msg)) => (false, Some(msg.clone())),
            None => (false, None),
        };
        Some(ControlView {
            surface: ControlSurface::for_state(node.lifecycle),
            pending,
            error,
        })
    }

    // ------------------------------------------------------------------
    // Anchors
    // ------------------------------------------------------------------

    /// Records an anchor decision
    ///
    /// Returns the request to submit, or `None` when the pair was already
    /// decided.
    #[must_use]
    pub fn record_anchor(
        &self,
        concept_id: &str,
        brick_id: &str,
        action: AnchorAction,
    ) -> (Self, Option<AnchorRequest>) {
        if self.ledger.intent_for(concept_id, brick_id).is_some() {
            return (self.clone(), None);
        }
        let mut next = self.clone();
        next.ledger = self.ledger.record_intent(concept_id, brick_id, action);
        next.anchor_errors = self.anchor_errors.without(&AnchorKey::new(concept_id, brick_id));
        let request = AnchorRequest {
            brick_id: brick_id.to_string(),
            action,
        };
        (next, Some(request))
    }

    /// Marks an anchor submission as failed; the intent is kept
    #[must_use]
    pub fn anchor_failed(&self, concept_id: &str, brick_id: &str, message: &str) -> Self {
        tracing::warn!(concept_id, brick_id, message, "anchor submission failed");
        let mut next = self.clone();
        next.anchor_errors = self
            .anchor_errors
            .update(AnchorKey::new(concept_id, brick_id), message.to_string());
        next
    }

    // ------------------------------------------------------------------
    // Recall
    // ------------------------------------------------------------------

    /// Starts a recall; `None` for blank queries
    #[must_use]
    pub fn begin_recall(&self, query: &str) -> Option<(Self, RecallTicket)> {
        let recall = RecallView::begin(query)?;
        let mut next = self.clone();
        next.recall_seq = self.recall_seq + 1;
        let ticket = RecallTicket {
            seq: next.recall_seq,
            query: recall.query().to_string(),
        };
        next.recall = recall;
        Some((next, ticket))
    }

    /// Applies a preview; superseded queries are dropped
    #[must_use]
    pub fn resolve_recall<E: fmt::Display>(
        &self,
        ticket: &RecallTicket,
        outcome: Result<AskPreview, E>,
    ) -> Self {
        if ticket.seq != self.recall_seq {
            tracing::debug!(query = %ticket.query, "dropping superseded recall");
            return self.clone();
        }
        let mut next = self.clone();
        next.recall = self.recall.resolve(outcome);
        next
    }

    // ------------------------------------------------------------------
    // Brick detail
    // ------------------------------------------------------------------

    /// Selects a brick; returns the detail ticket when one must be fetched
    #[must_use]
    pub fn select_brick(&self, brick_id: Option<&str>) -> (Self, Option<BrickTicket>) {
        let mut next = self.dispatch(UiAction::SelectBrick(brick_id.map(str::to_string)));
        match brick_id {
            Some(id) => {
                next.brick = BrickPanel::Loading {
                    brick_id: id.to_string(),
                };
                let ticket = BrickTicket {
                    epoch: next.app.epoch,
                    brick_id: id.to_string(),
                };
                (next, Some(ticket))
            }
            None => {
                next.brick = BrickPanel::Closed;
                (next, None)
            }
        }
    }

    /// Applies brick metadata for a live selection
    #[must_use]
    pub fn resolve_brick_meta<E: fmt::Display>(
        &self,
        ticket: &BrickTicket,
        outcome: Result<BrickMeta, E>,
    ) -> Self {
        if ticket.epoch != self.app.epoch {
            tracing::debug!(brick_id = %ticket.brick_id, "dropping stale brick metadata");
            return self.clone();
        }
        let mut next = self.clone();
        next.brick = self.brick.with_meta(&ticket.brick_id, outcome);
        next
    }

    /// Attaches full text for a live selection; failures keep the panel
    #[must_use]
    pub fn resolve_brick_full<E: fmt::Display>(
        &self,
        ticket: &BrickTicket,
        outcome: Result<BrickFull, E>,
    ) -> Self {
        if ticket.epoch != self.app.epoch {
            return self.clone();
        }
        match outcome {
            Ok(full) => {
                let mut next = self.clone();
                next.brick = self.brick.with_full(full);
                next
            }
            Err(err) => {
                tracing::warn!(brick_id = %ticket.brick_id, %err, "full text fetch failed");
                self.clone()
            }
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle transitions
    // ------------------------------------------------------------------

    /// Validates a transition and marks the node's controls pending
    ///
    /// Nothing about the node changes until [`Session::resolve_transition`]
    /// sees an acknowledgment.
    ///
    /// # Errors
    /// - [`CurationError::NoGraph`] / [`CurationError::UnknownNode`]
    /// - [`CurationError::Lifecycle`] when the node's state refuses the action
    /// - [`CurationError::MissingReason`] for a blank kill reason
    pub fn begin_transition(
        &self,
        node_id: &str,
        request: TransitionRequest,
        actor: &str,
    ) -> Result<(Self, TransitionTicket), CurationError> {
        let snapshot = self.snapshot().ok_or(CurationError::NoGraph)?;
        let node = snapshot
            .node(node_id)
            .ok_or_else(|| CurationError::UnknownNode(node_id.to_string()))?;
        let action = request.action();
        let target = lifecycle::validate(node.lifecycle, action)?;

        let body = match request {
            TransitionRequest::Promote => TransitionBody::Promote(PromoteRequest {
                node_id: node_id.to_string(),
                promote_bricks: self.ledger.promoted_for(node_id),
                actor: actor.to_string(),
            }),
            TransitionRequest::Kill { reason } => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return Err(CurationError::MissingReason);
                }
                TransitionBody::Kill(KillRequest {
                    node_id: node_id.to_string(),
                    reason: reason.to_string(),
                    actor: actor.to_string(),
                })
            }
        };

        let mut next = self.clone();
        next.next_ticket = self.next_ticket + 1;
        let ticket = TransitionTicket {
            id: next.next_ticket,
            epoch: self.app.epoch,
            node_id: node_id.to_string(),
            action,
            target,
            body,
        };
        next.controls = self.controls.update(
            node_id.to_string(),
            ControlStatus::Pending {
                ticket: ticket.id,
                action,
            },
        );

        tracing::info!(
            node_id,
            %action,
            from = %node.lifecycle,
            to = %target,
            ticket = ticket.id,
            "transition requested"
        );
        Ok((next, ticket))
    }

    /// Shows a locally raised error on the node's controls
    #[must_use]
    pub fn control_failed(&self, node_id: &str, message: &str) -> Self {
        let mut next = self.clone();
        next.controls = self
            .controls
            .update(node_id.to_string(), ControlStatus::Failed(message.to_string()));
        next
    }

    /// Applies the backend's answer to a transition
    ///
    /// Stale tickets (older epoch) and tickets for vanished nodes are dropped
    /// whole. An acknowledgment sets the ticket's target state; anything else
    /// leaves the lifecycle alone and shows the message inline.
    #[must_use]
    pub fn resolve_transition(&self, ticket: &TransitionTicket, outcome: TransitionOutcome) -> Self {
        if ticket.epoch != self.app.epoch {
            tracing::debug!(ticket = ticket.id, node_id = %ticket.node_id, "dropping stale transition");
            return self.clone();
        }
        let Some(graph) = self.graph.as_ref() else {
            return self.clone();
        };
        if !graph.snapshot.contains(&ticket.node_id) {
            tracing::debug!(node_id = %ticket.node_id, "transition target vanished");
            return self.clone();
        }

        let superseded = matches!(
            self.controls.get(&ticket.node_id),
            Some(ControlStatus::Pending { ticket: newer, .. }) if *newer > ticket.id
        );

        let mut next = self.clone();
        match outcome {
            TransitionOutcome::Acknowledged => {
                let Ok(snapshot) = graph.snapshot.with_lifecycle(&ticket.node_id, ticket.target) else {
                    return self.clone();
                };
                tracing::info!(node_id = %ticket.node_id, to = %ticket.target, "transition applied");
                next.graph = Some(GraphView {
                    snapshot,
                    index_content: graph.index_content.clone(),
                });
                if !superseded {
                    next.controls = self.controls.without(&ticket.node_id);
                }
            }
            TransitionOutcome::Rejected(message) | TransitionOutcome::Failed(message) => {
                tracing::warn!(node_id = %ticket.node_id, %message, "transition not applied");
                if !superseded {
                    next.controls = self
                        .controls
                        .update(ticket.node_id.clone(), ControlStatus::Failed(message));
                }
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_model::{AnchorOverride, BrickHit, ConceptEdge};
    use pretty_assertions::assert_eq;

    fn index() -> GraphIndex {
        GraphIndex {
            snapshot: GraphSnapshot::new(
                vec![
                    ConceptNode::new("n1", "Budget").with_anchors(&["b1"], &["b2"]),
                    ConceptNode::new("n2", "Forecast").with_lifecycle(Lifecycle::Forming),
                    ConceptNode::new("n3", "Old").with_lifecycle(Lifecycle::Killed),
                ],
                vec![ConceptEdge::new("n1", "n2", "supports")],
            ),
            index_content: "# Index".into(),
            anchor_overrides: vec![AnchorOverride {
                concept_id: "n1".into(),
                brick_id: "b9".into(),
                action: AnchorAction::Promote,
                status: "applied".into(),
            }],
        }
    }

    fn loaded() -> Session {
        Session::new().load_graph(index())
    }

    fn lifecycle_of(session: &Session, id: &str) -> Lifecycle {
        session.snapshot().unwrap().node(id).unwrap().lifecycle
    }

    #[test]
    fn promote_applies_only_on_ack() {
        let session = loaded();
        let (pending, ticket) = session
            .begin_transition("n1", TransitionRequest::Promote, "user")
            .unwrap();
        assert_eq!(lifecycle_of(&pending, "n1"), Lifecycle::Loose);
        assert!(pending.control_view("n1").unwrap().enabled_buttons().is_empty());

        let done = pending.resolve_transition(&ticket, TransitionOutcome::Acknowledged);
        assert_eq!(lifecycle_of(&done, "n1"), Lifecycle::Forming);
        let view = done.control_view("n1").unwrap();
        assert!(!view.pending);
        assert_eq!(view.enabled_buttons()[0].label, "Promote to FROZEN");
    }

    #[test]
    fn refresh_keeps_pending_transitions() {
        let (pending, ticket) = loaded()
            .begin_transition("n1", TransitionRequest::Promote, "user")
            .unwrap();
        let (pending, _) = pending
            .begin_transition("n2", TransitionRequest::Kill { reason: "dup".into() }, "user")
            .unwrap();

        let mut shrunk = index();
        shrunk.snapshot = GraphSnapshot::new(
            vec![ConceptNode::new("n1", "Budget").with_anchors(&["b1"], &["b2"])],
            vec![],
        );
        let refreshed = pending.refresh_graph(shrunk);
        assert!(refreshed.control_view("n1").unwrap().pending);
        assert!(refreshed.control_view("n1").unwrap().enabled_buttons().is_empty());
        assert!(!refreshed.controls.contains_key("n2"));

        let done = refreshed.resolve_transition(&ticket, TransitionOutcome::Acknowledged);
        assert_eq!(lifecycle_of(&done, "n1"), Lifecycle::Forming);
        assert!(!done.control_view("n1").unwrap().pending);
    }

    #[test]
    fn failed_promote_keeps_lifecycle_and_shows_error() {
        let (pending, ticket) = loaded()
            .begin_transition("n1", TransitionRequest::Promote, "user")
            .unwrap();
        let failed = pending.resolve_transition(
            &ticket,
            TransitionOutcome::Failed("connection refused".into()),
        );
        assert_eq!(lifecycle_of(&failed, "n1"), Lifecycle::Loose);
        assert_eq!(
            failed.control_view("n1").unwrap().error.as_deref(),
            Some("connection refused")
        );
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let (pending, ticket) = loaded()
            .begin_transition("n1", TransitionRequest::Promote, "user")
            .unwrap();
        let moved = pending.select_node(Some("n2"));
        let after = moved.resolve_transition(&ticket, TransitionOutcome::Acknowledged);
        assert_eq!(lifecycle_of(&after, "n1"), Lifecycle::Loose);
        assert!(!after.control_view("n1").unwrap().pending);
    }

    #[test]
    fn terminal_and_reasonless_requests_are_refused() {
        let session = loaded();
        assert!(matches!(
            session.begin_transition("n3", TransitionRequest::Promote, "user"),
            Err(CurationError::Lifecycle(_))
        ));
        assert_eq!(
            session
                .begin_transition("n2", TransitionRequest::Kill { reason: "  ".into() }, "user")
                .unwrap_err(),
            CurationError::MissingReason
        );
        assert_eq!(
            session
                .begin_transition("zz", TransitionRequest::Promote, "user")
                .unwrap_err(),
            CurationError::UnknownNode("zz".into())
        );
        assert_eq!(
            Session::new()
                .begin_transition("n1", TransitionRequest::Promote, "user")
                .unwrap_err(),
            CurationError::NoGraph
        );
    }

    #[test]
    fn kill_body_carries_trimmed_reason() {
        let (_, ticket) = loaded()
            .begin_transition("n2", TransitionRequest::Kill { reason: " dup ".into() }, "cli")
            .unwrap();
        assert_eq!(
            ticket.body,
            TransitionBody::Kill(KillRequest {
                node_id: "n2".into(),
                reason: "dup".into(),
                actor: "cli".into(),
            })
        );
        assert_eq!(ticket.target, Lifecycle::Killed);
    }

    #[test]
    fn promote_body_lists_promoted_bricks() {
        let (session, _) = loaded().record_anchor("n1", "b2", AnchorAction::Promote);
        let (_, ticket) = session
            .begin_transition("n1", TransitionRequest::Promote, "user")
            .unwrap();
        let TransitionBody::Promote(body) = ticket.body else {
            panic!("expected promote body");
        };
        assert_eq!(body.promote_bricks, vec!["b2".to_string(), "b9".to_string()]);
    }

    #[test]
    fn anchor_clicks_are_idempotent() {
        let (once, request) = loaded().record_anchor("n1", "b2", AnchorAction::Reject);
        assert!(request.is_some());
        let (twice, again) = once.record_anchor("n1", "b2", AnchorAction::Promote);
        assert!(again.is_none());
        assert_eq!(
            twice.ledger().intent_for("n1", "b2").unwrap().action,
            AnchorAction::Reject
        );
    }

    #[test]
    fn refresh_keeps_intents_load_resets() {
        let (session, _) = loaded().record_anchor("n1", "b2", AnchorAction::Reject);
        let refreshed = session.refresh_graph(index());
        assert!(refreshed.ledger().intent_for("n1", "b2").is_some());
        assert!(refreshed.snapshot().unwrap().revision() > session.snapshot().unwrap().revision());

        let reloaded = session.load_graph(index());
        assert!(reloaded.ledger().intent_for("n1", "b2").is_none());
        assert!(reloaded.ledger().intent_for("n1", "b9").is_some());
    }

    #[test]
    fn anchor_failure_keeps_intent() {
        let (session, _) = loaded().record_anchor("n1", "b2", AnchorAction::Promote);
        let failed = session.anchor_failed("n1", "b2", "timeout");
        assert_eq!(failed.anchor_error("n1", "b2"), Some("timeout"));
        assert!(failed.ledger().intent_for("n1", "b2").is_some());
    }

    #[test]
    fn recall_drives_highlights() {
        let (session, ticket) = loaded().begin_recall("budget").unwrap();
        let session = session.resolve_recall::<String>(
            &ticket,
            Ok(AskPreview {
                query: "budget".into(),
                top_bricks: vec![BrickHit::new("b1", 0.9)],
                status: "ok".into(),
            }),
        );
        let levels = session.highlights();
        assert_eq!(levels[0], ("n1".to_string(), HighlightLevel::Strong));
        assert_eq!(levels[1].1, HighlightLevel::None);
    }

    #[test]
    fn superseded_recall_is_dropped() {
        let (first, old) = loaded().begin_recall("budget").unwrap();
        let (second, _) = first.begin_recall("forecast").unwrap();
        let after = second.resolve_recall::<String>(
            &old,
            Ok(AskPreview {
                query: "budget".into(),
                top_bricks: vec![BrickHit::new("b1", 0.9)],
                status: "ok".into(),
            }),
        );
        assert_eq!(after.recall().query(), "forecast");
        assert!(after.recall().hits().is_empty());
    }

    #[test]
    fn brick_meta_for_old_selection_is_dropped() {
        let (first, old) = loaded().select_brick(Some("b1"));
        let (second, _) = first.select_brick(Some("b2"));
        let meta = BrickMeta {
            brick_id: "b1".into(),
            source_file: "a.md".into(),
            source_span: serde_json::Value::Null,
            text_sample: None,
        };
        let after = second.resolve_brick_meta::<String>(old.as_ref().unwrap(), Ok(meta));
        assert_eq!(after.brick_panel().brick_id(), Some("b2"));
        assert_eq!(after.brick_panel().message(), Some("Loading..."));
    }

    #[test]
    fn neighbors_and_drawer_follow_toggles() {
        let session = loaded();
        assert!(session.neighbors("n1").is_empty());
        let open = session.toggle_neighbors("n1").toggle_anchors("n1");
        assert_eq!(open.neighbors("n1")[0].neighbor.id(), "n2");
        let drawer = open.drawer("n1").unwrap();
        assert_eq!(drawer.soft.len(), 1);
        assert!(open.toggle_neighbors("n1").neighbors("n1").is_empty());
    }

    #[test]
    fn wall_lists_graph_nodes() {
        let session = loaded();
        let wall = session.wall();
        let ids: Vec<_> = wall.order().primary.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n2", "n1"]);
        assert_eq!(wall.order().cemetery.len(), 1);
    }
}
