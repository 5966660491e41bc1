//! Testing utilities for the Nexus workspace
//!
//! Shared fixtures and a scripted in-memory backend.

#![allow(missing_docs)]

use async_trait::async_trait;
use nexus_client::{BackendError, CortexBackend};
use nexus_model::{
    Ack, AnchorRequest, AskPreview, BrickFull, BrickMeta, GraphIndex, KillRequest, PromoteRequest,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;

// ----------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------

/// `/graph-index` body: n1 anchored, n2 with legacy bricks only, one node
/// per remaining lifecycle and an edge to a node outside the graph
pub fn sample_graph_json() -> Value {
    json!({
        "nodes": { "nodes": [
            {
                "id": "n1",
                "label": "Budget",
                "type": "topic",
                "lifecycle": "LOOSE",
                "confidence": 0.8,
                "anchors": { "hard": ["b1"], "soft": ["b3", "b4"] }
            },
            { "id": "n2", "label": "Projections", "lifecycle": "loose", "bricks": ["b2"], "confidence": 0.6 },
            { "id": "n3", "label": "Forecast", "lifecycle": "FORMING", "confidence": 0.9 },
            { "id": "n4", "label": "Ledger", "lifecycle": "FROZEN", "confidence": 0.7 },
            { "id": "n5", "label": "Old Plan", "lifecycle": "KILLED", "confidence": 0.95 }
        ]},
        "edges": [
            { "source": "n1", "target": "n2", "type": "supports" },
            { "source": "n2", "target": "n3" },
            { "source": "n1", "target": "ghost-node-123456" }
        ],
        "index_content": "# Budget\n- n1\n- n2",
        "anchor_overrides": [
            { "concept_id": "n1", "brick_id": "b4", "action": "reject", "status": "applied" }
        ]
    })
}

pub fn sample_index() -> GraphIndex {
    GraphIndex::from_value(&sample_graph_json())
}

/// Recall for "budget projections", unsorted as on the wire
pub fn budget_preview() -> AskPreview {
    serde_json::from_value(json!({
        "query": "budget projections",
        "top_bricks": [
            { "brick_id": "b2", "confidence": 0.4 },
            { "brick_id": "b1", "confidence": 0.9 }
        ],
        "status": "ok"
    }))
    .unwrap()
}

pub fn empty_preview(query: &str) -> AskPreview {
    AskPreview {
        query: query.to_string(),
        top_bricks: Vec::new(),
        status: "ok".to_string(),
    }
}

pub fn brick_meta(brick_id: &str) -> BrickMeta {
    BrickMeta {
        brick_id: brick_id.to_string(),
        source_file: "notes/budget.md".to_string(),
        source_span: json!({ "start": 10, "end": 42 }),
        text_sample: Some("Projected spend for Q3".to_string()),
    }
}

pub fn brick_full(brick_id: &str) -> BrickFull {
    BrickFull {
        brick_id: brick_id.to_string(),
        source_file: Some("notes/budget.md".to_string()),
        message_id: None,
        block_index: Some(2),
        role: Some("user".to_string()),
        created_at: None,
        full_text: "Projected spend for Q3 is flat.".to_string(),
    }
}

pub fn rejected(message: &str) -> BackendError {
    BackendError::Rejected(message.to_string())
}

pub fn unreachable() -> BackendError {
    BackendError::Transport("connection refused".to_string())
}

// ----------------------------------------------------------------------
// Scripted backend
// ----------------------------------------------------------------------

/// A request seen by [`ScriptedBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    AskPreview { query: String, use_genai: bool },
    GraphIndex,
    BrickMeta(String),
    BrickFull(String),
    Anchor(AnchorRequest),
    Promote(PromoteRequest),
    Kill(KillRequest),
}

/// Responses queued per endpoint
///
/// Each queue hands out its entries in order and then keeps repeating the
/// last one. Empty queues answer with a transport error, except the POST
/// endpoints which acknowledge.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    graphs: Mutex<VecDeque<Result<GraphIndex, BackendError>>>,
    previews: Mutex<VecDeque<Result<AskPreview, BackendError>>>,
    metas: Mutex<VecDeque<Result<BrickMeta, BackendError>>>,
    fulls: Mutex<VecDeque<Result<BrickFull, BackendError>>>,
    acks: Mutex<VecDeque<Result<Ack, BackendError>>>,
    requests: Mutex<Vec<Recorded>>,
}

fn next<T: Clone>(queue: &Mutex<VecDeque<Result<T, BackendError>>>) -> Option<Result<T, BackendError>> {
    let mut queue = queue.lock();
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

fn unscripted<T>(endpoint: &str) -> Result<T, BackendError> {
    Err(BackendError::Transport(format!("no scripted response for {endpoint}")))
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend serving [`sample_index`]
    pub fn with_sample_graph() -> Self {
        Self::new().with_graph(Ok(sample_index()))
    }

    pub fn with_graph(self, response: Result<GraphIndex, BackendError>) -> Self {
        self.graphs.lock().push_back(response);
        self
    }

    pub fn with_preview(self, response: Result<AskPreview, BackendError>) -> Self {
        self.previews.lock().push_back(response);
        self
    }

    pub fn with_meta(self, response: Result<BrickMeta, BackendError>) -> Self {
        self.metas.lock().push_back(response);
        self
    }

    pub fn with_full(self, response: Result<BrickFull, BackendError>) -> Self {
        self.fulls.lock().push_back(response);
        self
    }

    /// Answer for the next POST (anchor, promote or kill)
    pub fn with_ack(self, response: Result<Ack, BackendError>) -> Self {
        self.acks.lock().push_back(response);
        self
    }

    /// Requests seen so far, in order
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    /// How many times the graph was fetched
    pub fn graph_fetches(&self) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| matches!(r, Recorded::GraphIndex))
            .count()
    }

    fn record(&self, request: Recorded) {
        self.requests.lock().push(request);
    }

    fn ack(&self) -> Result<Ack, BackendError> {
        let mut queue = self.acks.lock();
        queue.pop_front().unwrap_or_else(|| Ok(Ack::success()))
    }
}

#[async_trait]
impl CortexBackend for ScriptedBackend {
    async fn ask_preview(&self, query: &str, use_genai: bool) -> Result<AskPreview, BackendError> {
        self.record(Recorded::AskPreview {
            query: query.to_string(),
            use_genai,
        });
        next(&self.previews)
            .unwrap_or_else(|| unscripted("ask-preview"))
            .map(AskPreview::sorted)
    }

    async fn graph_index(&self) -> Result<GraphIndex, BackendError> {
        self.record(Recorded::GraphIndex);
        next(&self.graphs).unwrap_or_else(|| unscripted("graph-index"))
    }

    async fn brick_meta(&self, brick_id: &str) -> Result<BrickMeta, BackendError> {
        self.record(Recorded::BrickMeta(brick_id.to_string()));
        next(&self.metas).unwrap_or_else(|| unscripted("brick-meta"))
    }

    async fn brick_full(&self, brick_id: &str) -> Result<BrickFull, BackendError> {
        self.record(Recorded::BrickFull(brick_id.to_string()));
        next(&self.fulls).unwrap_or_else(|| unscripted("brick-full"))
    }

    async fn submit_anchor(&self, request: &AnchorRequest) -> Result<Ack, BackendError> {
        self.record(Recorded::Anchor(request.clone()));
        self.ack()
    }

    async fn promote_node(&self, request: &PromoteRequest) -> Result<Ack, BackendError> {
        self.record(Recorded::Promote(request.clone()));
        self.ack()
    }

    async fn kill_node(&self, request: &KillRequest) -> Result<Ack, BackendError> {
        self.record(Recorded::Kill(request.clone()));
        self.ack()
    }
}
