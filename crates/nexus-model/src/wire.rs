//! Request and response bodies of the backend contract

use crate::types::AnchorAction;
use serde::{Deserialize, Serialize};

/// One recalled brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickHit {
    /// Brick id
    pub brick_id: String,
    /// Recall confidence
    pub confidence: f64,
}

impl BrickHit {
    /// Create a hit
    #[inline]
    #[must_use]
    pub fn new(brick_id: impl Into<String>, confidence: f64) -> Self {
        Self {
            brick_id: brick_id.into(),
            confidence,
        }
    }
}

/// `GET /ask-preview` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskPreview {
    /// Echoed query
    #[serde(default)]
    pub query: String,
    /// Recalled bricks, unordered on the wire
    #[serde(default)]
    pub top_bricks: Vec<BrickHit>,
    /// Backend status string
    #[serde(default)]
    pub status: String,
}

impl AskPreview {
    /// Hits sorted by confidence, highest first (stable for ties)
    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.top_bricks
            .sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        self
    }
}

/// `GET /brick-meta` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickMeta {
    /// Brick id
    pub brick_id: String,
    /// Originating file
    #[serde(default)]
    pub source_file: String,
    /// Opaque location
    #[serde(default)]
    pub source_span: serde_json::Value,
    /// Excerpt
    #[serde(default)]
    pub text_sample: Option<String>,
}

/// `GET /brick-full` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickFull {
    /// Brick id
    pub brick_id: String,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub block_index: Option<u32>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Complete text
    #[serde(default)]
    pub full_text: String,
}

/// `POST /anchor` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRequest {
    /// Brick being curated
    pub brick_id: String,
    /// Decision
    pub action: AnchorAction,
}

/// `POST /node/promote` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoteRequest {
    /// Node to promote
    pub node_id: String,
    /// Soft anchors the curator chose to promote alongside
    pub promote_bricks: Vec<String>,
    /// Who asked
    pub actor: String,
}

/// `POST /node/kill` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillRequest {
    /// Node to kill
    pub node_id: String,
    /// Mandatory justification
    pub reason: String,
    /// Who asked
    pub actor: String,
}

/// Acknowledgment body of the POST endpoints
///
/// A 2xx response may still carry `error`; that counts as a rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Remaining fields, kept for logging
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Ack {
    /// Successful acknowledgment
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: Some("success".to_string()),
            ..Self::default()
        }
    }

    /// Server-side rejection message, if any
    #[must_use]
    pub fn rejection(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preview_sorts_descending() {
        let preview: AskPreview = serde_json::from_value(json!({
            "query": "budget projections",
            "top_bricks": [
                { "brick_id": "b2", "confidence": 0.4 },
                { "brick_id": "b1", "confidence": 0.9 }
            ],
            "status": "ok"
        }))
        .unwrap();
        let ids: Vec<_> = preview
            .sorted()
            .top_bricks
            .into_iter()
            .map(|h| h.brick_id)
            .collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }

    #[test]
    fn ack_error_is_rejection() {
        let ack: Ack = serde_json::from_value(json!({ "error": "confidence too low" })).unwrap();
        assert_eq!(ack.rejection(), Some("confidence too low"));

        let ok: Ack = serde_json::from_value(json!({ "status": "success", "brick_id": "b1" })).unwrap();
        assert_eq!(ok.rejection(), None);
        assert_eq!(ok.extra.get("brick_id"), Some(&json!("b1")));
    }

    #[test]
    fn requests_use_wire_names() {
        let body = serde_json::to_value(AnchorRequest {
            brick_id: "b1".into(),
            action: AnchorAction::Reject,
        })
        .unwrap();
        assert_eq!(body, json!({ "brick_id": "b1", "action": "reject" }));
    }
}
