//! Recall preview and brick detail panels

use nexus_model::{AskPreview, BrickFull, BrickHit, BrickMeta};
use std::collections::HashSet;
use std::fmt;

/// Shown while a preview request is in flight
pub const SEARCHING: &str = "Searching...";
/// Preview request failed
pub const PREVIEW_UNAVAILABLE: &str = "Preview unavailable";
/// Preview succeeded with no hits
pub const NO_MATCHES: &str = "No matching bricks found";
/// Brick detail request failed
pub const DETAIL_ERROR: &str = "Error fetching details";

/// Where the last recall stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecallStatus {
    /// Nothing asked yet
    #[default]
    Idle,
    /// Request in flight
    Searching,
    /// At least one hit
    Ready,
    /// Succeeded without hits
    Empty,
    /// Request failed
    Unavailable,
}

/// Query plus its recalled bricks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecallView {
    query: String,
    hits: im::Vector<BrickHit>,
    status: RecallStatus,
}

impl RecallView {
    /// Starts a recall; blank queries are not sent
    #[must_use]
    pub fn begin(query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(Self {
            query: query.to_string(),
            hits: im::Vector::new(),
            status: RecallStatus::Searching,
        })
    }

    /// Applies the preview outcome
    #[must_use]
    pub fn resolve<E: fmt::Display>(&self, outcome: Result<AskPreview, E>) -> Self {
        match outcome {
            Ok(preview) => {
                let hits: im::Vector<BrickHit> = preview.sorted().top_bricks.into_iter().collect();
                let status = if hits.is_empty() {
                    RecallStatus::Empty
                } else {
                    RecallStatus::Ready
                };
                tracing::debug!(query = %self.query, hits = hits.len(), "recall resolved");
                Self {
                    query: self.query.clone(),
                    hits,
                    status,
                }
            }
            Err(err) => {
                tracing::warn!(query = %self.query, %err, "recall preview failed");
                Self {
                    query: self.query.clone(),
                    hits: im::Vector::new(),
                    status: RecallStatus::Unavailable,
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Hits, highest confidence first
    #[inline]
    #[must_use]
    pub fn hits(&self) -> &im::Vector<BrickHit> {
        &self.hits
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> RecallStatus {
        self.status
    }

    /// Status line, if the status has one
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self.status {
            RecallStatus::Idle | RecallStatus::Ready => None,
            RecallStatus::Searching => Some(SEARCHING),
            RecallStatus::Empty => Some(NO_MATCHES),
            RecallStatus::Unavailable => Some(PREVIEW_UNAVAILABLE),
        }
    }

    /// Ids used for highlighting
    #[must_use]
    pub fn recalled_ids(&self) -> HashSet<String> {
        self.hits.iter().map(|h| h.brick_id.clone()).collect()
    }
}

/// Right-panel detail for the selected brick
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BrickPanel {
    /// Nothing selected
    #[default]
    Closed,
    /// Metadata request in flight
    Loading {
        /// Selected brick
        brick_id: String,
    },
    /// Metadata available, full text optional
    Loaded {
        /// Brick metadata
        meta: BrickMeta,
        /// Complete text, once fetched
        full: Option<BrickFull>,
    },
    /// Metadata request failed
    Failed {
        /// Selected brick
        brick_id: String,
    },
}

impl BrickPanel {
    /// Brick the panel is about
    #[must_use]
    pub fn brick_id(&self) -> Option<&str> {
        match self {
            Self::Closed => None,
            Self::Loading { brick_id } | Self::Failed { brick_id } => Some(brick_id),
            Self::Loaded { meta, .. } => Some(&meta.brick_id),
        }
    }

    /// Status line for loading/failed panels
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loading { .. } => Some("Loading..."),
            Self::Failed { .. } => Some(DETAIL_ERROR),
            Self::Closed | Self::Loaded { .. } => None,
        }
    }

    /// Applies a metadata outcome; ignored unless it matches the loading brick
    #[must_use]
    pub fn with_meta<E: fmt::Display>(&self, brick_id: &str, outcome: Result<BrickMeta, E>) -> Self {
        if !matches!(self, Self::Loading { brick_id: b } if b == brick_id) {
            return self.clone();
        }
        match outcome {
            Ok(meta) => Self::Loaded { meta, full: None },
            Err(err) => {
                tracing::warn!(brick_id, %err, "brick metadata fetch failed");
                Self::Failed {
                    brick_id: brick_id.to_string(),
                }
            }
        }
    }

    /// Attaches full text to a loaded panel for the same brick
    #[must_use]
    pub fn with_full(&self, full: BrickFull) -> Self {
        match self {
            Self::Loaded { meta, .. } if meta.brick_id == full.brick_id => Self::Loaded {
                meta: meta.clone(),
                full: Some(full),
            },
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn preview(hits: Vec<BrickHit>) -> AskPreview {
        AskPreview {
            query: "q".into(),
            top_bricks: hits,
            status: "ok".into(),
        }
    }

    fn meta(id: &str) -> BrickMeta {
        BrickMeta {
            brick_id: id.into(),
            source_file: "notes.md".into(),
            source_span: serde_json::Value::Null,
            text_sample: Some("sample".into()),
        }
    }

    #[test]
    fn blank_query_is_not_sent() {
        assert!(RecallView::begin("   ").is_none());
        let view = RecallView::begin(" budget ").unwrap();
        assert_eq!(view.query(), "budget");
        assert_eq!(view.message(), Some(SEARCHING));
    }

    #[test]
    fn hits_sorted_and_exposed_as_ids() {
        let view = RecallView::begin("budget")
            .unwrap()
            .resolve::<String>(Ok(preview(vec![BrickHit::new("b1", 0.2), BrickHit::new("b2", 0.7)])));
        assert_eq!(view.status(), RecallStatus::Ready);
        assert_eq!(view.hits()[0].brick_id, "b2");
        assert!(view.recalled_ids().contains("b1"));
    }

    #[test]
    fn empty_and_failed_previews_have_messages() {
        let base = RecallView::begin("budget").unwrap();
        assert_eq!(
            base.resolve::<String>(Ok(preview(vec![]))).message(),
            Some(NO_MATCHES)
        );
        let failed = base.resolve(Err("connection refused"));
        assert_eq!(failed.message(), Some(PREVIEW_UNAVAILABLE));
        assert!(failed.recalled_ids().is_empty());
    }

    #[test]
    fn stale_meta_is_ignored() {
        let panel = BrickPanel::Loading {
            brick_id: "b2".into(),
        };
        let unchanged = panel.with_meta::<String>("b1", Ok(meta("b1")));
        assert_eq!(unchanged, panel);

        let loaded = panel.with_meta::<String>("b2", Ok(meta("b2")));
        assert_eq!(loaded.brick_id(), Some("b2"));
        assert_eq!(loaded.message(), None);
    }

    #[test]
    fn failed_meta_shows_error() {
        let panel = BrickPanel::Loading {
            brick_id: "b1".into(),
        }
        .with_meta("b1", Err("timeout"));
        assert_eq!(panel.message(), Some(DETAIL_ERROR));
    }
}
