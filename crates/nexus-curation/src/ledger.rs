//! Anchor intent ledger
//!
//! Records promote/reject decisions per `(concept, brick)` pair. The first
//! decision for a key wins for the rest of the session; later calls for the
//! same key are ignored. Server overrides seed the ledger without replacing
//! anything the user already decided.

use nexus_model::{AnchorAction, AnchorOverride};
use std::fmt;

/// `concept_id:brick_id`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorKey {
    /// Concept side
    pub concept_id: String,
    /// Brick side
    pub brick_id: String,
}

impl AnchorKey {
    /// Create key
    #[inline]
    #[must_use]
    pub fn new(concept_id: impl Into<String>, brick_id: impl Into<String>) -> Self {
        Self {
            concept_id: concept_id.into(),
            brick_id: brick_id.into(),
        }
    }
}

impl fmt::Display for AnchorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.concept_id, self.brick_id)
    }
}

/// Where an intent came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOrigin {
    /// Clicked during this session
    Session,
    /// Loaded from a durable override
    Override {
        /// Backend status string
        status: String,
    },
}

/// A decision for one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorIntent {
    /// Promote or reject
    pub action: AnchorAction,
    /// Brick the decision is about
    pub brick_id: String,
    /// Session click or override
    pub origin: IntentOrigin,
}

impl AnchorIntent {
    /// Badge shown in place of the action buttons
    #[must_use]
    pub fn badge(&self) -> &'static str {
        match self.action {
            AnchorAction::Promote => "Promotion Intended",
            AnchorAction::Reject => "Rejection Intended",
        }
    }
}

/// Persistent map of anchor intents
///
/// Every operation returns a new ledger; the receiver is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorLedger {
    intents: im::OrdMap<AnchorKey, AnchorIntent>,
}

impl AnchorLedger {
    /// Empty ledger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger for a fresh graph load
    #[inline]
    #[must_use]
    pub fn reset(&self) -> Self {
        Self::new()
    }

    /// Records a session decision, ignoring keys that already have one
    #[must_use]
    pub fn record_intent(&self, concept_id: &str, brick_id: &str, action: AnchorAction) -> Self {
        let key = AnchorKey::new(concept_id, brick_id);
        if self.intents.contains_key(&key) {
            tracing::debug!(%key, %action, "intent already recorded, ignoring");
            return self.clone();
        }

        tracing::info!(
            action = match action {
                AnchorAction::Promote => "PROMOTE_TO_HARD",
                AnchorAction::Reject => "REJECT_SOFT",
            },
            concept_id,
            brick_id,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "anchor intent recorded"
        );

        Self {
            intents: self.intents.update(
                key,
                AnchorIntent {
                    action,
                    brick_id: brick_id.to_string(),
                    origin: IntentOrigin::Session,
                },
            ),
        }
    }

    /// Merges durable overrides; existing intents for a key are kept
    #[must_use]
    pub fn seed_from_overrides(&self, overrides: &[AnchorOverride]) -> Self {
        let mut intents = self.intents.clone();
        for o in overrides {
            let key = AnchorKey::new(o.concept_id.as_str(), o.brick_id.as_str());
            if intents.contains_key(&key) {
                continue;
            }
            intents.insert(
                key,
                AnchorIntent {
                    action: o.action,
                    brick_id: o.brick_id.clone(),
                    origin: IntentOrigin::Override {
                        status: o.status.clone(),
                    },
                },
            );
        }
        tracing::debug!(
            overrides = overrides.len(),
            intents = intents.len(),
            "seeded anchor ledger"
        );
        Self { intents }
    }

    /// Intent for a pair, if any
    #[must_use]
    pub fn intent_for(&self, concept_id: &str, brick_id: &str) -> Option<&AnchorIntent> {
        self.intents.get(&AnchorKey::new(concept_id, brick_id))
    }

    /// Bricks of `concept_id` with a promote intent, in key order
    #[must_use]
    pub fn promoted_for(&self, concept_id: &str) -> Vec<String> {
        self.intents
            .iter()
            .filter(|(k, i)| k.concept_id == concept_id && i.action == AnchorAction::Promote)
            .map(|(_, i)| i.brick_id.clone())
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// All intents in key order
    pub fn iter(&self) -> impl Iterator<Item = (&AnchorKey, &AnchorIntent)> {
        self.intents.iter()
    }
}
