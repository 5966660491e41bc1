//! Concept/brick promotion lifecycle
//!
//! ```text
//! LOOSE --promote--> FORMING --promote--> FROZEN
//!   |                   |
//!   +------kill---------+------> KILLED
//! ```
//!
//! `FROZEN` and `KILLED` are terminal. Illegal requests are no-ops: the
//! validating entry point reports them as [`LifecycleError::Terminal`], the
//! applying entry point hands the current state back unchanged.

use crate::error::LifecycleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Promotion state of a concept or brick
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lifecycle {
    /// Unreviewed, initial state
    #[default]
    #[serde(alias = "loose")]
    Loose,
    /// Promoted once, pending confirmation
    #[serde(alias = "forming")]
    Forming,
    /// Confirmed, read-only
    #[serde(alias = "frozen")]
    Frozen,
    /// Rejected, read-only
    #[serde(alias = "killed")]
    Killed,
}

impl Lifecycle {
    /// All states in wall order
    pub const ALL: [Lifecycle; 4] = [
        Lifecycle::Frozen,
        Lifecycle::Forming,
        Lifecycle::Loose,
        Lifecycle::Killed,
    ];

    /// Upper-case wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loose => "LOOSE",
            Self::Forming => "FORMING",
            Self::Frozen => "FROZEN",
            Self::Killed => "KILLED",
        }
    }

    /// Whether no further action is accepted
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Frozen | Self::Killed)
    }

    /// Lane rank used by the wall ordering (lower sorts first)
    #[inline]
    #[must_use]
    pub fn wall_rank(self) -> u8 {
        match self {
            Self::Frozen => 0,
            Self::Forming => 1,
            Self::Loose => 2,
            Self::Killed => 3,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unknown lifecycle name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lifecycle: {0}")]
pub struct UnknownLifecycle(pub String);

impl FromStr for Lifecycle {
    type Err = UnknownLifecycle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOOSE" => Ok(Self::Loose),
            "FORMING" => Ok(Self::Forming),
            "FROZEN" => Ok(Self::Frozen),
            "KILLED" => Ok(Self::Killed),
            _ => Err(UnknownLifecycle(s.to_string())),
        }
    }
}

/// Curation action on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleAction {
    /// Move one step towards `FROZEN`
    Promote,
    /// Reject the node
    Kill,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Promote => "promote",
            Self::Kill => "kill",
        })
    }
}

/// Validates an action and returns the target state.
pub fn validate(from: Lifecycle, action: LifecycleAction) -> Result<Lifecycle, LifecycleError> {
    use Lifecycle::*;
    match (from, action) {
        (Loose, LifecycleAction::Promote) => Ok(Forming),
        (Forming, LifecycleAction::Promote) => Ok(Frozen),
        (Loose | Forming, LifecycleAction::Kill) => Ok(Killed),
        (state, action) => Err(LifecycleError::Terminal { state, action }),
    }
}

/// Applies an action, keeping the current state when it is not accepted.
#[must_use]
pub fn apply(from: Lifecycle, action: LifecycleAction) -> Lifecycle {
    validate(from, action).unwrap_or(from)
}

pub fn allowed_actions(from: Lifecycle) -> Vec<LifecycleAction> {
    use Lifecycle::*;
    match from {
        Loose | Forming => vec![LifecycleAction::Promote, LifecycleAction::Kill],
        Frozen | Killed => vec![],
    }
}

/// One action button of a node control strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlButton {
    /// Action sent when pressed
    pub action: LifecycleAction,
    /// State reached on acknowledgment
    pub target: Lifecycle,
    /// Button caption
    pub label: &'static str,
}

/// What the control strip for a node offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSurface {
    /// Terminal node: status line only
    ReadOnly {
        /// Terminal state shown
        state: Lifecycle,
    },
    /// Live node: promote plus kill
    Actions {
        /// Promote button
        primary: ControlButton,
        /// Kill button
        kill: ControlButton,
    },
}

impl ControlSurface {
    /// Builds the control surface for a state
    #[must_use]
    pub fn for_state(state: Lifecycle) -> Self {
        let (Ok(promote_target), Ok(kill_target)) = (
            validate(state, LifecycleAction::Promote),
            validate(state, LifecycleAction::Kill),
        ) else {
            return Self::ReadOnly { state };
        };

        let label = if promote_target == Lifecycle::Forming {
            "Promote to FORMING"
        } else {
            "Promote to FROZEN"
        };

        Self::Actions {
            primary: ControlButton {
                action: LifecycleAction::Promote,
                target: promote_target,
                label,
            },
            kill: ControlButton {
                action: LifecycleAction::Kill,
                target: kill_target,
                label: "Kill Idea",
            },
        }
    }

    #[inline]
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly { .. })
    }

    /// Buttons in display order
    #[must_use]
    pub fn buttons(&self) -> Vec<ControlButton> {
        match self {
            Self::ReadOnly { .. } => Vec::new(),
            Self::Actions { primary, kill } => vec![*primary, *kill],
        }
    }

    /// Status line for read-only surfaces
    #[must_use]
    pub fn status_text(&self) -> Option<String> {
        match self {
            Self::ReadOnly { state } => Some(format!("STATUS: {state} (ReadOnly)")),
            Self::Actions { .. } => None,
        }
    }
}
