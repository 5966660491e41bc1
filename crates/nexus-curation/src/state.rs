//! View-level application state
//!
//! A plain reducer: every [`UiAction`] produces a new [`AppState`]. The
//! epoch advances whenever the user navigates (mode or selection change);
//! responses stamped with an older epoch are dropped by the session.

use nexus_model::ViewMode;

/// Navigation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// Active top-level view
    pub mode: ViewMode,
    /// Brick shown in the right panel
    pub selected_brick: Option<String>,
    /// Graph node being inspected
    pub selected_node: Option<String>,
    /// Whether the right panel is visible
    pub right_panel_open: bool,
    /// Navigation counter
    pub epoch: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: ViewMode::Ask,
            selected_brick: None,
            selected_node: None,
            right_panel_open: true,
            epoch: 0,
        }
    }
}

/// User navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Switch view
    SetMode(ViewMode),
    /// Select or clear a brick; selecting opens the right panel
    SelectBrick(Option<String>),
    /// Select or clear a node; selecting opens the right panel
    SelectNode(Option<String>),
    /// Flip the right panel, or force it open/closed
    ToggleRightPanel(Option<bool>),
}

/// Applies one action
#[must_use]
pub fn reduce(state: &AppState, action: UiAction) -> AppState {
    let mut next = state.clone();
    match action {
        UiAction::SetMode(mode) => {
            next.mode = mode;
        }
        UiAction::SelectBrick(id) => {
            if id.is_some() {
                next.right_panel_open = true;
            }
            next.selected_brick = id;
        }
        UiAction::SelectNode(id) => {
            if id.is_some() {
                next.right_panel_open = true;
            }
            next.selected_node = id;
        }
        UiAction::ToggleRightPanel(force) => {
            next.right_panel_open = force.unwrap_or(!state.right_panel_open);
        }
    }

    let navigated = next.mode != state.mode
        || next.selected_brick != state.selected_brick
        || next.selected_node != state.selected_node;
    if navigated {
        next.epoch = state.epoch + 1;
        tracing::trace!(epoch = next.epoch, mode = ?next.mode, "navigation");
    }
    next
}
