//! Layout errors

/// Layout error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Node id not part of the current layout
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Drag gestures need the force layout
    #[error("drag is only supported by the force layout")]
    NotInteractive,

    /// Drag move/end without a matching start
    #[error("node {0} is not being dragged")]
    NotDragging(String),

    /// Tuning value out of range
    #[error("invalid layout config: {0}")]
    InvalidConfig(String),

    /// Driver task has stopped
    #[error("layout driver stopped: {0}")]
    DriverStopped(String),
}
