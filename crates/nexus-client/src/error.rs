//! Backend errors
//!
//! Nothing here is fatal to a session: transport problems become a short
//! status on the view that issued the request, rejections show inline on
//! the control that triggered them.

/// Backend error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Connection, DNS or timeout failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success status without a readable error body
    #[error("{endpoint} returned status {status}")]
    Status {
        /// Path that was called
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// The server answered with an `error` field
    #[error("rejected: {0}")]
    Rejected(String),

    /// Body did not decode into the expected shape
    #[error("invalid response from {endpoint}: {message}")]
    Decode {
        /// Path that was called
        endpoint: String,
        /// Decoder message
        message: String,
    },

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl BackendError {
    /// Request never got a usable answer
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    /// Short text for inline display
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::Transport(_) => "Backend unreachable".to_string(),
            Self::Status { status, .. } => format!("Backend error ({status})"),
            Self::Decode { .. } => "Unexpected backend response".to_string(),
            Self::Config(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_is_shown_verbatim() {
        let err = BackendError::Rejected("confidence too low".into());
        assert_eq!(err.user_message(), "confidence too low");
        assert!(!err.is_transport());
    }

    #[test]
    fn status_counts_as_transport() {
        let err = BackendError::Status {
            endpoint: "node/promote".into(),
            status: 502,
        };
        assert!(err.is_transport());
        assert_eq!(err.user_message(), "Backend error (502)");
        assert_eq!(err.to_string(), "node/promote returned status 502");
    }
}
