//! Error types for service dispatch and chat sessions.
//!
//! Only rejections (`DuplicateService`, `UnknownService`, `UnknownStore`,
//! `InvalidInput`, `SessionBusy`) ever reach a caller of the session. Transport,
//! backend and cancellation failures are recovered into `error` transcript
//! entries by the session.

use thiserror::Error;

use crate::domain::ServiceId;

/// Metadata key under which `error` entries record [`ChatError::failure_kind`].
pub const FAILURE_KIND_KEY: &str = "kind";

/// Result type alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors raised by the registry, the session and transports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    /// A descriptor with the same id was already registered.
    #[error("Service '{0}' is already registered")]
    DuplicateService(ServiceId),

    /// The requested service id is not known.
    #[error("Unknown service '{0}'")]
    UnknownService(String),

    /// The requested knowledge store is not in the catalog.
    #[error("Unknown knowledge store '{0}'")]
    UnknownStore(String),

    /// The submission was rejected before any network call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A request is already outstanding for this session.
    #[error("A request is already in progress for this session")]
    SessionBusy,

    /// The backend could not be reached.
    #[error("Network error: {message}")]
    Transport {
        /// Descriptive classification of the failure
        message: String,
    },

    /// The backend answered with a non-2xx status.
    #[error("Backend returned HTTP {status}: {body}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Response body, kept as diagnostic text
        body: String,
    },

    /// The in-flight request was cancelled through the session hook.
    #[error("Request cancelled")]
    Cancelled,
}

impl ChatError {
    /// Shorthand for an `InvalidInput` rejection.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether this error rejects an operation before any network call.
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::DuplicateService(_)
                | Self::UnknownService(_)
                | Self::UnknownStore(_)
                | Self::InvalidInput(_)
                | Self::SessionBusy
        )
    }

    /// Failure class stored under [`FAILURE_KIND_KEY`] in `error` entries.
    pub const fn failure_kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Backend { .. } => "backend",
            Self::Cancelled => "cancelled",
            _ => "rejected",
        }
    }

    /// Human-readable explanation used for `error` transcript entries.
    pub fn describe(&self) -> String {
        match self {
            Self::Backend { status, body } if body.trim().is_empty() => {
                format!("The backend returned HTTP {status} with an empty body.")
            }
            Self::Backend { status, body } => {
                format!("The backend returned HTTP {status}: {}", body.trim())
            }
            Self::Transport { message } => format!("Could not reach the backend: {message}"),
            Self::Cancelled => "Request cancelled.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message_includes_status_and_body() {
        let error = ChatError::Backend {
            status: 503,
            body: "upstream unavailable".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("upstream unavailable"));
    }

    #[test]
    fn test_describe_empty_backend_body() {
        let error = ChatError::Backend {
            status: 500,
            body: "  ".to_string(),
        };
        assert_eq!(
            error.describe(),
            "The backend returned HTTP 500 with an empty body."
        );
    }

    #[test]
    fn test_describe_transport() {
        let error = ChatError::Transport {
            message: "connection refused".to_string(),
        };
        assert!(error.describe().contains("connection refused"));
    }

    #[test]
    fn test_rejections() {
        assert!(ChatError::SessionBusy.is_rejection());
        assert!(ChatError::invalid_input("empty").is_rejection());
        assert!(ChatError::UnknownStore("x".to_string()).is_rejection());
        assert!(!ChatError::Cancelled.is_rejection());
        assert!(
            !ChatError::Transport {
                message: "x".to_string()
            }
            .is_rejection()
        );
    }

    #[test]
    fn test_failure_kind() {
        let transport = ChatError::Transport {
            message: "refused".to_string(),
        };
        assert_eq!(transport.failure_kind(), "transport");
        assert_eq!(ChatError::Cancelled.failure_kind(), "cancelled");
        assert_eq!(ChatError::SessionBusy.failure_kind(), "rejected");
    }
}
