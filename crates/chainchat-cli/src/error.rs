//! CLI-specific error types and exit codes.

use chainchat_client::ClientError;
use chainchat_core::ChatError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The session rejected the request before anything was sent.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The transport could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend could not be reached.
    #[error("{0}")]
    Unavailable(String),

    /// The backend answered with an error reply.
    #[error("{0}")]
    Reply(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to an exit code following sysexits.h.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Reply(_) => 1,
            Self::Arguments(_) => 2,    // EX_USAGE
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,          // EX_IOERR
            Self::Config(_) => 78,      // EX_CONFIG
        }
    }
}

impl From<ChatError> for CliError {
    fn from(err: ChatError) -> Self {
        if err.is_rejection() {
            return Self::Arguments(err.to_string());
        }
        match err {
            ChatError::Transport { .. } => Self::Unavailable(err.describe()),
            other => Self::Reply(other.describe()),
        }
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_usage_errors() {
        let err = CliError::from(ChatError::UnknownStore("bogies".to_string()));
        assert!(matches!(err, CliError::Arguments(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_transport_is_unavailable() {
        let err = CliError::from(ChatError::Transport {
            message: "connection refused".to_string(),
        });
        assert_eq!(err.exit_code(), 69);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_backend_status_is_a_reply_error() {
        let err = CliError::from(ChatError::Backend {
            status: 503,
            body: String::new(),
        });
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("503"));
    }
}
