//! Transport construction errors and the mapping of request failures.

use chainchat_core::ChatError;
use thiserror::Error;
use url::Url;

/// Errors raised while building a transport.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL could not be parsed.
    #[error("Invalid API base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The base URL is not an http(s) URL.
    #[error("API base URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    /// The HTTP client could not be initialized.
    #[error("Failed to create HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Classify a reqwest failure into a descriptive transport error.
///
/// Native clients are not subject to CORS, but a backend reached through a
/// browser-facing proxy fails the same way as an unreachable one, hence the
/// hint on connection failures.
pub(crate) fn map_error(err: &reqwest::Error, url: &Url) -> ChatError {
    let message = if err.is_timeout() {
        format!("request to {url} timed out")
    } else if err.is_connect() {
        format!(
            "could not connect to {}. Check that the backend is running and that any proxy in \
             front of it accepts cross-origin requests",
            url.origin().ascii_serialization()
        )
    } else if err.is_decode() || err.is_body() {
        format!("failed to read the response from {url}: {err}")
    } else {
        format!("request to {url} failed: {err}")
    };
    ChatError::Transport { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_message() {
        let source = Url::parse("not a url").unwrap_err();
        let error = ClientError::InvalidBaseUrl {
            url: "not a url".to_string(),
            source,
        };
        assert!(error.to_string().contains("not a url"));
    }

    #[test]
    fn test_unsupported_scheme_message() {
        let error = ClientError::UnsupportedScheme("ftp://host".to_string());
        assert!(error.to_string().contains("ftp://host"));
    }
}
