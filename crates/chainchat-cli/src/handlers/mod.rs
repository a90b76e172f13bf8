//! Command handlers.
//!
//! Handlers are thin: they translate arguments into session calls and print
//! the resulting transcript entries. Session rules live in `chainchat-core`.

pub mod ask;
pub mod chat;
pub mod health;
pub mod services;
pub mod stores;
pub mod upload;

use std::future::Future;

use anyhow::Result;
use chainchat_core::{
    ChatMessage, ChatResult, ChatSession, FAILURE_KIND_KEY, MessageRole, Metadata, ServiceTransport,
};

use crate::error::CliError;
use crate::presentation::print_message;

/// Await a session exchange, cancelling it on the first Ctrl+C.
///
/// The exchange future is polled to completion even after cancellation so the
/// session records the cancelled entry and returns to idle.
pub async fn run_cancellable<T, F>(session: &ChatSession<T>, exchange: F) -> ChatResult<ChatMessage>
where
    T: ServiceTransport,
    F: Future<Output = ChatResult<ChatMessage>>,
{
    tokio::pin!(exchange);
    let mut interrupted = false;
    loop {
        tokio::select! {
            result = &mut exchange => return result,
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                if session.cancel() {
                    tracing::info!("Cancelling pending request");
                }
            }
        }
    }
}

/// Print a reply, turning `error` entries into a failing exit status.
pub(crate) fn report_reply(reply: &ChatMessage) -> Result<()> {
    if reply.role == MessageRole::Error {
        return Err(failure(&reply.content, reply.metadata.as_ref()).into());
    }
    print_message(reply);
    Ok(())
}

/// Classify a failed reply by the kind the session recorded for it.
pub(crate) fn failure(content: &str, metadata: Option<&Metadata>) -> CliError {
    let kind = metadata
        .and_then(|m| m.get(FAILURE_KIND_KEY))
        .and_then(|k| k.as_str());
    match kind {
        Some("transport") => CliError::Unavailable(content.to_string()),
        _ => CliError::Reply(content.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_failures_are_unavailable() {
        let mut metadata = Metadata::new();
        metadata.insert(FAILURE_KIND_KEY.to_string(), json!("transport"));
        let err = failure("Could not reach the backend", Some(&metadata));
        assert_eq!(err.exit_code(), 69);

        metadata.insert(FAILURE_KIND_KEY.to_string(), json!("backend"));
        assert_eq!(failure("HTTP 500", Some(&metadata)).exit_code(), 1);
        assert_eq!(failure("Error: index offline", None).exit_code(), 1);
    }
}
