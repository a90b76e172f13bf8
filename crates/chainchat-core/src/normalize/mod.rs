//! Response normalization.
//!
//! Reduces the heterogeneous payloads of the ai-chain endpoints to a single
//! [`NormalizedResponse`]. Normalization never fails: every branch ends in a
//! textual fallback so the rendering layer always has something to display.
//!
//! Priority:
//! 1. absent or `null` payload
//! 2. explicit failure marker (`error` field or `success: false`)
//! 3. plain-text body
//! 4. per-service extraction rule, with source lists and side-fields

mod fields;
mod rules;
mod sources;

use serde_json::Value;

use crate::domain::{NormalizedResponse, ServiceId};
use fields::{as_text, field_text};

pub use sources::{EXCERPT_MAX_CHARS, format_score, truncate_excerpt};

/// Content used when the backend sent nothing.
pub const NO_RESPONSE: &str = "No response received from the backend.";
/// Description used when a failure carries no readable explanation.
pub const UNSPECIFIED_ERROR: &str = "The backend reported an unspecified error.";
/// Prefix of every error-shaped content.
pub const ERROR_PREFIX: &str = "Error: ";

/// Normalize a raw backend response for the given service id.
///
/// `service_id` is the wire string; ids outside the registry use the generic
/// rule (first of `answer`, `result`, `message`, `response`).
pub fn normalize(raw: Option<&Value>, service_id: &str) -> NormalizedResponse {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return NormalizedResponse::new(NO_RESPONSE);
    };

    if let Some(failure) = detect_failure(raw) {
        return failure;
    }

    let mut response = if raw.is_string() {
        NormalizedResponse::new(as_text(raw).unwrap_or_default())
    } else {
        match ServiceId::parse(service_id) {
            Some(id) => rules::apply(id, raw),
            None => {
                tracing::debug!(service = service_id, "No extraction rule, using generic rule");
                rules::generic(raw)
            }
        }
    };

    if response.content.trim().is_empty() {
        response.content = rules::NO_CONTENT.to_string();
    }
    response
}

fn describe_error(error: &Value) -> Option<String> {
    as_text(error).or_else(|| {
        ["description", "message", "error", "detail"]
            .iter()
            .find_map(|key| field_text(error, key))
    })
}

/// Build an error-shaped response when the payload reports a failure.
fn detect_failure(raw: &Value) -> Option<NormalizedResponse> {
    let error = raw
        .get("error")
        .filter(|e| !e.is_null() && !matches!(e, Value::Bool(false)));
    let failed = raw.get("success").and_then(Value::as_bool) == Some(false);
    if error.is_none() && !failed {
        return None;
    }

    let description = error
        .and_then(describe_error)
        .or_else(|| field_text(raw, "message"))
        .unwrap_or_else(|| UNSPECIFIED_ERROR.to_string());

    tracing::debug!(%description, "Backend reported a failure");

    Some(
        NormalizedResponse::new(format!("{ERROR_PREFIX}{description}"))
            .with_metadata("error", error.cloned().unwrap_or_else(|| raw.clone())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_absent() {
        for raw in [None, Some(&Value::Null)] {
            let response = normalize(raw, "chat-answer");
            assert_eq!(response.content, NO_RESPONSE);
            assert!(response.metadata.is_empty());
        }
    }

    #[test]
    fn test_error_object_description() {
        let raw = json!({"error": {"description": "X"}});
        let response = normalize(Some(&raw), "embedding-query");
        assert!(response.content.contains('X'));
        assert!(response.content.starts_with(ERROR_PREFIX));
        assert!(response.is_error());
        assert_eq!(response.metadata["error"], json!({"description": "X"}));
    }

    #[test]
    fn test_success_false_uses_message() {
        let raw = json!({"success": false, "message": "store missing"});
        let response = normalize(Some(&raw), "embedding-get-info");
        assert_eq!(response.content, "Error: store missing");
        assert_eq!(response.metadata["error"], raw);
    }

    #[test]
    fn test_error_without_description() {
        let raw = json!({"error": {"code": 17}});
        let response = normalize(Some(&raw), "anything");
        assert_eq!(response.content, format!("{ERROR_PREFIX}{UNSPECIFIED_ERROR}"));
    }

    #[test]
    fn test_error_false_is_not_a_failure() {
        let raw = json!({"error": false, "answer": "fine"});
        let response = normalize(Some(&raw), "chat-answer");
        assert_eq!(response.content, "fine");
        assert!(!response.is_error());
    }

    #[test]
    fn test_get_info_sources_and_truncation() {
        let segment = "...".repeat(200);
        let raw = json!({
            "answer": {
                "response": "hi",
                "sources": [{"fileName": "a.pdf", "textSegment": segment}]
            }
        });
        let response = normalize(Some(&raw), "embedding-get-info");

        assert!(response.content.contains("hi"));
        assert!(response.content.contains("a.pdf"));

        let quoted = response
            .content
            .lines()
            .find(|line| line.trim_start().starts_with('"'))
            .expect("quoted excerpt");
        let excerpt = quoted.trim().trim_matches('"');
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= EXCERPT_MAX_CHARS + 3);
        assert!(response.metadata.contains_key("sources"));
    }

    #[test]
    fn test_query_score_percentage() {
        let raw = json!({
            "results": {"response": "R", "sources": [{"fileName": "f", "individualScore": 0.876}]}
        });
        let response = normalize(Some(&raw), "embedding-query");
        assert!(response.content.starts_with('R'));
        assert!(response.content.contains("87.6%"));
    }

    #[test]
    fn test_query_top_level_sources() {
        let raw = json!({"results": "R", "sources": [{"fileName": "g", "score": 0.5}]});
        let response = normalize(Some(&raw), "embedding-query");
        assert!(response.content.contains("1. g (50.0%)"));
    }

    #[test]
    fn test_empty_sources_not_appended() {
        let raw = json!({"answer": {"response": "only text", "sources": []}});
        let response = normalize(Some(&raw), "embedding-get-info");
        assert_eq!(response.content, "only text");
        assert!(!response.metadata.contains_key("sources"));
    }

    #[test]
    fn test_plain_text_body() {
        let raw = json!("pong");
        assert_eq!(normalize(Some(&raw), "chat-answer").content, "pong");

        let blank = json!("  ");
        assert_eq!(normalize(Some(&blank), "chat-answer").content, rules::NO_CONTENT);
    }

    #[test]
    fn test_unrecognized_service_uses_generic_rule() {
        let raw = json!({"message": "queued"});
        assert_eq!(normalize(Some(&raw), "translate").content, "queued");
    }

    #[test]
    fn test_content_is_never_empty() {
        let shapes = [
            json!({}),
            json!([]),
            json!(42),
            json!({"answer": null}),
            json!({"answer": {"response": ""}}),
        ];
        for raw in &shapes {
            for id in ServiceId::ALL {
                let response = normalize(Some(raw), id.as_str());
                assert!(!response.content.trim().is_empty(), "{id} on {raw}");
            }
            assert!(!normalize(Some(raw), "unknown").content.is_empty());
        }
    }
}
