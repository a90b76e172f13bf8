//! Field lookups over variably nested backend payloads.

use serde_json::Value;

/// A string value with visible content.
pub(super) fn as_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(ToString::to_string)
}

/// `raw[key]` as text.
pub(super) fn field_text(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(as_text)
}

/// `raw[key].response` when `raw[key]` is an object, else `raw[key]` itself.
pub(super) fn nested_text(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::Object(inner) => inner.get("response").and_then(as_text),
        other => as_text(other),
    }
}

/// `raw[outer][inner]` when `raw[outer]` is an object.
pub(super) fn nested_field<'a>(raw: &'a Value, outer: &str, inner: &str) -> Option<&'a Value> {
    raw.get(outer)
        .filter(|v| v.is_object())
        .and_then(|v| v.get(inner))
        .filter(|v| !v.is_null())
}

/// A side-field echoed by the backend, either under `metadata` or top-level.
pub(super) fn side_field<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.get("metadata")
        .and_then(|m| m.get(key))
        .filter(|v| !v.is_null())
        .or_else(|| raw.get(key).filter(|v| !v.is_null()))
}

pub(super) fn side_text(raw: &Value, key: &str) -> Option<String> {
    side_field(raw, key).and_then(as_text)
}

/// A numeric value, also accepting numbers sent as strings.
pub(super) fn as_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Textual rendering of any JSON value: strings verbatim, the rest pretty-printed.
pub(super) fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(_) => as_text(value),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string_pretty(value).ok(),
    }
}
