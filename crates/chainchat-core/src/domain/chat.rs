//! Chat domain types.
//!
//! These types are what the rendering layer receives. It never sees raw
//! backend JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ServiceId;

/// Free-form side data attached to a message (sources, image URL, store...).
pub type Metadata = Map<String, Value>;

/// The role of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
    Error,
}

impl MessageRole {
    /// Parse a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "system" => Some(Self::System),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Convert role to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single transcript entry. Created once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u64,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ServiceId>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Whether the message carries metadata with the given key.
    pub fn has_metadata(&self, key: &str) -> bool {
        self.metadata.as_ref().is_some_and(|m| m.contains_key(key))
    }
}

/// The uniform display record produced for every backend response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub content: String,
    pub metadata: Metadata,
}

impl NormalizedResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Whether the backend reported an explicit failure.
    pub fn is_error(&self) -> bool {
        self.metadata.contains_key("error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_parse_and_display() {
        for role in [
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::System,
            MessageRole::Error,
        ] {
            assert_eq!(MessageRole::parse(role.as_str()), Some(role));
            assert_eq!(role.to_string(), role.as_str());
        }
        assert_eq!(MessageRole::parse("bot"), None);
    }

    #[test]
    fn test_message_serializes_camel_case() {
        let message = ChatMessage {
            id: 3,
            role: MessageRole::Assistant,
            content: "pong".to_string(),
            metadata: None,
            service_id: Some(ServiceId::ChatAnswer),
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["serviceId"], "chat-answer");
        assert_eq!(value["role"], "assistant");
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_normalized_response_error_flag() {
        let ok = NormalizedResponse::new("fine");
        assert!(!ok.is_error());

        let failed = NormalizedResponse::new("Error: boom").with_metadata("error", json!("boom"));
        assert!(failed.is_error());
    }
}
