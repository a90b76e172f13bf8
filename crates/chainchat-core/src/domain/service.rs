//! Service identifiers shared by the request and response tables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ChatError;

/// A backend capability exposed by the ai-chain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceId {
    ChatAnswer,
    ChatAnswerMemory,
    EmbeddingGetInfo,
    EmbeddingQuery,
    SentimentAnalyze,
    ImageGenerate,
    ImageRead,
    ImageReadScanned,
    RagLoadDocument,
    EmbeddingAddDocument,
    EmbeddingAddFolder,
    EmbeddingNewStore,
    HealthCheck,
}

impl ServiceId {
    /// Every service, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::ChatAnswer,
        Self::ChatAnswerMemory,
        Self::EmbeddingGetInfo,
        Self::EmbeddingQuery,
        Self::SentimentAnalyze,
        Self::ImageGenerate,
        Self::ImageRead,
        Self::ImageReadScanned,
        Self::RagLoadDocument,
        Self::EmbeddingAddDocument,
        Self::EmbeddingAddFolder,
        Self::EmbeddingNewStore,
        Self::HealthCheck,
    ];

    /// Parse a service id from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s.trim())
    }

    /// Convert the service id to its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ChatAnswer => "chat-answer",
            Self::ChatAnswerMemory => "chat-answer-memory",
            Self::EmbeddingGetInfo => "embedding-get-info",
            Self::EmbeddingQuery => "embedding-query",
            Self::SentimentAnalyze => "sentiment-analyze",
            Self::ImageGenerate => "image-generate",
            Self::ImageRead => "image-read",
            Self::ImageReadScanned => "image-read-scanned",
            Self::RagLoadDocument => "rag-load-document",
            Self::EmbeddingAddDocument => "embedding-add-document",
            Self::EmbeddingAddFolder => "embedding-add-folder",
            Self::EmbeddingNewStore => "embedding-new-store",
            Self::HealthCheck => "health-check",
        }
    }

    /// Services whose upload payload is built from a file.
    #[must_use]
    pub const fn accepts_files(&self) -> bool {
        matches!(
            self,
            Self::RagLoadDocument
                | Self::EmbeddingAddDocument
                | Self::EmbeddingAddFolder
                | Self::ImageRead
                | Self::ImageReadScanned
        )
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceId {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ChatError::UnknownService(s.to_string()))
    }
}

/// HTTP method used to reach a service endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_id() {
        for id in ServiceId::ALL {
            assert_eq!(ServiceId::parse(id.as_str()), Some(id));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(ServiceId::parse("translate"), None);
        assert!(matches!(
            "translate".parse::<ServiceId>(),
            Err(ChatError::UnknownService(s)) if s == "translate"
        ));
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&ServiceId::ImageReadScanned).unwrap();
        assert_eq!(json, "\"image-read-scanned\"");
    }

    #[test]
    fn test_accepts_files() {
        assert!(ServiceId::EmbeddingAddFolder.accepts_files());
        assert!(ServiceId::ImageRead.accepts_files());
        assert!(!ServiceId::ChatAnswer.accepts_files());
        assert!(!ServiceId::HealthCheck.accepts_files());
    }
}
