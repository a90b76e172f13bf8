//! Session configuration.

use crate::domain::ServiceId;
use crate::registry::DEFAULT_STORES;

/// Image style sent with generation requests unless overridden.
pub const DEFAULT_IMAGE_STYLE: &str = "technical_diagram";

/// Greeting shown as the first transcript entry of a new session.
pub const DEFAULT_WELCOME_MESSAGE: &str =
    "Welcome to the maintenance assistant. How can I help you today?";

/// Configuration for a new chat session.
///
/// # Example
///
/// ```
/// use chainchat_core::{ServiceId, SessionConfig};
///
/// let config = SessionConfig::new()
///     .with_service(ServiceId::EmbeddingQuery)
///     .with_store("brake-systems")
///     .with_memory(false);
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub(crate) service: ServiceId,
    pub(crate) store: String,
    pub(crate) memory_enabled: bool,
    pub(crate) image_style: Option<String>,
    pub(crate) welcome_message: Option<String>,
    pub(crate) stores: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            service: ServiceId::ChatAnswer,
            store: "default".to_string(),
            memory_enabled: true,
            image_style: Some(DEFAULT_IMAGE_STYLE.to_string()),
            welcome_message: Some(DEFAULT_WELCOME_MESSAGE.to_string()),
            stores: DEFAULT_STORES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initially selected service.
    ///
    /// Defaults to `chat-answer`.
    #[must_use]
    pub const fn with_service(mut self, service: ServiceId) -> Self {
        self.service = service;
        self
    }

    /// Set the initially active knowledge store.
    ///
    /// Defaults to `default`. Must be one of the configured stores.
    #[must_use]
    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = store.into();
        self
    }

    /// Route plain chat through the memory-backed endpoint.
    ///
    /// Defaults to `true`.
    #[must_use]
    pub const fn with_memory(mut self, enabled: bool) -> Self {
        self.memory_enabled = enabled;
        self
    }

    /// Set the image generation style; `None` omits it from requests.
    #[must_use]
    pub fn with_image_style(mut self, style: Option<String>) -> Self {
        self.image_style = style;
        self
    }

    /// Set the welcome message; `None` starts with an empty transcript.
    #[must_use]
    pub fn with_welcome_message(mut self, message: Option<String>) -> Self {
        self.welcome_message = message;
        self
    }

    /// Replace the known knowledge stores.
    #[must_use]
    pub fn with_stores<I, S>(mut self, stores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stores = stores.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::new();
        assert_eq!(config.service, ServiceId::ChatAnswer);
        assert_eq!(config.store, "default");
        assert!(config.memory_enabled);
        assert_eq!(config.image_style.as_deref(), Some(DEFAULT_IMAGE_STYLE));
        assert_eq!(config.stores.len(), 4);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SessionConfig::new()
            .with_service(ServiceId::SentimentAnalyze)
            .with_store("legacy-trains")
            .with_memory(false)
            .with_image_style(None)
            .with_welcome_message(None)
            .with_stores(["legacy-trains"]);

        assert_eq!(config.service, ServiceId::SentimentAnalyze);
        assert_eq!(config.store, "legacy-trains");
        assert!(!config.memory_enabled);
        assert!(config.image_style.is_none());
        assert!(config.welcome_message.is_none());
        assert_eq!(config.stores, vec!["legacy-trains".to_string()]);
    }
}
