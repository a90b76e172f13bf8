//! Session state passed to the payload builders.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SessionConfig;
use crate::domain::{ChatMessage, ServiceId};

/// Everything a payload builder may read about the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub selected_service: ServiceId,
    pub active_store: String,
    pub memory_enabled: bool,
    /// Backend memory key, unique per session
    pub memory_name: String,
    pub image_style: Option<String>,
    /// Path of the document analyzed by RAG and image requests
    pub context_path: Option<String>,
    /// Append-only, in display order
    pub transcript: Vec<ChatMessage>,
}

impl SessionState {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            selected_service: config.service,
            active_store: config.store.clone(),
            memory_enabled: config.memory_enabled,
            memory_name: format!("session-{}", Uuid::new_v4()),
            image_style: config.image_style.clone(),
            context_path: None,
            transcript: Vec::new(),
        }
    }

    /// The service a text submission is routed to.
    ///
    /// Plain chat goes through the memory endpoint while memory is enabled.
    pub const fn effective_service(&self) -> ServiceId {
        match self.selected_service {
            ServiceId::ChatAnswer if self.memory_enabled => ServiceId::ChatAnswerMemory,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_names_are_unique() {
        let config = SessionConfig::default();
        let a = SessionState::from_config(&config);
        let b = SessionState::from_config(&config);
        assert!(a.memory_name.starts_with("session-"));
        assert_ne!(a.memory_name, b.memory_name);
    }

    #[test]
    fn test_effective_service_memory_routing() {
        let mut state = SessionState::from_config(&SessionConfig::default());
        assert_eq!(state.effective_service(), ServiceId::ChatAnswerMemory);

        state.memory_enabled = false;
        assert_eq!(state.effective_service(), ServiceId::ChatAnswer);

        state.memory_enabled = true;
        state.selected_service = ServiceId::EmbeddingQuery;
        assert_eq!(state.effective_service(), ServiceId::EmbeddingQuery);
    }
}
