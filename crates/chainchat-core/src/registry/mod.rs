//! Service registry: the request half of the dispatch tables.
//!
//! Each descriptor maps a `ServiceId` to its endpoint and a pure payload
//! builder. The registry is populated once at startup and shared read-only
//! afterwards (`Arc<ServiceRegistry>`).

mod payload;
mod stores;

use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::{HttpMethod, ServiceId};
use crate::error::{ChatError, ChatResult};
use crate::session::SessionState;

pub use payload::{
    DEFAULT_FILE_TYPE, DEFAULT_IMAGE_PROMPT, DEFAULT_SCAN_PROMPT, FOLDER_FILE_TYPE,
    MAX_OVERLAP_SIZE, MAX_SEGMENT_SIZE, MEMORY_MAX_MESSAGES, QUERY_MAX_RESULTS, QUERY_MIN_SCORE,
    build_file_request,
};
pub use stores::{DEFAULT_STORES, StoreCatalog};

/// Builds a request payload from the user's text and the session state.
pub type RequestBuilder = fn(&str, &SessionState) -> Value;

/// Describes one backend capability.
#[derive(Clone, Copy)]
pub struct ServiceDescriptor {
    pub id: ServiceId,
    pub method: HttpMethod,
    /// Path relative to the API base, e.g. `/ai-chain/chat/answer`
    pub endpoint: &'static str,
    pub display_name: &'static str,
    pub build_request: RequestBuilder,
}

impl ServiceDescriptor {
    pub const fn new(
        id: ServiceId,
        method: HttpMethod,
        endpoint: &'static str,
        display_name: &'static str,
        build_request: RequestBuilder,
    ) -> Self {
        Self {
            id,
            method,
            endpoint,
            display_name,
            build_request,
        }
    }

    /// Build the payload for a text submission.
    pub fn payload(&self, text: &str, state: &SessionState) -> Value {
        (self.build_request)(text, state)
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("endpoint", &self.endpoint)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

const DEFAULT_SERVICES: [ServiceDescriptor; 13] = [
    ServiceDescriptor::new(
        ServiceId::ChatAnswer,
        HttpMethod::Post,
        "/ai-chain/chat/answer",
        "Chat",
        payload::chat,
    ),
    ServiceDescriptor::new(
        ServiceId::ChatAnswerMemory,
        HttpMethod::Post,
        "/ai-chain/chat/answer-with-memory",
        "Chat with memory",
        payload::chat_with_memory,
    ),
    ServiceDescriptor::new(
        ServiceId::EmbeddingGetInfo,
        HttpMethod::Post,
        "/ai-chain/embedding/get-info",
        "Knowledge store lookup",
        payload::store_info,
    ),
    ServiceDescriptor::new(
        ServiceId::EmbeddingQuery,
        HttpMethod::Post,
        "/ai-chain/embedding/query",
        "Semantic search",
        payload::semantic_query,
    ),
    ServiceDescriptor::new(
        ServiceId::SentimentAnalyze,
        HttpMethod::Post,
        "/ai-chain/sentiment/analyze",
        "Sentiment analysis",
        payload::sentiment,
    ),
    ServiceDescriptor::new(
        ServiceId::ImageGenerate,
        HttpMethod::Post,
        "/ai-chain/image/generate",
        "Image generation",
        payload::image_generate,
    ),
    ServiceDescriptor::new(
        ServiceId::ImageRead,
        HttpMethod::Post,
        "/ai-chain/image/read",
        "Image analysis",
        payload::image_read,
    ),
    ServiceDescriptor::new(
        ServiceId::ImageReadScanned,
        HttpMethod::Post,
        "/ai-chain/image/read-scanned",
        "Scanned document OCR",
        payload::image_read,
    ),
    ServiceDescriptor::new(
        ServiceId::RagLoadDocument,
        HttpMethod::Post,
        "/ai-chain/rag/load-document",
        "Document analysis (RAG)",
        payload::rag,
    ),
    ServiceDescriptor::new(
        ServiceId::EmbeddingAddDocument,
        HttpMethod::Post,
        "/ai-chain/embedding/add-document",
        "Add document",
        payload::ingest_document,
    ),
    ServiceDescriptor::new(
        ServiceId::EmbeddingAddFolder,
        HttpMethod::Post,
        "/ai-chain/embedding/add-folder",
        "Add folder",
        payload::ingest_folder,
    ),
    ServiceDescriptor::new(
        ServiceId::EmbeddingNewStore,
        HttpMethod::Post,
        "/ai-chain/embedding/new-store",
        "New knowledge store",
        payload::new_store,
    ),
    ServiceDescriptor::new(
        ServiceId::HealthCheck,
        HttpMethod::Get,
        "/health",
        "Health check",
        payload::health,
    ),
];

/// Table of registered services, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: BTreeMap<ServiceId, ServiceDescriptor>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every ai-chain service.
    pub fn with_defaults() -> Self {
        let services = DEFAULT_SERVICES.iter().map(|d| (d.id, *d)).collect();
        Self { services }
    }

    /// Register a descriptor. Ids are unique.
    pub fn register(&mut self, descriptor: ServiceDescriptor) -> ChatResult<()> {
        if self.services.contains_key(&descriptor.id) {
            return Err(ChatError::DuplicateService(descriptor.id));
        }
        tracing::debug!(service = %descriptor.id, endpoint = descriptor.endpoint, "Registered service");
        self.services.insert(descriptor.id, descriptor);
        Ok(())
    }

    /// Look up a descriptor by id.
    pub fn resolve(&self, id: ServiceId) -> ChatResult<&ServiceDescriptor> {
        self.services
            .get(&id)
            .ok_or_else(|| ChatError::UnknownService(id.to_string()))
    }

    /// Look up a descriptor by its wire string.
    pub fn resolve_str(&self, id: &str) -> ChatResult<&ServiceDescriptor> {
        let id: ServiceId = id.parse()?;
        self.resolve(id)
    }

    /// Descriptors in `ServiceId` declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
