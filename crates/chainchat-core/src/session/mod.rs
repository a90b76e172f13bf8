//! Chat session - thin orchestrator over the registry, transport and normalizer.
//!
//! A session is either idle or awaiting a response. At most one backend call
//! is outstanding at a time; operations attempted while a call is in flight
//! are rejected with [`ChatError::SessionBusy`]. The state lock is never held
//! across the backend call, so a shared session can observe and reject
//! concurrent submissions.

mod config;
mod state;

use chrono::Utc;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

use crate::domain::{
    ChatMessage, DocumentEntry, MessageRole, Metadata, NormalizedResponse, ServiceId, UploadedFile,
};
use crate::error::{ChatError, ChatResult, FAILURE_KIND_KEY};
use crate::normalize::{ERROR_PREFIX, normalize};
use crate::ports::{BackendRequest, ServiceTransport};
use crate::registry::{ServiceDescriptor, ServiceRegistry, StoreCatalog, build_file_request};

pub use config::{DEFAULT_IMAGE_STYLE, DEFAULT_WELCOME_MESSAGE, SessionConfig};
pub use state::SessionState;

/// Lifecycle of a session.
#[derive(Debug, Clone, Default)]
enum SessionPhase {
    #[default]
    Idle,
    AwaitingResponse {
        cancel: CancellationToken,
    },
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    phase: SessionPhase,
    stores: StoreCatalog,
    documents: Vec<DocumentEntry>,
    next_id: u64,
}

impl SessionInner {
    fn ensure_idle(&self) -> ChatResult<()> {
        match self.phase {
            SessionPhase::Idle => Ok(()),
            SessionPhase::AwaitingResponse { .. } => {
                tracing::warn!("Rejected operation while a request is in flight");
                Err(ChatError::SessionBusy)
            }
        }
    }

    /// Enter the awaiting-response phase and hand back its cancellation token.
    fn begin(&mut self) -> CancellationToken {
        let cancel = CancellationToken::new();
        self.phase = SessionPhase::AwaitingResponse {
            cancel: cancel.clone(),
        };
        cancel
    }

    fn push(
        &mut self,
        role: MessageRole,
        content: String,
        metadata: Option<Metadata>,
        service_id: Option<ServiceId>,
    ) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id,
            role,
            content,
            metadata: metadata.filter(|m| !m.is_empty()),
            service_id,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.state.transcript.push(message.clone());
        message
    }

    /// Append the response entry for a finished call.
    fn record(&mut self, service: ServiceId, outcome: ChatResult<Value>) -> ChatMessage {
        match outcome {
            Ok(raw) => {
                let response = normalize(Some(&raw), service.as_str());
                let role = if response.is_error() {
                    MessageRole::Error
                } else {
                    MessageRole::Assistant
                };
                self.push(role, response.content, Some(response.metadata), Some(service))
            }
            Err(err) => {
                let mut metadata = Metadata::new();
                metadata.insert(FAILURE_KIND_KEY.to_string(), json!(err.failure_kind()));
                if let ChatError::Backend { status, body } = &err {
                    metadata.insert("status".to_string(), json!(status));
                    metadata.insert("body".to_string(), Value::String(body.clone()));
                }
                self.push(MessageRole::Error, err.describe(), Some(metadata), Some(service))
            }
        }
    }
}

fn lock_inner(inner: &Mutex<SessionInner>) -> MutexGuard<'_, SessionInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reply callback type for calls kept out of the transcript.
type NoReply = fn(&mut SessionInner, &ChatMessage);

/// An outstanding backend call.
///
/// Settling it returns the session to idle. If the owning future is dropped
/// before the call finishes, the drop settles it as cancelled so the session
/// never stays busy and the user entry still gets its response.
struct InFlight<'a, R>
where
    R: FnOnce(&mut SessionInner, &ChatMessage),
{
    inner: &'a Mutex<SessionInner>,
    service: ServiceId,
    /// `None` for calls kept out of the transcript
    on_reply: Option<R>,
    settled: bool,
}

impl<'a, R> InFlight<'a, R>
where
    R: FnOnce(&mut SessionInner, &ChatMessage),
{
    fn new(inner: &'a Mutex<SessionInner>, service: ServiceId, on_reply: Option<R>) -> Self {
        Self {
            inner,
            service,
            on_reply,
            settled: false,
        }
    }

    /// Return to idle; transcript calls also append their response entry.
    fn settle(mut self, outcome: ChatResult<Value>) -> Option<ChatMessage> {
        self.finish(outcome)
    }

    /// Return to idle without recording anything.
    fn release(mut self) {
        self.on_reply = None;
        self.finish(Ok(Value::Null));
    }

    fn finish(&mut self, outcome: ChatResult<Value>) -> Option<ChatMessage> {
        self.settled = true;
        let mut inner = lock_inner(self.inner);
        inner.phase = SessionPhase::Idle;
        let on_reply = self.on_reply.take()?;
        let reply = inner.record(self.service, outcome);
        on_reply(&mut inner, &reply);
        Some(reply)
    }
}

impl<R> Drop for InFlight<'_, R>
where
    R: FnOnce(&mut SessionInner, &ChatMessage),
{
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!(service = %self.service, "Request abandoned before completion");
            self.finish(Err(ChatError::Cancelled));
        }
    }
}

/// A conversation with the ai-chain backend.
pub struct ChatSession<T: ServiceTransport> {
    transport: T,
    registry: Arc<ServiceRegistry>,
    inner: Mutex<SessionInner>,
}

impl<T: ServiceTransport> ChatSession<T> {
    /// Create a session. The configured service and store are validated here.
    pub fn new(
        transport: T,
        registry: Arc<ServiceRegistry>,
        config: &SessionConfig,
    ) -> ChatResult<Self> {
        registry.resolve(config.service)?;
        let stores = StoreCatalog::new(config.stores.iter().cloned());
        stores.validate(&config.store)?;

        let mut inner = SessionInner {
            state: SessionState::from_config(config),
            phase: SessionPhase::Idle,
            stores,
            documents: Vec::new(),
            next_id: 1,
        };
        if let Some(welcome) = config.welcome_message.as_ref().filter(|w| !w.is_empty()) {
            inner.push(MessageRole::System, welcome.clone(), None, None);
        }

        Ok(Self {
            transport,
            registry,
            inner: Mutex::new(inner),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        lock_inner(&self.inner)
    }

    /// Submit user text to the selected service.
    ///
    /// Returns the appended response entry (`assistant` or `error`). Empty
    /// text and submissions while a call is in flight are rejected without
    /// touching the transcript.
    pub async fn submit(&self, text: &str) -> ChatResult<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::invalid_input("message must not be empty"));
        }
        let content = text.to_string();
        self.exchange(
            None,
            content,
            None,
            |descriptor, state| Ok(descriptor.payload(text, state)),
            |_, _| {},
        )
        .await
    }

    /// Upload a file to a file-capable service.
    ///
    /// Records a document entry whatever the outcome. A successful upload
    /// becomes the session's context path.
    pub async fn upload(&self, file: &UploadedFile, service: ServiceId) -> ChatResult<ChatMessage> {
        if file.name.trim().is_empty() || file.path.trim().is_empty() {
            return Err(ChatError::invalid_input("file name and path must not be empty"));
        }
        let mut file_metadata = Metadata::new();
        file_metadata.insert(
            "file".to_string(),
            json!({ "name": file.name, "size": file.size, "mimeType": file.mime_type }),
        );

        self.exchange(
            Some(service),
            format!("Uploaded {}", file.name),
            Some(file_metadata),
            |_, state| build_file_request(file, service, state),
            |inner, reply| {
                let success = reply.role == MessageRole::Assistant;
                inner
                    .documents
                    .push(DocumentEntry::record(file, service, success));
                if success {
                    inner.state.context_path = Some(file.path.clone());
                }
            },
        )
        .await
    }

    /// Create a knowledge store on the backend and add it to the catalog.
    pub async fn create_store(&self, name: &str) -> ChatResult<ChatMessage> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatError::invalid_input("store name must not be empty"));
        }
        self.exchange(
            Some(ServiceId::EmbeddingNewStore),
            format!("Create knowledge store \"{name}\""),
            None,
            |descriptor, state| Ok(descriptor.payload(name, state)),
            |inner, reply| {
                if reply.role == MessageRole::Assistant {
                    if let Ok(true) = inner.stores.add(name) {
                        tracing::info!(store = name, "Knowledge store added to catalog");
                    }
                }
            },
        )
        .await
    }

    /// Query the backend health endpoint.
    ///
    /// The health call counts as the session's outstanding call, so it is rejected
    /// with `SessionBusy` while another call is in flight and can be
    /// cancelled. It never touches the transcript.
    pub async fn health_check(&self) -> ChatResult<NormalizedResponse> {
        let descriptor = self.registry.resolve(ServiceId::HealthCheck)?;
        let (request, cancel) = {
            let mut inner = self.lock();
            inner.ensure_idle()?;
            let body = descriptor.payload("", &inner.state);
            (BackendRequest::new(descriptor, body), inner.begin())
        };
        let pending = InFlight::<NoReply>::new(&self.inner, descriptor.id, None);

        let outcome = tokio::select! {
            () = cancel.cancelled() => Err(ChatError::Cancelled),
            result = self.transport.send(request) => result,
        };
        pending.release();

        let response = match outcome {
            Ok(raw) => normalize(Some(&raw), descriptor.id.as_str()),
            Err(err) => NormalizedResponse::new(format!("{ERROR_PREFIX}{}", err.describe()))
                .with_metadata("error", Value::String(err.to_string()))
                .with_metadata(FAILURE_KIND_KEY, json!(err.failure_kind())),
        };
        Ok(response)
    }

    /// Cancel the in-flight call, if any.
    ///
    /// The pending operation resolves into an `error` entry. Returns whether a
    /// call was cancelled.
    pub fn cancel(&self) -> bool {
        match &self.lock().phase {
            SessionPhase::AwaitingResponse { cancel } => {
                cancel.cancel();
                true
            }
            SessionPhase::Idle => false,
        }
    }

    /// Select the service for subsequent text submissions.
    pub fn select_service(&self, id: &str) -> ChatResult<ServiceId> {
        let service = self.registry.resolve_str(id)?.id;
        let mut inner = self.lock();
        inner.ensure_idle()?;
        inner.state.selected_service = service;
        Ok(service)
    }

    /// Select the knowledge store used by store-scoped services.
    pub fn select_store(&self, name: &str) -> ChatResult<()> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        inner.stores.validate(name)?;
        inner.state.active_store = name.to_string();
        Ok(())
    }

    pub fn set_memory_enabled(&self, enabled: bool) -> ChatResult<()> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        inner.state.memory_enabled = enabled;
        Ok(())
    }

    /// Set the document path used by RAG and image analysis requests.
    pub fn set_context_path(&self, path: Option<String>) -> ChatResult<()> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        inner.state.context_path = path.filter(|p| !p.trim().is_empty());
        Ok(())
    }

    pub fn set_image_style(&self, style: Option<String>) -> ChatResult<()> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        inner.state.image_style = style;
        Ok(())
    }

    /// Snapshot of the transcript, in display order.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock().state.transcript.clone()
    }

    /// Snapshot of the recorded uploads.
    pub fn documents(&self) -> Vec<DocumentEntry> {
        self.lock().documents.clone()
    }

    /// Known knowledge store names.
    pub fn stores(&self) -> Vec<String> {
        self.lock().stores.names().to_vec()
    }

    /// Snapshot of the session state.
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.lock().phase, SessionPhase::AwaitingResponse { .. })
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Run one request/response exchange.
    ///
    /// Accepting the exchange appends the user entry and enters the
    /// awaiting-response phase; the response entry is appended (and
    /// `on_reply` run) under the same lock acquisition that returns the
    /// session to idle, also when the future is dropped mid-call.
    async fn exchange<B, R>(
        &self,
        service: Option<ServiceId>,
        user_content: String,
        user_metadata: Option<Metadata>,
        build: B,
        on_reply: R,
    ) -> ChatResult<ChatMessage>
    where
        B: FnOnce(&ServiceDescriptor, &SessionState) -> ChatResult<Value>,
        R: FnOnce(&mut SessionInner, &ChatMessage),
    {
        let (request, cancel) = {
            let mut inner = self.lock();
            inner.ensure_idle()?;

            let service = service.unwrap_or_else(|| inner.state.effective_service());
            let descriptor = self.registry.resolve(service)?;
            let body = build(descriptor, &inner.state)?;

            inner.push(MessageRole::User, user_content, user_metadata, Some(service));
            (BackendRequest::new(descriptor, body), inner.begin())
        };

        let service = request.service;
        let pending = InFlight::new(&self.inner, service, Some(on_reply));
        tracing::info!(
            service = %service,
            method = %request.method,
            endpoint = request.endpoint,
            "Dispatching request"
        );

        let outcome = tokio::select! {
            () = cancel.cancelled() => Err(ChatError::Cancelled),
            result = self.transport.send(request) => result,
        };

        if let Err(err) = &outcome {
            tracing::warn!(service = %service, error = %err, "Request failed");
        }

        pending.settle(outcome).ok_or(ChatError::Cancelled)
    }
}
