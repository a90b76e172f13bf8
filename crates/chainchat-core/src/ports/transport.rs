//! Transport port definition.
//!
//! The session issues every backend call through this port. Implementations
//! perform the HTTP exchange; the core never depends on an HTTP client.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::{HttpMethod, ServiceId};
use crate::error::ChatResult;
use crate::registry::ServiceDescriptor;

/// A request ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub service: ServiceId,
    pub method: HttpMethod,
    /// Path relative to the API base
    pub endpoint: &'static str,
    /// JSON body; ignored for `GET`
    pub body: Value,
}

impl BackendRequest {
    pub fn new(descriptor: &ServiceDescriptor, body: Value) -> Self {
        Self {
            service: descriptor.id,
            method: descriptor.method,
            endpoint: descriptor.endpoint,
            body,
        }
    }
}

/// Port for issuing backend calls.
///
/// `Ok` carries the decoded response body: `Value::Null` for an empty body and
/// a JSON string for a body that is not JSON. Non-2xx statuses are reported as
/// `ChatError::Backend`, unreachable backends as `ChatError::Transport`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceTransport: Send + Sync {
    async fn send(&self, request: BackendRequest) -> ChatResult<Value>;
}

#[async_trait]
impl<T: ServiceTransport + ?Sized> ServiceTransport for Arc<T> {
    async fn send(&self, request: BackendRequest) -> ChatResult<Value> {
        (**self).send(request).await
    }
}
