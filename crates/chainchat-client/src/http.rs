//! reqwest-backed implementation of the transport port.

use async_trait::async_trait;
use chainchat_core::{BackendRequest, ChatError, ChatResult, HttpMethod, ServiceTransport};
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, map_error};
use crate::endpoint::{build_endpoint_url, parse_base_url};

/// Production transport talking to an ai-chain backend over HTTP.
///
/// `GET` requests carry no body; `POST` requests send the payload as JSON.
/// No retries are attempted: a failed call surfaces immediately so the
/// session can record it.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Create a transport from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The parsed API base every endpoint is resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_request(&self, request: &BackendRequest, url: &Url) -> reqwest::RequestBuilder {
        match request.method {
            HttpMethod::Get => self.client.get(url.as_str()),
            HttpMethod::Post => self.client.post(url.as_str()).json(&request.body),
        }
    }
}

#[async_trait]
impl ServiceTransport for ReqwestTransport {
    async fn send(&self, request: BackendRequest) -> ChatResult<Value> {
        let url = build_endpoint_url(&self.base_url, request.endpoint);
        tracing::debug!(
            service = %request.service,
            method = %request.method,
            %url,
            "Sending backend request"
        );

        let response = self
            .build_request(&request, &url)
            .send()
            .await
            .map_err(|e| map_error(&e, &url))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| map_error(&e, &url))?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Backend responded");

        if !status.is_success() {
            return Err(ChatError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        Ok(decode_body(&body))
    }
}

/// Decode a successful response body.
///
/// Empty bodies become `null`; bodies that are not JSON are kept as a string.
pub(crate) fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
