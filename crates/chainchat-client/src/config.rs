//! Connection settings for talking to an ai-chain backend.

use std::time::Duration;

/// Where the backend listens when started with its stock profile.
pub const DEFAULT_API_BASE: &str = "http://localhost:8081/api/v1";

/// Connection settings consumed by [`ReqwestTransport::new`](crate::ReqwestTransport::new).
///
/// Every service path from the registry (`/health`, `/ai-chain/chat/answer`, ...)
/// is joined onto `base_url`, so the base must include the `/api/v1` prefix.
///
/// ```
/// use chainchat_client::ClientConfig;
/// use std::time::Duration;
///
/// // A shared backend that ingests large PDFs gets a longer deadline.
/// let config = ClientConfig::new()
///     .with_base_url("http://ai-chain.internal:8081/api/v1")
///     .with_timeout(Duration::from_secs(120));
/// assert_eq!(config.base_url(), "http://ai-chain.internal:8081/api/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) base_url: String,
    /// Sent on every call so backend logs can tell chainchat traffic apart.
    pub(crate) user_agent: String,
    /// Upper bound on a whole exchange, connect through last body byte.
    pub(crate) timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            user_agent: concat!("chainchat/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ClientConfig {
    /// Local backend, chainchat user agent, 60 second deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the transport at another backend deployment.
    ///
    /// The value is validated when the transport is built, not here.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Deadline for one backend exchange.
    ///
    /// Expiry surfaces as a transport failure worded "timed out". Image
    /// generation and document ingestion are the slow services.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
