//! CLI bootstrap - the composition root.
//!
//! The only place where the reqwest transport, the service registry and the
//! chat session are wired together.

use std::sync::Arc;
use std::time::Duration;

use chainchat_client::{ClientConfig, ReqwestTransport};
use chainchat_core::{ChatSession, ServiceId, ServiceRegistry, SessionConfig};

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration derived from the global flags.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub client: ClientConfig,
    pub session: SessionConfig,
}

impl CliConfig {
    /// Build the configuration from parsed arguments.
    ///
    /// `interactive` keeps the welcome message; one-shot commands drop it so
    /// their output is just the reply.
    pub fn from_cli(cli: &Cli, interactive: bool) -> Result<Self, CliError> {
        let service: ServiceId = cli.service.parse()?;
        let client = ClientConfig::new()
            .with_base_url(cli.api_base.clone())
            .with_timeout(Duration::from_secs(cli.timeout));

        let mut session = SessionConfig::new()
            .with_service(service)
            .with_store(cli.store.clone())
            .with_memory(!cli.no_memory);
        if !interactive {
            session = session.with_welcome_message(None);
        }

        Ok(Self { client, session })
    }
}

/// Fully composed context handed to command handlers.
pub struct CliContext {
    pub session: ChatSession<ReqwestTransport>,
}

impl CliContext {
    pub const fn session(&self) -> &ChatSession<ReqwestTransport> {
        &self.session
    }
}

/// Wire the transport and session together.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let transport = ReqwestTransport::new(&config.client)?;
    tracing::debug!(base_url = %transport.base_url(), "Transport ready");

    let registry = Arc::new(ServiceRegistry::with_defaults());
    let session = ChatSession::new(transport, registry, &config.session)?;

    Ok(CliContext { session })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_bootstrap_applies_global_flags() {
        let cli = Cli::parse_from([
            "chainchat",
            "--service",
            "embedding-query",
            "--store",
            "legacy-trains",
            "--no-memory",
            "health",
        ]);
        let config = CliConfig::from_cli(&cli, false).unwrap();
        let ctx = bootstrap(&config).unwrap();

        let state = ctx.session().state();
        assert_eq!(state.selected_service, ServiceId::EmbeddingQuery);
        assert_eq!(state.active_store, "legacy-trains");
        assert!(!state.memory_enabled);
        assert!(ctx.session().transcript().is_empty());
    }

    #[tokio::test]
    async fn test_interactive_session_opens_with_welcome() {
        let cli = Cli::parse_from(["chainchat", "chat"]);
        let config = CliConfig::from_cli(&cli, true).unwrap();
        let ctx = bootstrap(&config).unwrap();

        assert_eq!(ctx.session().transcript().len(), 1);
    }

    #[test]
    fn test_unknown_service_is_rejected() {
        let cli = Cli::parse_from(["chainchat", "--service", "telepathy", "health"]);
        let err = CliConfig::from_cli(&cli, false).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_unknown_store_is_rejected() {
        let cli = Cli::parse_from(["chainchat", "--store", "nowhere", "health"]);
        let config = CliConfig::from_cli(&cli, false).unwrap();
        assert!(matches!(bootstrap(&config), Err(CliError::Arguments(_))));
    }
}
