//! Main CLI parser and top-level argument handling.
//!
//! Global options configure the transport and the session every subcommand
//! runs against.

use clap::Parser;

use chainchat_client::DEFAULT_API_BASE;

use crate::commands::Commands;

/// Command-line interface for the ai-chain maintenance assistant.
#[derive(Parser, Debug)]
#[command(name = "chainchat")]
#[command(about = "Chat with an ai-chain backend from the terminal")]
#[command(version)]
pub struct Cli {
    /// Base URL of the ai-chain REST API
    #[arg(
        long = "api-base",
        env = "CHAINCHAT_API_BASE",
        default_value = DEFAULT_API_BASE,
        global = true
    )]
    pub api_base: String,

    /// Request timeout in seconds
    #[arg(long, env = "CHAINCHAT_TIMEOUT", default_value_t = 60, global = true)]
    pub timeout: u64,

    /// Service to route messages to (e.g. chat-answer, embedding-query)
    #[arg(short = 's', long, default_value = "chat-answer", global = true)]
    pub service: String,

    /// Knowledge store used by retrieval and ingestion services
    #[arg(long, default_value = "default", global = true)]
    pub store: String,

    /// Disable conversation memory for chat-answer
    #[arg(long = "no-memory", global = true)]
    pub no_memory: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["chainchat", "health"]);
        assert_eq!(cli.service, "chat-answer");
        assert_eq!(cli.store, "default");
        assert_eq!(cli.timeout, 60);
        assert!(!cli.no_memory);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from([
            "chainchat",
            "ask",
            "What is the brake pad wear limit?",
            "--service",
            "embedding-query",
            "--store",
            "brake-systems",
            "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.service, "embedding-query");
        assert_eq!(cli.store, "brake-systems");
        assert!(matches!(cli.command, Some(Commands::Ask { .. })));
    }
}
