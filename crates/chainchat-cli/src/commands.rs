//! Subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one message to the selected service and print the reply
    Ask {
        /// Message text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Send a local document, image, or folder to a file-accepting service
    Upload {
        /// Path to the file or folder
        path: PathBuf,
        /// Service that processes the file
        #[arg(long = "to", default_value = "rag-load-document")]
        target: String,
        /// Follow-up question asked once the upload succeeds
        #[arg(long)]
        ask: Option<String>,
    },
    /// Check backend health
    Health,
    /// List the services the client can route to
    Services,
    /// List known knowledge stores
    Stores,
    /// Create a knowledge store on the backend
    NewStore {
        /// Name of the store to create
        name: String,
    },
    /// Start an interactive chat session
    Chat,
}

impl Commands {
    /// Whether the command runs a full conversation that should open with the
    /// welcome message.
    pub const fn is_interactive(&self) -> bool {
        matches!(self, Self::Chat)
    }
}
