//! Interactive chat handler.
//!
//! Lines starting with `/` are session commands; everything else is sent to
//! the selected service.

use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::Result;
use chainchat_core::{ChatError, ChatMessage, ChatResult, ServiceId};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::{run_cancellable, services, stores, upload};
use crate::bootstrap::CliContext;
use crate::presentation::print_message;

const HELP: &str = "\
Commands:
  /service [id]          show or select the service
  /services              list available services
  /store [name]          show or select the knowledge store
  /stores                list knowledge stores
  /new-store <name>      create a knowledge store
  /memory on|off         toggle conversation memory
  /style <style>|none    set the image generation style
  /upload <path> [id]    send a file or folder to a service
  /docs                  list uploaded documents
  /health                check backend health
  /help                  show this help
  /quit                  leave the session
Press Ctrl+C while waiting for a reply to cancel it.";

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Message(String),
    Help,
    Quit,
    Service(Option<String>),
    Services,
    Store(Option<String>),
    Stores,
    NewStore(String),
    Memory(bool),
    Style(Option<String>),
    Upload { path: PathBuf, service: Option<String> },
    Documents,
    Health,
    /// A slash command that could not be understood, with the reason
    Invalid(String),
}

/// Parse a line of input. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<ReplInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Some(ReplInput::Message(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();
    let rest = (!args.is_empty()).then(|| args.join(" "));

    let input = match name {
        "help" | "?" => ReplInput::Help,
        "quit" | "exit" | "q" => ReplInput::Quit,
        "service" => ReplInput::Service(rest),
        "services" => ReplInput::Services,
        "store" => ReplInput::Store(rest),
        "stores" => ReplInput::Stores,
        "new-store" => match rest {
            Some(name) => ReplInput::NewStore(name),
            None => ReplInput::Invalid("usage: /new-store <name>".to_string()),
        },
        "memory" => match args.as_slice() {
            ["on"] => ReplInput::Memory(true),
            ["off"] => ReplInput::Memory(false),
            _ => ReplInput::Invalid("usage: /memory on|off".to_string()),
        },
        "style" => match rest.as_deref() {
            None => ReplInput::Invalid("usage: /style <style>|none".to_string()),
            Some("none") => ReplInput::Style(None),
            Some(_) => ReplInput::Style(rest),
        },
        "upload" => match args.as_slice() {
            [path] => ReplInput::Upload {
                path: PathBuf::from(path),
                service: None,
            },
            [path, service] => ReplInput::Upload {
                path: PathBuf::from(path),
                service: Some((*service).to_string()),
            },
            _ => ReplInput::Invalid("usage: /upload <path> [service]".to_string()),
        },
        "docs" => ReplInput::Documents,
        "health" => ReplInput::Health,
        other => ReplInput::Invalid(format!("unknown command /{other}; try /help")),
    };
    Some(input)
}

/// Run the interactive session until `/quit`, Ctrl+D, or Ctrl+C at the prompt.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    for message in ctx.session().transcript() {
        print_message(&message);
    }
    println!("Type /help for commands.");

    loop {
        let state = ctx.session().state();
        let prompt = format!("[{}@{}] > ", state.selected_service, state.active_store);

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let Some(input) = parse_line(&line) else {
            continue;
        };
        if let Err(err) = editor.add_history_entry(line.as_str()) {
            tracing::debug!(error = %err, "Could not record history entry");
        }

        match dispatch(ctx, input).await {
            Ok(ControlFlow::Break(())) => break,
            Ok(ControlFlow::Continue(())) => {}
            Err(err) => eprintln!("error> {}", err.describe()),
        }
    }

    Ok(())
}

async fn dispatch(ctx: &CliContext, input: ReplInput) -> ChatResult<ControlFlow<()>> {
    let session = ctx.session();
    match input {
        ReplInput::Message(text) => {
            show(run_cancellable(session, session.submit(&text)).await?);
        }
        ReplInput::Help => println!("{HELP}"),
        ReplInput::Quit => return Ok(ControlFlow::Break(())),
        ReplInput::Service(None) => println!("{}", session.state().selected_service),
        ReplInput::Service(Some(id)) => {
            let service = session.select_service(&id)?;
            println!("Service set to {service}");
        }
        ReplInput::Services => services::execute(session.registry()),
        ReplInput::Store(None) => println!("{}", session.state().active_store),
        ReplInput::Store(Some(name)) => {
            session.select_store(&name)?;
            println!("Store set to {name}");
        }
        ReplInput::Stores => stores::list(ctx),
        ReplInput::NewStore(name) => {
            show(run_cancellable(session, session.create_store(&name)).await?);
        }
        ReplInput::Memory(enabled) => {
            session.set_memory_enabled(enabled)?;
            println!("Memory {}", if enabled { "on" } else { "off" });
        }
        ReplInput::Style(style) => {
            session.set_image_style(style)?;
        }
        ReplInput::Upload { path, service } => {
            let service = match service {
                Some(id) => id.parse()?,
                None => upload_target(session.state().selected_service),
            };
            let file = upload::describe_file(&path)
                .map_err(|e| ChatError::invalid_input(e.to_string()))?;
            show(run_cancellable(session, session.upload(&file, service)).await?);
        }
        ReplInput::Documents => {
            for doc in session.documents() {
                let status = if doc.success { "ok" } else { "failed" };
                println!(
                    "{} ({} bytes, {}) via {} [{status}]",
                    doc.name, doc.size, doc.mime_type, doc.service_id
                );
            }
        }
        ReplInput::Health => println!("{}", session.health_check().await?.content),
        ReplInput::Invalid(reason) => eprintln!("{reason}"),
    }
    Ok(ControlFlow::Continue(()))
}

/// Uploads go to the selected service when it takes files, else to RAG.
const fn upload_target(selected: ServiceId) -> ServiceId {
    if selected.accepts_files() {
        selected
    } else {
        ServiceId::RagLoadDocument
    }
}

fn show(message: ChatMessage) {
    print_message(&message);
}
