//! Rendering of transcript entries.

use chainchat_core::{ChatMessage, MessageRole};
use serde_json::Value;

const fn label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "you",
        MessageRole::Assistant => "assistant",
        MessageRole::System => "system",
        MessageRole::Error => "error",
    }
}

/// Format a transcript entry for the terminal.
///
/// Generated images have no inline rendering here, so their URL is printed
/// under the content.
pub fn format_message(message: &ChatMessage) -> String {
    let mut out = format!("{}> {}", label(message.role), message.content);

    if let Some(metadata) = &message.metadata {
        if let Some(Value::String(url)) = metadata.get("imageUrl") {
            out.push_str("\n  image: ");
            out.push_str(url);
        }
        if let Some(Value::String(path)) = metadata.get("filePath") {
            out.push_str("\n  file: ");
            out.push_str(path);
        }
    }

    out
}

/// Print a transcript entry; errors go to stderr.
pub fn print_message(message: &ChatMessage) {
    let text = format_message(message);
    if message.role == MessageRole::Error {
        eprintln!("{text}");
    } else {
        println!("{text}");
    }
}
