//! Request payload builders.
//!
//! Every builder is a pure function of the user input and the session state.
//! The key names and constants are the wire contract of the ai-chain backend.

use serde_json::{Value, json};

use crate::domain::document::extension_of;
use crate::domain::{ServiceId, UploadedFile};
use crate::error::{ChatError, ChatResult};
use crate::session::SessionState;

/// Conversation window kept by the backend for memory-backed chat.
pub const MEMORY_MAX_MESSAGES: u32 = 10;
/// Number of passages returned by a semantic query.
pub const QUERY_MAX_RESULTS: u32 = 5;
/// Minimum relevance score for a semantic query hit.
pub const QUERY_MIN_SCORE: f64 = 0.7;
/// Segment size used when splitting ingested documents.
pub const MAX_SEGMENT_SIZE: u32 = 2048;
/// Overlap between consecutive segments of ingested documents.
pub const MAX_OVERLAP_SIZE: u32 = 512;

/// File type sent when the path has no extension.
pub const DEFAULT_FILE_TYPE: &str = "pdf";
/// File type sent for bulk ingestion of an extension-less path.
pub const FOLDER_FILE_TYPE: &str = "folder";

/// Prompt sent with an uploaded image when the user typed none.
pub const DEFAULT_IMAGE_PROMPT: &str = "Describe this image in detail.";
/// Prompt sent with an uploaded scanned document.
pub const DEFAULT_SCAN_PROMPT: &str = "Extract all text from this scanned document.";

fn file_type(path: &str, folder: bool) -> String {
    extension_of(path).unwrap_or_else(|| {
        if folder {
            FOLDER_FILE_TYPE.to_string()
        } else {
            DEFAULT_FILE_TYPE.to_string()
        }
    })
}

fn context_path(state: &SessionState) -> &str {
    state.context_path.as_deref().unwrap_or("")
}

fn ingestion(store: &str, path: &str, folder: bool) -> Value {
    json!({
        "store": store,
        "contextPath": path,
        "maxSegmentSize": MAX_SEGMENT_SIZE,
        "maxOverlapSize": MAX_OVERLAP_SIZE,
        "fileType": file_type(path, folder),
    })
}

pub(crate) fn chat(text: &str, _state: &SessionState) -> Value {
    json!({ "message": text })
}

pub(crate) fn chat_with_memory(text: &str, state: &SessionState) -> Value {
    json!({
        "message": text,
        "memoryName": state.memory_name,
        "maxMessages": MEMORY_MAX_MESSAGES,
    })
}

pub(crate) fn store_info(text: &str, state: &SessionState) -> Value {
    json!({ "query": text, "store": state.active_store })
}

pub(crate) fn semantic_query(text: &str, state: &SessionState) -> Value {
    json!({
        "question": text,
        "store": state.active_store,
        "maxResults": QUERY_MAX_RESULTS,
        "minScore": QUERY_MIN_SCORE,
    })
}

pub(crate) fn rag(text: &str, state: &SessionState) -> Value {
    let path = context_path(state);
    json!({
        "query": text,
        "contextPath": path,
        "fileType": file_type(path, false),
    })
}

pub(crate) fn sentiment(text: &str, _state: &SessionState) -> Value {
    json!({ "text": text })
}

pub(crate) fn ingest_document(text: &str, state: &SessionState) -> Value {
    ingestion(&state.active_store, text, false)
}

pub(crate) fn ingest_folder(text: &str, state: &SessionState) -> Value {
    ingestion(&state.active_store, text, true)
}

pub(crate) fn image_read(text: &str, state: &SessionState) -> Value {
    json!({ "prompt": text, "contextURL": context_path(state) })
}

pub(crate) fn image_generate(text: &str, state: &SessionState) -> Value {
    let mut payload = json!({ "prompt": text });
    if let Some(style) = &state.image_style {
        payload["style"] = Value::String(style.clone());
    }
    payload
}

pub(crate) fn new_store(text: &str, _state: &SessionState) -> Value {
    json!({ "storeName": text })
}

pub(crate) fn health(_text: &str, _state: &SessionState) -> Value {
    json!({})
}

/// Build the payload for a file upload.
///
/// Only file-capable services accept uploads; any other service is rejected
/// before a request is issued.
pub fn build_file_request(
    file: &UploadedFile,
    service: ServiceId,
    state: &SessionState,
) -> ChatResult<Value> {
    let payload = match service {
        ServiceId::EmbeddingAddDocument => ingestion(&state.active_store, &file.path, false),
        ServiceId::EmbeddingAddFolder => ingestion(&state.active_store, &file.path, true),
        ServiceId::RagLoadDocument => json!({
            "query": format!("Analyze the document {}", file.name),
            "contextPath": file.path,
            "fileType": file_type(&file.path, false),
        }),
        ServiceId::ImageRead => json!({
            "prompt": DEFAULT_IMAGE_PROMPT,
            "filePath": file.path,
        }),
        ServiceId::ImageReadScanned => json!({
            "prompt": DEFAULT_SCAN_PROMPT,
            "filePath": file.path,
        }),
        other => {
            return Err(ChatError::invalid_input(format!(
                "service '{other}' does not accept file uploads"
            )));
        }
    };
    Ok(payload)
}
