//! Uploaded files and the document list consumed by the document manager view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ServiceId;

/// A file selected by the UI layer, described as plain values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// File name shown to the user
    pub name: String,
    /// Path (or URL) the backend reads the file from
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type, e.g. `application/pdf`
    pub mime_type: String,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
            mime_type: mime_type.into(),
        }
    }

    /// Lowercase extension of the file path, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.path)
    }
}

/// Lowercase extension of a path-like string.
pub(crate) fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}

/// A locally recorded upload, independent of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(rename = "processed")]
    pub processed_at: DateTime<Utc>,
    #[serde(rename = "service")]
    pub service_id: ServiceId,
    pub success: bool,
}

impl DocumentEntry {
    pub(crate) fn record(file: &UploadedFile, service_id: ServiceId, success: bool) -> Self {
        Self {
            name: file.name.clone(),
            size: file.size,
            mime_type: file.mime_type.clone(),
            processed_at: Utc::now(),
            service_id,
            success,
        }
    }
}
