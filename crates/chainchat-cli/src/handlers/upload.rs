//! Upload command handler.
//!
//! Describes a local file or folder and hands it to a file-accepting service,
//! optionally asking a follow-up question about it.

use std::path::Path;

use anyhow::{Context, Result};
use chainchat_core::{ServiceId, UploadedFile};

use super::{report_reply, run_cancellable};
use crate::bootstrap::CliContext;
use crate::error::CliError;

/// MIME type reported for folders sent to bulk ingestion.
const FOLDER_MIME_TYPE: &str = "inode/directory";

/// Upload `path` to `target`, then ask `follow_up` if given.
pub async fn execute(
    ctx: &CliContext,
    path: &Path,
    target: &str,
    follow_up: Option<&str>,
) -> Result<()> {
    let service: ServiceId = target.parse().map_err(CliError::from)?;
    let file = describe_file(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let session = ctx.session();

    let reply = run_cancellable(session, session.upload(&file, service))
        .await
        .map_err(CliError::from)?;
    report_reply(&reply)?;

    if let Some(question) = follow_up {
        let follow_up_service = follow_up_service(service);
        session
            .select_service(follow_up_service.as_str())
            .map_err(CliError::from)?;
        let reply = run_cancellable(session, session.submit(question))
            .await
            .map_err(CliError::from)?;
        report_reply(&reply)?;
    }

    Ok(())
}

/// Service that answers questions about content sent to `service`.
pub const fn follow_up_service(service: ServiceId) -> ServiceId {
    match service {
        ServiceId::EmbeddingAddDocument | ServiceId::EmbeddingAddFolder => {
            ServiceId::EmbeddingQuery
        }
        ServiceId::ImageRead | ServiceId::ImageReadScanned => ServiceId::ImageRead,
        other => other,
    }
}

/// Build the upload descriptor for a local path.
///
/// The path is canonicalized because the backend resolves it on its own
/// filesystem.
pub fn describe_file(path: &Path) -> Result<UploadedFile, CliError> {
    let metadata = std::fs::metadata(path)?;
    let absolute = std::fs::canonicalize(path)?;
    let name = absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| absolute.display().to_string());

    let (size, mime_type) = if metadata.is_dir() {
        (0, FOLDER_MIME_TYPE.to_string())
    } else {
        (metadata.len(), mime_for(&name))
    };

    Ok(UploadedFile::new(
        name,
        absolute.display().to_string(),
        size,
        mime_type,
    ))
}

/// MIME type inferred from the file name's extension.
fn mime_for(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .to_string()
}
