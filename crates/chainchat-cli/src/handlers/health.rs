//! Health command handler.

use anyhow::Result;

use super::failure;
use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Query the backend health endpoint.
///
/// Health checks stay out of the transcript, so the normalized reply is
/// printed directly.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let response = ctx.session().health_check().await.map_err(CliError::from)?;
    if response.is_error() {
        return Err(failure(&response.content, Some(&response.metadata)).into());
    }
    println!("{}", response.content);
    Ok(())
}
