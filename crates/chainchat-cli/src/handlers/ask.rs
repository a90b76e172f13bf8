//! Ask command handler.

use anyhow::Result;

use super::{report_reply, run_cancellable};
use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Send one message to the selected service and print the reply.
pub async fn execute(ctx: &CliContext, message: &[String]) -> Result<()> {
    let text = message.join(" ");
    let session = ctx.session();

    let reply = run_cancellable(session, session.submit(&text))
        .await
        .map_err(CliError::from)?;
    report_reply(&reply)
}
