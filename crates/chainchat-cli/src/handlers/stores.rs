//! Store listing and creation handlers.

use anyhow::Result;

use super::{report_reply, run_cancellable};
use crate::bootstrap::CliContext;
use crate::error::CliError;

/// List known stores, marking the active one.
pub fn list(ctx: &CliContext) {
    let active = ctx.session().state().active_store;
    for store in ctx.session().stores() {
        let marker = if store == active { "*" } else { " " };
        println!("{marker} {store}");
    }
}

/// Create a store on the backend.
pub async fn create(ctx: &CliContext, name: &str) -> Result<()> {
    let session = ctx.session();
    let reply = run_cancellable(session, session.create_store(name))
        .await
        .map_err(CliError::from)?;
    report_reply(&reply)
}
