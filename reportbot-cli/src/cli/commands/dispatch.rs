//! `reportbot dispatch`

use anyhow::Result;

use crate::cli::output;
use crate::config::Database;
use crate::services::dispatch::dispatch_pending;

pub async fn handle_dispatch_command(db: &mut Database) -> Result<()> {
    let pool = db.ensure_alive().await?;

    let outcome = dispatch_pending(pool).await?;
    output::print_dispatch_outcome(&outcome);

    Ok(())
}
