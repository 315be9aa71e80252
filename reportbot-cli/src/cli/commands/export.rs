//! `reportbot export`

use anyhow::Result;
use std::path::Path;

use crate::cli::output;
use crate::config::Database;
use crate::services::export::export_daily;

pub async fn handle_export_command(db: &mut Database, output_path: &Path) -> Result<()> {
    let pool = db.ensure_alive().await?;

    let outcome = export_daily(pool, output_path).await?;
    output::print_export_outcome(&outcome);

    Ok(())
}
