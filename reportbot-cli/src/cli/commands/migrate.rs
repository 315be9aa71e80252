//! `reportbot migrate`

use anyhow::Result;
use std::path::Path;

use crate::cli::output;
use crate::config::Database;
use crate::services::import::migrate_file;

pub async fn handle_migrate_command(db: &mut Database, file: &Path) -> Result<()> {
    let pool = db.ensure_alive().await?;

    output::print_import_start(file);
    let summary = migrate_file(pool, file).await?;
    output::print_migration_summary(&summary);

    Ok(())
}
