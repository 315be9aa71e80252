//! `reportbot run`: import, dispatch and export in sequence

use anyhow::{Result, bail};
use std::path::Path;

use crate::cli::output;
use crate::config::Database;
use crate::services::dispatch::dispatch_pending;
use crate::services::export::export_daily;
use crate::services::import::migrate_file;

pub async fn handle_run_command(db: &mut Database, file: &Path, export_path: &Path) -> Result<()> {
    output::print_step(1, "Migrating spreadsheet into the store");
    output::print_import_start(file);

    // A failed import still lets previously loaded pending reports go out
    let import_failed = match migrate_file(db.ensure_alive().await?, file).await {
        Ok(summary) => {
            output::print_migration_summary(&summary);
            false
        }
        Err(e) => {
            output::print_error("Migration failed", &e);
            true
        }
    };

    output::print_step(2, "Dispatching pending reports");
    let outcome = dispatch_pending(db.ensure_alive().await?).await?;
    output::print_dispatch_outcome(&outcome);

    output::print_step(3, "Exporting today's dispatch log");
    let export = export_daily(db.ensure_alive().await?, export_path).await?;
    output::print_export_outcome(&export);

    if import_failed {
        bail!("Run finished, but the migration step failed");
    }
    Ok(())
}
