//! CSV export of the day's dispatch log

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use csv::Writer;
use sqlx::SqlitePool;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::repository::dispatch_log;
use crate::models::DispatchLogEntry;

/// Column names of the exported file
pub const EXPORT_HEADER: [&str; 4] = ["log_id", "reporte_id", "cliente", "fecha_envio"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    /// Nothing was dispatched that day; no file was written
    NothingToExport { day: NaiveDate },
}

/// Export today's (local time) dispatches
pub async fn export_daily(pool: &SqlitePool, path: &Path) -> Result<ExportOutcome> {
    export_day(pool, path, Local::now().date_naive()).await
}

/// Export the dispatches of one calendar day, newest first
pub async fn export_day(pool: &SqlitePool, path: &Path, day: NaiveDate) -> Result<ExportOutcome> {
    let entries = dispatch_log::entries_on(pool, day).await?;
    if entries.is_empty() {
        log::info!("No dispatches recorded on {}, nothing to export", day);
        return Ok(ExportOutcome::NothingToExport { day });
    }

    write_entries(path, &entries)?;
    log::info!("CSV file exported to: {}", path.display());

    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        rows: entries.len(),
    })
}

/// Write entries as UTF-8 CSV with a byte-order mark
///
/// The file is written next to the target and renamed over it, so an
/// interrupted export leaves the previous file intact.
pub fn write_entries(path: &Path, entries: &[DispatchLogEntry]) -> Result<()> {
    let tmp_path = staging_path(path)?;

    if let Err(e) = write_csv(&tmp_path, entries) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e).with_context(|| format!("Failed to replace CSV file: {}", path.display()));
    }
    Ok(())
}

fn staging_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("Export path has no file name: {}", path.display()))?;
    Ok(path.with_file_name(format!(".{}.tmp", name.to_string_lossy())))
}

fn write_csv(path: &Path, entries: &[DispatchLogEntry]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    // Spreadsheet tools need the BOM to pick UTF-8 for accented client names
    file.write_all(UTF8_BOM)
        .context("Failed to write CSV byte-order mark")?;

    let mut wtr = Writer::from_writer(file);
    wtr.write_record(EXPORT_HEADER)
        .context("Failed to write CSV header")?;

    for entry in entries {
        wtr.write_record([
            entry.log_id.to_string(),
            entry.reporte_id.to_string(),
            entry.cliente.clone(),
            entry.fecha_envio.format("%Y-%m-%d").to_string(),
        ])
        .with_context(|| format!("Failed to write log entry {}", entry.log_id))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}
