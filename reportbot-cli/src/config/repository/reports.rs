//! Repository for the `reportes` table

use anyhow::{Context, Result, anyhow};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::models::{NewReport, Report, ReportStatus};

/// Filter and page for the report listing
#[derive(Debug, Clone)]
pub struct ReportQuery {
    /// Matched against `cliente` and `contenido`
    pub search: Option<String>,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

/// One page of the report listing
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReportPage {
    pub reports: Vec<Report>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl ReportPage {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        ((self.total.max(0) as u64).div_ceil(self.page_size as u64)) as u32
    }
}

fn report_from_row(row: &SqliteRow) -> Result<Report> {
    let estado: String = row.try_get("estado")?;
    let estado = ReportStatus::parse(&estado)
        .ok_or_else(|| anyhow!("Unknown report status in store: {}", estado))?;

    Ok(Report {
        id: row.try_get("id")?,
        cliente: row.try_get("cliente")?,
        contenido: row.try_get("contenido")?,
        estado,
    })
}

/// Check whether a report with this id is already stored
pub async fn report_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM reportes WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await
        .context("Failed to check report existence")?;

    Ok(row.is_some())
}

/// Insert a new report, failing on a duplicate id
pub async fn insert_report(conn: &mut SqliteConnection, report: &NewReport) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO reportes (id, cliente, contenido, estado)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(report.id)
    .bind(&report.cliente)
    .bind(&report.contenido)
    .bind(report.estado.as_str())
    .execute(conn)
    .await
    .with_context(|| format!("Failed to insert report {}", report.id))?;

    Ok(())
}

/// Move a pending report to sent. Returns false if it was not pending.
pub async fn mark_sent(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
    let result = sqlx::query("UPDATE reportes SET estado = ? WHERE id = ? AND estado = ?")
        .bind(ReportStatus::Sent.as_str())
        .bind(id)
        .bind(ReportStatus::Pending.as_str())
        .execute(conn)
        .await
        .with_context(|| format!("Failed to mark report {} as sent", id))?;

    Ok(result.rows_affected() > 0)
}

/// Get a single report by id
pub async fn get_report(pool: &SqlitePool, id: i64) -> Result<Option<Report>> {
    let row = sqlx::query("SELECT id, cliente, contenido, estado FROM reportes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get report")?;

    row.as_ref().map(report_from_row).transpose()
}

/// All pending reports in id order
pub async fn list_pending(pool: &SqlitePool) -> Result<Vec<Report>> {
    let rows = sqlx::query(
        "SELECT id, cliente, contenido, estado FROM reportes WHERE estado = ? ORDER BY id",
    )
    .bind(ReportStatus::Pending.as_str())
    .fetch_all(pool)
    .await
    .context("Failed to list pending reports")?;

    rows.iter().map(report_from_row).collect()
}

/// The most recently loaded reports, highest id first
pub async fn recent_reports(pool: &SqlitePool, limit: u32) -> Result<Vec<Report>> {
    let rows = sqlx::query(
        "SELECT id, cliente, contenido, estado FROM reportes ORDER BY id DESC LIMIT ?",
    )
    .bind(limit as i64)
    .fetch_all(pool)
    .await
    .context("Failed to get recent reports")?;

    rows.iter().map(report_from_row).collect()
}

/// Escape LIKE wildcards so the search term matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Search reports by client or content, highest id first, one page at a time
pub async fn search_reports(pool: &SqlitePool, query: &ReportQuery) -> Result<ReportPage> {
    let pattern = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);

    let page = query.page.max(1);
    let page_size = query.page_size.max(1);
    let offset = (page as i64 - 1).saturating_mul(page_size as i64);

    let (total, rows) = match &pattern {
        Some(pattern) => {
            let total: (i64,) = sqlx::query_as(
                r#"
                SELECT COUNT(*) FROM reportes
                WHERE cliente LIKE ? ESCAPE '\' OR contenido LIKE ? ESCAPE '\'
                "#,
            )
            .bind(pattern)
            .bind(pattern)
            .fetch_one(pool)
            .await
            .context("Failed to count matching reports")?;

            let rows = sqlx::query(
                r#"
                SELECT id, cliente, contenido, estado FROM reportes
                WHERE cliente LIKE ? ESCAPE '\' OR contenido LIKE ? ESCAPE '\'
                ORDER BY id DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(pattern)
            .bind(pattern)
            .bind(page_size as i64)
            .bind(offset)
            .fetch_all(pool)
            .await
            .context("Failed to search reports")?;

            (total.0, rows)
        }
        None => {
            let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reportes")
                .fetch_one(pool)
                .await
                .context("Failed to count reports")?;

            let rows = sqlx::query(
                "SELECT id, cliente, contenido, estado FROM reportes ORDER BY id DESC LIMIT ? OFFSET ?",
            )
            .bind(page_size as i64)
            .bind(offset)
            .fetch_all(pool)
            .await
            .context("Failed to list reports")?;

            (total.0, rows)
        }
    };

    let reports = rows.iter().map(report_from_row).collect::<Result<Vec<_>>>()?;

    Ok(ReportPage {
        reports,
        total,
        page,
        page_size,
    })
}
