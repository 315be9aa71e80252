//! Repository for the append-only `log_envios` table

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::models::DispatchLogEntry;

/// Record one dispatch and return the generated `log_id`
pub async fn insert_entry(
    conn: &mut SqliteConnection,
    reporte_id: i64,
    cliente: &str,
    fecha_envio: NaiveDate,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO log_envios (reporte_id, cliente, fecha_envio)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(reporte_id)
    .bind(cliente)
    .bind(fecha_envio)
    .execute(conn)
    .await
    .with_context(|| format!("Failed to log dispatch of report {}", reporte_id))?;

    Ok(result.last_insert_rowid())
}

/// All entries dispatched on the given day, newest first
pub async fn entries_on(pool: &SqlitePool, day: NaiveDate) -> Result<Vec<DispatchLogEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT log_id, reporte_id, cliente, fecha_envio
        FROM log_envios
        WHERE fecha_envio = ?
        ORDER BY fecha_envio DESC, log_id DESC
        "#,
    )
    .bind(day)
    .fetch_all(pool)
    .await
    .context("Failed to get dispatch log entries")?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push(DispatchLogEntry {
            log_id: row.try_get("log_id")?,
            reporte_id: row.try_get("reporte_id")?,
            cliente: row.try_get("cliente")?,
            fecha_envio: row.try_get("fecha_envio")?,
        });
    }

    Ok(entries)
}
