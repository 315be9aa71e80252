//! Reconcile candidate rows against the `reportes` table

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use std::path::Path;

use super::ImportError;
use super::row::{CandidateRow, RowIssue};
use super::source::read_source;
use crate::config::repository::reports;
use crate::models::NewReport;

/// A row rejected by validation
#[derive(Debug, Clone, Serialize)]
pub struct DroppedRow {
    pub line: usize,
    pub reason: String,
}

/// A valid row whose store write was rolled back
#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    pub line: usize,
    pub id: i64,
    pub error: String,
}

/// Counts from one migration run
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationSummary {
    pub migrated: usize,
    pub already_present: usize,
    pub failed: usize,
    pub dropped: usize,
    pub dropped_rows: Vec<DroppedRow>,
    pub failures: Vec<RowFailure>,
}

impl MigrationSummary {
    /// Rows that passed validation
    pub fn valid_rows(&self) -> usize {
        self.migrated + self.already_present + self.failed
    }
}

enum RowOutcome {
    Inserted,
    AlreadyPresent,
}

/// Existence check then insert, on the row's own transaction
async fn apply_row(conn: &mut SqliteConnection, report: &NewReport) -> Result<RowOutcome> {
    if reports::report_exists(&mut *conn, report.id).await? {
        return Ok(RowOutcome::AlreadyPresent);
    }

    reports::insert_report(&mut *conn, report).await?;
    Ok(RowOutcome::Inserted)
}

/// Migrate already-read rows in source order
///
/// Invalid rows are dropped and counted. Each valid row commits on its own,
/// so a failure only rolls back that row. The only error returned is a store
/// that cannot start a transaction at all.
pub async fn migrate_rows(pool: &SqlitePool, rows: &[CandidateRow]) -> Result<MigrationSummary> {
    let mut summary = MigrationSummary::default();

    for row in rows {
        let report = match row.validate() {
            Ok(report) => report,
            Err(issue) => {
                log_dropped(row, &issue);
                summary.dropped += 1;
                summary.dropped_rows.push(DroppedRow {
                    line: row.line,
                    reason: issue.to_string(),
                });
                continue;
            }
        };

        let mut tx = pool.begin().await.context("Failed to start transaction")?;

        let outcome = match apply_row(&mut tx, &report).await {
            Ok(outcome) => tx
                .commit()
                .await
                .context("Failed to commit report")
                .map(|_| outcome),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!("Rollback failed for report {}: {}", report.id, rollback_err);
                }
                Err(e)
            }
        };

        match outcome {
            Ok(RowOutcome::Inserted) => {
                log::debug!("Inserted report {} (line {})", report.id, row.line);
                summary.migrated += 1;
            }
            Ok(RowOutcome::AlreadyPresent) => {
                log::debug!("Report {} already exists, skipping", report.id);
                summary.already_present += 1;
            }
            Err(e) => {
                log::warn!("Report {} (line {}) rolled back: {:#}", report.id, row.line, e);
                summary.failed += 1;
                summary.failures.push(RowFailure {
                    line: row.line,
                    id: report.id,
                    error: format!("{:#}", e),
                });
            }
        }
    }

    log::info!(
        "Migration finished: {} migrated, {} already present, {} failed, {} dropped",
        summary.migrated,
        summary.already_present,
        summary.failed,
        summary.dropped
    );

    Ok(summary)
}

fn log_dropped(row: &CandidateRow, issue: &RowIssue) {
    log::warn!("Dropping line {}: {}", row.line, issue);
}

/// Read a source file and migrate its rows
pub async fn migrate_file<P: AsRef<Path>>(
    pool: &SqlitePool,
    path: P,
) -> Result<MigrationSummary, ImportError> {
    let path = path.as_ref();
    let rows = read_source(path)?;
    log::info!("Migrating {} rows from {}", rows.len(), path.display());

    migrate_rows(pool, &rows).await.map_err(ImportError::Store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Database;
    use crate::models::ReportStatus;
    use crate::test_support::{TempFile, write_xlsx};

    fn candidate(line: usize, id: &str, cliente: &str, contenido: &str, estado: &str) -> CandidateRow {
        let cell = |s: &str| Some(s.to_string());
        CandidateRow::new(line, cell(id), cell(cliente), cell(contenido), cell(estado))
    }

    async fn report_count(pool: &SqlitePool) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reportes")
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn test_new_rows_are_migrated() {
        let db = Database::in_memory().await;
        let rows = vec![
            candidate(2, "1", "Acme", "Hello", "pendiente"),
            candidate(3, "2", "Globex", "Hi", "pendiente"),
        ];

        let summary = migrate_rows(db.pool(), &rows).await.unwrap();

        assert_eq!(summary.migrated, 2);
        assert_eq!(summary.already_present, 0);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.dropped, 0);
        assert_eq!(report_count(db.pool()).await, 2);

        let stored = reports::get_report(db.pool(), 2).await.unwrap().unwrap();
        assert_eq!(stored.cliente, "Globex");
        assert_eq!(stored.estado, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_existing_ids_are_not_duplicated_or_updated() {
        let db = Database::in_memory().await;
        migrate_rows(db.pool(), &[candidate(2, "1", "Acme", "Hello", "pendiente")])
            .await
            .unwrap();

        let summary = migrate_rows(
            db.pool(),
            &[
                candidate(2, "1", "Changed", "Changed", "enviado"),
                candidate(3, "5", "Initech", "New", "pendiente"),
            ],
        )
        .await
        .unwrap();

        assert_eq!(summary.migrated, 1);
        assert_eq!(summary.already_present, 1);
        assert_eq!(report_count(db.pool()).await, 2);

        let untouched = reports::get_report(db.pool(), 1).await.unwrap().unwrap();
        assert_eq!(untouched.cliente, "Acme");
        assert_eq!(untouched.estado, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_incomplete_rows_are_dropped_before_existence_check() {
        let db = Database::in_memory().await;
        migrate_rows(db.pool(), &[candidate(2, "1", "Acme", "Hello", "pendiente")])
            .await
            .unwrap();

        let rows = vec![
            // Existing id but missing cliente: dropped, not counted as present
            CandidateRow::new(2, Some("1".into()), None, Some("x".into()), Some("pendiente".into())),
            candidate(3, "2", "Globex", "Hi", "pendiente"),
            candidate(4, "abc", "Initech", "Hi", "pendiente"),
        ];
        let summary = migrate_rows(db.pool(), &rows).await.unwrap();

        assert_eq!(summary.migrated, 1);
        assert_eq!(summary.already_present, 0);
        assert_eq!(summary.dropped, 2);
        assert_eq!(summary.valid_rows(), 1);
        assert_eq!(summary.dropped_rows[0].line, 2);
        assert_eq!(summary.dropped_rows[0].reason, "missing value for 'cliente'");
        assert_eq!(summary.dropped_rows[1].line, 4);
    }

    #[tokio::test]
    async fn test_duplicate_ids_within_batch() {
        let db = Database::in_memory().await;
        let rows = vec![
            candidate(2, "7", "Acme", "First", "pendiente"),
            candidate(3, "7", "Acme", "Second", "pendiente"),
        ];

        let summary = migrate_rows(db.pool(), &rows).await.unwrap();

        // The first row is committed before the second is checked
        assert_eq!(summary.migrated, 1);
        assert_eq!(summary.already_present, 1);
        let stored = reports::get_report(db.pool(), 7).await.unwrap().unwrap();
        assert_eq!(stored.contenido, "First");
    }

    #[tokio::test]
    async fn test_failed_insert_only_skips_that_row() {
        let db = Database::in_memory().await;
        sqlx::query(
            r#"
            CREATE TRIGGER reject_boom BEFORE INSERT ON reportes
            WHEN NEW.cliente = 'Boom'
            BEGIN
                SELECT RAISE(ABORT, 'rejected by test trigger');
            END
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let rows = vec![
            candidate(2, "1", "Acme", "Hello", "pendiente"),
            candidate(3, "2", "Boom", "Hi", "pendiente"),
            candidate(4, "3", "Globex", "Hey", "enviado"),
        ];
        let summary = migrate_rows(db.pool(), &rows).await.unwrap();

        assert_eq!(summary.migrated, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].id, 2);
        assert_eq!(summary.failures[0].line, 3);
        assert!(summary.failures[0].error.contains("rejected by test trigger"));
        assert!(reports::get_report(db.pool(), 2).await.unwrap().is_none());
        assert!(reports::get_report(db.pool(), 3).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_closed_store_is_fatal() {
        let db = Database::in_memory().await;
        db.pool().close().await;

        let result = migrate_rows(db.pool(), &[candidate(2, "1", "Acme", "Hello", "pendiente")]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_migrate_file() {
        let db = Database::in_memory().await;
        let file = TempFile::new("xlsx");
        write_xlsx(
            file.path(),
            &[
                &["id", "cliente", "contenido", "estado"],
                &["1", "Acme", "Hello", "pendiente"],
                &["2", "Globex", "Hi", "pendiente"],
                &["3", "", "No client", "pendiente"],
            ],
        );

        let summary = migrate_file(db.pool(), file.path()).await.unwrap();
        assert_eq!(summary.migrated, 2);
        assert_eq!(summary.dropped, 1);
    }

    #[tokio::test]
    async fn test_unreadable_source_has_no_side_effects() {
        let db = Database::in_memory().await;
        let missing = TempFile::new("xlsx");

        let err = migrate_file(db.pool(), missing.path()).await.unwrap_err();
        assert!(matches!(err, ImportError::SourceNotFound(_)));
        assert_eq!(report_count(db.pool()).await, 0);
    }
}
