//! Dispatch of pending reports
//!
//! Sending is simulated: each pending report gets a message, is moved to
//! sent and receives one `log_envios` entry. The status change and the log
//! entry commit together or not at all, one report at a time.

pub mod message;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use crate::config::repository::{dispatch_log, reports};
use crate::models::Report;

/// A report that was sent and logged
#[derive(Debug, Clone, Serialize)]
pub struct DispatchedReport {
    pub id: i64,
    pub cliente: String,
    pub log_id: i64,
    pub message: String,
}

/// A report whose dispatch was rolled back; it stays pending
#[derive(Debug, Clone, Serialize)]
pub struct DispatchFailure {
    pub id: i64,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchSummary {
    pub dispatched: Vec<DispatchedReport>,
    pub failures: Vec<DispatchFailure>,
}

impl DispatchSummary {
    pub fn dispatched_count(&self) -> usize {
        self.dispatched.len()
    }
}

/// Result of one dispatcher run
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// No report was pending
    NothingPending,
    Processed(DispatchSummary),
}

impl DispatchOutcome {
    pub fn dispatched_count(&self) -> usize {
        match self {
            DispatchOutcome::NothingPending => 0,
            DispatchOutcome::Processed(summary) => summary.dispatched_count(),
        }
    }
}

/// Dispatch every pending report, logging it with today's local date
pub async fn dispatch_pending(pool: &SqlitePool) -> Result<DispatchOutcome> {
    dispatch_pending_on(pool, Local::now().date_naive()).await
}

/// Dispatch every pending report, logging it with the given date
pub async fn dispatch_pending_on(pool: &SqlitePool, today: NaiveDate) -> Result<DispatchOutcome> {
    let pending = reports::list_pending(pool).await?;
    if pending.is_empty() {
        log::info!("No pending reports to dispatch");
        return Ok(DispatchOutcome::NothingPending);
    }

    log::info!("Dispatching {} pending reports", pending.len());
    let mut summary = DispatchSummary::default();

    for report in &pending {
        let message = message::compose(report);
        log::info!("{}", message);

        let mut tx = pool.begin().await.context("Failed to start transaction")?;

        let result = match send_and_log(&mut tx, report, today).await {
            Ok(log_id) => tx
                .commit()
                .await
                .context("Failed to commit dispatch")
                .map(|_| log_id),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!("Rollback failed for report {}: {}", report.id, rollback_err);
                }
                Err(e)
            }
        };

        match result {
            Ok(log_id) => {
                log::debug!("Report {} marked as sent (log {})", report.id, log_id);
                summary.dispatched.push(DispatchedReport {
                    id: report.id,
                    cliente: report.cliente.clone(),
                    log_id,
                    message,
                });
            }
            Err(e) => {
                log::warn!("Dispatch of report {} rolled back: {:#}", report.id, e);
                summary.failures.push(DispatchFailure {
                    id: report.id,
                    error: format!("{:#}", e),
                });
            }
        }
    }

    log::info!(
        "Dispatch finished: {} sent, {} failed",
        summary.dispatched.len(),
        summary.failures.len()
    );

    Ok(DispatchOutcome::Processed(summary))
}

/// Status update plus log entry on the report's transaction
async fn send_and_log(conn: &mut SqliteConnection, report: &Report, today: NaiveDate) -> Result<i64> {
    if !reports::mark_sent(&mut *conn, report.id).await? {
        bail!("report {} is no longer pending", report.id);
    }

    dispatch_log::insert_entry(&mut *conn, report.id, &report.cliente, today).await
}
