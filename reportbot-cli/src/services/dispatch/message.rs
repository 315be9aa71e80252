//! Human-readable text for a simulated send

use crate::models::Report;

/// Compose the message shown when a report is "sent"
pub fn compose(report: &Report) -> String {
    format!(
        "Sending report {} to {}: {}",
        report.id,
        report.cliente,
        report.content_preview()
    )
}
