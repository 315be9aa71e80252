//! Report and dispatch log types shared by the store and the services

use chrono::NaiveDate;
use serde::Serialize;

/// Lifecycle status of a report
///
/// Stored as the Spanish labels the source spreadsheets use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReportStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "enviado")]
    Sent,
}

impl ReportStatus {
    /// Label persisted in the `estado` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pendiente",
            ReportStatus::Sent => "enviado",
        }
    }

    /// Parse a status label, accepting the stored labels and their English names
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "pendiente" | "pending" => Some(ReportStatus::Pending),
            "enviado" | "sent" => Some(ReportStatus::Sent),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A report row as stored in `reportes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub id: i64,
    pub cliente: String,
    pub contenido: String,
    pub estado: ReportStatus,
}

impl Report {
    /// Content shortened for tables and dispatch messages
    pub fn content_preview(&self) -> String {
        preview(&self.contenido, CONTENT_PREVIEW_CHARS)
    }
}

/// A validated report ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub id: i64,
    pub cliente: String,
    pub contenido: String,
    pub estado: ReportStatus,
}

/// One audit row in `log_envios`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchLogEntry {
    pub log_id: i64,
    pub reporte_id: i64,
    pub cliente: String,
    pub fecha_envio: NaiveDate,
}

/// Number of content characters shown before truncating
pub const CONTENT_PREVIEW_CHARS: usize = 50;

/// Truncate on a character boundary, appending `...` when something was cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
