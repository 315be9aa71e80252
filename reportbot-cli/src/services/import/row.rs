//! Candidate rows read from a source file and their validation

use crate::models::{NewReport, ReportStatus};

/// Required source columns, in the order they are reported
pub const REQUIRED_COLUMNS: [&str; 4] = ["id", "cliente", "contenido", "estado"];

/// One data row as read from the source, before validation
///
/// Cells keep their text as read; blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRow {
    /// 1-based line in the source, header included
    pub line: usize,
    pub id: Option<String>,
    pub cliente: Option<String>,
    pub contenido: Option<String>,
    pub estado: Option<String>,
}

/// Why a candidate row was dropped before reaching the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    /// A required field is empty
    Missing(&'static str),
    /// The id is not a whole number
    InvalidId(String),
    /// The status is neither pending nor sent
    UnknownStatus(String),
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowIssue::Missing(column) => write!(f, "missing value for '{}'", column),
            RowIssue::InvalidId(raw) => write!(f, "id '{}' is not a whole number", raw),
            RowIssue::UnknownStatus(raw) => write!(f, "unknown status '{}'", raw),
        }
    }
}

impl std::error::Error for RowIssue {}

impl CandidateRow {
    /// Build a row from optional cell texts, normalising blanks to `None`
    pub fn new(
        line: usize,
        id: Option<String>,
        cliente: Option<String>,
        contenido: Option<String>,
        estado: Option<String>,
    ) -> Self {
        Self {
            line,
            id: normalize(id),
            cliente: normalize(cliente),
            contenido: normalize(contenido),
            estado: normalize(estado),
        }
    }

    /// True when every cell is empty
    pub fn is_blank(&self) -> bool {
        self.id.is_none() && self.cliente.is_none() && self.contenido.is_none() && self.estado.is_none()
    }

    /// Check required fields, then parse id and status
    pub fn validate(&self) -> Result<NewReport, RowIssue> {
        let id = self.id.as_deref().map(str::trim).ok_or(RowIssue::Missing("id"))?;
        let cliente = self.cliente.as_deref().ok_or(RowIssue::Missing("cliente"))?;
        let contenido = self
            .contenido
            .as_deref()
            .ok_or(RowIssue::Missing("contenido"))?;
        let estado = self
            .estado
            .as_deref()
            .map(str::trim)
            .ok_or(RowIssue::Missing("estado"))?;

        let id = parse_id(id).ok_or_else(|| RowIssue::InvalidId(id.to_string()))?;
        let estado =
            ReportStatus::parse(estado).ok_or_else(|| RowIssue::UnknownStatus(estado.to_string()))?;

        Ok(NewReport {
            id,
            cliente: cliente.to_string(),
            contenido: contenido.to_string(),
            estado,
        })
    }
}

fn normalize(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.trim().is_empty())
}

/// Parse an id, accepting whole-number floats such as `12.0`
fn parse_id(raw: &str) -> Option<i64> {
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }

    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
