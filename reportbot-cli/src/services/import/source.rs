//! Read candidate report rows from spreadsheet or CSV files
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read with
//! calamine from their first sheet; `.csv` files with the csv crate. In both
//! cases the first row is the header and the required columns are located by
//! name, so column order and extra columns do not matter.

use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

use super::ImportError;
use super::row::{CandidateRow, REQUIRED_COLUMNS};

/// Positions of the required columns within a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    id: usize,
    cliente: usize,
    contenido: usize,
    estado: usize,
}

impl ColumnIndex {
    /// Locate required columns by name; returns the missing names on failure
    fn from_headers<'a, I>(headers: I) -> Result<Self, Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let normalized: Vec<String> = headers.into_iter().map(normalize_header).collect();
        let find = |name: &str| normalized.iter().position(|h| h == name);

        match (find("id"), find("cliente"), find("contenido"), find("estado")) {
            (Some(id), Some(cliente), Some(contenido), Some(estado)) => Ok(Self {
                id,
                cliente,
                contenido,
                estado,
            }),
            _ => Err(REQUIRED_COLUMNS
                .iter()
                .filter(|c| find(**c).is_none())
                .map(|c| c.to_string())
                .collect()),
        }
    }

    fn candidate<F>(&self, line: usize, cell: F) -> CandidateRow
    where
        F: Fn(usize) -> Option<String>,
    {
        CandidateRow::new(
            line,
            cell(self.id),
            cell(self.cliente),
            cell(self.contenido),
            cell(self.estado),
        )
    }
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Read every non-blank data row from the source file
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateRow>, ImportError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ImportError::SourceNotFound(path.to_path_buf()));
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let rows = if is_csv {
        read_csv(path)?
    } else {
        read_workbook(path)?
    };

    log::debug!("Read {} candidate rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn unreadable(path: &Path, reason: impl std::fmt::Display) -> ImportError {
    ImportError::SourceUnreadable {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn missing_columns(path: &Path, columns: Vec<String>) -> ImportError {
    ImportError::MissingColumns {
        path: path.to_path_buf(),
        columns,
    }
}

/// Convert a workbook cell to text; blank and error cells are `None`
fn cell_to_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers come back as floats from most spreadsheet tools
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn read_workbook(path: &Path) -> Result<Vec<CandidateRow>, ImportError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(path, e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| unreadable(path, "workbook has no sheets"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| unreadable(path, format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    // Ranges start at the first used cell, not necessarily A1
    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|c| cell_to_text(c).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    let columns = ColumnIndex::from_headers(headers.iter().map(String::as_str))
        .map_err(|missing| missing_columns(path, missing))?;

    let candidates = rows
        .enumerate()
        .map(|(idx, row)| {
            columns.candidate(first_line + idx + 1, |col| {
                row.get(col).and_then(cell_to_text)
            })
        })
        .filter(|candidate| !candidate.is_blank())
        .collect();

    Ok(candidates)
}

fn read_csv(path: &Path) -> Result<Vec<CandidateRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| unreadable(path, e))?;

    let headers = reader.headers().map_err(|e| unreadable(path, e))?.clone();
    let columns = ColumnIndex::from_headers(headers.iter())
        .map_err(|missing| missing_columns(path, missing))?;

    let mut candidates = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| unreadable(path, e))?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);

        let candidate = columns.candidate(line, |col| record.get(col).map(str::to_string));
        if !candidate.is_blank() {
            candidates.push(candidate);
        }
    }

    Ok(candidates)
}
