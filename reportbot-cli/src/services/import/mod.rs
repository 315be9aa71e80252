//! Spreadsheet-to-store migration
//!
//! Rows are read in full before the store is touched, so an unreadable
//! source has no side effects. Each accepted row is then reconciled against
//! the store in its own transaction.

mod migrate;
mod row;
mod source;

pub use migrate::{MigrationSummary, migrate_file};

use std::path::PathBuf;

/// Failures that stop an import before any row is processed
#[derive(Debug)]
pub enum ImportError {
    /// The source path does not exist or is not a file
    SourceNotFound(PathBuf),
    /// The source exists but could not be parsed
    SourceUnreadable { path: PathBuf, reason: String },
    /// The header row lacks required columns
    MissingColumns { path: PathBuf, columns: Vec<String> },
    /// The store could not be used at all
    Store(anyhow::Error),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::SourceNotFound(path) => {
                write!(f, "source file not found: {}", path.display())
            }
            ImportError::SourceUnreadable { path, reason } => {
                write!(f, "could not read {}: {}", path.display(), reason)
            }
            ImportError::MissingColumns { path, columns } => write!(
                f,
                "{} is missing required column(s): {}",
                path.display(),
                columns.join(", ")
            ),
            ImportError::Store(e) => write!(f, "store unavailable: {:#}", e),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Store(e) => Some(&**e),
            _ => None,
        }
    }
}
