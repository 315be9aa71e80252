//! Helpers shared by unit tests

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

/// A unique path in the system temp dir, removed on drop
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(extension: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "reportbot-test-{}.{}",
            uuid::Uuid::new_v4(),
            extension
        ));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Write rows to the first sheet of a new workbook
///
/// Cells that parse as numbers are written as numbers, the way spreadsheet
/// tools store typed-in ids. Empty strings leave the cell blank.
pub fn write_xlsx(path: &Path, rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(n) => sheet.write_number(r as u32, c as u16, n).unwrap(),
                Err(_) => sheet.write_string(r as u32, c as u16, *value).unwrap(),
            };
        }
    }

    workbook.save(path).unwrap();
}
