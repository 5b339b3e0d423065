//! JSON sheet file format.
//!
//! ```json
//! {
//!   "Cells": {
//!     "A1": { "StringForm": "5" },
//!     "B1": { "StringForm": "=A1+2" }
//!   }
//! }
//! ```
//!
//! Each cell is stored as the text that recreates it: numbers in
//! round-trip form, text verbatim, formulas as `=` plus canonical text.

use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Refuse to read sheet files larger than this.
pub const MAX_SHEET_FILE_BYTES: u64 = 16 * 1_048_576; // 16 MiB

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetFile {
    /// Sorted by name so output is deterministic.
    #[serde(rename = "Cells")]
    pub cells: BTreeMap<String, CellRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(rename = "StringForm")]
    pub string_form: String,
}

impl CellRecord {
    pub fn new(string_form: impl Into<String>) -> Self {
        CellRecord {
            string_form: string_form.into(),
        }
    }
}

/// Read and parse a sheet file.
pub fn parse_sheet(path: &Path) -> Result<SheetFile> {
    let meta = fs::metadata(path)
        .map_err(|e| SheetError::read_write(format!("Cannot read {}: {}", path.display(), e)))?;
    if meta.len() > MAX_SHEET_FILE_BYTES {
        return Err(SheetError::read_write(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_SHEET_FILE_BYTES
        )));
    }
    let content = fs::read_to_string(path)
        .map_err(|e| SheetError::read_write(format!("Cannot read {}: {}", path.display(), e)))?;
    parse_sheet_content(&content)
}

/// Parse sheet JSON from a string.
pub fn parse_sheet_content(content: &str) -> Result<SheetFile> {
    serde_json::from_str(content)
        .map_err(|e| SheetError::read_write(format!("Malformed sheet data: {}", e)))
}

/// Write a sheet file.
pub fn write_sheet(path: &Path, file: &SheetFile, pretty: bool) -> Result<()> {
    let content = write_sheet_content(file, pretty)?;
    fs::write(path, content)
        .map_err(|e| SheetError::read_write(format!("Cannot write {}: {}", path.display(), e)))
}

/// Render sheet JSON.
pub fn write_sheet_content(file: &SheetFile, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(file)
    } else {
        serde_json::to_string(file)
    };
    rendered.map_err(|e| SheetError::read_write(format!("Cannot serialize sheet: {}", e)))
}
