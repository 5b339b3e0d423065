//! Storage backends for sheets.

pub mod json;

pub use json::{
    CellRecord, SheetFile, parse_sheet, parse_sheet_content, write_sheet, write_sheet_content,
};
