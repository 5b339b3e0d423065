//! Spreadsheet engine API.
//!
//! This module provides the computation layer for the sheet:
//!
//! - [`CellName`] - Validated, case-normalized cell names
//! - [`Expression`] - Formula parsing, canonical form and evaluation
//! - [`DependencyGraph`] - Mirrored dependee/dependent relation
//! - [`recalc_order`] - Recomputation order with cycle detection
//! - [`Cell`], [`CellContents`], [`CellValue`] - Cell data structures
//! - [`format_number`] - Round-trip number rendering

mod cell;
mod cell_name;
mod cycle;
mod error;
mod eval;
mod expression;
mod format;
mod graph;
mod token;

pub use cell::{Cell, CellContents, CellValue};
pub use cell_name::{CellName, is_valid, normalize};
pub use cycle::recalc_order;
pub use error::{CircularDependency, FormulaFormatError, InvalidCellName};
pub use eval::FormulaError;
pub use expression::Expression;
pub use format::format_number;
pub use graph::DependencyGraph;
pub use token::{Lexeme, Operator, tokenize};
