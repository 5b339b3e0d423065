//! cellgraph-core - Sheet document model + storage.

pub mod error;
pub mod sheet;
pub mod storage;

pub use error::{Result, SheetError};
pub use sheet::Sheet;

pub use cellgraph_engine::engine::{CellContents, CellName, CellValue, Expression, FormulaError};
