//! Error types for Cellgraph core.

use thiserror::Error;

use cellgraph_engine::engine::{CellName, CircularDependency, FormulaFormatError, InvalidCellName};

/// Errors that abort a sheet operation. Nothing is changed when one is returned.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error(transparent)]
    InvalidName(#[from] InvalidCellName),

    #[error(transparent)]
    Format(#[from] FormulaFormatError),

    #[error(transparent)]
    CircularDependency(#[from] CircularDependency<CellName>),

    #[error("Read/write error: {message}")]
    ReadWrite { message: String },
}

impl SheetError {
    pub(crate) fn read_write(message: impl Into<String>) -> Self {
        SheetError::ReadWrite {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
