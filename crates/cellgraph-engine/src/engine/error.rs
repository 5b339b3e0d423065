//! Structural errors raised by the engine.
//!
//! These abort whatever operation produced them. Runtime evaluation
//! failures are not errors; see [`super::FormulaError`].

use std::fmt;

use thiserror::Error;

/// A name that is not one-or-more letters followed by one-or-more digits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid cell name: {0:?}")]
pub struct InvalidCellName(pub String);

/// An expression that fails tokenization or validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid formula: {message}")]
pub struct FormulaFormatError {
    pub message: String,
}

impl FormulaFormatError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        FormulaFormatError {
            message: message.into(),
        }
    }
}

/// A recomputation order could not be built because the start node
/// reaches itself. `path` begins and ends with the start node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Circular dependency detected: {}", Chain(.path))]
pub struct CircularDependency<N: fmt::Display + fmt::Debug> {
    pub path: Vec<N>,
}

struct Chain<'a, N>(&'a [N]);

impl<N: fmt::Display> fmt::Display for Chain<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, node) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}
