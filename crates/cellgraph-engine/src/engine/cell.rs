//! Cell data structures.
//!
//! - [`CellContents`] - what the user typed: a number, text or a formula
//! - [`CellValue`] - what the cell shows: a number, text or a formula error
//! - [`Cell`] - the two together

use std::collections::HashSet;
use std::fmt;

use super::cell_name::CellName;
use super::error::FormulaFormatError;
use super::eval::FormulaError;
use super::expression::Expression;
use super::format::format_number;

/// The contents of a non-empty cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContents {
    Number(f64),
    Text(String),
    Formula(Expression),
}

impl CellContents {
    /// Classify user input.
    /// - Empty string -> `None` (the cell is cleared)
    /// - Parses as a finite number (surrounding whitespace allowed) -> Number
    /// - Starts with '=' -> Formula (without the '=')
    /// - Otherwise -> Text, verbatim
    pub fn from_input(input: &str) -> Result<Option<CellContents>, FormulaFormatError> {
        if input.is_empty() {
            return Ok(None);
        }

        if let Ok(n) = input.trim().parse::<f64>()
            && n.is_finite()
        {
            return Ok(Some(CellContents::Number(n)));
        }

        if let Some(formula) = input.strip_prefix('=') {
            return Ok(Some(CellContents::Formula(Expression::new(formula)?)));
        }

        Ok(Some(CellContents::Text(input.to_string())))
    }

    /// The text that [`CellContents::from_input`] turns back into these contents.
    pub fn to_input_string(&self) -> String {
        match self {
            CellContents::Number(n) => format_number(*n),
            CellContents::Text(s) => s.clone(),
            CellContents::Formula(expr) => format!("={}", expr),
        }
    }

    /// Cells these contents read from.
    pub fn dependees(&self) -> HashSet<CellName> {
        match self {
            CellContents::Formula(expr) => expr.variables(),
            CellContents::Number(_) | CellContents::Text(_) => HashSet::new(),
        }
    }
}

impl fmt::Display for CellContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_input_string())
    }
}

/// The computed value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl CellValue {
    /// The value of a cell that has no contents.
    pub const EMPTY: CellValue = CellValue::Text(String::new());

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

impl From<Result<f64, FormulaError>> for CellValue {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => CellValue::Number(n),
            Err(err) => CellValue::Error(err),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Error(err) => write!(f, "#ERR: {}", err),
        }
    }
}

/// A non-empty cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub contents: CellContents,
    pub value: CellValue,
}

impl Cell {
    /// Wrap contents. Literal contents are their own value; formula cells
    /// show empty text until they are evaluated.
    pub fn new(contents: CellContents) -> Cell {
        let value = match &contents {
            CellContents::Number(n) => CellValue::Number(*n),
            CellContents::Text(s) => CellValue::Text(s.clone()),
            CellContents::Formula(_) => CellValue::EMPTY,
        };
        Cell { contents, value }
    }

    pub fn formula(&self) -> Option<&Expression> {
        match &self.contents {
            CellContents::Formula(expr) => Some(expr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, CellContents, CellValue};
    use crate::engine::FormulaError;

    #[test]
    fn test_from_input_classifies() {
        assert_eq!(CellContents::from_input("").unwrap(), None);
        assert_eq!(
            CellContents::from_input("2.50").unwrap(),
            Some(CellContents::Number(2.5))
        );
        assert_eq!(
            CellContents::from_input(" 7 ").unwrap(),
            Some(CellContents::Number(7.0))
        );
        assert_eq!(
            CellContents::from_input("hello").unwrap(),
            Some(CellContents::Text("hello".to_string()))
        );
        assert!(matches!(
            CellContents::from_input("=a1+1").unwrap(),
            Some(CellContents::Formula(_))
        ));
    }

    #[test]
    fn test_non_finite_spellings_are_text() {
        for input in ["NaN", "inf", "-infinity"] {
            assert_eq!(
                CellContents::from_input(input).unwrap(),
                Some(CellContents::Text(input.to_string()))
            );
        }
    }

    #[test]
    fn test_whitespace_is_text() {
        assert_eq!(
            CellContents::from_input("  ").unwrap(),
            Some(CellContents::Text("  ".to_string()))
        );
    }

    #[test]
    fn test_malformed_formula_is_an_error() {
        assert!(CellContents::from_input("=1+").is_err());
        assert!(CellContents::from_input("=").is_err());
    }

    #[test]
    fn test_input_string_round_trip() {
        for input in ["5", "hello", "=A1+2", "=(B2*3)/C4", "-1.5"] {
            let contents = CellContents::from_input(input).unwrap().unwrap();
            assert_eq!(contents.to_input_string(), input);
        }
        let contents = CellContents::from_input("= a1 + 2.0").unwrap().unwrap();
        assert_eq!(contents.to_input_string(), "=A1+2");
    }

    #[test]
    fn test_cell_new_values() {
        assert_eq!(
            Cell::new(CellContents::Number(3.0)).value,
            CellValue::Number(3.0)
        );
        assert_eq!(
            Cell::new(CellContents::Text("x".to_string())).value,
            CellValue::Text("x".to_string())
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(CellValue::Number(7.0).to_string(), "7");
        assert_eq!(CellValue::EMPTY.to_string(), "");
        assert_eq!(
            CellValue::Error(FormulaError::DivisionByZero).to_string(),
            "#ERR: Division by zero"
        );
    }
}
