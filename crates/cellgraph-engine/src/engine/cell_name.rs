//! Cell name validation and normalization.
//!
//! A cell name is one or more ASCII letters followed by one or more
//! digits (`A1`, `xy22`, `AA100`). Names are case-insensitive and are
//! always stored upper-cased, so `a1` and `A1` are the same cell.
//!
//! # Examples
//!
//! ```
//! use cellgraph_engine::engine::CellName;
//!
//! let name: CellName = "b3".parse().unwrap();
//! assert_eq!(name.as_str(), "B3");
//! assert!("3B".parse::<CellName>().is_err());
//! ```

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

use super::error::InvalidCellName;

/// A validated, upper-cased cell name.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CellName(String);

impl CellName {
    /// Validate and normalize a name.
    pub fn new(name: &str) -> Result<CellName, InvalidCellName> {
        if is_valid(name) {
            Ok(CellName(normalize(name)))
        } else {
            Err(InvalidCellName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Upper-case a name without validating it.
pub fn normalize(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// True if `name` is letters followed by digits, in either case.
pub fn is_valid(name: &str) -> bool {
    cell_name_re().is_match(name)
}

fn cell_name_re() -> &'static Regex {
    static CELL_NAME_RE: OnceLock<Regex> = OnceLock::new();
    CELL_NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z]+[0-9]+$").expect("cell name regex must compile")
    })
}

impl std::str::FromStr for CellName {
    type Err = InvalidCellName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellName::new(s)
    }
}

impl fmt::Display for CellName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CellName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CellName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CellName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CellName::new(&raw).map_err(serde::de::Error::custom)
    }
}
