use cellgraph_engine::engine::{Cell, CellName, DependencyGraph};
use std::collections::HashMap;

/// A sheet of named cells with formulas that are kept up to date.
///
/// Every non-empty cell has an entry in `cells`; a missing entry is an
/// empty cell. `graph` holds one edge per formula reference, from the
/// referenced cell to the formula cell.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    pub(crate) cells: HashMap<CellName, Cell>,
    pub(crate) graph: DependencyGraph<CellName>,
    /// Set by every successful edit, cleared by save and load.
    pub(crate) changed: bool,
}

impl Sheet {
    /// Create an empty sheet.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Sheet {
            cells: HashMap::new(),
            graph: DependencyGraph::new(),
            changed: false,
        }
    }

    /// Whether the sheet has been edited since it was created, saved or loaded.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
