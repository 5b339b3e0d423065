use super::Sheet;
use crate::error::Result;
use cellgraph_engine::engine::{
    Cell, CellContents, CellName, CellValue, CircularDependency, recalc_order,
};
use std::collections::HashSet;
use std::ops::Index;
use tracing::{debug, warn};

static EMPTY_VALUE: CellValue = CellValue::EMPTY;

impl Sheet {
    /// Set a cell from user input and recalculate everything that depends on it.
    ///
    /// Returns the recalculated cells in evaluation order, starting with
    /// `name` itself. An empty `text` clears the cell. On error the sheet is
    /// left exactly as it was.
    pub fn set_contents_of_cell(&mut self, name: &str, text: &str) -> Result<Vec<CellName>> {
        let name = CellName::new(name)?;
        let contents = CellContents::from_input(text)?;
        self.set_cell_contents(&name, contents)
    }

    /// Typed form of [`Sheet::set_contents_of_cell`]; `None` clears the cell.
    pub fn set_cell_contents(
        &mut self,
        name: &CellName,
        contents: Option<CellContents>,
    ) -> Result<Vec<CellName>> {
        let dependees = contents
            .as_ref()
            .map(CellContents::dependees)
            .unwrap_or_default();

        let order = match self.prospective_order(name, &dependees) {
            Ok(order) => order,
            Err(cycle) => {
                warn!(cell = %name, %cycle, "rejected edit");
                return Err(cycle.into());
            }
        };

        // Checked: commit graph and contents together.
        self.graph.replace_dependees(name.clone(), dependees);
        match contents {
            Some(contents) => {
                self.cells.insert(name.clone(), Cell::new(contents));
            }
            None => {
                self.cells.remove(name);
            }
        }
        self.recalculate(&order);
        self.changed = true;

        debug!(cell = %name, recalculated = order.len(), "cell updated");
        Ok(order)
    }

    /// Recomputation order for `name` as if its dependees were `dependees`,
    /// without touching the stored graph.
    fn prospective_order(
        &self,
        name: &CellName,
        dependees: &HashSet<CellName>,
    ) -> std::result::Result<Vec<CellName>, CircularDependency<CellName>> {
        recalc_order(name, |node: &CellName| {
            let mut next: Vec<CellName> = self
                .graph
                .dependents(node)
                .filter(|dependent| *dependent != name)
                .cloned()
                .collect();
            if dependees.contains(node) {
                next.push(name.clone());
            }
            next.sort();
            next
        })
    }

    /// Contents of a cell. Empty cells have empty text contents.
    pub fn cell_contents(&self, name: &str) -> Result<CellContents> {
        let name = CellName::new(name)?;
        Ok(self
            .cells
            .get(&name)
            .map(|cell| cell.contents.clone())
            .unwrap_or_else(|| CellContents::Text(String::new())))
    }

    /// Value of a cell: a number, text or a formula error. Empty cells are empty text.
    pub fn cell_value(&self, name: &str) -> Result<CellValue> {
        let name = CellName::new(name)?;
        Ok(self.value(&name).clone())
    }

    /// Value of an already validated cell name.
    pub fn value(&self, name: &CellName) -> &CellValue {
        self.cells
            .get(name)
            .map(|cell| &cell.value)
            .unwrap_or(&EMPTY_VALUE)
    }

    pub fn names_of_all_nonempty_cells(&self) -> HashSet<CellName> {
        self.cells.keys().cloned().collect()
    }

    /// Cells whose formulas reference `name` directly, sorted.
    pub fn direct_dependents(&self, name: &str) -> Result<Vec<CellName>> {
        let name = CellName::new(name)?;
        let mut out: Vec<CellName> = self.graph.dependents(&name).cloned().collect();
        out.sort();
        Ok(out)
    }

    /// Non-empty cells sorted by name.
    pub fn cells(&self) -> Vec<(&CellName, &Cell)> {
        let mut out: Vec<_> = self.cells.iter().collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

impl Index<&CellName> for Sheet {
    type Output = CellValue;

    fn index(&self, name: &CellName) -> &CellValue {
        self.value(name)
    }
}
