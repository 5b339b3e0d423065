use super::Sheet;
use cellgraph_engine::engine::{Cell, CellName, CellValue};
use tracing::trace;

impl Sheet {
    /// Numeric value of a cell for formula evaluation.
    /// Empty cells, text cells and cells holding an error are undefined.
    pub(crate) fn lookup(&self, name: &str) -> Option<f64> {
        self.cells.get(name).and_then(|cell| cell.value.as_number())
    }

    /// Re-evaluate the formula cells among `order`, in order.
    pub(crate) fn recalculate(&mut self, order: &[CellName]) {
        for name in order {
            let value = match self.cells.get(name).and_then(Cell::formula) {
                Some(expr) => CellValue::from(expr.evaluate(|var| self.lookup(var))),
                None => continue,
            };
            trace!(cell = %name, %value, "recalculated");
            if let Some(cell) = self.cells.get_mut(name) {
                cell.value = value;
            }
        }
    }
}
