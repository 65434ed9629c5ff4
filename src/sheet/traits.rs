//! Traits for the named-cell spreadsheet abstraction.
//!
//! Extraction code only ever needs "what is in cell X" and the save path only
//! ever needs "put this in cell X", so the work-order layer is written
//! against these two traits rather than a concrete workbook.

use super::coordinate::CellRef;
use super::types::CellValue;

/// Read access to cells by coordinate.
pub trait CellSource {
    /// Get the value at `cell`; absent cells are [`CellValue::Empty`].
    fn value(&self, cell: CellRef) -> &CellValue;

    /// Get the cell rendered as text (empty for absent cells).
    fn text(&self, cell: CellRef) -> String {
        self.value(cell).to_text()
    }

    /// Check if the cell is empty.
    fn is_blank(&self, cell: CellRef) -> bool {
        self.value(cell).is_empty()
    }
}

/// Write access to cells by coordinate.
pub trait CellSink {
    /// Store `value` at `cell`. Writing [`CellValue::Empty`] clears the value.
    fn set_value(&mut self, cell: CellRef, value: CellValue);

    /// Convenience wrapper over [`CellSink::set_value`].
    fn set<V: Into<CellValue>>(&mut self, cell: CellRef, value: V)
    where
        Self: Sized,
    {
        self.set_value(cell, value.into());
    }

    /// Clear the value at `cell`.
    fn clear(&mut self, cell: CellRef) {
        self.set_value(cell, CellValue::Empty);
    }
}
