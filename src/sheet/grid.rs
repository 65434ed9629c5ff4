//! In-memory worksheet grid.

use std::collections::{BTreeMap, BTreeSet};

use super::coordinate::CellRef;
use super::traits::{CellSink, CellSource};
use super::types::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// One stored cell: its value plus what it was read with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Cell value
    pub value: CellValue,
    /// Raw `s` attribute (style index), carried through unchanged on save
    pub style: Option<String>,
    /// Raw `<f>` element markup; dropped as soon as the value is overwritten
    pub formula: Option<String>,
}

/// A single worksheet held in memory.
///
/// Cells are kept in row-major order. Row-level attributes (height, hidden,
/// custom format) are stored verbatim so a round trip through
/// [`crate::xlsx::Workbook`] leaves the sheet's appearance untouched.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    cells: BTreeMap<CellRef, Cell>,
    row_attributes: BTreeMap<u32, Vec<(String, String)>>,
}

impl Sheet {
    /// Create a new empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the stored cell, including its style.
    pub fn cell(&self, cell: CellRef) -> Option<&Cell> {
        self.cells.get(&cell)
    }

    /// Insert a fully-formed cell, replacing anything at that position.
    pub fn insert_cell(&mut self, at: CellRef, cell: Cell) {
        self.cells.insert(at, cell);
    }

    /// Record the attributes of a `<row>` element (excluding `r` and `spans`).
    pub fn set_row_attributes(&mut self, row: u32, attributes: Vec<(String, String)>) {
        if attributes.is_empty() {
            self.row_attributes.remove(&row);
        } else {
            self.row_attributes.insert(row, attributes);
        }
    }

    /// Attributes recorded for `row`.
    pub fn row_attributes(&self, row: u32) -> &[(String, String)] {
        self.row_attributes
            .get(&row)
            .map(|a| a.as_slice())
            .unwrap_or(&[])
    }

    /// Every row number that has cells or attributes, ascending.
    pub fn row_numbers(&self) -> Vec<u32> {
        let rows: BTreeSet<u32> = self
            .cells
            .keys()
            .map(|c| c.row())
            .chain(self.row_attributes.keys().copied())
            .collect();
        rows.into_iter().collect()
    }

    /// Cells of one row, ordered by column.
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = (CellRef, &Cell)> {
        self.cells
            .range(CellRef::new(1, row)..=CellRef::new(u32::MAX, row))
            .map(|(r, c)| (*r, c))
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the sheet has no stored cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CellSource for Sheet {
    fn value(&self, cell: CellRef) -> &CellValue {
        self.cells.get(&cell).map(|c| &c.value).unwrap_or(&EMPTY)
    }
}

impl CellSink for Sheet {
    fn set_value(&mut self, cell: CellRef, value: CellValue) {
        let value = match value {
            CellValue::String(s) if s.is_empty() => CellValue::Empty,
            other => other,
        };

        if value == CellValue::Empty {
            // A styled cell keeps its formatting when cleared
            match self.cells.get_mut(&cell) {
                Some(existing) if existing.style.is_some() => {
                    existing.value = CellValue::Empty;
                    existing.formula = None;
                },
                Some(_) => {
                    self.cells.remove(&cell);
                },
                None => {},
            }
            return;
        }

        let entry = self.cells.entry(cell).or_default();
        entry.value = value;
        entry.formula = None;
    }
}
