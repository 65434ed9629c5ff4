//! Spreadsheet cell abstraction.
//!
//! This module provides the format-independent pieces the rest of the crate
//! works with: [`CellValue`], A1 coordinates ([`CellRef`]), the
//! [`CellSource`]/[`CellSink`] traits, and an in-memory [`Sheet`] that
//! implements both. The `.xlsx` file format itself lives in [`crate::xlsx`].

pub mod coordinate;
pub mod grid;
pub mod traits;
pub mod types;

pub use coordinate::{CellRef, column_to_letters, letters_to_column};
pub use grid::{Cell, Sheet};
pub use traits::{CellSink, CellSource};
pub use types::CellValue;
