//! Reading and writing `.xlsx` work order spreadsheets.
//!
//! Only the first worksheet is parsed. Saving regenerates that worksheet's
//! `<sheetData>` and copies every other package part through untouched, so
//! styles, merged cells and column widths set up in the template survive any
//! number of edits.

pub mod package;
pub mod reader;
pub mod template;
pub mod workbook;
pub mod writer;

pub use package::Package;
pub use template::{DOCUMENT_TITLE, PLANS_HEADER};
pub use workbook::Workbook;
