//! Layered classification of candidate spreadsheet files.

use std::path::Path;

use tracing::debug;

use crate::common::fs::extension_lower;
use crate::model::FileStatus;
use crate::sheet::CellSource;
use crate::xlsx::{DOCUMENT_TITLE, PLANS_HEADER, Workbook};

use super::extract::wo_number;
use super::layout;

/// Only OOXML packages can be read; legacy `.xls` counts as foreign.
const SPREADSHEET_EXTENSIONS: [&str; 1] = ["xlsx"];

/// Open `path` and run the structural checks.
///
/// The workbook is returned only when the status is [`FileStatus::Valid`],
/// so callers that go on to extract fields don't open the file twice.
pub fn inspect(path: &Path) -> (FileStatus, Option<Workbook>) {
    if !path.is_file() {
        return (FileStatus::NotFound, None);
    }

    let is_spreadsheet = extension_lower(path)
        .is_some_and(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()));
    if !is_spreadsheet {
        return (FileStatus::NotSpreadsheet, None);
    }

    let book = match Workbook::open(path) {
        Ok(book) => book,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "unreadable spreadsheet");
            return (FileStatus::NotWorkOrder, None);
        },
    };

    if !has_work_order_headers(&book) {
        return (FileStatus::NotWorkOrder, None);
    }
    (FileStatus::Valid, Some(book))
}

/// Structural status of `path`: found, a spreadsheet, a work order sheet.
pub fn input_file_status(path: &Path) -> FileStatus {
    inspect(path).0
}

/// Status of `path` as a candidate for approval.
pub fn approved_file_status(path: &Path) -> FileStatus {
    match inspect(path) {
        (FileStatus::Valid, Some(book)) => approval_status(&book),
        (status, _) => status,
    }
}

/// The sheet carries both fixed header texts.
pub fn has_work_order_headers<S: CellSource + ?Sized>(sheet: &S) -> bool {
    sheet.text(layout::DOCUMENT_TITLE).trim() == DOCUMENT_TITLE
        && sheet.text(layout::PLANS_HEADER).trim() == PLANS_HEADER
}

/// Completeness and approval checks on a structurally valid sheet.
///
/// A sheet without a title or a first real task is
/// [`FileStatus::Incomplete`]. One without a valid number in A7 or with an
/// empty approval mark is [`FileStatus::NotApproved`].
pub fn approval_status<S: CellSource + ?Sized>(sheet: &S) -> FileStatus {
    let incomplete = sheet.is_blank(layout::TITLE)
        || layout::MINIMUM_TASK_CELLS
            .iter()
            .any(|&cell| sheet.is_blank(cell));
    if incomplete {
        return FileStatus::Incomplete;
    }

    let unmarked = layout::APPROVAL_MARKS.iter().any(|&cell| sheet.is_blank(cell));
    if wo_number(sheet).is_none() || unmarked {
        return FileStatus::NotApproved;
    }
    FileStatus::Valid
}
