//! Outcome of examining a candidate spreadsheet.

use std::fmt;

/// Result of classifying a spreadsheet file, one variant per check layer.
///
/// This is a value, not an error: callers branch on it to decide whether a
/// file may be approved or matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    /// Passed every check
    Valid,
    /// No file at that path
    NotFound,
    /// Not an `.xlsx`/`.xls` file
    NotSpreadsheet,
    /// Missing the work order header cells, or unreadable
    NotWorkOrder,
    /// Missing a title or the first real task
    Incomplete,
    /// Approval markings or a valid number are missing
    NotApproved,
    /// Content doesn't correspond to the pending record
    FilesUnmatched,
    /// The record is already approved
    AlreadyApproved,
}

impl FileStatus {
    /// Check if the status is [`FileStatus::Valid`].
    #[inline]
    pub fn is_valid(self) -> bool {
        self == FileStatus::Valid
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FileStatus::Valid => "valid work order",
            FileStatus::NotFound => "file not found",
            FileStatus::NotSpreadsheet => "not a spreadsheet",
            FileStatus::NotWorkOrder => "not a work order information sheet",
            FileStatus::Incomplete => "work order sheet is incomplete",
            FileStatus::NotApproved => "work order sheet is not approved",
            FileStatus::FilesUnmatched => "spreadsheet does not match the work order",
            FileStatus::AlreadyApproved => "work order is already approved",
        };
        f.write_str(text)
    }
}
