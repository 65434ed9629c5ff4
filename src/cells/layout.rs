//! Fixed cell positions of the Technician Work Order Information Sheet.

use crate::sheet::CellRef;

/// Must read [`crate::xlsx::DOCUMENT_TITLE`].
pub const DOCUMENT_TITLE: CellRef = CellRef::from_a1("D1");
/// Must read [`crate::xlsx::PLANS_HEADER`].
pub const PLANS_HEADER: CellRef = CellRef::from_a1("A13");

pub const DUE_DATE: CellRef = CellRef::from_a1("B3");
pub const ORIGINATOR: CellRef = CellRef::from_a1("B4");
pub const PREPARER_INITIALS: CellRef = CellRef::from_a1("B5");
/// Filled in by planning and control when the work order is approved.
pub const APPROVAL_MARKS: [CellRef; 3] = [
    CellRef::from_a1("C3"),
    CellRef::from_a1("C4"),
    CellRef::from_a1("C5"),
];

pub const NUMBER: CellRef = CellRef::from_a1("A7");
pub const SITE: CellRef = CellRef::from_a1("B7");
pub const SPECIAL: CellRef = CellRef::from_a1("C7");
pub const TITLE: CellRef = CellRef::from_a1("D7");
pub const TYPE: CellRef = CellRef::from_a1("I7");

pub const BUILDING: CellRef = CellRef::from_a1("D8");
pub const ROOM: CellRef = CellRef::from_a1("F8");
/// Location cells searched, in order, for building and room numbers.
pub const LOCATION: [CellRef; 4] = [
    CellRef::from_a1("D8"),
    CellRef::from_a1("F8"),
    CellRef::from_a1("H8"),
    CellRef::from_a1("J8"),
];

pub const PRIORITY: CellRef = CellRef::from_a1("A10");
pub const CREATOR: CellRef = CellRef::from_a1("B10");
pub const RELATED_WO: CellRef = CellRef::from_a1("G10");
pub const PAC: CellRef = CellRef::from_a1("I10");

pub const NCR_REQUIRED: CellRef = CellRef::from_a1("A12");
pub const NCR_NUMBER: CellRef = CellRef::from_a1("B12");
pub const TASK_LEAD_REQUIRED: CellRef = CellRef::from_a1("E12");
pub const TECH_WITNESS_POINT: CellRef = CellRef::from_a1("F12");
pub const PEER_REVIEW_REQUIRED: CellRef = CellRef::from_a1("G12");
pub const PEER_REVIEW_ATTACHED: CellRef = CellRef::from_a1("H12");
pub const EHS_REQUIRED: CellRef = CellRef::from_a1("I12");
pub const QAMIP: CellRef = CellRef::from_a1("J12");
pub const QA_REVIEW_REQUIRED: CellRef = CellRef::from_a1("K12");

/// A sheet counts as filled in only when all of these hold something: the
/// safety message summary plus number, summary and reference of the first
/// real task.
pub const MINIMUM_TASK_CELLS: [CellRef; 4] = [
    CellRef::from_a1("A16"),
    CellRef::from_a1("B16"),
    CellRef::from_a1("G16"),
    CellRef::from_a1("B15"),
];

// Planned task columns; use with the task's planned row
pub const TASK_NUMBER: CellRef = CellRef::from_a1("A15");
pub const TASK_SUMMARY: CellRef = CellRef::from_a1("B15");
pub const TASK_REFERENCE: CellRef = CellRef::from_a1("G15");

// Actuals columns; use with the task's actuals row
pub const ACTUAL_NUMBER: CellRef = CellRef::from_a1("A32");
pub const ACTUAL_DATE: CellRef = CellRef::from_a1("C32");
pub const ACTUAL_TECHNICIAN: CellRef = CellRef::from_a1("E32");
pub const ACTUAL_QTY_TECHS: CellRef = CellRef::from_a1("H32");
pub const ACTUAL_HOURS: CellRef = CellRef::from_a1("J32");

pub const COMPLETION_START: CellRef = CellRef::from_a1("A78");
pub const COMPLETION_END: CellRef = CellRef::from_a1("C78");
pub const COMPLETION_RESTORE: CellRef = CellRef::from_a1("A80");
pub const COMPLETION_REPAIR_TIME: CellRef = CellRef::from_a1("C80");

// Comment columns; use with the comment's row
pub const COMMENT_TEXT: CellRef = CellRef::from_a1("A86");
pub const COMMENT_AUTHOR: CellRef = CellRef::from_a1("I86");
pub const COMMENT_DATE: CellRef = CellRef::from_a1("K86");
