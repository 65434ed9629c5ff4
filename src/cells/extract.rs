//! Tolerant extraction of typed fields from a work order sheet.
//!
//! Nothing here fails. Every function either finds a usable value or falls
//! back to a documented default, and [`Parsed::defaulted`] says which.

use chrono::NaiveDate;

use crate::common::dates::{string_to_date, today};
use crate::common::text::{truncate_chars, yes_no_to_bool};
use crate::config::{BUILDING_RANGE, Config, ROOM_RANGE};
use crate::model::comment::{FIRST_COMMENT_ROW, LAST_COMMENT_ROW};
use crate::model::task::{FIRST_TASK_ROW, LAST_TASK_ROW};
use crate::model::{LogComment, Site, Special, TaskItem, WorkOrderType};
use crate::sheet::{CellRef, CellSource, CellValue};

use super::layout;
use super::validate::{
    DEFAULT_PRIORITY, DEFAULT_TITLE, NCR_REQUIRED_MARKER, NOT_APPLICABLE, clean_title, find_building,
    find_room, is_valid_ncr_number, is_valid_priority, is_valid_wo_number,
};

/// A value read from the sheet together with whether the default was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed<T> {
    /// The usable value
    pub value: T,
    /// `true` when the cell was missing or malformed
    pub defaulted: bool,
}

impl<T> Parsed<T> {
    /// A value read successfully.
    pub fn found(value: T) -> Self {
        Self {
            value,
            defaulted: false,
        }
    }

    /// A fallback value.
    pub fn default_to(value: T) -> Self {
        Self {
            value,
            defaulted: true,
        }
    }

    /// Discard the flag.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Trimmed text of a cell.
fn text<S: CellSource + ?Sized>(sheet: &S, cell: CellRef) -> String {
    sheet.text(cell).trim().to_string()
}

/// Date in `cell`: a date-valued cell, or the first `M/D/YYYY` in its text.
/// Defaults to today.
pub fn date<S: CellSource + ?Sized>(sheet: &S, cell: CellRef) -> Parsed<NaiveDate> {
    let value = sheet.value(cell);
    let found = match value {
        CellValue::DateTime(_) | CellValue::Float(_) | CellValue::Int(_) => value.as_date(),
        CellValue::String(s) => string_to_date(s),
        _ => None,
    };
    match found {
        Some(d) => Parsed::found(d),
        None => Parsed::default_to(today()),
    }
}

/// Six-digit work order number from A7, if it is one.
pub fn wo_number<S: CellSource + ?Sized>(sheet: &S) -> Option<String> {
    let raw = text(sheet, layout::NUMBER);
    let number = truncate_chars(&raw, 6);
    is_valid_wo_number(number).then(|| number.to_string())
}

/// Full number (A7 digits + B7 site + C7 special), if valid.
pub fn full_wo_number<S: CellSource + ?Sized>(sheet: &S) -> Option<String> {
    let raw = text(sheet, layout::NUMBER);
    let full = format!(
        "{}{}{}",
        truncate_chars(&raw, 6),
        text(sheet, layout::SITE),
        text(sheet, layout::SPECIAL)
    );
    is_valid_wo_number(&full).then_some(full)
}

pub fn site<S: CellSource + ?Sized>(sheet: &S, config: &Config) -> Site {
    Site::parse(&text(sheet, layout::SITE), config.default_site)
}

pub fn special<S: CellSource + ?Sized>(sheet: &S, config: &Config) -> Special {
    Special::parse(&text(sheet, layout::SPECIAL), config.default_special)
}

pub fn wo_type<S: CellSource + ?Sized>(sheet: &S, config: &Config) -> WorkOrderType {
    WorkOrderType::parse(&text(sheet, layout::TYPE), config.default_type)
}

/// Title from D7, truncated and made filename-safe.
pub fn title<S: CellSource + ?Sized>(sheet: &S) -> Parsed<String> {
    match clean_title(&sheet.text(layout::TITLE)) {
        Some(title) => Parsed::found(title),
        None => Parsed::default_to(DEFAULT_TITLE.to_string()),
    }
}

/// Priority from A10; anything but 1, 2 or 3 becomes 3.
pub fn priority<S: CellSource + ?Sized>(sheet: &S) -> Parsed<u8> {
    match sheet.value(layout::PRIORITY).as_i64() {
        Some(p) if is_valid_priority(p) => Parsed::found(p as u8),
        _ => Parsed::default_to(DEFAULT_PRIORITY),
    }
}

/// Creator from B10, or the primary user.
pub fn creator<S: CellSource + ?Sized>(sheet: &S, config: &Config) -> Parsed<String> {
    let raw = text(sheet, layout::CREATOR);
    if raw.is_empty() {
        Parsed::default_to(config.primary_user.name.clone())
    } else {
        Parsed::found(raw)
    }
}

/// First building number found in the location cells.
pub fn building<S: CellSource + ?Sized>(sheet: &S, default: u32) -> Parsed<u32> {
    let found = layout::LOCATION
        .iter()
        .map(|&cell| sheet.text(cell))
        .find_map(|t| find_building(&t));
    match found {
        Some(b) if BUILDING_RANGE.contains(&b) => Parsed::found(b),
        _ => Parsed::default_to(default),
    }
}

/// First room number found in the location cells.
pub fn room<S: CellSource + ?Sized>(sheet: &S, default: u32) -> Parsed<u32> {
    let found = layout::LOCATION
        .iter()
        .map(|&cell| sheet.text(cell))
        .find_map(|t| find_room(&t));
    match found {
        Some(r) if ROOM_RANGE.contains(&r) => Parsed::found(r),
        _ => Parsed::default_to(default),
    }
}

/// Related work order from G10, or `"N/A"`.
pub fn related_wo<S: CellSource + ?Sized>(sheet: &S) -> Parsed<String> {
    let raw = text(sheet, layout::RELATED_WO);
    if is_valid_wo_number(&raw) {
        Parsed::found(raw)
    } else {
        Parsed::default_to(NOT_APPLICABLE.to_string())
    }
}

/// PAC is required when I10 ends in "yes" or "required".
pub fn pac_required<S: CellSource + ?Sized>(sheet: &S) -> bool {
    let value = text(sheet, layout::PAC).to_lowercase();
    value.ends_with("yes") || value.ends_with("required")
}

/// A Yes/No cell; anything but "yes" is `false`.
pub fn yes_no<S: CellSource + ?Sized>(sheet: &S, cell: CellRef) -> bool {
    yes_no_to_bool(&sheet.text(cell))
}

/// NCR number from B12.
///
/// `"N/A"` unless `required`; `"REQUIRED"` when required but B12 holds
/// nothing valid.
pub fn ncr_number<S: CellSource + ?Sized>(sheet: &S, required: bool) -> Parsed<String> {
    if !required {
        return Parsed::found(NOT_APPLICABLE.to_string());
    }
    let raw = text(sheet, layout::NCR_NUMBER);
    if is_valid_ncr_number(&raw) {
        Parsed::found(raw)
    } else {
        Parsed::default_to(NCR_REQUIRED_MARKER.to_string())
    }
}

/// Planned tasks from rows 15..=29, keeping rows with a summary.
///
/// A missing reference becomes `"REFERENCE REQUIRED"` except on the safety
/// message row. Fewer than two tasks gets the description-required
/// placeholder appended.
pub fn tasks<S: CellSource + ?Sized>(sheet: &S) -> Vec<TaskItem> {
    let mut tasks = Vec::new();

    for row in FIRST_TASK_ROW..=LAST_TASK_ROW {
        let summary = sheet.text(layout::TASK_SUMMARY.with_row(row));
        if summary.is_empty() {
            continue;
        }
        let number = sheet
            .value(layout::TASK_NUMBER.with_row(row))
            .as_i64()
            .unwrap_or(((row - FIRST_TASK_ROW) * 10) as i64);
        let mut reference = sheet.text(layout::TASK_REFERENCE.with_row(row));
        if reference.is_empty() && row > FIRST_TASK_ROW {
            reference = "REFERENCE REQUIRED".to_string();
        }
        tasks.push(TaskItem::new(number, summary, reference, row));
    }

    if tasks.len() < 2 {
        tasks.push(TaskItem::description_required());
    }
    tasks
}

/// Comments from rows 86..=109, keeping rows with text.
pub fn comments<S: CellSource + ?Sized>(sheet: &S) -> Vec<LogComment> {
    (FIRST_COMMENT_ROW..=LAST_COMMENT_ROW)
        .filter_map(|row| {
            let text = sheet.text(layout::COMMENT_TEXT.with_row(row));
            if text.is_empty() {
                return None;
            }
            let author = sheet.text(layout::COMMENT_AUTHOR.with_row(row));
            let when = date(sheet, layout::COMMENT_DATE.with_row(row)).value;
            Some(LogComment::new(text, author, when, (row - FIRST_COMMENT_ROW) as usize))
        })
        .collect()
}
