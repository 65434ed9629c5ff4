//! Date formatting and tolerant date parsing.
//!
//! Dates are written to the sheet as `M/D/YYYY` without zero padding, which is
//! also the only textual form recognized when reading.

use chrono::{Datelike, Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})[/\\](\d{1,2})[/\\](\d{4})").expect("Failed to compile date pattern")
});

/// Excel's serial date zero point (1900 date system, including the leap bug).
const EXCEL_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1899, 12, 30) {
    Some(d) => d,
    None => panic!("invalid epoch"),
};

/// Today's local date.
#[inline]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Format as `M/D/YYYY` (e.g. `8/5/2024`).
pub fn date_to_string(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Format a `Week of MM-DD` directory name component.
pub fn month_day(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

/// Find the first `M/D/YYYY` (or backslash-separated) date inside `text`.
///
/// Returns `None` when no such date exists or the numbers don't form a real
/// calendar date.
pub fn string_to_date(text: &str) -> Option<NaiveDate> {
    let caps = DATE_RE.captures(text)?;
    let month = caps[1].parse().ok()?;
    let day = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Convert an Excel serial day number to a date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }
    EXCEL_EPOCH.checked_add_days(Days::new(serial.trunc() as u64))
}

/// The Monday on or before `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}
