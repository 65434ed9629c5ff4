//! Completion record for a finished work order.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dates and repair time entered when closing out a work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionData {
    /// Work started
    pub start_date: NaiveDate,
    /// Work finished; decides which week folder the record lands in
    pub end_date: NaiveDate,
    /// System restored to service
    pub restore_date: NaiveDate,
    /// Repair time, days part
    pub days: u32,
    /// Repair time, hours part
    pub hours: u32,
    /// Repair time, minutes part
    pub minutes: u32,
}

impl CompletionData {
    /// Build from dates and a `"[d:]h:m"` repair time string.
    ///
    /// Non-numeric segments count as zero. With a single segment only the
    /// minutes are set.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, restore_date: NaiveDate, repair_time: &str) -> Self {
        let (days, hours, minutes) = parse_repair_time(repair_time);
        Self {
            start_date,
            end_date,
            restore_date,
            days,
            hours,
            minutes,
        }
    }
}

/// Split `"[d:]h:m"` into (days, hours, minutes).
pub fn parse_repair_time(text: &str) -> (u32, u32, u32) {
    let segments: Vec<u32> = text
        .split(':')
        .map(|s| {
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse().unwrap_or(0)
            } else {
                0
            }
        })
        .collect();

    let n = segments.len();
    let minutes = segments[n - 1];
    let hours = if n >= 2 { segments[n - 2] } else { 0 };
    let days = if n >= 3 { segments[0] } else { 0 };
    (days, hours, minutes)
}

impl fmt::Display for CompletionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [(self.days, "d"), (self.hours, "h"), (self.minutes, "m")]
            .into_iter()
            .filter(|(v, _)| *v > 0)
            .map(|(v, unit)| format!("{}{}", v, unit))
            .collect();
        f.write_str(&parts.join(", "))
    }
}
