//! Format validation for identifiers and free-text fields.
//!
//! The patterns are anchored: a value is valid only if the whole (trimmed)
//! string matches, so `"1234567891"` is not a work order number just because
//! it starts with six digits.

use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::text::{make_filepath_friendly, truncate_chars};

pub const MAX_TITLE: usize = 60;
pub const DEFAULT_TITLE: &str = "No title provided";
pub const MAX_DESCRIPTION: usize = 280;
pub const DEFAULT_DESCRIPTION: &str = "No description of task provided";
/// Placeholder for an optional reference that was not supplied.
pub const NOT_APPLICABLE: &str = "N/A";
/// NCR number of a record that needs one but has none yet.
pub const NCR_REQUIRED_MARKER: &str = "REQUIRED";
pub const DEFAULT_PRIORITY: u8 = 3;
pub const PRIORITY_RANGE: RangeInclusive<i64> = 1..=3;

static WO_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\d{6}(FG|VB|CS|EA|FD|SX|FY|CL|BL|TH)?(S|N|I)?$")
        .expect("Failed to compile work order number pattern")
});

static NCR_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^NCR\d{6}W$").expect("Failed to compile NCR pattern"));

static BUILDING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(b|bldg)\.?\s?(\d{2,5})\b").expect("Failed to compile building pattern")
});

static ROOM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(r|rm|room)\.?\s?(\d{1,3})(?:\b|,|\\|/)").expect("Failed to compile room pattern")
});

/// Six digits, then optionally a site code, then optionally a special code.
///
/// # Examples
///
/// ```
/// use twois::cells::validate::is_valid_wo_number;
/// assert!(is_valid_wo_number("123456VBS"));
/// assert!(is_valid_wo_number("123456i"));
/// assert!(!is_valid_wo_number("Pending-001"));
/// ```
pub fn is_valid_wo_number(value: &str) -> bool {
    WO_NUMBER_RE.is_match(value.trim())
}

/// `NCR` + six digits + `W`, or the literal `REQUIRED`; case-insensitive.
pub fn is_valid_ncr_number(value: &str) -> bool {
    let value = value.trim();
    NCR_NUMBER_RE.is_match(value) || value.eq_ignore_ascii_case(NCR_REQUIRED_MARKER)
}

/// Priority is one of 1, 2 or 3.
#[inline]
pub fn is_valid_priority(value: i64) -> bool {
    PRIORITY_RANGE.contains(&value)
}

/// Building number following `b`/`bldg` in free text, e.g. `"Bldg. 1768"`.
pub fn find_building(text: &str) -> Option<u32> {
    BUILDING_RE
        .captures(text)
        .and_then(|c| c.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

/// Room number following `r`/`rm`/`room` in free text, e.g. `"Rm. 6/7/8"`.
pub fn find_room(text: &str) -> Option<u32> {
    ROOM_RE
        .captures(text)
        .and_then(|c| c.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

/// Truncate to the title limit and strip filepath-hostile characters.
///
/// `None` when nothing usable is left.
pub fn clean_title(title: &str) -> Option<String> {
    let clean = make_filepath_friendly(truncate_chars(title.trim(), MAX_TITLE));
    let clean = clean.trim();
    (!clean.is_empty()).then(|| clean.to_string())
}

/// Like [`clean_title`], falling back to [`DEFAULT_TITLE`].
pub fn sanitize_title(title: &str) -> String {
    clean_title(title).unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Truncate to the description limit.
pub fn truncate_description(description: &str) -> String {
    truncate_chars(description, MAX_DESCRIPTION).to_string()
}

/// Render the room the way the sheet expects.
///
/// Room 6 of building 1768 spans three rooms and is written `"Rm. 6/7/8"`.
pub fn format_room(room: u32, building: u32) -> String {
    if room == 6 && building == 1768 {
        "Rm. 6/7/8".to_string()
    } else {
        format!("Rm. {}", room)
    }
}

/// Render the building the way the sheet expects.
pub fn format_building(building: u32) -> String {
    format!("B{}", building)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wo_numbers() {
        for valid in ["123456VBS", "123456", "123456FGI", "123456I", "123456vbs", "123456TH"] {
            assert!(is_valid_wo_number(valid), "{} should be valid", valid);
        }
        for invalid in ["1234567891", "123456A", "12345", "Pending-001", "Pending-001VBS", ""] {
            assert!(!is_valid_wo_number(invalid), "{} should be invalid", invalid);
        }
    }

    #[test]
    fn test_ncr_numbers() {
        assert!(is_valid_ncr_number("NCR123456W"));
        assert!(is_valid_ncr_number("ncr123456w"));
        assert!(is_valid_ncr_number("REQUIRED"));
        assert!(is_valid_ncr_number("required"));
        assert!(!is_valid_ncr_number("NCR12345W"));
        assert!(!is_valid_ncr_number("call Bob about it"));
        assert!(!is_valid_ncr_number("N/A"));
    }

    #[test]
    fn test_find_building() {
        assert_eq!(find_building("B1768"), Some(1768));
        assert_eq!(find_building("Bldg. 220"), Some(220));
        assert_eq!(find_building("bldg 99999"), Some(99999));
        assert_eq!(find_building("Rm. 6/7/8"), None);
        assert_eq!(find_building("B7"), None);
    }

    #[test]
    fn test_find_room() {
        assert_eq!(find_room("Rm. 6/7/8"), Some(6));
        assert_eq!(find_room("Room 101"), Some(101));
        assert_eq!(find_room("r12, east wall"), Some(12));
        assert_eq!(find_room("B1768"), None);
    }

    #[test]
    fn test_room_format_round_trip() {
        let text = format_room(6, 1768);
        assert_eq!(text, "Rm. 6/7/8");
        assert_eq!(find_room(&text), Some(6));
        assert_eq!(format_room(6, 220), "Rm. 6");
        assert_eq!(find_building(&format_building(1768)), Some(1768));
    }

    #[test]
    fn test_sanitize_title() {
        let long = format!("{}:{}", "x".repeat(59), "tail");
        let t = sanitize_title(&long);
        assert_eq!(t, "x".repeat(59));
        assert_eq!(sanitize_title("14-Day AV Updates (OPS GMM)"), "14-Day AV Updates (OPS GMM)");
        assert_eq!(sanitize_title("a/b\\c?d"), "abcd");
    }

    #[test]
    fn test_hostile_only_title_falls_back() {
        assert_eq!(clean_title("???"), None);
        assert_eq!(clean_title("  "), None);
        assert_eq!(sanitize_title("? * ?"), DEFAULT_TITLE);
        assert_eq!(sanitize_title(" : Scan : "), "Scan");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_priority_validity(p in -100i64..100) {
            prop_assert_eq!(is_valid_priority(p), (1..=3).contains(&p));
        }

        #[test]
        fn prop_formatted_building_is_found(b in 10u32..=99999) {
            prop_assert_eq!(find_building(&format_building(b)), Some(b));
        }

        #[test]
        fn prop_formatted_room_is_found(r in 1u32..=999, b in 10u32..=99999) {
            prop_assert_eq!(find_room(&format_room(r, b)), Some(r));
        }

        #[test]
        fn prop_title_never_exceeds_limit(s in "\\PC{0,120}") {
            let t = sanitize_title(&s);
            prop_assert!(t.chars().count() <= MAX_TITLE);
            prop_assert!(!t.contains(['#', '%', '/', '\\', ':', '?', '*']));
            prop_assert!(!t.trim().is_empty());
        }
    }
}
