//! Small string helpers used when turning record fields into cell text and
//! filenames.

use phf::{Set, phf_set};

/// Characters that are never allowed in a title, since the title is part of
/// the spreadsheet filename.
static FILEPATH_HOSTILE: Set<char> = phf_set! {
    '#', '%', '{', '}', '\\', '<', '>', '*', '?', '/',
    '$', '!', '\'', '"', ':', '@', '+', '`', '|', '=', '^',
};

/// Remove every filepath-hostile character from `value`.
///
/// # Examples
///
/// ```
/// use twois::common::text::make_filepath_friendly;
/// assert_eq!(make_filepath_friendly("AV: 50% done?"), "AV 50 done");
/// ```
pub fn make_filepath_friendly(value: &str) -> String {
    value
        .chars()
        .filter(|c| !FILEPATH_HOSTILE.contains(c))
        .collect()
}

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Derive upper-case initials from a full name, stopping at the first
/// character that is neither alphanumeric nor a space.
///
/// `"Brian Cobb"` becomes `"BC"`; `"Jose Lopez (SA)"` becomes `"JL"`.
pub fn name_to_initials(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut initials = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if i == 0 && ch != ' ' {
            initials.extend(ch.to_uppercase());
        }
        if ch == ' '
            && let Some(next) = chars.get(i + 1)
            && next.is_alphabetic()
        {
            initials.extend(next.to_uppercase());
        }
        if !ch.is_alphanumeric() && ch != ' ' {
            break;
        }
    }

    initials
}

/// `true` becomes `"Yes"`, `false` becomes `"No"`.
#[inline]
pub fn bool_to_yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Case-insensitive `"yes"` test; everything else is `false`.
#[inline]
pub fn yes_no_to_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filepath_friendly_strips_every_hostile_char() {
        let hostile = "#%{}\\<>*?/$!'\":@+`|=^";
        assert_eq!(make_filepath_friendly(hostile), "");
        assert_eq!(
            make_filepath_friendly("14-Day AV Updates (OPS GMM)"),
            "14-Day AV Updates (OPS GMM)"
        );
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 60), "short");
    }

    #[test]
    fn test_name_to_initials() {
        assert_eq!(name_to_initials("Brian Cobb"), "BC");
        assert_eq!(name_to_initials("fiorela silva hurst"), "FSH");
        assert_eq!(name_to_initials("Jose Lopez (SA)"), "JL");
        assert_eq!(name_to_initials(""), "");
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(bool_to_yes_no(true), "Yes");
        assert!(yes_no_to_bool("YES"));
        assert!(yes_no_to_bool("yes "));
        assert!(!yes_no_to_bool("BAAAAAD companyyyyy"));
    }
}
