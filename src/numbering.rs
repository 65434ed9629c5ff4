//! Placeholder numbers for work orders that have not been approved yet.
//!
//! A pending record is named `Pending-NNN` until planning and control assign
//! it a real six-digit number. The allocator fills gaps: with
//! `Pending-001..=004` and `Pending-006` on disk the next one is
//! `Pending-005`.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::common::Result;

/// Prefix of every placeholder number.
pub const PENDING_PREFIX: &str = "Pending-";
/// Extension of record snapshot files.
pub const SNAPSHOT_EXTENSION: &str = "twois";
/// Extension of record spreadsheet files.
pub const SPREADSHEET_EXTENSION: &str = "xlsx";

/// Number embedded in a snapshot filename such as `"Pending-004.twois"`.
pub fn pending_index(file_name: &str) -> Option<u32> {
    let stem = file_name.strip_suffix(SNAPSHOT_EXTENSION)?.strip_suffix('.')?;
    let digits = stem.strip_prefix(PENDING_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Smallest positive integer not in `used`.
pub fn lowest_free(used: &BTreeSet<u32>) -> u32 {
    (1..=u32::MAX).find(|n| !used.contains(n)).unwrap_or(u32::MAX)
}

/// `4` becomes `"Pending-004"`; wider numbers keep all their digits.
pub fn format_pending(n: u32) -> String {
    format!("{}{:03}", PENDING_PREFIX, n)
}

/// Check if `number` is a placeholder rather than an assigned number.
#[inline]
pub fn is_pending(number: &str) -> bool {
    number.starts_with(PENDING_PREFIX)
}

/// Placeholder numbers currently used by snapshots in `dir`.
///
/// A missing directory holds no records.
pub fn used_pending_numbers(dir: &Path) -> Result<BTreeSet<u32>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(e.into()),
    };

    let mut used = BTreeSet::new();
    for entry in entries {
        let entry = entry?;
        if let Some(n) = entry.file_name().to_str().and_then(pending_index) {
            used.insert(n);
        }
    }
    Ok(used)
}

/// Allocate the lowest free placeholder number among the snapshots in `dir`.
pub fn next_pending_number(dir: &Path) -> Result<String> {
    let used = used_pending_numbers(dir)?;
    let number = format_pending(lowest_free(&used));
    debug!(dir = %dir.display(), in_use = used.len(), %number, "allocated pending number");
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_pending_index() {
        assert_eq!(pending_index("Pending-004.twois"), Some(4));
        assert_eq!(pending_index("Pending-1234.twois"), Some(1234));
        assert_eq!(pending_index("Pending-004 - AV Updates.xlsx"), None);
        assert_eq!(pending_index("123456VBS.twois"), None);
        assert_eq!(pending_index("Pending-.twois"), None);
        assert_eq!(pending_index("Pending-abc.twois"), None);
    }

    #[test]
    fn test_format_pending() {
        assert_eq!(format_pending(1), "Pending-001");
        assert_eq!(format_pending(42), "Pending-042");
        assert_eq!(format_pending(1000), "Pending-1000");
        assert!(is_pending("Pending-001"));
        assert!(!is_pending("123456"));
    }

    #[test]
    fn test_fills_the_gap() {
        let dir = tempdir().unwrap();
        for n in [1, 2, 3, 4, 6, 7, 8] {
            touch(dir.path(), &format!("{}.twois", format_pending(n)));
            touch(dir.path(), &format!("{} - Title {}.xlsx", format_pending(n), n));
        }
        touch(dir.path(), "123456VBS.twois");
        assert_eq!(next_pending_number(dir.path()).unwrap(), "Pending-005");
    }

    #[test]
    fn test_empty_and_missing_dir() {
        let dir = tempdir().unwrap();
        assert_eq!(next_pending_number(dir.path()).unwrap(), "Pending-001");
        assert_eq!(next_pending_number(&dir.path().join("missing")).unwrap(), "Pending-001");
    }

    #[test]
    fn test_full_run_goes_past_the_end() {
        let dir = tempdir().unwrap();
        for n in 1..=3 {
            touch(dir.path(), &format!("{}.twois", format_pending(n)));
        }
        assert_eq!(next_pending_number(dir.path()).unwrap(), "Pending-004");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_lowest_free_is_smallest_unused(used in proptest::collection::btree_set(1u32..50, 0..40)) {
            let n = lowest_free(&used);
            prop_assert!(n >= 1);
            prop_assert!(!used.contains(&n));
            prop_assert!((1..n).all(|k| used.contains(&k)));
        }

        #[test]
        fn prop_format_round_trips(n in 1u32..100_000) {
            let name = format!("{}.{}", format_pending(n), SNAPSHOT_EXTENSION);
            prop_assert_eq!(pending_index(&name), Some(n));
        }
    }
}
