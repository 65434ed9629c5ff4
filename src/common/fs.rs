//! Filesystem helpers with the "best effort" semantics the record lifecycle
//! relies on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::dates::{monday_of, month_day};
use super::error::Result;

/// Rename `src` to `dest` only when `src` exists and `dest` does not.
///
/// Returns `Ok(true)` when a rename happened. Anything else is a silent no-op.
pub fn safe_rename(src: &Path, dest: &Path) -> Result<bool> {
    if src == dest || !src.exists() || dest.exists() {
        return Ok(false);
    }
    fs::rename(src, dest)?;
    debug!(from = %src.display(), to = %dest.display(), "renamed");
    Ok(true)
}

/// Remove a file, treating "not found" as success.
///
/// Returns `Ok(true)` if a file was actually removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed");
            Ok(true)
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Create (if needed) `<base>/<year>/Week of MM-DD` for the week containing
/// `date`, where the week starts on Monday. Returns the week directory.
pub fn create_dated_directories(base: &Path, date: NaiveDate) -> Result<PathBuf> {
    let monday = monday_of(date);
    let dir = base
        .join(date.year().to_string())
        .join(format!("Week of {}", month_day(monday)));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Lower-cased extension of `path`, if any.
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_safe_rename_moves_file() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.twois");
        let b = dir.path().join("b.twois");
        fs::write(&a, b"x").unwrap();

        assert!(safe_rename(&a, &b).unwrap());
        assert!(!a.exists());
        assert!(b.exists());
    }

    #[test]
    fn test_safe_rename_never_overwrites() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.twois");
        let b = dir.path().join("b.twois");
        fs::write(&a, b"new").unwrap();
        fs::write(&b, b"old").unwrap();

        assert!(!safe_rename(&a, &b).unwrap());
        assert_eq!(fs::read(&b).unwrap(), b"old");
        assert!(a.exists());
    }

    #[test]
    fn test_safe_rename_missing_source() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("missing");
        let b = dir.path().join("b");
        assert!(!safe_rename(&a, &b).unwrap());
        assert!(!b.exists());
    }

    #[test]
    fn test_remove_if_exists() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.xlsx");
        fs::write(&a, b"x").unwrap();
        assert!(remove_if_exists(&a).unwrap());
        assert!(!remove_if_exists(&a).unwrap());
    }

    #[test]
    fn test_create_dated_directories() {
        let dir = tempdir().unwrap();
        // Thursday 2024-08-08 belongs to the week of Monday 08-05
        let date = NaiveDate::from_ymd_opt(2024, 8, 8).unwrap();
        let week = create_dated_directories(dir.path(), date).unwrap();
        assert_eq!(week, dir.path().join("2024").join("Week of 08-05"));
        assert!(week.is_dir());

        // Idempotent
        assert_eq!(create_dated_directories(dir.path(), date).unwrap(), week);
    }

    #[test]
    fn test_extension_lower() {
        assert_eq!(extension_lower(Path::new("x.XLSX")).as_deref(), Some("xlsx"));
        assert_eq!(extension_lower(Path::new("noext")), None);
    }
}
