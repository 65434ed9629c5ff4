//! A1-style cell coordinates.

use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

/// A 1-based (column, row) cell position.
///
/// Ordering is row-major, which is also the order cells must appear in a
/// worksheet's `<sheetData>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    row: u32,
    column: u32,
}

impl CellRef {
    /// Create a reference from 1-based column and row numbers.
    pub const fn new(column: u32, row: u32) -> Self {
        Self { row, column }
    }

    /// Parse a reference such as `"B7"` at compile time.
    ///
    /// Panics (during const evaluation) on a malformed literal, so it is only
    /// meant for fixed layout constants. Use [`CellRef::parse`] for input.
    pub const fn from_a1(reference: &str) -> Self {
        let bytes = reference.as_bytes();
        let mut i = 0;
        let mut column = 0u32;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            column = column * 26 + (bytes[i].to_ascii_uppercase() - b'A' + 1) as u32;
            i += 1;
        }
        let mut row = 0u32;
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            row = row * 10 + (bytes[i] - b'0') as u32;
            i += 1;
        }
        if column == 0 || i == digits_start || i != bytes.len() || row == 0 {
            panic!("malformed cell reference literal");
        }
        Self { row, column }
    }

    /// Parse an A1 reference, ignoring `$` absolute markers.
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || Error::InvalidReference(reference.to_string());
        let cleaned: String = reference.chars().filter(|&c| c != '$').collect();
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = cleaned.split_at(split);

        if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        let column = letters_to_column(letters).ok_or_else(invalid)?;
        let row = digits.parse::<u32>().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self { row, column })
    }

    /// 1-based row number.
    #[inline]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// 1-based column number.
    #[inline]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// The same column, a different row.
    #[inline]
    pub const fn with_row(self, row: u32) -> Self {
        Self {
            row,
            column: self.column,
        }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_to_letters(self.column), self.row)
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert column number to Excel column letters (e.g., 1 -> "A", 26 -> "Z", 27 -> "AA").
pub fn column_to_letters(col: u32) -> String {
    let mut letters = String::new();
    let mut col = col;

    while col > 0 {
        col -= 1;
        let letter = ((col % 26) as u8 + b'A') as char;
        letters.insert(0, letter);
        col /= 26;
    }

    letters
}

/// Convert column letters to a 1-based column number; `None` on overflow.
pub fn letters_to_column(letters: &str) -> Option<u32> {
    letters.bytes().try_fold(0u32, |acc, b| {
        acc.checked_mul(26)?
            .checked_add((b.to_ascii_uppercase() - b'A' + 1) as u32)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(1), "A");
        assert_eq!(column_to_letters(26), "Z");
        assert_eq!(column_to_letters(27), "AA");
        assert_eq!(column_to_letters(11), "K");
    }

    #[test]
    fn test_parse_and_display() {
        let r = CellRef::parse("$K$109").unwrap();
        assert_eq!((r.column(), r.row()), (11, 109));
        assert_eq!(r.to_string(), "K109");
        assert_eq!("aa3".parse::<CellRef>().unwrap(), CellRef::new(27, 3));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CellRef::parse("7A").is_err());
        assert!(CellRef::parse("A").is_err());
        assert!(CellRef::parse("A0").is_err());
        assert!(CellRef::parse("").is_err());
    }

    #[test]
    fn test_const_literal() {
        const D7: CellRef = CellRef::from_a1("D7");
        assert_eq!(D7, CellRef::new(4, 7));
        assert_eq!(D7.with_row(8).to_string(), "D8");
    }

    #[test]
    fn test_row_major_order() {
        assert!(CellRef::from_a1("K1") < CellRef::from_a1("A2"));
    }
}
