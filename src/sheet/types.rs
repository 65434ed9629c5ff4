//! Cell value type shared by the spreadsheet reader, writer and extractors.

use std::fmt;

use chrono::NaiveDate;

use crate::common::dates::{date_to_string, serial_to_date};

/// Types of data that can be stored in a cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell
    #[default]
    Empty,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// String value
    String(String),
    /// Date value (stored as an Excel serial number)
    DateTime(f64),
    /// Error value such as `#REF!`
    Error(String),
}

impl CellValue {
    /// `true` for [`CellValue::Empty`] and for strings that are empty.
    ///
    /// Sheets routinely carry `""` placeholders, which read the same as a
    /// cell that was never written.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the value, parsing strings when possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) | CellValue::DateTime(f) => Some(*f),
            CellValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Integer view of the value.
    ///
    /// Floats are accepted only when they carry no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            CellValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Date view of a serial-number cell.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::DateTime(f) | CellValue::Float(f) => serial_to_date(*f),
            CellValue::Int(i) => serial_to_date(*i as f64),
            _ => None,
        }
    }

    /// Render the value the way it would be read back as text.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::String(s) | CellValue::Error(s) => f.write_str(s),
            CellValue::DateTime(v) => match serial_to_date(*v) {
                Some(date) => f.write_str(&date_to_string(date)),
                None => write!(f, "{}", v),
            },
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(value)
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}
