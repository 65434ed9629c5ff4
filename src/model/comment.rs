//! Log comments appended to a work order.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::dates::date_to_string;

/// First comment row.
pub const FIRST_COMMENT_ROW: u32 = 86;
/// Last comment row.
pub const LAST_COMMENT_ROW: u32 = 109;
/// Number of comments one sheet can hold.
pub const MAX_COMMENTS: usize = (LAST_COMMENT_ROW - FIRST_COMMENT_ROW + 1) as usize;

/// A dated, attributed comment occupying one sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogComment {
    /// The comment itself
    pub text: String,
    /// Who left it
    pub author: String,
    /// When it was left
    pub date: NaiveDate,
    row: u32,
}

impl LogComment {
    /// Create a comment for a list currently holding `list_size` entries.
    pub fn new(text: impl Into<String>, author: impl Into<String>, date: NaiveDate, list_size: usize) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            date,
            row: clamp_row(FIRST_COMMENT_ROW.saturating_add(list_size as u32)),
        }
    }

    /// Sheet row of this comment.
    #[inline]
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Move the comment, clamped to the comment block.
    pub fn set_row(&mut self, row: u32) {
        self.row = clamp_row(row);
    }
}

fn clamp_row(row: u32) -> u32 {
    row.clamp(FIRST_COMMENT_ROW, LAST_COMMENT_ROW)
}

impl fmt::Display for LogComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", date_to_string(self.date), self.text)
    }
}
