//! The work order sheet layout and everything that reads it.
//!
//! - [`layout`]: fixed cell positions
//! - [`validate`]: format checks for numbers, titles and locations
//! - [`extract`]: tolerant field extraction with defaults
//! - [`classify`]: layered [`FileStatus`](crate::model::FileStatus) checks

pub mod classify;
pub mod extract;
pub mod layout;
pub mod validate;

pub use classify::{approved_file_status, input_file_status};
pub use extract::Parsed;
