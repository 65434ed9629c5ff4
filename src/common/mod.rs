//! Common types and helpers shared across the crate.
//!
//! This module provides the unified error type together with the small text,
//! date, XML and filesystem utilities used by both the spreadsheet layer and
//! the work-order entity.

// Submodule declarations
pub mod dates;
pub mod error;
pub mod fs;
pub mod text;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
