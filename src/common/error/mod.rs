//! Unified error types for the twois library.
//!
//! This module provides a single error type covering spreadsheet package,
//! snapshot and configuration failures, presenting a consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
