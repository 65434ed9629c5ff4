//! Unified error types for the twois library.
//!
//! Field-level parsing never produces these errors: malformed cell content
//! always degrades to a default. Only genuine I/O and package failures do.
use thiserror::Error;

/// Main error type for twois operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Package part not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// Malformed cell reference such as `"7A"`
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    /// Snapshot (de)serialization error
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for twois operations.
pub type Result<T> = std::result::Result<T, Error>;
