//! Error types for the snpsig CLI
//!
//! Run-level errors abort the whole annotation run. Per-record fetch
//! problems never surface here: the annotation client recovers them into
//! the result text so one bad variant cannot sink the report (see
//! [`crate::client`]).

use thiserror::Error;

/// Result type alias for annotation operations
pub type Result<T> = std::result::Result<T, AnnotateError>;

/// Errors that abort an annotation run
///
/// All errors are designed to be user-facing with clear messages and suggestions.
#[derive(Error, Debug)]
pub enum AnnotateError {
    /// Input file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}. Check your proxy and TLS environment settings.")]
    Http(#[from] reqwest::Error),

    /// Report could not be written
    #[error("Failed to write report: {0}. Check that the output path is writable.")]
    Report(#[from] csv::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your command-line flags and SNPSIG_* environment variables.")]
    Config(String),
}
