//! Centralized error handling for the sweeper library.
//!
//! Every failure a pipeline run can surface is a variant of [`SweeperError`].
//! Variants that report a caller mistake carry the offending value (format
//! tag, column name) so the caller can display it and retry with corrected
//! inputs.
//!
//! The `?` operator works across the crate because the underlying error
//! types convert via `From`:
//!
//! ```no_run
//! use sweeper::error::Result;
//!
//! fn read_input(path: &str) -> Result<Vec<u8>> {
//!     // std::io::Error converts to SweeperError automatically
//!     let bytes = std::fs::read(path)?;
//!     Ok(bytes)
//! }
//! ```

use std::fmt;

/// Main error type for sweeper operations.
#[derive(Debug)]
pub enum SweeperError {
    /// A format tag outside the supported set; carries the offending tag.
    UnsupportedFormat(String),

    /// A requested column does not exist in the current table; carries the
    /// offending column name.
    UnknownColumn(String),

    /// Raw bytes could not be parsed as the declared format.
    MalformedInput(String),

    /// Errors raised by the DataFrame engine mid-pipeline.
    DataProcessing(String),

    /// I/O errors (reading input files, writing output buffers).
    Io(std::io::Error),
}

impl fmt::Display for SweeperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(tag) => write!(f, "Unsupported format: {tag}"),
            Self::UnknownColumn(name) => write!(f, "Unknown column: {name}"),
            Self::MalformedInput(msg) => write!(f, "Malformed input: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for SweeperError {}

impl From<std::io::Error> for SweeperError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for SweeperError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

// UI-shell callers want plain strings for display.
impl From<SweeperError> for String {
    fn from(err: SweeperError) -> Self {
        err.to_string()
    }
}

/// Result type alias for sweeper operations.
pub type Result<T> = std::result::Result<T, SweeperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SweeperError::UnsupportedFormat("json".to_owned());
        assert_eq!(err.to_string(), "Unsupported format: json");

        let err = SweeperError::UnknownColumn("price".to_owned());
        assert_eq!(err.to_string(), "Unknown column: price");
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = SweeperError::MalformedInput("not a csv".to_owned());
        let s: String = err.into();
        assert_eq!(s, "Malformed input: not a csv");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "data.csv");
        let err: SweeperError = io_err.into();
        assert!(matches!(err, SweeperError::Io(_)));
    }
}
