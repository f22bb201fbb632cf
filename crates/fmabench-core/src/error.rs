//! Error types for fmabench-core.
//!
//! The numeric kernels themselves are total. Errors only arise when state is
//! constructed, when a row id is looked up, or when configuration is loaded.

use thiserror::Error;

/// Errors raised while building kernel state, resolving names, or loading config.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Vectors or rows participating in one operation differ in length.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length every participant must share.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A row id outside `[0, rows)`.
    #[error("Row {row} out of range for table with {rows} rows")]
    RowOutOfRange {
        /// Requested row id.
        row: usize,
        /// Number of rows in the table.
        rows: usize,
    },

    /// An embedding table with no rows (random row selection is undefined).
    #[error("Embedding table must have at least one row")]
    EmptyTable,

    /// No multiply-add operation is registered under this name.
    #[error("Unknown multiply-add operation: {0}")]
    UnknownOperation(String),

    /// A strategy or benchmark case name that does not exist.
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration was loaded but holds unusable values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for fmabench-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::RowOutOfRange { row: 9, rows: 4 };
        assert_eq!(err.to_string(), "Row 9 out of range for table with 4 rows");

        let err = Error::DimensionMismatch {
            expected: 256,
            actual: 255,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 256, got 255");
    }

    #[test]
    fn test_error_from_figment() {
        let err: Error = figment::Error::from("missing field `rows`".to_string()).into();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("rows")));
    }
}
