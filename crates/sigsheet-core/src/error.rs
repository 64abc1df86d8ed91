//! Error types for sigsheet-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sigsheet-core
///
/// Every variant carries the offending input so a failed run can be
/// diagnosed from the error alone.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid range descriptor
    #[error("Invalid range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    /// Column cannot be incremented within the configured bounds
    #[error("Column '{column}' out of range")]
    ColumnOutOfRange { column: String },

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u16),

    /// Epoch anchor cannot be resolved in the requested time zone
    #[error("Invalid epoch anchor {anchor}: {reason}")]
    InvalidAnchor { anchor: String, reason: String },

    /// The computed row lies before the first row of the series
    #[error("Row {row} computed for {instant} lies before the start of the {series} series")]
    RowBeforeSeries {
        series: &'static str,
        instant: String,
        row: i64,
    },
}

impl Error {
    /// Create an [`Error::InvalidRange`] for `range`
    pub fn invalid_range<R: Into<String>, S: Into<String>>(range: R, reason: S) -> Self {
        Error::InvalidRange {
            range: range.into(),
            reason: reason.into(),
        }
    }
}
