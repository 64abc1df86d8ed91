//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while generating formulas
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Range or column error from the core crate
    #[error(transparent)]
    Core(#[from] sigsheet_core::Error),

    /// Offset list that cannot drive a rolling window
    #[error("Invalid offsets {offsets:?}: {reason}")]
    InvalidOffsets { offsets: Vec<i64>, reason: String },

    /// Destination range does not have the shape the summary needs
    #[error("Range '{range}' has the wrong shape: {reason}")]
    ShapeMismatch { range: String, reason: String },
}

impl FormulaError {
    pub(crate) fn shape<R: ToString, S: Into<String>>(range: &R, reason: S) -> Self {
        FormulaError::ShapeMismatch {
            range: range.to_string(),
            reason: reason.into(),
        }
    }
}
