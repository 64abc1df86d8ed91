//! Chart error types

use thiserror::Error;

/// Result type for chart operations
pub type ChartResult<T> = std::result::Result<T, ChartError>;

/// Errors that can occur while building chart updates
#[derive(Debug, Error)]
pub enum ChartError {
    /// The series ends before its first data row
    #[error("Chart {chart_id}: end row {end_row} leaves no data rows")]
    EmptyRange { chart_id: i64, end_row: i64 },

    /// A chart needs at least one series
    #[error("Chart {0} has no series columns")]
    NoSeries(i64),

    /// A chart id was given without the id of the sheet it plots
    #[error("Chart {0} has no sheet id")]
    MissingSheetId(i64),
}
