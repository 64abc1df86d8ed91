//! Data series types

use crate::axis::AxisPosition;
use serde::Serialize;

/// Block of a sheet, 0-based with exclusive ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: u32,
    pub end_row_index: u32,
    pub start_column_index: u16,
    pub end_column_index: u16,
}

impl GridRange {
    /// One full column from the top of the sheet down to `end_row_index` (exclusive)
    pub fn column(sheet_id: i64, column: u16, end_row_index: u32) -> Self {
        Self {
            sheet_id,
            start_row_index: 0,
            end_row_index,
            start_column_index: column,
            end_column_index: column + 1,
        }
    }
}

/// Data series for a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSeries {
    /// Values (Y data)
    pub source: GridRange,
    pub target_axis: AxisPosition,
}

impl ChartSeries {
    /// Create a series plotted against the left axis
    pub fn new(source: GridRange) -> Self {
        Self {
            source,
            target_axis: AxisPosition::Left,
        }
    }

    /// Set the target axis
    pub fn with_axis(mut self, axis: AxisPosition) -> Self {
        self.target_axis = axis;
        self
    }
}
