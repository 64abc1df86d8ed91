//! Write operations

use crate::cell::FormulaCell;
use serde::{Serialize, Serializer};
use sigsheet_core::RangeDescriptor;

/// Orientation of the nested value lists of a [`WriteOperation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MajorDimension {
    /// Each inner list is one row
    Rows,
    /// Each inner list is one column
    Columns,
}

/// Values bound for one range of the sheet
///
/// Serializes as a Sheets API `ValueRange`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOperation {
    #[serde(serialize_with = "serialize_range")]
    pub range: RangeDescriptor,
    pub major_dimension: MajorDimension,
    pub values: Vec<Vec<FormulaCell>>,
}

impl WriteOperation {
    /// A single row of values
    pub fn row(range: RangeDescriptor, values: Vec<FormulaCell>) -> Self {
        Self {
            range,
            major_dimension: MajorDimension::Rows,
            values: vec![values],
        }
    }

    /// A single column of values
    pub fn column(range: RangeDescriptor, values: Vec<FormulaCell>) -> Self {
        Self {
            range,
            major_dimension: MajorDimension::Columns,
            values: vec![values],
        }
    }

    /// Total number of cells carried
    pub fn cell_count(&self) -> usize {
        self.values.iter().map(Vec::len).sum()
    }
}

fn serialize_range<S: Serializer>(range: &RangeDescriptor, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(range)
}
