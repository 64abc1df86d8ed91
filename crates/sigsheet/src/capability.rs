//! External collaborators of an update run
//!
//! The engine never talks to a network itself. It asks a [`MetricsFetcher`]
//! for the current numbers and hands the finished batch to a [`SheetStore`].

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sigsheet_chart::ChartUpdate;
use sigsheet_formula::WriteOperation;

/// Latest figures of a petition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub signature_count: i64,
    pub signature_goal: i64,
}

impl Metrics {
    pub fn new(signature_count: i64, signature_goal: i64) -> Self {
        Self {
            signature_count,
            signature_goal,
        }
    }
}

/// Source of petition metrics
pub trait MetricsFetcher {
    /// Fetch the current signature count and goal of `petition`
    fn fetch(&self, petition: &str) -> Result<Metrics>;
}

/// Destination of a batch
///
/// Each call is applied atomically by the store; a failure aborts the run.
pub trait SheetStore {
    /// Apply all value writes of a batch in one call
    fn write_values(&self, writes: &[WriteOperation]) -> Result<()>;

    /// Point charts at their new data ranges
    fn update_charts(&self, charts: &[ChartUpdate]) -> Result<()>;
}

impl<T: MetricsFetcher + ?Sized> MetricsFetcher for &T {
    fn fetch(&self, petition: &str) -> Result<Metrics> {
        (**self).fetch(petition)
    }
}

impl<T: SheetStore + ?Sized> SheetStore for &T {
    fn write_values(&self, writes: &[WriteOperation]) -> Result<()> {
        (**self).write_values(writes)
    }

    fn update_charts(&self, charts: &[ChartUpdate]) -> Result<()> {
        (**self).update_charts(charts)
    }
}

impl<T: MetricsFetcher + ?Sized> MetricsFetcher for Box<T> {
    fn fetch(&self, petition: &str) -> Result<Metrics> {
        (**self).fetch(petition)
    }
}

impl<T: SheetStore + ?Sized> SheetStore for Box<T> {
    fn write_values(&self, writes: &[WriteOperation]) -> Result<()> {
        (**self).write_values(writes)
    }

    fn update_charts(&self, charts: &[ChartUpdate]) -> Result<()> {
        (**self).update_charts(charts)
    }
}
