//! # sigsheet-chart
//!
//! Chart data-range updates for sigsheet.
//!
//! Only the ranges a chart plots are touched; styling stays whatever the
//! sheet already has.

mod axis;
mod chart;
mod error;
mod series;

pub use axis::AxisPosition;
pub use chart::{ChartType, ChartUpdate, UpdateChartSpecRequest};
pub use error::{ChartError, ChartResult};
pub use series::{ChartSeries, GridRange};
