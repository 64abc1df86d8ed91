//! # sigsheet
//!
//! Tracks a petition's signature count as time series in a spreadsheet.
//!
//! Each run takes the current instant and the petition's latest figures and
//! produces one [`UpdateBatch`]: the row of the hourly series for this hour,
//! rolling summaries over that series, and, in the first hour of a day, the
//! new row of the daily series with its summaries. Rows are placed purely by
//! wall-clock arithmetic against fixed anchors; nothing is read back from the
//! sheet.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{FixedOffset, TimeZone};
//! use sigsheet::prelude::*;
//!
//! let tz = FixedOffset::east_opt(2 * 3600).unwrap();
//! let mut config = EngineConfig::default();
//! config.hourly.sheet_id = Some(0);
//! config.hourly.chart_id = Some(7);
//!
//! let assembler = UpdateBatchAssembler::new(&config, &tz).unwrap();
//! let now = tz.with_ymd_and_hms(2024, 4, 20, 14, 0, 0).unwrap();
//! let batch = assembler.assemble(&now, Metrics::new(12345, 20000)).unwrap();
//!
//! assert_eq!(batch.writes[0].range.to_string(), "Hourly!A149:C149");
//! assert_eq!(batch.charts[0].end_row_index(), 149);
//! ```

pub mod batch;
pub mod capability;
pub mod config;
pub mod error;
pub mod prelude;
pub mod updater;

pub use batch::{UpdateBatch, UpdateBatchAssembler};
pub use capability::{Metrics, MetricsFetcher, SheetStore};
pub use config::{
    DailyConfig, DailySummaryConfig, EngineConfig, HourlyConfig, RollingSummaryConfig,
    WeeklySummaryConfig,
};
pub use error::{BoxError, ConfigError, Error, Result};
pub use updater::Updater;

// Re-export core types
pub use sigsheet_core::{
    CellAddress, ColumnArithmetic, ColumnBounds, EpochAnchor, RangeDescriptor, SeriesUnit,
    TemporalConfig, TemporalIndexer,
};

// Re-export formula types
pub use sigsheet_formula::{
    FormulaCell, FormulaExpr, MajorDimension, OffsetPolicy, RollingAggregateGenerator,
    SeriesColumn, WriteOperation,
};

// Re-export chart types
pub use sigsheet_chart::{AxisPosition, ChartSeries, ChartType, ChartUpdate, GridRange};
