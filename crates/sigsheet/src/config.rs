//! Engine configuration
//!
//! Everything that depends on a particular spreadsheet lives here: anchors,
//! sheet names and ids, and where summaries go. Settings are read from TOML;
//! omitted keys keep their defaults.
//!
//! ```toml
//! first_data_row = 2
//!
//! [temporal]
//! midnight_hour = 0
//! week_start = "Mon"
//!
//! [temporal.hourly]
//! reference = "2024-04-15T03:00:00"
//! reference_row = 18
//! unit = "hour"
//!
//! [hourly]
//! sheet_name = "Hourly"
//! sheet_id = 123
//! chart_id = 456
//!
//! [[hourly.summaries]]
//! range = "Chart!F28:F31"
//! offsets = { doubling = { base = 6 } }
//! ```

use crate::error::{BoxError, Error, Result};
use serde::{Deserialize, Serialize};
use sigsheet_core::{ColumnBounds, TemporalConfig};
use sigsheet_formula::OffsetPolicy;
use std::path::Path;

/// Complete configuration of the update engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub temporal: TemporalConfig,
    pub columns: ColumnBounds,
    /// First 1-based row holding data (row 1 is the header)
    pub first_data_row: i64,
    pub hourly: HourlyConfig,
    pub daily: DailyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            temporal: TemporalConfig::default(),
            columns: ColumnBounds::default(),
            first_data_row: 2,
            hourly: HourlyConfig::default(),
            daily: DailyConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::ConfigFile {
            path: "<inline>".into(),
            source: Box::new(e),
        })
    }

    /// Read and parse a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_error = |source: BoxError| Error::ConfigFile {
            path: path.display().to_string(),
            source,
        };
        let text = std::fs::read_to_string(path).map_err(|e| file_error(Box::new(e)))?;
        toml::from_str(&text).map_err(|e| file_error(Box::new(e)))
    }
}

/// Hourly series sheet
///
/// Columns: A timestamp, B signature count, C signature goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyConfig {
    pub sheet_name: String,
    /// Required together with `chart_id`
    pub sheet_id: Option<i64>,
    /// Chart plotting the hourly series; no chart update when unset
    pub chart_id: Option<i64>,
    /// `strftime` format of the timestamp column
    pub timestamp_format: String,
    /// Rolling summaries over the signature column
    pub summaries: Vec<RollingSummaryConfig>,
}

impl Default for HourlyConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Hourly".into(),
            sheet_id: None,
            chart_id: None,
            timestamp_format: "%d-%m-%Y %H:%M:%S".into(),
            summaries: Vec::new(),
        }
    }
}

/// Daily series sheet
///
/// Columns: A date, B signature count, C daily increase, D change of the
/// daily increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyConfig {
    pub sheet_name: String,
    /// Required together with `chart_id`
    pub sheet_id: Option<i64>,
    /// Chart plotting the daily series; no chart update when unset
    pub chart_id: Option<i64>,
    /// Columns plotted by the daily chart, against the dates in column A
    pub chart_series: Vec<String>,
    /// `strftime` format of the date column
    pub date_format: String,
    /// Rolling summaries over the signature column, in days
    pub sevenly: Vec<RollingSummaryConfig>,
    pub summary: Option<DailySummaryConfig>,
    pub weekly: Option<WeeklySummaryConfig>,
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Daily".into(),
            sheet_id: None,
            chart_id: None,
            chart_series: vec!["C".into()],
            date_format: "%d-%m-%Y".into(),
            sevenly: Vec::new(),
            summary: None,
            weekly: None,
        }
    }
}

/// One rolling summary destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingSummaryConfig {
    /// Single-column destination, one cell per offset
    pub range: String,
    pub offsets: OffsetPolicy,
    /// Also fill the column to the right with window-over-window trends
    #[serde(default)]
    pub trend: bool,
}

/// Mirror of the latest days of the daily sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummaryConfig {
    /// One row per day, one column per source column
    pub range: String,
    #[serde(default = "default_daily_summary_columns")]
    pub columns: Vec<String>,
    /// Also write, right of the first row, the change of the oldest day
    /// against the day before it (first column only)
    #[serde(default = "default_daily_trend")]
    pub trend: bool,
}

fn default_daily_trend() -> bool {
    true
}

fn default_daily_summary_columns() -> Vec<String> {
    vec!["C".into()]
}

/// Week-aligned seven-day sums
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummaryConfig {
    /// One row per week; a second column receives week-over-week changes
    pub range: String,
    /// Daily sheet column that is summed
    #[serde(default = "default_weekly_column")]
    pub column: String,
}

fn default_weekly_column() -> String {
    "C".into()
}
