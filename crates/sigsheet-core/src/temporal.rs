//! Time-to-row mapping for the hourly and daily series
//!
//! Each series is an append-only block of rows whose zero point is an
//! [`EpochAnchor`]. Rows are derived from the wall clock alone, so every run
//! recomputes them without any persisted counter.
//!
//! Hourly rows are counted in elapsed hours between two instants, which keeps
//! exactly one row per hour across daylight-saving changes. Daily rows are
//! counted in calendar days: the local date of `now` is taken as a UTC
//! midnight and compared with the anchor date, so a 23 or 25 hour day still
//! advances the series by exactly one row.

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Granularity of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesUnit {
    Hour,
    Day,
}

impl SeriesUnit {
    fn name(self) -> &'static str {
        match self {
            SeriesUnit::Hour => "hourly",
            SeriesUnit::Day => "daily",
        }
    }
}

/// Fixed (instant, row) pair defining the zero point of a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochAnchor {
    /// Reference instant, in the local time of the series' zone
    pub reference: NaiveDateTime,
    /// Row that corresponds exactly to `reference`
    pub reference_row: i64,
    pub unit: SeriesUnit,
}

impl EpochAnchor {
    /// Hourly series: 2024-04-15 03:00 local time is row 18
    pub fn default_hourly() -> Self {
        Self {
            reference: NaiveDate::from_ymd_opt(2024, 4, 15)
                .and_then(|d| d.and_hms_opt(3, 0, 0))
                .unwrap_or_default(),
            reference_row: 18,
            unit: SeriesUnit::Hour,
        }
    }

    /// Daily series: 2024-03-28 is row 2 (row 1 holds the header)
    pub fn default_daily() -> Self {
        Self {
            reference: NaiveDate::from_ymd_opt(2024, 3, 28)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            reference_row: 2,
            unit: SeriesUnit::Day,
        }
    }
}

/// Calendar conventions of a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    pub hourly: EpochAnchor,
    pub daily: EpochAnchor,
    /// Local hour at which the daily series rolls over (default: 0)
    pub midnight_hour: u32,
    /// First day of the week for weekly summaries (default: Monday)
    pub week_start: Weekday,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            hourly: EpochAnchor::default_hourly(),
            daily: EpochAnchor::default_daily(),
            midnight_hour: 0,
            week_start: Weekday::Mon,
        }
    }
}

#[derive(Debug, Clone)]
struct ResolvedAnchor<Tz: TimeZone> {
    instant: DateTime<Tz>,
    date: NaiveDate,
    row: i64,
    unit: SeriesUnit,
}

impl<Tz: TimeZone> ResolvedAnchor<Tz> {
    fn resolve(anchor: &EpochAnchor, tz: &Tz) -> Result<Self> {
        let instant = tz
            .from_local_datetime(&anchor.reference)
            .single()
            .ok_or_else(|| Error::InvalidAnchor {
                anchor: anchor.reference.to_string(),
                reason: "local time is ambiguous or does not exist in this zone".into(),
            })?;
        Ok(Self {
            instant,
            date: anchor.reference.date(),
            row: anchor.reference_row,
            unit: anchor.unit,
        })
    }

    fn row_at(&self, now: &DateTime<Tz>) -> Result<i64> {
        let elapsed = match self.unit {
            SeriesUnit::Hour => now
                .clone()
                .signed_duration_since(self.instant.clone())
                .num_seconds()
                .div_euclid(3600),
            SeriesUnit::Day => (now.date_naive() - self.date).num_days(),
        };
        let row = self.row + elapsed;
        if row < 1 {
            return Err(Error::RowBeforeSeries {
                series: self.unit.name(),
                instant: now.naive_local().to_string(),
                row,
            });
        }
        Ok(row)
    }
}

/// Maps instants to series rows
///
/// `now` must be expressed in the same zone the indexer was built for; no
/// conversion is applied to it.
#[derive(Debug, Clone)]
pub struct TemporalIndexer<Tz: TimeZone> {
    hourly: ResolvedAnchor<Tz>,
    daily: ResolvedAnchor<Tz>,
    midnight_hour: u32,
    week_start: Weekday,
}

impl<Tz: TimeZone> TemporalIndexer<Tz> {
    /// Resolve the configured anchors in `tz`
    pub fn new(config: &TemporalConfig, tz: &Tz) -> Result<Self> {
        if config.midnight_hour > 23 {
            return Err(Error::InvalidAnchor {
                anchor: format!("midnight_hour = {}", config.midnight_hour),
                reason: "hour must be between 0 and 23".into(),
            });
        }
        let indexer = Self {
            hourly: ResolvedAnchor::resolve(&config.hourly, tz)?,
            daily: ResolvedAnchor::resolve(&config.daily, tz)?,
            midnight_hour: config.midnight_hour,
            week_start: config.week_start,
        };
        trace!(
            hourly = %config.hourly.reference,
            daily = %config.daily.reference,
            midnight_hour = config.midnight_hour,
            "resolved epoch anchors"
        );
        Ok(indexer)
    }

    /// Row of the hourly series for `now`
    pub fn hourly_row(&self, now: &DateTime<Tz>) -> Result<i64> {
        self.hourly.row_at(now)
    }

    /// Row of the daily series for `now`
    pub fn daily_row(&self, now: &DateTime<Tz>) -> Result<i64> {
        self.daily.row_at(now)
    }

    /// Days elapsed since the start of the week, in `0..=6`
    pub fn weekday_index(&self, now: &DateTime<Tz>) -> u32 {
        let day = now.weekday().num_days_from_monday();
        let start = self.week_start.num_days_from_monday();
        (7 + day - start) % 7
    }

    /// Whether `now` falls in the hour that closes a day of the daily series
    pub fn is_boundary_hour(&self, now: &DateTime<Tz>) -> bool {
        now.hour() == self.midnight_hour
    }
}
