//! Assembly of one invocation's writes and chart updates
//!
//! All configured ranges are parsed once, when the assembler is built. A
//! batch is then either produced whole or not at all: any failure while
//! assembling returns an error and nothing else.

use crate::capability::Metrics;
use crate::config::{EngineConfig, RollingSummaryConfig};
use crate::error::{configuration, Result};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use sigsheet_chart::{ChartError, ChartType, ChartUpdate};
use sigsheet_core::{CellAddress, ColumnArithmetic, RangeDescriptor, TemporalIndexer};
use sigsheet_formula::{
    FormulaCell, FormulaError, FormulaExpr, OffsetPolicy, RollingAggregateGenerator, SeriesColumn,
    WriteOperation,
};
use std::fmt;
use tracing::debug;

/// Hourly sheet: timestamp
const HOURLY_TIMESTAMP_COL: u16 = 0;
/// Hourly sheet: signature count
const HOURLY_SIGNATURE_COL: u16 = 1;
/// Hourly sheet: signature goal
const HOURLY_GOAL_COL: u16 = 2;

/// Daily sheet: date
const DAILY_DATE_COL: u16 = 0;
/// Daily sheet: signature count
const DAILY_SIGNATURE_COL: u16 = 1;
/// Daily sheet: increase over the day
const DAILY_DELTA_COL: u16 = 2;
/// Daily sheet: change of the increase against the previous day
const DAILY_TREND_COL: u16 = 3;

/// Everything one invocation hands to the sheet store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateBatch {
    pub hourly_row: i64,
    pub daily_row: i64,
    /// Whether this run closed a day of the daily series
    pub day_boundary: bool,
    pub writes: Vec<WriteOperation>,
    pub charts: Vec<ChartUpdate>,
}

impl UpdateBatch {
    /// Total number of cells written
    pub fn cell_count(&self) -> usize {
        self.writes.iter().map(WriteOperation::cell_count).sum()
    }
}

#[derive(Debug, Clone)]
struct RollingTarget {
    context: String,
    range: RangeDescriptor,
    offsets: OffsetPolicy,
    trend: bool,
}

impl RollingTarget {
    fn prepare(kind: &str, config: &RollingSummaryConfig) -> Result<Self> {
        let context = format!("{} range '{}'", kind, config.range);
        let range = RangeDescriptor::parse(&config.range).map_err(configuration(&*context))?;
        Ok(Self {
            context,
            range,
            offsets: config.offsets.clone(),
            trend: config.trend,
        })
    }
}

#[derive(Debug, Clone)]
struct DailySummaryTarget {
    context: String,
    range: RangeDescriptor,
    columns: Vec<u16>,
    trend: bool,
}

#[derive(Debug, Clone, Copy)]
struct ChartTarget {
    chart_id: i64,
    sheet_id: i64,
}

impl ChartTarget {
    /// A chart is updated only when configured, and then needs its sheet
    fn prepare(
        context: &str,
        chart_id: Option<i64>,
        sheet_id: Option<i64>,
    ) -> Result<Option<Self>> {
        match (chart_id, sheet_id) {
            (None, _) => Ok(None),
            (Some(chart_id), Some(sheet_id)) => Ok(Some(Self { chart_id, sheet_id })),
            (Some(chart_id), None) => {
                Err(configuration(context)(ChartError::MissingSheetId(chart_id)))
            }
        }
    }
}

#[derive(Debug, Clone)]
struct WeeklyTarget {
    context: String,
    range: RangeDescriptor,
    series: SeriesColumn,
}

/// Builds an [`UpdateBatch`] from the current instant and fresh metrics
#[derive(Debug, Clone)]
pub struct UpdateBatchAssembler<Tz: TimeZone> {
    indexer: TemporalIndexer<Tz>,
    generator: RollingAggregateGenerator,
    first_data_row: i64,

    hourly_sheet: String,
    hourly_chart: Option<ChartTarget>,
    timestamp_format: String,
    hourly_series: SeriesColumn,
    hourly_summaries: Vec<RollingTarget>,

    daily_sheet: String,
    daily_chart: Option<ChartTarget>,
    daily_chart_series: Vec<u16>,
    date_format: String,
    daily_series: SeriesColumn,
    sevenly_summaries: Vec<RollingTarget>,
    daily_summary: Option<DailySummaryTarget>,
    weekly_summary: Option<WeeklyTarget>,
}

fn column_index(context: &str, letters: &str) -> Result<u16> {
    CellAddress::letters_to_column(letters).map_err(configuration(context))
}

impl<Tz> UpdateBatchAssembler<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    /// Validate `config` and resolve its anchors in `tz`
    pub fn new(config: &EngineConfig, tz: &Tz) -> Result<Self> {
        let indexer =
            TemporalIndexer::new(&config.temporal, tz).map_err(configuration("epoch anchors"))?;
        let generator = RollingAggregateGenerator::new(
            ColumnArithmetic::new(config.columns),
            config.first_data_row,
        );

        let hourly = &config.hourly;
        let daily = &config.daily;

        let hourly_summaries = hourly
            .summaries
            .iter()
            .map(|s| RollingTarget::prepare("hourly summary", s))
            .collect::<Result<Vec<_>>>()?;
        let sevenly_summaries = daily
            .sevenly
            .iter()
            .map(|s| RollingTarget::prepare("sevenly summary", s))
            .collect::<Result<Vec<_>>>()?;

        let daily_summary = match &daily.summary {
            Some(summary) => {
                let context = format!("daily summary range '{}'", summary.range);
                let range =
                    RangeDescriptor::parse(&summary.range).map_err(configuration(&*context))?;
                let columns = summary
                    .columns
                    .iter()
                    .map(|c| column_index(&context, c))
                    .collect::<Result<Vec<_>>>()?;
                if summary.trend && columns.is_empty() {
                    return Err(configuration(&*context)(FormulaError::ShapeMismatch {
                        range: range.to_string(),
                        reason: "a daily trend needs a source column".into(),
                    }));
                }
                Some(DailySummaryTarget {
                    context,
                    range,
                    columns,
                    trend: summary.trend,
                })
            }
            None => None,
        };

        let weekly_summary = match &daily.weekly {
            Some(weekly) => {
                let context = format!("weekly summary range '{}'", weekly.range);
                let range =
                    RangeDescriptor::parse(&weekly.range).map_err(configuration(&*context))?;
                let series = SeriesColumn {
                    sheet: daily.sheet_name.clone(),
                    column: column_index(&context, &weekly.column)?,
                };
                Some(WeeklyTarget {
                    context,
                    range,
                    series,
                })
            }
            None => None,
        };

        let daily_chart_series = daily
            .chart_series
            .iter()
            .map(|c| column_index("daily chart series", c))
            .collect::<Result<Vec<_>>>()?;
        let hourly_chart = ChartTarget::prepare("hourly chart", hourly.chart_id, hourly.sheet_id)?;
        let daily_chart = ChartTarget::prepare("daily chart", daily.chart_id, daily.sheet_id)?;

        Ok(Self {
            indexer,
            generator,
            first_data_row: config.first_data_row,

            hourly_sheet: hourly.sheet_name.clone(),
            hourly_chart,
            timestamp_format: hourly.timestamp_format.clone(),
            hourly_series: SeriesColumn {
                sheet: hourly.sheet_name.clone(),
                column: HOURLY_SIGNATURE_COL,
            },
            hourly_summaries,

            daily_sheet: daily.sheet_name.clone(),
            daily_chart,
            daily_chart_series,
            date_format: daily.date_format.clone(),
            daily_series: SeriesColumn {
                sheet: daily.sheet_name.clone(),
                column: DAILY_SIGNATURE_COL,
            },
            sevenly_summaries,
            daily_summary,
            weekly_summary,
        })
    }

    /// The indexer used to place rows
    pub fn indexer(&self) -> &TemporalIndexer<Tz> {
        &self.indexer
    }

    /// Build every write and chart update for a run at `now`
    pub fn assemble(&self, now: &DateTime<Tz>, metrics: Metrics) -> Result<UpdateBatch> {
        let hourly_row = self
            .indexer
            .hourly_row(now)
            .map_err(configuration("hourly anchor"))?;
        let daily_row = self
            .indexer
            .daily_row(now)
            .map_err(configuration("daily anchor"))?;
        let day_boundary = self.indexer.is_boundary_hour(now);

        let mut writes = Vec::new();
        writes.push(self.hourly_sample(now, hourly_row, metrics)?);
        writes.push(self.running_day(daily_row, metrics)?);
        for target in &self.hourly_summaries {
            writes.push(self.rolling(&self.hourly_series, hourly_row, target)?);
        }

        if day_boundary {
            writes.push(self.new_day(now, daily_row, metrics)?);
            for target in &self.sevenly_summaries {
                writes.push(self.rolling(&self.daily_series, daily_row, target)?);
            }
            if let Some(target) = &self.daily_summary {
                let op = self
                    .generator
                    .daily_summary(&self.daily_sheet, &target.columns, daily_row, &target.range)
                    .map_err(configuration(&*target.context))?;
                writes.push(op);
                if let (true, Some(&column)) = (target.trend, target.columns.first()) {
                    let op = self
                        .generator
                        .daily_trend(&self.daily_sheet, column, daily_row, &target.range)
                        .map_err(configuration(&*target.context))?;
                    writes.push(op);
                }
            }
            if let Some(target) = &self.weekly_summary {
                let op = self
                    .generator
                    .weekly_summary(
                        &target.series,
                        daily_row,
                        self.indexer.weekday_index(now),
                        &target.range,
                    )
                    .map_err(configuration(&*target.context))?;
                writes.push(op);
            }
        }

        let mut charts = Vec::new();
        if let Some(target) = self.hourly_chart {
            let chart = ChartUpdate::from_row_boundary(
                target.chart_id,
                target.sheet_id,
                ChartType::Line,
                HOURLY_TIMESTAMP_COL,
                &[HOURLY_SIGNATURE_COL, HOURLY_GOAL_COL],
                hourly_row,
            )
            .map_err(configuration("hourly chart"))?;
            charts.push(chart);
        }
        if let (true, Some(target)) = (day_boundary, self.daily_chart) {
            let chart = ChartUpdate::from_row_boundary(
                target.chart_id,
                target.sheet_id,
                ChartType::Column,
                DAILY_DATE_COL,
                &self.daily_chart_series,
                daily_row,
            )
            .map_err(configuration("daily chart"))?;
            charts.push(chart);
        }

        let batch = UpdateBatch {
            hourly_row,
            daily_row,
            day_boundary,
            writes,
            charts,
        };
        debug!(
            hourly_row,
            daily_row,
            day_boundary,
            writes = batch.writes.len(),
            cells = batch.cell_count(),
            charts = batch.charts.len(),
            "assembled batch"
        );
        Ok(batch)
    }

    fn rolling(
        &self,
        series: &SeriesColumn,
        row: i64,
        target: &RollingTarget,
    ) -> Result<WriteOperation> {
        self.generator
            .rolling_summary(series, row, &target.range, &target.offsets, target.trend)
            .map_err(configuration(&*target.context))
    }

    /// `(timestamp, signatures, goal)` appended to the hourly series
    fn hourly_sample(&self, now: &DateTime<Tz>, row: i64, metrics: Metrics) -> Result<WriteOperation> {
        let range =
            RangeDescriptor::row_span(&*self.hourly_sheet, HOURLY_TIMESTAMP_COL, HOURLY_GOAL_COL, row)
                .map_err(configuration("hourly sheet"))?;
        Ok(WriteOperation::row(
            range,
            vec![
                FormulaCell::Text(now.format(&self.timestamp_format).to_string()),
                FormulaCell::Number(metrics.signature_count),
                FormulaCell::Number(metrics.signature_goal),
            ],
        ))
    }

    /// Latest count in the row after today, which today's delta formula reads
    fn running_day(&self, row: i64, metrics: Metrics) -> Result<WriteOperation> {
        let addr = CellAddress::from_row_number(row + 1, DAILY_SIGNATURE_COL)
            .map_err(configuration("daily sheet"))?;
        let range =
            RangeDescriptor::single(&*self.daily_sheet, addr).map_err(configuration("daily sheet"))?;
        Ok(WriteOperation::row(
            range,
            vec![FormulaCell::Number(metrics.signature_count)],
        ))
    }

    /// `(date, signatures, delta, trend)` opening a new day of the daily series
    fn new_day(&self, now: &DateTime<Tz>, row: i64, metrics: Metrics) -> Result<WriteOperation> {
        let cell = |row: i64, col: u16| -> Result<FormulaExpr> {
            let addr = CellAddress::from_row_number(row, col).map_err(configuration("daily sheet"))?;
            Ok(FormulaExpr::cell(None, addr))
        };

        // Reads the running count of the next row, so it grows during the day
        let delta = cell(row + 1, DAILY_SIGNATURE_COL)? - cell(row, DAILY_SIGNATURE_COL)?;
        let trend = if row - 1 >= self.first_data_row {
            FormulaCell::from(cell(row, DAILY_DELTA_COL)? - cell(row - 1, DAILY_DELTA_COL)?)
        } else {
            FormulaCell::Placeholder
        };

        let range = RangeDescriptor::row_span(&*self.daily_sheet, DAILY_DATE_COL, DAILY_TREND_COL, row)
            .map_err(configuration("daily sheet"))?;
        Ok(WriteOperation::row(
            range,
            vec![
                FormulaCell::Text(now.format(&self.date_format).to_string()),
                FormulaCell::Number(metrics.signature_count),
                FormulaCell::from(delta),
                trend,
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DailySummaryConfig, WeeklySummaryConfig};
    use chrono::{FixedOffset, NaiveDate};
    use pretty_assertions::assert_eq;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn at(d: u32, h: u32) -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2024, 4, d, h, 0, 0).unwrap()
    }

    fn config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.hourly.sheet_id = Some(11);
        config.hourly.chart_id = Some(101);
        config.hourly.summaries.push(RollingSummaryConfig {
            range: "Chart!F2:F5".into(),
            offsets: OffsetPolicy::Doubling { base: 6 },
            trend: false,
        });
        config.daily.sheet_id = Some(22);
        config.daily.chart_id = Some(202);
        config.daily.sevenly.push(RollingSummaryConfig {
            range: "Chart!H2:H3".into(),
            offsets: OffsetPolicy::Fixed(vec![7, 14]),
            trend: true,
        });
        config.daily.summary = Some(DailySummaryConfig {
            range: "Chart!F8:F11".into(),
            columns: vec!["C".into()],
            trend: true,
        });
        config.daily.weekly = Some(WeeklySummaryConfig {
            range: "Chart!K2:L3".into(),
            column: "C".into(),
        });
        config
    }

    fn text(op: &WriteOperation) -> Vec<Vec<String>> {
        op.values
            .iter()
            .map(|line| line.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn test_regular_hour() {
        let assembler = UpdateBatchAssembler::new(&config(), &tz()).unwrap();
        let batch = assembler
            .assemble(&at(20, 14), Metrics::new(12345, 20000))
            .unwrap();

        assert_eq!(batch.hourly_row, 149);
        assert_eq!(batch.daily_row, 25);
        assert!(!batch.day_boundary);

        let ranges: Vec<String> = batch.writes.iter().map(|w| w.range.to_string()).collect();
        assert_eq!(ranges, vec!["Hourly!A149:C149", "Daily!B26", "Chart!F2:F5"]);
        assert_eq!(text(&batch.writes[1]), vec![vec!["12345"]]);

        assert_eq!(batch.charts.len(), 1);
        assert_eq!(batch.charts[0].chart_id, 101);
    }

    #[test]
    fn test_midnight_adds_daily_writes_and_chart() {
        let assembler = UpdateBatchAssembler::new(&config(), &tz()).unwrap();
        // 2024-04-24 is a Wednesday
        let batch = assembler
            .assemble(&at(24, 0), Metrics::new(15000, 20000))
            .unwrap();

        assert!(batch.day_boundary);
        assert_eq!(batch.daily_row, 29);

        let ranges: Vec<String> = batch.writes.iter().map(|w| w.range.to_string()).collect();
        assert_eq!(
            ranges,
            vec![
                "Hourly!A231:C231",
                "Daily!B30",
                "Chart!F2:F5",
                "Daily!A29:D29",
                "Chart!H2:I3",
                "Chart!F8:F11",
                "Chart!G8",
                "Chart!K2:L3",
            ]
        );
        assert_eq!(
            text(&batch.writes[3]),
            vec![vec!["24-04-2024", "15000", "=B30-B29", "=C29-C28"]]
        );
        assert_eq!(text(&batch.writes[6]), vec![vec!["='Chart'!F8-'Daily'!C25"]]);
        assert_eq!(
            text(&batch.writes[7])[0],
            vec![
                "=SUM('Daily'!C21:C27)",
                "=SUM('Daily'!C21:C27)-SUM('Daily'!C14:C20)",
            ]
        );

        assert_eq!(batch.charts.len(), 2);
        assert_eq!(batch.charts[1].chart_id, 202);
        assert_eq!(batch.charts[1].chart_type, ChartType::Column);
        assert_eq!(batch.charts[1].end_row_index(), 29);
    }

    #[test]
    fn test_first_day_trend_is_placeholder() {
        let mut config = config();
        config.temporal.daily.reference = NaiveDate::from_ymd_opt(2024, 4, 20)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let assembler = UpdateBatchAssembler::new(&config, &tz()).unwrap();
        let batch = assembler.assemble(&at(20, 0), Metrics::new(10, 100)).unwrap();

        assert_eq!(batch.daily_row, 2);
        let new_day = batch
            .writes
            .iter()
            .find(|w| w.range.to_string() == "Daily!A2:D2")
            .unwrap();
        assert_eq!(text(new_day), vec![vec!["20-04-2024", "10", "=B3-B2", "-"]]);

        // No day has a full week of history yet
        let weekly = batch.writes.last().unwrap();
        assert!(weekly.values.iter().flatten().all(FormulaCell::is_placeholder));
    }

    #[test]
    fn test_bad_range_rejected_up_front() {
        let mut config = config();
        config.hourly.summaries[0].range = "Chart!28:31".into();

        let err = UpdateBatchAssembler::new(&config, &tz()).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("Chart!28:31"));
    }

    #[test]
    fn test_shape_error_aborts_whole_batch() {
        let mut config = config();
        config.daily.summary = Some(DailySummaryConfig {
            range: "Chart!F8:G11".into(),
            columns: vec!["C".into()],
            trend: true,
        });
        let assembler = UpdateBatchAssembler::new(&config, &tz()).unwrap();

        // Outside midnight the daily summary is not built
        assert!(assembler.assemble(&at(20, 14), Metrics::new(1, 2)).is_ok());

        let err = assembler
            .assemble(&at(21, 0), Metrics::new(1, 2))
            .unwrap_err();
        assert!(err.to_string().contains("Chart!F8:G11"));
    }

    #[test]
    fn test_trend_column_out_of_bounds() {
        let mut config = config();
        config.hourly.summaries[0].range = "Chart!Z2:Z5".into();
        config.hourly.summaries[0].trend = true;
        let assembler = UpdateBatchAssembler::new(&config, &tz()).unwrap();

        let err = assembler
            .assemble(&at(20, 14), Metrics::new(1, 2))
            .unwrap_err();
        assert!(err.to_string().contains("'Z'"));
    }

    #[test]
    fn test_chart_needs_sheet_id() {
        let mut config = config();
        config.daily.sheet_id = None;

        let err = UpdateBatchAssembler::new(&config, &tz()).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("202"));
    }

    #[test]
    fn test_daily_trend_can_be_disabled() {
        let mut config = config();
        if let Some(summary) = config.daily.summary.as_mut() {
            summary.trend = false;
        }
        let assembler = UpdateBatchAssembler::new(&config, &tz()).unwrap();

        let batch = assembler.assemble(&at(24, 0), Metrics::new(1, 2)).unwrap();
        assert!(batch.writes.iter().all(|w| w.range.to_string() != "Chart!G8"));
    }

    #[test]
    fn test_no_charts_without_ids() {
        let mut config = config();
        config.hourly.chart_id = None;
        config.daily.chart_id = None;
        let assembler = UpdateBatchAssembler::new(&config, &tz()).unwrap();

        let batch = assembler.assemble(&at(21, 0), Metrics::new(1, 2)).unwrap();
        assert!(batch.charts.is_empty());
    }
}
