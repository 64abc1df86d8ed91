//! Rolling-window summaries and trends
//!
//! Every summary compares the value of a series at the current row with the
//! value some number of rows earlier. When the earlier row would fall before
//! the first data row, the cell becomes [`FormulaCell::Placeholder`]. Within
//! one pass, every window longer than a placeholder's is a placeholder too.

use crate::ast::FormulaExpr;
use crate::cell::FormulaCell;
use crate::error::{FormulaError, FormulaResult};
use crate::write::{MajorDimension, WriteOperation};
use serde::{Deserialize, Serialize};
use sigsheet_core::{CellAddress, ColumnArithmetic, RangeDescriptor};

/// How the step sizes of a rolling summary are chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetPolicy {
    /// `base`, `2·base`, `4·base`, ... one per destination cell
    Doubling { base: i64 },
    /// Explicit steps in destination order, one per destination cell
    Fixed(Vec<i64>),
}

impl OffsetPolicy {
    /// Resolve into `count` distinct positive steps, in destination order
    pub fn resolve(&self, count: usize) -> FormulaResult<Vec<i64>> {
        let offsets = match self {
            OffsetPolicy::Doubling { base } => {
                let mut offsets = Vec::with_capacity(count);
                let mut step = *base;
                for i in 0..count {
                    if i > 0 {
                        step = step.checked_mul(2).ok_or_else(|| FormulaError::InvalidOffsets {
                            offsets: offsets.clone(),
                            reason: "doubling overflows".into(),
                        })?;
                    }
                    offsets.push(step);
                }
                offsets
            }
            OffsetPolicy::Fixed(offsets) => {
                if offsets.len() != count {
                    return Err(FormulaError::InvalidOffsets {
                        offsets: offsets.clone(),
                        reason: format!("expected {} offsets", count),
                    });
                }
                offsets.clone()
            }
        };

        if offsets.iter().any(|o| *o <= 0) {
            return Err(FormulaError::InvalidOffsets {
                offsets,
                reason: "offsets must be positive".into(),
            });
        }
        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(FormulaError::InvalidOffsets {
                offsets,
                reason: "offsets must be distinct".into(),
            });
        }
        Ok(offsets)
    }
}

/// Step of the window compared against `step` in a trend: the next larger
/// listed step, or twice `step` past the largest one
fn next_window(step: i64, offsets: &[i64]) -> i64 {
    offsets
        .iter()
        .copied()
        .filter(|o| *o > step)
        .min()
        .unwrap_or_else(|| step.saturating_mul(2))
}

/// The column holding a series on its sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesColumn {
    pub sheet: String,
    /// 0-based column index
    pub column: u16,
}

impl SeriesColumn {
    /// Series in column `letters` of `sheet`
    pub fn new<S: Into<String>>(sheet: S, letters: &str) -> FormulaResult<Self> {
        Ok(Self {
            sheet: sheet.into(),
            column: CellAddress::letters_to_column(letters)?,
        })
    }

    /// Sheet-qualified reference to the series value at a 1-based row
    pub fn cell(&self, row: i64) -> FormulaResult<FormulaExpr> {
        let addr = CellAddress::from_row_number(row, self.column)?;
        Ok(FormulaExpr::cell(Some(&self.sheet), addr))
    }

    /// Sheet-qualified reference to rows `start..=end` of the series
    pub fn span(&self, start: i64, end: i64) -> FormulaResult<FormulaExpr> {
        let start = CellAddress::from_row_number(start, self.column)?;
        let end = CellAddress::from_row_number(end, self.column)?;
        Ok(FormulaExpr::range(Some(&self.sheet), start, end))
    }
}

/// Builds summary and trend formulas for destination ranges
#[derive(Debug, Clone)]
pub struct RollingAggregateGenerator {
    columns: ColumnArithmetic,
    first_row: i64,
}

impl RollingAggregateGenerator {
    /// `first_row` is the first 1-based row holding data in every series
    pub fn new(columns: ColumnArithmetic, first_row: i64) -> Self {
        Self { columns, first_row }
    }

    /// First row a formula may reference
    pub fn first_row(&self) -> i64 {
        self.first_row
    }

    fn has_history(&self, row: i64) -> bool {
        row >= self.first_row
    }

    /// Differences between the current value and the value `step` rows back
    ///
    /// `target` must be a single column with one cell per offset, filled in
    /// the order the offsets are listed. With `trend`, the column to its
    /// right receives `2×(cur − cur[−step]) − (cur − cur[−next])`, where
    /// `next` is the next larger listed step (twice `step` for the largest),
    /// so a doubling list compares each window with the one twice as long.
    ///
    /// A cell whose window reaches before the first row is a placeholder.
    /// Larger steps reach further back, so every step larger than a
    /// placeholder's is a placeholder too, whatever the listed order.
    pub fn rolling_summary(
        &self,
        series: &SeriesColumn,
        row: i64,
        target: &RangeDescriptor,
        offsets: &OffsetPolicy,
        trend: bool,
    ) -> FormulaResult<WriteOperation> {
        if target.column_count() != 1 {
            return Err(FormulaError::shape(
                target,
                "a rolling summary fills exactly one column",
            ));
        }
        let offsets = offsets.resolve(target.row_count() as usize)?;
        let current = series.cell(row)?;

        let mut summary = Vec::with_capacity(offsets.len());
        let mut trends = Vec::with_capacity(offsets.len());

        for &step in &offsets {
            if self.has_history(row - step) {
                let window = current.clone() - series.cell(row - step)?;
                summary.push(FormulaCell::from(window));
            } else {
                summary.push(FormulaCell::Placeholder);
            }

            if !trend {
                continue;
            }
            let next = next_window(step, &offsets);
            if self.has_history(row.saturating_sub(next)) {
                let last = current.clone() - series.cell(row - step)?;
                let longer = current.clone() - series.cell(row - next)?;
                trends.push(FormulaCell::from(FormulaExpr::from(2) * last - longer));
            } else {
                trends.push(FormulaCell::Placeholder);
            }
        }

        if !trend {
            return Ok(WriteOperation::column(target.clone(), summary));
        }

        let trend_col = self.columns.next_index(target.start().col)?;
        let range = RangeDescriptor::new(
            target.sheet_name(),
            target.start(),
            CellAddress::new(target.end().row, trend_col),
        )?;
        Ok(WriteOperation {
            range,
            major_dimension: MajorDimension::Columns,
            values: vec![summary, trends],
        })
    }

    /// Mirror the last rows of the daily sheet, oldest first
    ///
    /// Row `i` of `target` (with `n` rows) shows day `row − (n − 1 − i)`;
    /// column `j` references `source_columns[j]` of that day.
    pub fn daily_summary(
        &self,
        sheet: &str,
        source_columns: &[u16],
        row: i64,
        target: &RangeDescriptor,
    ) -> FormulaResult<WriteOperation> {
        if target.column_count() as usize != source_columns.len() {
            return Err(FormulaError::shape(
                target,
                format!("expected {} columns", source_columns.len()),
            ));
        }

        let count = target.row_count() as i64;
        let mut values = Vec::with_capacity(count as usize);
        for step in (0..count).rev() {
            let day = row - step;
            let cells = source_columns
                .iter()
                .map(|col| {
                    if self.has_history(day) {
                        let addr = CellAddress::from_row_number(day, *col)?;
                        Ok(FormulaCell::from(FormulaExpr::cell(Some(sheet), addr)))
                    } else {
                        Ok(FormulaCell::Placeholder)
                    }
                })
                .collect::<FormulaResult<Vec<_>>>()?;
            values.push(cells);
        }

        Ok(WriteOperation {
            range: target.clone(),
            major_dimension: MajorDimension::Rows,
            values,
        })
    }

    /// Change of the oldest mirrored day against the day before it
    ///
    /// Companion of [`daily_summary`](Self::daily_summary): the cell right of
    /// the first row of `target` receives
    /// `target[first cell] − source_column[row − n]` for a `target` of `n`
    /// rows.
    pub fn daily_trend(
        &self,
        sheet: &str,
        source_column: u16,
        row: i64,
        target: &RangeDescriptor,
    ) -> FormulaResult<WriteOperation> {
        let trend_col = self.columns.next_index(target.end().col)?;
        let cell = RangeDescriptor::single(
            target.sheet_name(),
            CellAddress::new(target.start().row, trend_col),
        )?;

        let previous_day = row - target.row_count() as i64;
        let value = if self.has_history(previous_day) {
            let oldest = FormulaExpr::cell(Some(target.sheet_name()), target.start());
            let before = FormulaExpr::cell(
                Some(sheet),
                CellAddress::from_row_number(previous_day, source_column)?,
            );
            FormulaCell::from(oldest - before)
        } else {
            FormulaCell::Placeholder
        };
        Ok(WriteOperation::row(cell, vec![value]))
    }

    /// Seven-day sums aligned on week boundaries, newest first
    ///
    /// The current week ends at `row − weekday_index`; each following row of
    /// `target` moves one week back. A second destination column receives the
    /// difference with the week before.
    pub fn weekly_summary(
        &self,
        series: &SeriesColumn,
        row: i64,
        weekday_index: u32,
        target: &RangeDescriptor,
    ) -> FormulaResult<WriteOperation> {
        let with_trend = match target.column_count() {
            1 => false,
            2 => true,
            _ => {
                return Err(FormulaError::shape(
                    target,
                    "a weekly summary fills one or two columns",
                ))
            }
        };

        let mut end = row - weekday_index as i64;
        let mut values = Vec::with_capacity(target.row_count() as usize);
        let mut sum_open = true;
        let mut trend_open = true;

        for _ in 0..target.row_count() {
            let start = end - 6;
            let previous_end = start - 1;
            let previous_start = previous_end - 6;

            let mut cells = Vec::with_capacity(2);
            sum_open = sum_open && self.has_history(start);
            let current_sum = if sum_open {
                let sum = FormulaExpr::sum(vec![series.span(start, end)?]);
                cells.push(FormulaCell::from(sum.clone()));
                Some(sum)
            } else {
                cells.push(FormulaCell::Placeholder);
                None
            };

            if with_trend {
                trend_open = trend_open && self.has_history(previous_start);
                match current_sum {
                    Some(sum) if trend_open => {
                        let previous =
                            FormulaExpr::sum(vec![series.span(previous_start, previous_end)?]);
                        cells.push(FormulaCell::from(sum - previous));
                    }
                    _ => cells.push(FormulaCell::Placeholder),
                }
            }

            values.push(cells);
            end = previous_end;
        }

        Ok(WriteOperation {
            range: target.clone(),
            major_dimension: MajorDimension::Rows,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn generator() -> RollingAggregateGenerator {
        RollingAggregateGenerator::new(ColumnArithmetic::default(), 2)
    }

    fn hourly() -> SeriesColumn {
        SeriesColumn::new("Hourly", "B").unwrap()
    }

    fn daily_delta() -> SeriesColumn {
        SeriesColumn::new("Daily", "C").unwrap()
    }

    fn range(s: &str) -> RangeDescriptor {
        RangeDescriptor::parse(s).unwrap()
    }

    fn text(op: &WriteOperation) -> Vec<Vec<String>> {
        op.values
            .iter()
            .map(|line| line.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn test_offset_policies() {
        assert_eq!(
            OffsetPolicy::Doubling { base: 6 }.resolve(4).unwrap(),
            vec![6, 12, 24, 48]
        );
        assert_eq!(
            OffsetPolicy::Fixed(vec![1, 3, 7]).resolve(3).unwrap(),
            vec![1, 3, 7]
        );
        assert!(OffsetPolicy::Fixed(vec![1, 3]).resolve(3).is_err());
        assert_eq!(
            OffsetPolicy::Fixed(vec![48, 24, 12, 6]).resolve(4).unwrap(),
            vec![48, 24, 12, 6]
        );
        assert!(OffsetPolicy::Fixed(vec![6, 12, 6]).resolve(3).is_err());
        assert!(OffsetPolicy::Fixed(vec![0, 6]).resolve(2).is_err());
        assert!(OffsetPolicy::Doubling { base: -1 }.resolve(2).is_err());
        assert!(OffsetPolicy::Doubling { base: i64::MAX }.resolve(3).is_err());
    }

    #[test]
    fn test_rolling_summary_with_full_history() {
        let op = generator()
            .rolling_summary(
                &hourly(),
                100,
                &range("Chart!F28:F31"),
                &OffsetPolicy::Doubling { base: 6 },
                false,
            )
            .unwrap();

        assert_eq!(op.range.to_string(), "Chart!F28:F31");
        assert_eq!(op.major_dimension, MajorDimension::Columns);
        assert_eq!(
            text(&op),
            vec![vec![
                "='Hourly'!B100-'Hourly'!B94",
                "='Hourly'!B100-'Hourly'!B88",
                "='Hourly'!B100-'Hourly'!B76",
                "='Hourly'!B100-'Hourly'!B52",
            ]]
        );
    }

    #[test]
    fn test_rolling_summary_at_anchor_row_uses_placeholders() {
        let op = generator()
            .rolling_summary(
                &hourly(),
                18,
                &range("Chart!F28:F31"),
                &OffsetPolicy::Fixed(vec![6, 12, 24, 48]),
                false,
            )
            .unwrap();

        assert_eq!(
            text(&op),
            vec![vec![
                "='Hourly'!B18-'Hourly'!B12",
                "='Hourly'!B18-'Hourly'!B6",
                "-",
                "-",
            ]]
        );
    }

    #[test]
    fn test_rolling_summary_descending_offsets() {
        let op = generator()
            .rolling_summary(
                &hourly(),
                149,
                &range("Chart!F28:F31"),
                &OffsetPolicy::Fixed(vec![48, 24, 12, 6]),
                false,
            )
            .unwrap();

        assert_eq!(
            text(&op),
            vec![vec![
                "='Hourly'!B149-'Hourly'!B101",
                "='Hourly'!B149-'Hourly'!B125",
                "='Hourly'!B149-'Hourly'!B137",
                "='Hourly'!B149-'Hourly'!B143",
            ]]
        );

        // Near the start the longest windows are placeholders, wherever listed
        let op = generator()
            .rolling_summary(
                &hourly(),
                18,
                &range("Chart!F28:F31"),
                &OffsetPolicy::Fixed(vec![48, 24, 12, 6]),
                false,
            )
            .unwrap();
        assert_eq!(
            text(&op),
            vec![vec![
                "-",
                "-",
                "='Hourly'!B18-'Hourly'!B6",
                "='Hourly'!B18-'Hourly'!B12",
            ]]
        );
    }

    #[test]
    fn test_rolling_summary_placeholders_are_sticky() {
        let op = generator()
            .rolling_summary(
                &hourly(),
                30,
                &range("Chart!F28:F33"),
                &OffsetPolicy::Doubling { base: 3 },
                true,
            )
            .unwrap();

        for column in &op.values {
            let first = column.iter().position(FormulaCell::is_placeholder);
            if let Some(first) = first {
                assert!(column[first..].iter().all(FormulaCell::is_placeholder));
            }
        }
        // 30 - 24 = 6 is the last summary with history, 30 - 2*12 = 6 the last trend
        assert!(!op.values[0][3].is_placeholder());
        assert!(op.values[0][4].is_placeholder());
        assert!(!op.values[1][2].is_placeholder());
        assert!(op.values[1][3].is_placeholder());
    }

    #[test]
    fn test_rolling_summary_with_trend() {
        let op = generator()
            .rolling_summary(
                &hourly(),
                100,
                &range("Chart!F28:F29"),
                &OffsetPolicy::Fixed(vec![6, 12]),
                true,
            )
            .unwrap();

        assert_eq!(op.range.to_string(), "Chart!F28:G29");
        assert_eq!(
            text(&op)[1],
            vec![
                "=2*('Hourly'!B100-'Hourly'!B94)-('Hourly'!B100-'Hourly'!B88)",
                "=2*('Hourly'!B100-'Hourly'!B88)-('Hourly'!B100-'Hourly'!B76)",
            ]
        );
    }

    #[test]
    fn test_rolling_summary_trend_uses_next_listed_step() {
        let op = generator()
            .rolling_summary(
                &hourly(),
                100,
                &range("Chart!F28:F30"),
                &OffsetPolicy::Fixed(vec![7, 1, 3]),
                true,
            )
            .unwrap();

        assert_eq!(
            text(&op)[1],
            vec![
                "=2*('Hourly'!B100-'Hourly'!B93)-('Hourly'!B100-'Hourly'!B86)",
                "=2*('Hourly'!B100-'Hourly'!B99)-('Hourly'!B100-'Hourly'!B97)",
                "=2*('Hourly'!B100-'Hourly'!B97)-('Hourly'!B100-'Hourly'!B93)",
            ]
        );
    }

    #[test]
    fn test_rolling_summary_errors() {
        let gen = generator();
        let policy = OffsetPolicy::Doubling { base: 6 };
        assert!(gen
            .rolling_summary(&hourly(), 100, &range("Chart!F28:G31"), &policy, false)
            .is_err());
        // No column right of Z for the trend
        assert!(gen
            .rolling_summary(&hourly(), 100, &range("Chart!Z28:Z31"), &policy, true)
            .is_err());
    }

    #[test]
    fn test_daily_summary() {
        let op = generator()
            .daily_summary("Daily", &[2, 3], 25, &range("Chart!F28:G31"))
            .unwrap();

        assert_eq!(op.major_dimension, MajorDimension::Rows);
        assert_eq!(
            text(&op),
            vec![
                vec!["='Daily'!C22", "='Daily'!D22"],
                vec!["='Daily'!C23", "='Daily'!D23"],
                vec!["='Daily'!C24", "='Daily'!D24"],
                vec!["='Daily'!C25", "='Daily'!D25"],
            ]
        );
    }

    #[test]
    fn test_daily_summary_short_history() {
        let op = generator()
            .daily_summary("Daily", &[2], 3, &range("Chart!F28:F31"))
            .unwrap();
        assert_eq!(
            text(&op),
            vec![vec!["-"], vec!["-"], vec!["='Daily'!C2"], vec!["='Daily'!C3"]]
        );

        assert!(generator()
            .daily_summary("Daily", &[2, 3], 3, &range("Chart!F28:F31"))
            .is_err());
    }

    #[test]
    fn test_daily_trend() {
        let op = generator()
            .daily_trend("Daily", 2, 25, &range("Chart!F28:F31"))
            .unwrap();
        assert_eq!(op.range.to_string(), "Chart!G28");
        assert_eq!(text(&op), vec![vec!["='Chart'!F28-'Daily'!C21"]]);

        let op = generator()
            .daily_trend("Daily", 2, 5, &range("Chart!F28:F31"))
            .unwrap();
        assert_eq!(text(&op), vec![vec!["-"]]);

        assert!(generator()
            .daily_trend("Daily", 2, 25, &range("Chart!Z28:Z31"))
            .is_err());
    }

    #[test]
    fn test_weekly_summary_wednesday() {
        let op = generator()
            .weekly_summary(&daily_delta(), 100, 2, &range("Chart!I28:J29"))
            .unwrap();

        assert_eq!(
            text(&op),
            vec![
                vec![
                    "=SUM('Daily'!C92:C98)",
                    "=SUM('Daily'!C92:C98)-SUM('Daily'!C85:C91)",
                ],
                vec![
                    "=SUM('Daily'!C85:C91)",
                    "=SUM('Daily'!C85:C91)-SUM('Daily'!C78:C84)",
                ],
            ]
        );
    }

    #[test]
    fn test_weekly_summary_short_history() {
        // Current week covers 8..=14, previous 1..=7 starts before row 2
        let op = generator()
            .weekly_summary(&daily_delta(), 14, 0, &range("Chart!I28:J30"))
            .unwrap();

        assert_eq!(
            text(&op),
            vec![
                vec!["=SUM('Daily'!C8:C14)", "-"],
                vec!["-", "-"],
                vec!["-", "-"],
            ]
        );
    }

    #[test]
    fn test_weekly_summary_single_column() {
        let op = generator()
            .weekly_summary(&daily_delta(), 100, 6, &range("Chart!I28:I28"))
            .unwrap();
        assert_eq!(text(&op), vec![vec!["=SUM('Daily'!C88:C94)"]]);

        assert!(generator()
            .weekly_summary(&daily_delta(), 100, 6, &range("Chart!I28:K28"))
            .is_err());
    }
}
