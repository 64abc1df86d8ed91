//! Chart types

use crate::axis::AxisPosition;
use crate::error::{ChartError, ChartResult};
use crate::series::{ChartSeries, GridRange};
use serde::{Serialize, Serializer};

/// Chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChartType {
    Line,
    Column,
}

/// New data ranges for an existing chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartUpdate {
    pub chart_id: i64,
    pub chart_type: ChartType,
    /// Rows at the top of each range treated as headers
    pub header_count: u32,
    /// Categories (X data)
    pub domain: GridRange,
    /// Data series
    pub series: Vec<ChartSeries>,
}

impl ChartUpdate {
    /// Create a chart update with one header row and no series
    pub fn new(chart_id: i64, chart_type: ChartType, domain: GridRange) -> Self {
        Self {
            chart_id,
            chart_type,
            header_count: 1,
            domain,
            series: Vec::new(),
        }
    }

    /// Add a data series
    pub fn add_series(&mut self, series: ChartSeries) {
        self.series.push(series);
    }

    /// Plot `series_columns` against `domain_column`, down to and including
    /// the 1-based row `last_row`
    ///
    /// A 1-based last row is the same number as the 0-based exclusive end.
    pub fn from_row_boundary(
        chart_id: i64,
        sheet_id: i64,
        chart_type: ChartType,
        domain_column: u16,
        series_columns: &[u16],
        last_row: i64,
    ) -> ChartResult<Self> {
        if series_columns.is_empty() {
            return Err(ChartError::NoSeries(chart_id));
        }
        let end_row_index = u32::try_from(last_row)
            .ok()
            .filter(|end| *end > 1)
            .ok_or(ChartError::EmptyRange {
                chart_id,
                end_row: last_row,
            })?;

        let mut update = Self::new(
            chart_id,
            chart_type,
            GridRange::column(sheet_id, domain_column, end_row_index),
        );
        for column in series_columns {
            update.add_series(ChartSeries::new(GridRange::column(
                sheet_id,
                *column,
                end_row_index,
            )));
        }
        Ok(update)
    }

    /// Exclusive 0-based end row shared by the domain and series
    pub fn end_row_index(&self) -> u32 {
        self.domain.end_row_index
    }

    /// Borrowed Sheets API `updateChartSpec` request
    pub fn as_request(&self) -> UpdateChartSpecRequest<'_> {
        UpdateChartSpecRequest {
            update_chart_spec: UpdateChartSpec {
                chart_id: self.chart_id,
                spec: ChartSpec {
                    basic_chart: BasicChart {
                        chart_type: self.chart_type,
                        header_count: self.header_count,
                        domains: vec![Domain {
                            domain: ChartData::new(&self.domain),
                        }],
                        series: self
                            .series
                            .iter()
                            .map(|s| Series {
                                series: ChartData::new(&s.source),
                                target_axis: s.target_axis,
                            })
                            .collect(),
                    },
                },
            },
        }
    }
}

impl Serialize for ChartUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_request().serialize(serializer)
    }
}

/// Wire form of a [`ChartUpdate`]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChartSpecRequest<'a> {
    update_chart_spec: UpdateChartSpec<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateChartSpec<'a> {
    chart_id: i64,
    spec: ChartSpec<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartSpec<'a> {
    basic_chart: BasicChart<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BasicChart<'a> {
    chart_type: ChartType,
    header_count: u32,
    domains: Vec<Domain<'a>>,
    series: Vec<Series<'a>>,
}

#[derive(Debug, Serialize)]
struct Domain<'a> {
    domain: ChartData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Series<'a> {
    series: ChartData<'a>,
    target_axis: AxisPosition,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartData<'a> {
    source_range: SourceRange<'a>,
}

impl<'a> ChartData<'a> {
    fn new(range: &'a GridRange) -> Self {
        Self {
            source_range: SourceRange {
                sources: [range],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct SourceRange<'a> {
    sources: [&'a GridRange; 1],
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_row_boundary() {
        let update =
            ChartUpdate::from_row_boundary(7, 42, ChartType::Line, 0, &[1, 2], 149).unwrap();

        assert_eq!(update.header_count, 1);
        assert_eq!(update.end_row_index(), 149);
        assert_eq!(update.domain, GridRange::column(42, 0, 149));
        assert_eq!(update.series.len(), 2);
        assert_eq!(update.series[1].source.start_column_index, 2);
        assert_eq!(update.series[1].source.end_column_index, 3);
        assert_eq!(update.series[1].target_axis, AxisPosition::Left);
    }

    #[test]
    fn test_from_row_boundary_errors() {
        assert!(ChartUpdate::from_row_boundary(7, 42, ChartType::Line, 0, &[], 10).is_err());
        assert!(ChartUpdate::from_row_boundary(7, 42, ChartType::Line, 0, &[1], 1).is_err());
        assert!(ChartUpdate::from_row_boundary(7, 42, ChartType::Line, 0, &[1], -3).is_err());
    }

    #[test]
    fn test_serialize_request() {
        let update = ChartUpdate::from_row_boundary(9, 3, ChartType::Column, 0, &[2], 25).unwrap();
        let grid = |col: u16| {
            json!({
                "sheetId": 3,
                "startRowIndex": 0,
                "endRowIndex": 25,
                "startColumnIndex": col,
                "endColumnIndex": col + 1,
            })
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "updateChartSpec": {
                    "chartId": 9,
                    "spec": {
                        "basicChart": {
                            "chartType": "COLUMN",
                            "headerCount": 1,
                            "domains": [{"domain": {"sourceRange": {"sources": [grid(0)]}}}],
                            "series": [{
                                "series": {"sourceRange": {"sources": [grid(2)]}},
                                "targetAxis": "LEFT_AXIS",
                            }],
                        }
                    }
                }
            })
        );
    }
}
