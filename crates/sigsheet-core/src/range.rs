//! Sheet-qualified range descriptors
//!
//! A [`RangeDescriptor`] is the parsed form of strings such as
//! `Chart!F28:G31`. Three shapes are accepted:
//!
//! - `Sheet!F28` - a single cell
//! - `Sheet!F28:G31` - two full cells
//! - `Sheet!F28:31` - the end column is implicit and equals the start column
//!
//! The shape is told apart by whether a column letter precedes the second row
//! number.

use crate::cell::CellAddress;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A range of cells on a named sheet
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeDescriptor {
    sheet_name: String,
    start: CellAddress,
    end: CellAddress,
}

impl RangeDescriptor {
    /// Create a range, checking that `start` is the top-left corner
    pub fn new<S: Into<String>>(sheet_name: S, start: CellAddress, end: CellAddress) -> Result<Self> {
        let sheet_name = sheet_name.into();
        if sheet_name.is_empty() {
            return Err(Error::invalid_range(
                format!("!{}:{}", start, end),
                "empty sheet name",
            ));
        }
        let range = Self {
            sheet_name,
            start,
            end,
        };
        if end.row < start.row {
            return Err(Error::invalid_range(
                range.to_string(),
                "end row is before start row",
            ));
        }
        if end.col < start.col {
            return Err(Error::invalid_range(
                range.to_string(),
                "end column is before start column",
            ));
        }
        Ok(range)
    }

    /// A range covering columns `start_col..=end_col` of a single 1-based row
    pub fn row_span<S: Into<String>>(
        sheet_name: S,
        start_col: u16,
        end_col: u16,
        row: i64,
    ) -> Result<Self> {
        let start = CellAddress::from_row_number(row, start_col)?;
        let end = CellAddress::from_row_number(row, end_col)?;
        Self::new(sheet_name, start, end)
    }

    /// A single-cell range
    pub fn single<S: Into<String>>(sheet_name: S, addr: CellAddress) -> Result<Self> {
        Self::new(sheet_name, addr, addr)
    }

    /// Parse a range such as `Chart!F28:F31`, `Chart!F28:G31` or `Chart!F28:31`
    ///
    /// # Examples
    /// ```
    /// use sigsheet_core::RangeDescriptor;
    ///
    /// let range = RangeDescriptor::parse("Chart!F28:G31").unwrap();
    /// assert_eq!(range.sheet_name(), "Chart");
    /// assert_eq!(range.start_column(), "F");
    /// assert_eq!(range.start_row(), 28);
    /// assert_eq!(range.end_column(), "G");
    /// assert_eq!(range.end_row(), 31);
    ///
    /// assert!(RangeDescriptor::parse("Chart!28:31").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let bang = s
            .rfind('!')
            .ok_or_else(|| Error::invalid_range(s, "missing '!' after the sheet name"))?;

        let sheet_name = unquote_sheet_name(&s[..bang])
            .ok_or_else(|| Error::invalid_range(s, "unbalanced quotes in sheet name"))?;
        if sheet_name.is_empty() {
            return Err(Error::invalid_range(s, "empty sheet name"));
        }

        let cells = &s[bang + 1..];
        let wrap = |e: Error| Error::invalid_range(s, e.to_string());

        let (start, end) = match cells.split_once(':') {
            None => {
                let addr = CellAddress::parse(cells).map_err(wrap)?;
                (addr, addr)
            }
            Some((first, second)) => {
                let start = CellAddress::parse(first).map_err(wrap)?;
                let end = if second.starts_with(|c: char| c.is_ascii_digit()) {
                    // Implicit end column: only the row is given
                    let addr = format!("{}{}", start.column_letters(), second);
                    CellAddress::parse(&addr).map_err(wrap)?
                } else {
                    CellAddress::parse(second).map_err(wrap)?
                };
                (start, end)
            }
        };

        Self::new(sheet_name, start, end).map_err(|e| match e {
            Error::InvalidRange { reason, .. } => Error::invalid_range(s, reason),
            other => other,
        })
    }

    /// Name of the sheet, without quotes
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Top-left cell
    pub fn start(&self) -> CellAddress {
        self.start
    }

    /// Bottom-right cell
    pub fn end(&self) -> CellAddress {
        self.end
    }

    /// Letters of the first column
    pub fn start_column(&self) -> String {
        self.start.column_letters()
    }

    /// Letters of the last column
    pub fn end_column(&self) -> String {
        self.end.column_letters()
    }

    /// 1-based first row
    pub fn start_row(&self) -> i64 {
        self.start.row_number()
    }

    /// 1-based last row
    pub fn end_row(&self) -> i64 {
        self.end.row_number()
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn column_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.column_count() as u64
    }

    /// Whether the range covers exactly one cell
    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Format as `Sheet!A1:B2`, quoting the sheet name when needed
    pub fn to_a1_string(&self) -> String {
        let sheet = quote_sheet_name_if_needed(&self.sheet_name);
        if self.is_single_cell() {
            format!("{}!{}", sheet, self.start)
        } else {
            format!("{}!{}:{}", sheet, self.start, self.end)
        }
    }
}

impl fmt::Display for RangeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for RangeDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Wrap a sheet name in single quotes, doubling embedded quotes
pub fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

fn quote_sheet_name_if_needed(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        quote_sheet_name(name)
    }
}

fn unquote_sheet_name(raw: &str) -> Option<String> {
    match raw.strip_prefix('\'') {
        Some(rest) => rest.strip_suffix('\'').map(|inner| inner.replace("''", "'")),
        None if raw.contains('\'') => None,
        None => Some(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parts(s: &str) -> (String, String, i64, String, i64) {
        let r = RangeDescriptor::parse(s).unwrap();
        (
            r.sheet_name().to_string(),
            r.start_column(),
            r.start_row(),
            r.end_column(),
            r.end_row(),
        )
    }

    #[test]
    fn test_parse_same_column() {
        assert_eq!(
            parts("Chart!F28:F31"),
            ("Chart".into(), "F".into(), 28, "F".into(), 31)
        );
    }

    #[test]
    fn test_parse_two_full_cells() {
        assert_eq!(
            parts("Chart!F28:G31"),
            ("Chart".into(), "F".into(), 28, "G".into(), 31)
        );
    }

    #[test]
    fn test_parse_implicit_end_column() {
        assert_eq!(
            parts("Chart!F28:31"),
            ("Chart".into(), "F".into(), 28, "F".into(), 31)
        );
    }

    #[test]
    fn test_parse_single_cell() {
        let r = RangeDescriptor::parse("Daily!B42").unwrap();
        assert!(r.is_single_cell());
        assert_eq!(r.start_row(), 42);
        assert_eq!(r.to_string(), "Daily!B42");
    }

    #[test]
    fn test_parse_quoted_sheet() {
        let r = RangeDescriptor::parse("'Hourly data'!A2:C2").unwrap();
        assert_eq!(r.sheet_name(), "Hourly data");
        assert_eq!(r.to_string(), "'Hourly data'!A2:C2");

        let r = RangeDescriptor::parse("'Bob''s'!A1").unwrap();
        assert_eq!(r.sheet_name(), "Bob's");
    }

    #[test]
    fn test_parse_errors() {
        assert!(RangeDescriptor::parse("Chart!28:31").is_err());
        assert!(RangeDescriptor::parse("F28:F31").is_err());
        assert!(RangeDescriptor::parse("!F28:F31").is_err());
        assert!(RangeDescriptor::parse("Chart!F31:F28").is_err());
        assert!(RangeDescriptor::parse("Chart!G28:F31").is_err());
        assert!(RangeDescriptor::parse("Chart!F0:F3").is_err());
        assert!(RangeDescriptor::parse("Chart!F28:").is_err());
        assert!(RangeDescriptor::parse("'Chart!F28").is_err());
    }

    #[test]
    fn test_error_carries_range() {
        let err = RangeDescriptor::parse("Chart!28:31").unwrap_err();
        assert!(err.to_string().contains("Chart!28:31"));
    }

    #[test]
    fn test_counts() {
        let r = RangeDescriptor::parse("Chart!F28:G31").unwrap();
        assert_eq!(r.row_count(), 4);
        assert_eq!(r.column_count(), 2);
        assert_eq!(r.cell_count(), 8);
    }

    #[test]
    fn test_row_span() {
        let r = RangeDescriptor::row_span("Hourly", 0, 2, 149).unwrap();
        assert_eq!(r.to_string(), "Hourly!A149:C149");
        assert!(RangeDescriptor::row_span("Hourly", 0, 2, 0).is_err());
    }
}
