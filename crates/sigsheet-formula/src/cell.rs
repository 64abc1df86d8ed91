//! Cell contents handed to the sheet

use crate::ast::FormulaExpr;
use serde::{Serialize, Serializer};
use std::fmt;

/// Text written in place of a formula that would reach before the series start
pub const PLACEHOLDER: &str = "-";

/// Content of one cell in a write operation
///
/// Values are entered as if typed by a user, so formulas are serialized with a
/// leading `=` and numbers stay numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaCell {
    /// Integer literal
    Number(i64),
    /// Text literal (dates and timestamps included)
    Text(String),
    /// Formula
    Formula(FormulaExpr),
    /// Not enough history for the formula
    Placeholder,
}

impl FormulaCell {
    /// Whether this cell is the placeholder
    pub fn is_placeholder(&self) -> bool {
        matches!(self, FormulaCell::Placeholder)
    }

    /// The formula, if this cell holds one
    pub fn formula(&self) -> Option<&FormulaExpr> {
        match self {
            FormulaCell::Formula(expr) => Some(expr),
            _ => None,
        }
    }
}

impl From<FormulaExpr> for FormulaCell {
    fn from(expr: FormulaExpr) -> Self {
        FormulaCell::Formula(expr)
    }
}

impl From<i64> for FormulaCell {
    fn from(n: i64) -> Self {
        FormulaCell::Number(n)
    }
}

impl From<String> for FormulaCell {
    fn from(s: String) -> Self {
        FormulaCell::Text(s)
    }
}

impl fmt::Display for FormulaCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaCell::Number(n) => write!(f, "{}", n),
            FormulaCell::Text(s) => write!(f, "{}", s),
            FormulaCell::Formula(expr) => write!(f, "={}", expr),
            FormulaCell::Placeholder => write!(f, "{}", PLACEHOLDER),
        }
    }
}

impl Serialize for FormulaCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FormulaCell::Number(n) => serializer.serialize_i64(*n),
            other => serializer.collect_str(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigsheet_core::CellAddress;

    #[test]
    fn test_display() {
        let expr = FormulaExpr::cell(None, CellAddress::parse("B3").unwrap());
        assert_eq!(FormulaCell::from(expr).to_string(), "=B3");
        assert_eq!(FormulaCell::Placeholder.to_string(), "-");
        assert_eq!(FormulaCell::from(12345).to_string(), "12345");
    }

    #[test]
    fn test_serialize() {
        let cells = vec![
            FormulaCell::Text("20-04-2024".into()),
            FormulaCell::Number(12345),
            FormulaCell::Placeholder,
        ];
        assert_eq!(
            serde_json::to_string(&cells).unwrap(),
            r#"["20-04-2024",12345,"-"]"#
        );
    }
}
