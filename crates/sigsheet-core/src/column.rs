//! Single-letter column arithmetic

use crate::cell::CellAddress;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Columns that may take part in an increment
///
/// `last` is the highest column an increment can produce; moving past it
/// would need a two-letter column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnBounds {
    /// First supported column letter
    pub first: char,
    /// Last column letter (cannot be incremented)
    pub last: char,
}

impl Default for ColumnBounds {
    fn default() -> Self {
        Self {
            first: 'A',
            last: 'Z',
        }
    }
}

/// Increments single-letter columns within [`ColumnBounds`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnArithmetic {
    bounds: ColumnBounds,
}

impl ColumnArithmetic {
    /// Create with explicit bounds
    pub fn new(bounds: ColumnBounds) -> Self {
        Self { bounds }
    }

    /// The bounds in use
    pub fn bounds(&self) -> ColumnBounds {
        self.bounds
    }

    /// Column to the right of `column`
    ///
    /// # Examples
    /// ```
    /// use sigsheet_core::ColumnArithmetic;
    ///
    /// let columns = ColumnArithmetic::default();
    /// assert_eq!(columns.next_column("B").unwrap(), "C");
    /// assert!(columns.next_column("Z").is_err());
    /// assert!(columns.next_column("AA").is_err());
    /// ```
    pub fn next_column(&self, column: &str) -> Result<String> {
        let mut chars = column.chars();
        let c = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(Error::ColumnOutOfRange {
                    column: column.to_string(),
                })
            }
        };

        if !c.is_ascii_uppercase() || c < self.bounds.first || c >= self.bounds.last {
            return Err(Error::ColumnOutOfRange {
                column: column.to_string(),
            });
        }

        Ok(char::from(c as u8 + 1).to_string())
    }

    /// Column index to the right of a 0-based index, within the same bounds
    pub fn next_index(&self, col: u16) -> Result<u16> {
        let letters = CellAddress::column_to_letters(col);
        let next = self.next_column(&letters)?;
        CellAddress::letters_to_column(&next)
    }
}
