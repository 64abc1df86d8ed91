//! # sigsheet-core
//!
//! Core building blocks for the sigsheet petition tracker.
//!
//! This crate provides the pieces the formula generator and the batch
//! assembler are built from:
//! - [`CellAddress`] - A1-style cell addressing
//! - [`RangeDescriptor`] - Sheet-qualified ranges such as `Chart!F28:G31`
//! - [`ColumnArithmetic`] - Bounded single-letter column increments
//! - [`TemporalIndexer`] - Maps an instant to a row of the hourly or daily series
//!
//! ## Example
//!
//! ```rust
//! use sigsheet_core::{ColumnArithmetic, RangeDescriptor};
//!
//! let range = RangeDescriptor::parse("Chart!F28:F31").unwrap();
//! assert_eq!(range.sheet_name(), "Chart");
//! assert_eq!(range.start_row(), 28);
//!
//! let columns = ColumnArithmetic::default();
//! assert_eq!(columns.next_column(&range.start_column()).unwrap(), "G");
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod range;
pub mod temporal;

// Re-exports for convenience
pub use cell::CellAddress;
pub use column::{ColumnArithmetic, ColumnBounds};
pub use error::{Error, Result};
pub use range::{quote_sheet_name, RangeDescriptor};
pub use temporal::{EpochAnchor, SeriesUnit, TemporalConfig, TemporalIndexer};

/// Maximum number of rows in a worksheet
pub const MAX_ROWS: u32 = 10_000_000;

/// Maximum number of columns in a worksheet
pub const MAX_COLS: u16 = 18_278;
