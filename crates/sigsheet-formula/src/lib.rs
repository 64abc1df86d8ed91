//! # sigsheet-formula
//!
//! Formula construction for sigsheet.
//!
//! This crate provides:
//! - A small formula AST with operator overloads and text serialization
//! - [`FormulaCell`] - a literal, a formula, or the `-` placeholder
//! - [`WriteOperation`] - a block of cells bound for one range
//! - [`RollingAggregateGenerator`] - rolling, daily and weekly summaries
//!
//! Formulas are only built, never evaluated.
//!
//! ## Example
//!
//! ```rust
//! use sigsheet_core::CellAddress;
//! use sigsheet_formula::FormulaExpr;
//!
//! let now = FormulaExpr::cell(Some("Hourly"), CellAddress::parse("B100").unwrap());
//! let before = FormulaExpr::cell(Some("Hourly"), CellAddress::parse("B94").unwrap());
//! assert_eq!((now - before).to_string(), "'Hourly'!B100-'Hourly'!B94");
//! ```

pub mod ast;
pub mod cell;
pub mod error;
pub mod rolling;
pub mod write;

pub use ast::{BinaryOperator, CellReference, FormulaExpr, RangeReference};
pub use cell::{FormulaCell, PLACEHOLDER};
pub use error::{FormulaError, FormulaResult};
pub use rolling::{OffsetPolicy, RollingAggregateGenerator, SeriesColumn};
pub use write::{MajorDimension, WriteOperation};
