//! Cell addressing
//!
//! - [`CellAddress`] - A cell's location (e.g., "F28")

mod address;

pub use address::CellAddress;
