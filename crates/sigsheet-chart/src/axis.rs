//! Axis types

use serde::Serialize;

/// Axis a series is plotted against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AxisPosition {
    #[serde(rename = "BOTTOM_AXIS")]
    Bottom,
    #[default]
    #[serde(rename = "LEFT_AXIS")]
    Left,
    #[serde(rename = "RIGHT_AXIS")]
    Right,
}
