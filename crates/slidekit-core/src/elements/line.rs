//! Line element.

use super::SerializableColor;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Stroke style for lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

/// A line between two endpoints, both relative to the element's `left`/`top`.
///
/// Lines carry no height or rotation: their box always starts at the element
/// origin and extends to the larger endpoint on each axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineElement {
    pub width: f64,
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub style: LineStyle,
    #[serde(default)]
    pub color: SerializableColor,
    /// Elbow point for broken lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broken: Option<Point>,
    /// Control point for quadratic curves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<Point>,
    /// Control points for cubic curves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cubic: Option<[Point; 2]>,
}

impl LineElement {
    pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

    pub fn new(start: Point, end: Point) -> Self {
        Self {
            width: Self::DEFAULT_STROKE_WIDTH,
            start,
            end,
            style: LineStyle::default(),
            color: SerializableColor::black(),
            broken: None,
            curve: None,
            cubic: None,
        }
    }
}
