//! Geometry kernel: axis-aligned ranges of rotated, line and grouped elements.
//!
//! Element positions address the *unrotated* box, while every alignment
//! computation works on the *visual* box. [`rotation_offset`] converts between
//! the two and must be applied on every write-back of a rotated element.

use crate::elements::{Element, ElementKind};
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding range of `frame` rotated by `rotate` degrees about its center.
///
/// Rotations are taken modulo 360, and a whole turn returns `frame` unchanged.
/// A zero-width box is valid: its diagonal angle is 90°.
pub fn rotated_bounding_range(frame: Rect, rotate: f64) -> Rect {
    let rotate = rotate.rem_euclid(360.0);
    if rotate == 0.0 {
        return frame;
    }

    let width = frame.width();
    let height = frame.height();
    let radius = width.hypot(height) / 2.0;
    let auxiliary_angle = height.atan2(width).to_degrees();

    // Top-left/bottom-right and top-right/bottom-left diagonals after rotation.
    let tlbr = (180.0 - rotate - auxiliary_angle).to_radians();
    let trbl = (auxiliary_angle - rotate).to_radians();

    let center_x = frame.x0 + width / 2.0;
    let center_y = frame.y0 + height / 2.0;

    let xs = [
        center_x + radius * tlbr.cos(),
        center_x + radius * trbl.cos(),
        center_x - radius * tlbr.cos(),
        center_x - radius * trbl.cos(),
    ];
    let ys = [
        center_y - radius * tlbr.sin(),
        center_y - radius * trbl.sin(),
        center_y + radius * tlbr.sin(),
        center_y + radius * trbl.sin(),
    ];

    Rect::new(min_of(&xs), min_of(&ys), max_of(&xs), max_of(&ys))
}

/// Offset from the unrotated box's top-left to the rotated range's top-left.
pub fn rotation_offset(frame: Rect, rotate: f64) -> Vec2 {
    let rotated = rotated_bounding_range(frame, rotate);
    Vec2::new(rotated.x0 - frame.x0, rotated.y0 - frame.y0)
}

/// Rotation offset of an element, zero for lines and unrotated elements.
pub fn element_rotation_offset(element: &Element) -> Vec2 {
    match element.frame_rect() {
        Some(frame) if element.rotate() != 0.0 => rotation_offset(frame, element.rotate()),
        _ => Vec2::ZERO,
    }
}

/// Visual range of a single element on the canvas.
pub fn element_range(element: &Element) -> Rect {
    match &element.kind {
        ElementKind::Line(line) => Rect::new(
            element.left,
            element.top,
            element.left + line.start.x.max(line.end.x),
            element.top + line.start.y.max(line.end.y),
        ),
        kind => {
            let frame = kind.frame().copied().unwrap_or_default();
            let rect = Rect::new(
                element.left,
                element.top,
                element.left + frame.width,
                element.top + frame.height,
            );
            if frame.rotate != 0.0 {
                rotated_bounding_range(rect, frame.rotate)
            } else {
                rect
            }
        }
    }
}

/// Union of the visual ranges of `elements`, or `None` for an empty collection.
pub fn list_range<'a, I>(elements: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a Element>,
{
    elements
        .into_iter()
        .map(element_range)
        .reduce(|acc, range| acc.union(range))
}

/// A candidate alignment line: a coordinate plus the perpendicular extent it covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignLine {
    pub value: f64,
    pub range: [f64; 2],
}

impl AlignLine {
    pub fn new(value: f64, min: f64, max: f64) -> Self {
        Self {
            value,
            range: [min, max],
        }
    }
}

/// Merge lines sharing the exact same value, unioning their ranges.
///
/// The output keeps the order in which each value was first seen.
pub fn merge_align_lines(lines: &[AlignLine]) -> Vec<AlignLine> {
    let mut merged: Vec<AlignLine> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|l| l.value == line.value) {
            Some(existing) => {
                existing.range = [
                    existing.range[0].min(line.range[0]),
                    existing.range[1].max(line.range[1]),
                ];
            }
            None => merged.push(*line),
        }
    }
    merged
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
