//! Snap guides for aligning a dragged selection to other elements and the canvas.

use crate::align::CanvasSize;
use crate::config::{GUIDE_OVERHANG, SNAP_TOLERANCE};
use crate::elements::Element;
use crate::geometry::{element_range, merge_align_lines, AlignLine};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Candidate lines a dragged selection can snap to.
///
/// Horizontal lines hold a y value and an x extent; vertical lines hold an x
/// value and a y extent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuideSet {
    pub horizontal: Vec<AlignLine>,
    pub vertical: Vec<AlignLine>,
}

impl GuideSet {
    /// Build guides from element edges and centers plus the canvas edges and center.
    ///
    /// Lines are skipped. Rotated elements contribute their visual range.
    pub fn build<'a, I>(elements: I, canvas: CanvasSize) -> Self
    where
        I: IntoIterator<Item = &'a Element>,
    {
        let mut horizontal = Vec::new();
        let mut vertical = Vec::new();

        for element in elements.into_iter().filter(|e| !e.is_line()) {
            let range = element_range(element);
            let center = range.center();
            for y in [range.y0, range.y1, center.y] {
                horizontal.push(AlignLine::new(y, range.x0, range.x1));
            }
            for x in [range.x0, range.x1, center.x] {
                vertical.push(AlignLine::new(x, range.y0, range.y1));
            }
        }

        let (width, height) = (canvas.width, canvas.height);
        for y in [0.0, height, height / 2.0] {
            horizontal.push(AlignLine::new(y, 0.0, width));
        }
        for x in [0.0, width, width / 2.0] {
            vertical.push(AlignLine::new(x, 0.0, height));
        }

        Self {
            horizontal: merge_align_lines(&horizontal),
            vertical: merge_align_lines(&vertical),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }
}

/// Orientation of a displayed guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    Horizontal,
    Vertical,
}

/// A guide line to display while snapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentGuide {
    pub orientation: GuideOrientation,
    /// Start of the line on the canvas.
    pub origin: Point,
    pub length: f64,
}

impl AlignmentGuide {
    fn new(orientation: GuideOrientation, line: &AlignLine, target: (f64, f64), overhang: f64) -> Self {
        let min = line.range[0].min(line.range[1]).min(target.0).min(target.1);
        let max = line.range[0].max(line.range[1]).max(target.0).max(target.1);
        let origin = match orientation {
            GuideOrientation::Horizontal => Point::new(min - overhang, line.value),
            GuideOrientation::Vertical => Point::new(line.value, min - overhang),
        };
        Self {
            orientation,
            origin,
            length: max - min + 2.0 * overhang,
        }
    }
}

/// Result of snapping a range against a guide set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    /// Correction to add to the range position.
    pub offset: Vec2,
    pub guides: Vec<AlignmentGuide>,
}

impl SnapResult {
    pub fn snapped_x(&self) -> bool {
        self.guides
            .iter()
            .any(|g| g.orientation == GuideOrientation::Vertical)
    }

    pub fn snapped_y(&self) -> bool {
        self.guides
            .iter()
            .any(|g| g.orientation == GuideOrientation::Horizontal)
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        !self.guides.is_empty()
    }
}

/// Snap `target` to `guides` with the default tolerance and overhang.
pub fn snap_range(target: Rect, guides: &GuideSet) -> SnapResult {
    snap_range_with(target, guides, SNAP_TOLERANCE, GUIDE_OVERHANG)
}

/// Snap `target` to `guides`.
///
/// Lines are visited in order and each is tested against the range's min, max
/// and center in that order. The first hit per axis wins and later lines on
/// that axis are ignored. A hit is strictly closer than `tolerance`.
pub fn snap_range_with(target: Rect, guides: &GuideSet, tolerance: f64, overhang: f64) -> SnapResult {
    let mut result = SnapResult::default();
    let center = target.center();

    let y_edges = [target.y0, target.y1, center.y];
    if let Some((line, edge)) = first_hit(&guides.horizontal, &y_edges, tolerance) {
        result.offset.y = line.value - edge;
        result.guides.push(AlignmentGuide::new(
            GuideOrientation::Horizontal,
            line,
            (target.x0, target.x1),
            overhang,
        ));
    }

    let x_edges = [target.x0, target.x1, center.x];
    if let Some((line, edge)) = first_hit(&guides.vertical, &x_edges, tolerance) {
        result.offset.x = line.value - edge;
        result.guides.push(AlignmentGuide::new(
            GuideOrientation::Vertical,
            line,
            (target.y0, target.y1),
            overhang,
        ));
    }

    result
}

fn first_hit<'a>(lines: &'a [AlignLine], edges: &[f64; 3], tolerance: f64) -> Option<(&'a AlignLine, f64)> {
    lines.iter().find_map(|line| {
        edges
            .iter()
            .find(|edge| (*edge - line.value).abs() < tolerance)
            .map(|edge| (line, *edge))
    })
}
