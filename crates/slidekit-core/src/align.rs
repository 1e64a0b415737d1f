//! Align selected elements to each other or to the canvas.
//!
//! Every computation here works on visual ranges, so translating a rotated
//! element by `target - range` already carries the rotation offset. Lines
//! contribute their larger endpoint as width, as in [`element_range`].

use crate::elements::{Element, ElementId, GroupId};
use crate::geometry::{element_range, list_range};
use kurbo::{Rect, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Alignment command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignCommand {
    Left,
    Right,
    Top,
    Bottom,
    /// Align horizontal centers (x axis).
    HorizontalCenter,
    /// Align vertical centers (y axis).
    VerticalCenter,
    /// Both centers.
    Center,
}

impl AlignCommand {
    /// Offset moving `range` onto `target` for this command.
    fn offset(self, range: Rect, target: Rect) -> Vec2 {
        let center_dx = target.center().x - range.center().x;
        let center_dy = target.center().y - range.center().y;
        match self {
            AlignCommand::Left => Vec2::new(target.x0 - range.x0, 0.0),
            AlignCommand::Right => Vec2::new(target.x1 - range.x1, 0.0),
            AlignCommand::Top => Vec2::new(0.0, target.y0 - range.y0),
            AlignCommand::Bottom => Vec2::new(0.0, target.y1 - range.y1),
            AlignCommand::HorizontalCenter => Vec2::new(center_dx, 0.0),
            AlignCommand::VerticalCenter => Vec2::new(0.0, center_dy),
            AlignCommand::Center => Vec2::new(center_dx, center_dy),
        }
    }
}

/// Logical canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    /// Canvas of the given width with height `width * ratio`.
    pub fn new(viewport_size: f64, viewport_ratio: f64) -> Self {
        Self {
            width: viewport_size,
            height: viewport_size * viewport_ratio,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

fn is_selected(element: &Element, selected: &[ElementId]) -> bool {
    selected.contains(&element.id)
}

/// Collective range of each group, computed over its selected members only.
pub fn selected_group_ranges(elements: &[Element], selected: &[ElementId]) -> HashMap<GroupId, Rect> {
    let mut ranges: HashMap<GroupId, Rect> = HashMap::new();
    for element in elements.iter().filter(|e| is_selected(e, selected)) {
        if let Some(group_id) = element.group_id() {
            let range = element_range(element);
            ranges
                .entry(group_id.to_string())
                .and_modify(|r| *r = r.union(range))
                .or_insert(range);
        }
    }
    ranges
}

/// Align the selected elements against the range of the whole selection.
///
/// Grouped members move together by the delta of their group's range, so a
/// group behaves as one item. Returns `None` when nothing is selected.
pub fn align_selection(
    elements: &[Element],
    selected: &[ElementId],
    command: AlignCommand,
) -> Option<Vec<Element>> {
    let target = list_range(elements.iter().filter(|e| is_selected(e, selected)))?;
    let group_ranges = selected_group_ranges(elements, selected);
    debug!("align {:?} against {:?}", command, target);

    let aligned = elements
        .iter()
        .map(|element| {
            let mut element = element.clone();
            if is_selected(&element, selected) {
                let range = match element.group_id().and_then(|g| group_ranges.get(g)) {
                    Some(group_range) => *group_range,
                    None => element_range(&element),
                };
                let offset = command.offset(range, target);
                element.translate(offset.x, offset.y);
            }
            element
        })
        .collect();
    Some(aligned)
}

/// Move the selection as one block so its range aligns with the canvas.
pub fn align_to_canvas(
    elements: &[Element],
    selected: &[ElementId],
    canvas: CanvasSize,
    command: AlignCommand,
) -> Option<Vec<Element>> {
    let range = list_range(elements.iter().filter(|e| is_selected(e, selected)))?;
    let offset = command.offset(range, canvas.rect());
    debug!("align {:?} to canvas, offset {:?}", command, offset);

    let aligned = elements
        .iter()
        .map(|element| {
            let mut element = element.clone();
            if is_selected(&element, selected) {
                element.translate(offset.x, offset.y);
            }
            element
        })
        .collect();
    Some(aligned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;
    use kurbo::Point;

    const EPS: f64 = 1e-9;

    fn shape(id: &str, left: f64, top: f64, w: f64, h: f64) -> Element {
        Element::new(id, left, top, ElementKind::shape(w, h))
    }

    fn ids(list: &[&str]) -> Vec<ElementId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn find<'a>(elements: &'a [Element], id: &str) -> &'a Element {
        elements.iter().find(|e| e.id == id).unwrap()
    }

    #[test]
    fn test_align_left() {
        let elements = vec![shape("a", 0.0, 0.0, 10.0, 10.0), shape("b", 20.0, 0.0, 10.0, 10.0)];
        let aligned = align_selection(&elements, &ids(&["a", "b"]), AlignCommand::Left).unwrap();
        assert_eq!(find(&aligned, "a").left, 0.0);
        assert_eq!(find(&aligned, "b").left, 0.0);
    }

    #[test]
    fn test_align_right_uses_line_extent() {
        let elements = vec![
            shape("a", 0.0, 0.0, 100.0, 10.0),
            Element::new("l", 0.0, 50.0, ElementKind::line(Point::new(40.0, 0.0), Point::ZERO)),
        ];
        let aligned = align_selection(&elements, &ids(&["a", "l"]), AlignCommand::Right).unwrap();
        assert_eq!(find(&aligned, "a").left, 0.0);
        assert_eq!(find(&aligned, "l").left, 60.0);
    }

    #[test]
    fn test_align_left_applies_rotation_offset() {
        let elements = vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("r", 200.0, 0.0, 100.0, 50.0).rotated(90.0),
        ];
        let aligned = align_selection(&elements, &ids(&["a", "r"]), AlignCommand::Left).unwrap();
        let rotated = find(&aligned, "r");
        // Rotated visual left is left + 25.
        assert!((rotated.left - -25.0).abs() < EPS);
        assert!(element_range(rotated).x0.abs() < EPS);
    }

    #[test]
    fn test_align_center_horizontal() {
        let elements = vec![shape("a", 0.0, 0.0, 100.0, 10.0), shape("b", 0.0, 20.0, 20.0, 10.0)];
        let aligned =
            align_selection(&elements, &ids(&["a", "b"]), AlignCommand::HorizontalCenter).unwrap();
        assert_eq!(find(&aligned, "b").left, 40.0);
        assert_eq!(find(&aligned, "b").top, 20.0);
    }

    #[test]
    fn test_group_moves_as_one_item() {
        let elements = vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("g1", 50.0, 0.0, 10.0, 10.0).in_group("g"),
            shape("g2", 70.0, 20.0, 10.0, 10.0).in_group("g"),
        ];
        let aligned =
            align_selection(&elements, &ids(&["a", "g1", "g2"]), AlignCommand::Left).unwrap();
        assert_eq!(find(&aligned, "g1").left, 0.0);
        assert_eq!(find(&aligned, "g2").left, 20.0);
    }

    #[test]
    fn test_group_aware_every_command() {
        let elements = vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("g1", 50.0, 0.0, 10.0, 10.0).in_group("g"),
            shape("g2", 70.0, 20.0, 10.0, 10.0).in_group("g"),
        ];
        let selected = ids(&["a", "g1", "g2"]);
        let cases = [
            (AlignCommand::Left, (0.0, 0.0), (0.0, 0.0), (20.0, 20.0)),
            (AlignCommand::Right, (70.0, 0.0), (50.0, 0.0), (70.0, 20.0)),
            (AlignCommand::Top, (0.0, 0.0), (50.0, 0.0), (70.0, 20.0)),
            (AlignCommand::Bottom, (0.0, 20.0), (50.0, 0.0), (70.0, 20.0)),
            (AlignCommand::HorizontalCenter, (35.0, 0.0), (25.0, 0.0), (45.0, 20.0)),
            (AlignCommand::VerticalCenter, (0.0, 10.0), (50.0, 0.0), (70.0, 20.0)),
            (AlignCommand::Center, (35.0, 10.0), (25.0, 0.0), (45.0, 20.0)),
        ];
        for (command, a, g1, g2) in cases {
            let aligned = align_selection(&elements, &selected, command).unwrap();
            let pos = |id| {
                let e = find(&aligned, id);
                (e.left, e.top)
            };
            assert_eq!(pos("a"), a, "{:?}", command);
            assert_eq!(pos("g1"), g1, "{:?}", command);
            assert_eq!(pos("g2"), g2, "{:?}", command);
        }
    }

    #[test]
    fn test_align_right_and_bottom_apply_rotation_offset() {
        // Visual range of r is x 225..275, y -25..75.
        let elements = vec![
            shape("r", 200.0, 0.0, 100.0, 50.0).rotated(90.0),
            shape("a", 400.0, 200.0, 10.0, 10.0),
        ];
        let selected = ids(&["r", "a"]);

        let right = align_selection(&elements, &selected, AlignCommand::Right).unwrap();
        let r = find(&right, "r");
        assert!((r.left - 335.0).abs() < EPS);
        assert!((element_range(r).x1 - 410.0).abs() < EPS);
        assert_eq!(find(&right, "a").left, 400.0);

        let bottom = align_selection(&elements, &selected, AlignCommand::Bottom).unwrap();
        let r = find(&bottom, "r");
        assert!((r.top - 135.0).abs() < EPS);
        assert!((element_range(r).y1 - 210.0).abs() < EPS);
        assert_eq!(find(&bottom, "a").top, 200.0);
    }

    #[test]
    fn test_unselected_elements_untouched() {
        let elements = vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("b", 20.0, 0.0, 10.0, 10.0),
            shape("c", 40.0, 0.0, 10.0, 10.0),
        ];
        let aligned = align_selection(&elements, &ids(&["b", "c"]), AlignCommand::Left).unwrap();
        assert_eq!(find(&aligned, "a").left, 0.0);
        assert_eq!(find(&aligned, "c").left, 20.0);
    }

    #[test]
    fn test_empty_selection_is_none() {
        let elements = vec![shape("a", 0.0, 0.0, 10.0, 10.0)];
        assert!(align_selection(&elements, &[], AlignCommand::Top).is_none());
        let canvas = CanvasSize::new(1000.0, 0.5625);
        assert!(align_to_canvas(&elements, &[], canvas, AlignCommand::Top).is_none());
    }

    #[test]
    fn test_canvas_moves_selection_as_block() {
        let canvas = CanvasSize::new(1000.0, 0.5625);
        let elements = vec![shape("a", 100.0, 100.0, 10.0, 10.0), shape("b", 150.0, 200.0, 10.0, 10.0)];
        let selected = ids(&["a", "b"]);

        let right = align_to_canvas(&elements, &selected, canvas, AlignCommand::Right).unwrap();
        assert_eq!(find(&right, "b").left, 990.0);
        assert_eq!(find(&right, "a").left, 940.0);

        let bottom = align_to_canvas(&elements, &selected, canvas, AlignCommand::Bottom).unwrap();
        assert_eq!(find(&bottom, "b").top, 552.5);
        assert_eq!(find(&bottom, "a").top, 452.5);
    }

    #[test]
    fn test_canvas_single_axis_commands() {
        let canvas = CanvasSize::new(1000.0, 0.5625);
        let elements = vec![shape("a", 100.0, 100.0, 10.0, 10.0), shape("b", 150.0, 200.0, 10.0, 10.0)];
        let selected = ids(&["a", "b"]);
        let cases = [
            (AlignCommand::Left, (0.0, 100.0), (50.0, 200.0)),
            (AlignCommand::HorizontalCenter, (470.0, 100.0), (520.0, 200.0)),
            (AlignCommand::VerticalCenter, (100.0, 226.25), (150.0, 326.25)),
        ];
        for (command, a, b) in cases {
            let aligned = align_to_canvas(&elements, &selected, canvas, command).unwrap();
            let pos = |id| {
                let e = find(&aligned, id);
                (e.left, e.top)
            };
            assert_eq!(pos("a"), a, "{:?}", command);
            assert_eq!(pos("b"), b, "{:?}", command);
        }
    }

    #[test]
    fn test_canvas_top_only_moves_vertically() {
        let canvas = CanvasSize::new(1000.0, 0.5625);
        let elements = vec![shape("a", 100.0, 100.0, 10.0, 10.0)];
        let top = align_to_canvas(&elements, &ids(&["a"]), canvas, AlignCommand::Top).unwrap();
        assert_eq!((top[0].left, top[0].top), (100.0, 0.0));
    }

    #[test]
    fn test_canvas_center() {
        let canvas = CanvasSize::new(1000.0, 0.5);
        let elements = vec![shape("a", 0.0, 0.0, 100.0, 100.0)];
        let centered = align_to_canvas(&elements, &ids(&["a"]), canvas, AlignCommand::Center).unwrap();
        assert_eq!((centered[0].left, centered[0].top), (450.0, 200.0));
    }
}
