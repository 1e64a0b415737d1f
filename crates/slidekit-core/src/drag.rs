//! Pointer drag of selected elements with live snapping.

use crate::align::CanvasSize;
use crate::config::EditorConfig;
use crate::elements::{Element, ElementId};
use crate::geometry::{element_range, list_range};
use crate::selection::Selection;
use crate::snap::{snap_range_with, AlignmentGuide, GuideSet};
use kurbo::{Point, Rect, Vec2};
use log::debug;
use std::collections::HashMap;

/// State of an in-progress element drag.
///
/// Guides are captured once in [`DragGesture::begin`]. Pointer positions are
/// in screen units and converted to canvas units with the zoom scale.
#[derive(Debug, Clone)]
pub struct DragGesture {
    start_pointer: Point,
    last_pointer: Point,
    scale: f64,
    /// True until the pointer first leaves the misclick box.
    suppressed: bool,
    misclick_threshold: f64,
    snap_tolerance: f64,
    guide_overhang: f64,
    /// Original positions of the elements that move.
    originals: HashMap<ElementId, Point>,
    /// Visual range of the moving elements at gesture start.
    start_range: Rect,
    guides: GuideSet,
    elements: Vec<Element>,
    alignment_guides: Vec<AlignmentGuide>,
}

impl DragGesture {
    /// Start dragging `handle_id` at `pointer`.
    ///
    /// Only the handle moves when it is the sole selection or the active group
    /// element; otherwise every selected element moves with it. Returns `None`
    /// if the handle does not exist or is locked.
    pub fn begin(
        elements: &[Element],
        selection: &Selection,
        handle_id: &str,
        pointer: Point,
        scale: f64,
        canvas: CanvasSize,
        config: &EditorConfig,
    ) -> Option<Self> {
        let handle = elements.iter().find(|e| e.id == handle_id)?;
        if handle.lock {
            debug!("drag ignored: {} is locked", handle_id);
            return None;
        }

        let solo = selection.active_group_element_id.as_deref() == Some(handle_id)
            || selection.active_element_ids.len() <= 1
            || !selection.contains(handle_id);

        let moving: Vec<&Element> = if solo {
            vec![handle]
        } else {
            elements
                .iter()
                .filter(|e| selection.contains(&e.id))
                .collect()
        };
        let start_range = if solo {
            element_range(handle)
        } else {
            list_range(moving.iter().copied())?
        };

        // Siblings of an active group element stay as guides, since only it moves.
        let guides = GuideSet::build(
            elements.iter().filter(|e| {
                if solo {
                    e.id != handle_id
                } else {
                    !selection.contains(&e.id)
                }
            }),
            canvas,
        );

        let originals = moving
            .iter()
            .map(|e| (e.id.clone(), Point::new(e.left, e.top)))
            .collect();

        debug!(
            "drag begin on {} ({} moving, {} h / {} v guides)",
            handle_id,
            moving.len(),
            guides.horizontal.len(),
            guides.vertical.len()
        );

        Some(Self {
            start_pointer: pointer,
            last_pointer: pointer,
            scale: if scale > 0.0 { scale } else { 1.0 },
            suppressed: true,
            misclick_threshold: config.misclick_threshold,
            snap_tolerance: config.snap_tolerance,
            guide_overhang: config.guide_overhang,
            originals,
            start_range,
            guides,
            elements: elements.to_vec(),
            alignment_guides: Vec::new(),
        })
    }

    /// Handle a pointer move. Returns the updated elements, or `None` while the
    /// move is still inside the misclick box.
    ///
    /// With `axis_lock` the drag is constrained to the dominant axis.
    pub fn pointer_move(&mut self, pointer: Point, axis_lock: bool) -> Option<&[Element]> {
        self.last_pointer = pointer;
        let screen_delta = pointer - self.start_pointer;

        if self.suppressed {
            self.suppressed = screen_delta.x.abs() < self.misclick_threshold
                && screen_delta.y.abs() < self.misclick_threshold;
            if self.suppressed {
                return None;
            }
        }

        let mut delta = screen_delta / self.scale;
        if axis_lock {
            if delta.x.abs() > delta.y.abs() {
                delta.y = 0.0;
            } else if delta.x.abs() < delta.y.abs() {
                delta.x = 0.0;
            }
        }

        let target = self.start_range + delta;
        let snap = snap_range_with(target, &self.guides, self.snap_tolerance, self.guide_overhang);
        let delta: Vec2 = delta + snap.offset;
        self.alignment_guides = snap.guides;

        for element in &mut self.elements {
            if let Some(origin) = self.originals.get(&element.id) {
                element.left = origin.x + delta.x;
                element.top = origin.y + delta.y;
            }
        }
        Some(&self.elements)
    }

    /// Guides to display for the last move.
    pub fn alignment_guides(&self) -> &[AlignmentGuide] {
        &self.alignment_guides
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Whether the pointer has left the misclick box.
    pub fn is_dragging(&self) -> bool {
        !self.suppressed
    }

    /// End the gesture. Returns the elements to commit, or `None` when the
    /// drag never left the misclick box or ended where it started.
    pub fn release(self, pointer: Point) -> Option<Vec<Element>> {
        if self.suppressed || pointer == self.start_pointer {
            debug!("drag released without commit");
            return None;
        }
        if pointer != self.last_pointer {
            debug!("drag released away from last move at {:?}", pointer);
        }
        Some(self.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;

    fn canvas() -> CanvasSize {
        CanvasSize::new(1000.0, 0.5625)
    }

    fn shape(id: &str, left: f64, top: f64) -> Element {
        Element::new(id, left, top, ElementKind::shape(50.0, 50.0))
    }

    fn selection(ids: &[&str]) -> Selection {
        let mut selection = Selection::new();
        selection.select(ids.iter().map(|s| s.to_string()).collect());
        selection
    }

    fn find<'a>(elements: &'a [Element], id: &str) -> &'a Element {
        elements.iter().find(|e| e.id == id).unwrap()
    }

    #[test]
    fn test_misclick_suppressed_until_exceeded() {
        let elements = vec![shape("a", 100.0, 100.0)];
        let mut drag = DragGesture::begin(
            &elements,
            &selection(&["a"]),
            "a",
            Point::new(10.0, 10.0),
            1.0,
            canvas(),
            &EditorConfig::default(),
        )
        .unwrap();

        assert!(drag.pointer_move(Point::new(13.0, 14.0), false).is_none());
        assert!(drag.pointer_move(Point::new(40.0, 10.0), false).is_some());
        // Suppression does not come back once lifted.
        let moved = drag.pointer_move(Point::new(12.0, 10.0), false).unwrap();
        assert_eq!(find(moved, "a").left, 102.0);
    }

    #[test]
    fn test_release_inside_misclick_box_commits_nothing() {
        let elements = vec![shape("a", 100.0, 100.0)];
        let mut drag = DragGesture::begin(
            &elements,
            &selection(&["a"]),
            "a",
            Point::ZERO,
            1.0,
            canvas(),
            &EditorConfig::default(),
        )
        .unwrap();
        drag.pointer_move(Point::new(2.0, 2.0), false);
        assert!(drag.release(Point::new(2.0, 2.0)).is_none());
    }

    #[test]
    fn test_release_at_start_commits_nothing() {
        let elements = vec![shape("a", 100.0, 100.0)];
        let mut drag = DragGesture::begin(
            &elements,
            &selection(&["a"]),
            "a",
            Point::ZERO,
            1.0,
            canvas(),
            &EditorConfig::default(),
        )
        .unwrap();
        drag.pointer_move(Point::new(80.0, 80.0), false);
        drag.pointer_move(Point::ZERO, false);
        assert!(drag.release(Point::ZERO).is_none());
    }

    #[test]
    fn test_delta_divided_by_scale() {
        let elements = vec![shape("a", 100.0, 100.0)];
        let mut drag = DragGesture::begin(
            &elements,
            &selection(&["a"]),
            "a",
            Point::ZERO,
            2.0,
            canvas(),
            &EditorConfig::default(),
        )
        .unwrap();
        drag.pointer_move(Point::new(61.0, 41.0), false);
        let committed = drag.release(Point::new(61.0, 41.0)).unwrap();
        assert_eq!((committed[0].left, committed[0].top), (130.5, 120.5));
    }

    #[test]
    fn test_axis_lock_keeps_dominant_axis() {
        let elements = vec![shape("a", 100.0, 100.0)];
        let mut drag = DragGesture::begin(
            &elements,
            &selection(&["a"]),
            "a",
            Point::ZERO,
            1.0,
            canvas(),
            &EditorConfig::default(),
        )
        .unwrap();
        let moved = drag.pointer_move(Point::new(31.0, 17.0), true).unwrap();
        assert_eq!((moved[0].left, moved[0].top), (131.0, 100.0));
    }

    #[test]
    fn test_snaps_to_other_element_edge() {
        let elements = vec![shape("a", 100.0, 100.0), shape("b", 300.0, 300.0)];
        let mut drag = DragGesture::begin(
            &elements,
            &selection(&["a"]),
            "a",
            Point::ZERO,
            1.0,
            canvas(),
            &EditorConfig::default(),
        )
        .unwrap();
        // Right edge lands at 297, three short of b's left edge.
        let moved = drag.pointer_move(Point::new(147.0, 11.0), false).unwrap();
        assert_eq!(find(moved, "a").left, 250.0);
        assert!(!drag.alignment_guides().is_empty());
    }

    #[test]
    fn test_multi_select_moves_together() {
        let elements = vec![shape("a", 100.0, 100.0), shape("b", 200.0, 120.0), shape("c", 600.0, 400.0)];
        let mut drag = DragGesture::begin(
            &elements,
            &selection(&["a", "b"]),
            "a",
            Point::ZERO,
            1.0,
            canvas(),
            &EditorConfig::default(),
        )
        .unwrap();
        let moved = drag.pointer_move(Point::new(21.0, 33.0), false).unwrap();
        assert_eq!((find(moved, "a").left, find(moved, "a").top), (121.0, 133.0));
        assert_eq!((find(moved, "b").left, find(moved, "b").top), (221.0, 153.0));
        assert_eq!(find(moved, "c").left, 600.0);
    }

    #[test]
    fn test_active_group_element_moves_alone_and_snaps_to_sibling() {
        let elements = vec![
            shape("a", 100.0, 100.0).in_group("g"),
            shape("b", 300.0, 120.0).in_group("g"),
        ];
        let mut selection = selection(&["a", "b"]);
        selection.set_active_group_element(Some("b".to_string()));

        let mut drag = DragGesture::begin(
            &elements,
            &selection,
            "b",
            Point::ZERO,
            1.0,
            canvas(),
            &EditorConfig::default(),
        )
        .unwrap();
        let moved = drag.pointer_move(Point::new(-198.0, 11.0), false).unwrap();
        assert_eq!(find(moved, "a").left, 100.0);
        // Snapped onto the sibling's left edge.
        assert_eq!(find(moved, "b").left, 100.0);
    }

    #[test]
    fn test_locked_handle_does_not_drag() {
        let elements = vec![shape("a", 0.0, 0.0).locked()];
        assert!(DragGesture::begin(
            &elements,
            &selection(&["a"]),
            "a",
            Point::ZERO,
            1.0,
            canvas(),
            &EditorConfig::default(),
        )
        .is_none());
    }
}
