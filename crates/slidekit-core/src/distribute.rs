//! Even distribution of selected elements along one axis.

use crate::elements::{Element, ElementId};
use crate::geometry::{element_range, list_range};
use kurbo::Rect;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn span(self, range: Rect) -> (f64, f64) {
        match self {
            Axis::Horizontal => (range.x0, range.x1),
            Axis::Vertical => (range.y0, range.y1),
        }
    }
}

/// A unit of distribution: one ungrouped element, or every selected member of a group.
#[derive(Debug)]
struct Item<'a> {
    key: &'a str,
    grouped: bool,
    range: Rect,
}

/// Ungrouped elements come first, then groups in first-seen order, so a stable
/// sort puts a lone element ahead of a group starting at the same coordinate.
fn collect_items<'a>(elements: &'a [Element], selected: &[ElementId]) -> Vec<Item<'a>> {
    let mut singles: Vec<Item<'a>> = Vec::new();
    let mut groups: Vec<Item<'a>> = Vec::new();
    for element in elements.iter().filter(|e| selected.contains(&e.id)) {
        let range = element_range(element);
        match element.group_id() {
            Some(group_id) => match groups.iter_mut().find(|i| i.key == group_id) {
                Some(item) => item.range = item.range.union(range),
                None => groups.push(Item {
                    key: group_id,
                    grouped: true,
                    range,
                }),
            },
            None => singles.push(Item {
                key: &element.id,
                grouped: false,
                range,
            }),
        }
    }
    singles.extend(groups);
    singles
}

/// Number of distribution items in the selection: ungrouped elements plus distinct groups.
pub fn display_item_count(elements: &[Element], selected: &[ElementId]) -> usize {
    collect_items(elements, selected).len()
}

/// Space the selected items evenly between the outermost two.
///
/// Items are sorted by their leading coordinate; the first stays put and every
/// following item starts one gap past the end of the previous one. Returns
/// `None` for fewer than two items.
pub fn distribute(elements: &[Element], selected: &[ElementId], axis: Axis) -> Option<Vec<Element>> {
    let mut items = collect_items(elements, selected);
    if items.len() < 2 {
        debug!("distribute skipped: {} item(s)", items.len());
        return None;
    }

    let outer = list_range(elements.iter().filter(|e| selected.contains(&e.id)))?;
    let (outer_min, outer_max) = axis.span(outer);
    items.sort_by(|a, b| axis.span(a.range).0.total_cmp(&axis.span(b.range).0));

    let occupied: f64 = items
        .iter()
        .map(|item| {
            let (min, max) = axis.span(item.range);
            max - min
        })
        .sum();
    let gap = (outer_max - outer_min - occupied) / (items.len() - 1) as f64;
    debug!("distribute {:?}: {} items, gap {}", axis, items.len(), gap);

    // Delta per item, in sorted order.
    let mut deltas: Vec<(&str, bool, f64)> = Vec::with_capacity(items.len());
    let mut cursor = outer_min;
    for item in &items {
        let (min, max) = axis.span(item.range);
        deltas.push((item.key, item.grouped, cursor - min));
        cursor += max - min + gap;
    }

    let distributed = elements
        .iter()
        .map(|element| {
            let mut element = element.clone();
            if selected.contains(&element.id) {
                let delta = deltas.iter().find_map(|(key, grouped, delta)| {
                    let hit = match (grouped, element.group_id()) {
                        (true, Some(group_id)) => *key == group_id,
                        (false, None) => *key == element.id,
                        _ => false,
                    };
                    hit.then_some(*delta)
                });
                if let Some(delta) = delta {
                    match axis {
                        Axis::Horizontal => element.translate(delta, 0.0),
                        Axis::Vertical => element.translate(0.0, delta),
                    }
                }
            }
            element
        })
        .collect();
    Some(distributed)
}
