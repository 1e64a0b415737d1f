//! Lock, nudge and delete operations on the selection.

use crate::elements::{Element, ElementId};
use crate::group::normalize_groups;
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// Direction for keyboard nudging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Default nudge distance in canvas units.
pub const NUDGE_STEP: f64 = 1.0;

/// Ids an operation should act on: the active group element if any, else the selection.
fn targets(selection: &Selection) -> Vec<ElementId> {
    match &selection.active_group_element_id {
        Some(id) => vec![id.clone()],
        None => selection.active_element_ids.clone(),
    }
}

/// Lock every selected element. Returns `None` for an empty selection.
pub fn lock_elements(elements: &[Element], selected: &[ElementId]) -> Option<Vec<Element>> {
    if selected.is_empty() {
        return None;
    }
    let mut updated = elements.to_vec();
    for element in updated.iter_mut().filter(|e| selected.contains(&e.id)) {
        element.lock = true;
    }
    Some(updated)
}

/// Unlock an element, or its whole group when grouped.
///
/// Returns the new elements and the ids to select afterwards.
pub fn unlock_element(elements: &[Element], id: &str) -> Option<(Vec<Element>, Vec<ElementId>)> {
    let target = elements.iter().find(|e| e.id == id)?;
    let group_id = target.group_id().map(str::to_string);

    let mut updated = elements.to_vec();
    let mut unlocked = Vec::new();
    for element in &mut updated {
        let hit = match &group_id {
            Some(group_id) => element.group_id() == Some(group_id.as_str()),
            None => element.id == id,
        };
        if hit {
            element.lock = false;
            unlocked.push(element.id.clone());
        }
    }
    Some((updated, unlocked))
}

/// Nudge the active group element, or every selected element, by `step`.
pub fn move_elements(
    elements: &[Element],
    selection: &Selection,
    direction: MoveDirection,
    step: f64,
) -> Option<Vec<Element>> {
    let targets = targets(selection);
    if targets.is_empty() {
        return None;
    }
    let (dx, dy) = match direction {
        MoveDirection::Left => (-step, 0.0),
        MoveDirection::Right => (step, 0.0),
        MoveDirection::Up => (0.0, -step),
        MoveDirection::Down => (0.0, step),
    };
    let mut updated = elements.to_vec();
    for element in updated.iter_mut().filter(|e| targets.contains(&e.id)) {
        element.translate(dx, dy);
    }
    Some(updated)
}

/// Delete the active group element, or every selected element.
///
/// A group left with a single member is dissolved.
pub fn delete_elements(elements: &[Element], selection: &Selection) -> Option<Vec<Element>> {
    let targets = targets(selection);
    if targets.is_empty() {
        return None;
    }
    let remaining = elements
        .iter()
        .filter(|e| !targets.contains(&e.id))
        .cloned()
        .collect();
    Some(normalize_groups(remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;

    fn el(id: &str) -> Element {
        Element::new(id, 10.0, 10.0, ElementKind::shape(10.0, 10.0))
    }

    fn selection(ids: &[&str]) -> Selection {
        let mut selection = Selection::new();
        selection.select(ids.iter().map(|s| s.to_string()).collect());
        selection
    }

    #[test]
    fn test_lock() {
        let elements = vec![el("a"), el("b")];
        let out = lock_elements(&elements, &["a".to_string()]).unwrap();
        assert!(out[0].lock);
        assert!(!out[1].lock);
        assert!(lock_elements(&elements, &[]).is_none());
    }

    #[test]
    fn test_unlock_group_member_unlocks_group() {
        let elements = vec![
            el("a").in_group("g").locked(),
            el("b").in_group("g").locked(),
            el("c").locked(),
        ];
        let (out, selected) = unlock_element(&elements, "a").unwrap();
        assert_eq!(selected, vec!["a", "b"]);
        assert!(!out[0].lock && !out[1].lock);
        assert!(out[2].lock);
    }

    #[test]
    fn test_nudge_selection() {
        let elements = vec![el("a"), el("b"), el("c")];
        let out = move_elements(&elements, &selection(&["a", "b"]), MoveDirection::Left, 5.0).unwrap();
        assert_eq!(out[0].left, 5.0);
        assert_eq!(out[1].left, 5.0);
        assert_eq!(out[2].left, 10.0);
    }

    #[test]
    fn test_nudge_active_group_element_only() {
        let elements = vec![el("a").in_group("g"), el("b").in_group("g")];
        let mut selection = selection(&["a", "b"]);
        selection.set_active_group_element(Some("b".to_string()));
        let out = move_elements(&elements, &selection, MoveDirection::Down, NUDGE_STEP).unwrap();
        assert_eq!(out[0].top, 10.0);
        assert_eq!(out[1].top, 11.0);
    }

    #[test]
    fn test_delete_active_group_element_dissolves_pair() {
        let elements = vec![el("a").in_group("g"), el("b").in_group("g"), el("c")];
        let mut selection = selection(&["a", "b"]);
        selection.set_active_group_element(Some("a".to_string()));
        let out = delete_elements(&elements, &selection).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "b");
        assert!(out[0].group_id.is_none());
    }

    #[test]
    fn test_delete_selection() {
        let elements = vec![el("a"), el("b"), el("c")];
        let out = delete_elements(&elements, &selection(&["a", "c"])).unwrap();
        assert_eq!(out.len(), 1);
        assert!(delete_elements(&elements, &Selection::new()).is_none());
    }
}
