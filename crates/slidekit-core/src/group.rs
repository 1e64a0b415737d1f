//! Combining selected elements into groups and splitting them again.

use crate::elements::{generate_id, Element, ElementId, GroupId};
use log::debug;
use std::collections::HashMap;

/// Whether the selection can be combined: at least two elements, not all
/// already in one group.
pub fn can_combine(elements: &[Element], selected: &[ElementId]) -> bool {
    let mut active = elements.iter().filter(|e| selected.contains(&e.id));
    let Some(first) = active.next() else {
        return false;
    };
    let mut count = 1;
    let mut same_group = first.group_id().is_some();
    for element in active {
        count += 1;
        same_group &= element.same_group(first);
    }
    count >= 2 && !same_group
}

/// Put every selected element into a fresh group.
///
/// Members are made contiguous, ending at the level of the topmost selected
/// element. Returns the new elements and group id, or `None` if the selection
/// cannot be combined.
pub fn combine_elements(elements: &[Element], selected: &[ElementId]) -> Option<(Vec<Element>, GroupId)> {
    if !can_combine(elements, selected) {
        return None;
    }
    let group_id = generate_id();

    let top_level = elements.iter().rposition(|e| selected.contains(&e.id))?;
    let (mut members, mut rest): (Vec<Element>, Vec<Element>) = elements
        .iter()
        .cloned()
        .partition(|e| selected.contains(&e.id));
    for member in &mut members {
        member.group_id = Some(group_id.clone());
    }

    let insert_at = top_level + 1 - members.len();
    debug!("combine {} elements into {} at level {}", members.len(), group_id, insert_at);
    rest.splice(insert_at..insert_at, members);
    Some((normalize_groups(rest), group_id))
}

/// Remove group ids from the selected elements. Returns `None` if none were grouped.
pub fn uncombine_elements(elements: &[Element], selected: &[ElementId]) -> Option<Vec<Element>> {
    let grouped = elements
        .iter()
        .any(|e| selected.contains(&e.id) && e.group_id.is_some());
    if !grouped {
        return None;
    }
    let mut updated = elements.to_vec();
    for element in updated.iter_mut().filter(|e| selected.contains(&e.id)) {
        element.group_id = None;
    }
    Some(normalize_groups(updated))
}

/// Strip group ids that are no longer shared by at least two elements.
pub fn normalize_groups(mut elements: Vec<Element>) -> Vec<Element> {
    let mut counts: HashMap<GroupId, usize> = HashMap::new();
    for group_id in elements.iter().filter_map(|e| e.group_id.clone()) {
        *counts.entry(group_id).or_default() += 1;
    }
    for element in &mut elements {
        let shared = element
            .group_id
            .as_ref()
            .is_some_and(|g| counts.get(g).copied().unwrap_or(0) >= 2);
        if !shared {
            element.group_id = None;
        }
    }
    elements
}
