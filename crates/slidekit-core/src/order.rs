//! Z-order changes for single and grouped elements.
//!
//! Index 0 of a slide's element list is the bottom layer. A grouped target
//! moves with every member of its group as one contiguous unit.

use crate::elements::Element;
use log::debug;
use serde::{Deserialize, Serialize};

/// Layer command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderCommand {
    /// One layer towards the front.
    Up,
    /// One layer towards the back.
    Down,
    /// Frontmost.
    Top,
    /// Backmost.
    Bottom,
}

/// Reorder `target_id` (and its group) within `elements`.
///
/// Returns `None` when the target does not exist or is already at the boundary
/// the command moves towards.
pub fn reorder(elements: &[Element], target_id: &str, command: OrderCommand) -> Option<Vec<Element>> {
    let target = elements.iter().find(|e| e.id == target_id)?;

    let in_unit = |e: &Element| match target.group_id() {
        Some(group_id) => e.group_id() == Some(group_id),
        None => e.id == target.id,
    };

    let levels: Vec<usize> = elements
        .iter()
        .enumerate()
        .filter(|&(_, e)| in_unit(e))
        .map(|(i, _)| i)
        .collect();
    let min_level = *levels.first()?;
    let max_level = *levels.last()?;

    let (unit, mut rest): (Vec<Element>, Vec<Element>) =
        elements.iter().cloned().partition(|e| in_unit(e));

    let insert_at = match command {
        OrderCommand::Up => {
            let next = elements.get(max_level + 1)?;
            let next_pos = rest.iter().position(|e| e.id == next.id)?;
            match next.group_id() {
                // Jump over the whole neighbouring group.
                Some(group_id) => rest
                    .iter()
                    .rposition(|e| e.group_id() == Some(group_id))
                    .map_or(next_pos + 1, |last| last + 1),
                None => next_pos + 1,
            }
        }
        OrderCommand::Down => {
            let prev = elements.get(min_level.checked_sub(1)?)?;
            let prev_pos = rest.iter().position(|e| e.id == prev.id)?;
            match prev.group_id() {
                Some(group_id) => rest
                    .iter()
                    .position(|e| e.group_id() == Some(group_id))
                    .unwrap_or(prev_pos),
                None => prev_pos,
            }
        }
        OrderCommand::Top => {
            if max_level == elements.len() - 1 {
                debug!("{} already at top", target_id);
                return None;
            }
            rest.len()
        }
        OrderCommand::Bottom => {
            if min_level == 0 {
                debug!("{} already at bottom", target_id);
                return None;
            }
            0
        }
    };

    rest.splice(insert_at..insert_at, unit);
    Some(rest)
}
