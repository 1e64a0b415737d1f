//! Selection state.

use crate::elements::{Element, ElementId};
use serde::{Deserialize, Serialize};

/// Which elements the user has selected on the current slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub active_element_ids: Vec<ElementId>,
    /// A group member picked out for independent editing.
    pub active_group_element_id: Option<ElementId>,
    /// The element the current interaction is anchored on.
    pub handle_element_id: Option<ElementId>,
    pub hidden_element_ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select exactly `ids`, anchoring on the first one.
    pub fn select(&mut self, ids: Vec<ElementId>) {
        self.handle_element_id = ids.first().cloned();
        self.active_element_ids = ids;
        self.active_group_element_id = None;
    }

    /// Select an element, expanding to its whole group.
    pub fn select_element(&mut self, elements: &[Element], id: &str) {
        let Some(target) = elements.iter().find(|e| e.id == id) else {
            return;
        };
        let ids = match target.group_id() {
            Some(group_id) => elements
                .iter()
                .filter(|e| e.group_id() == Some(group_id))
                .map(|e| e.id.clone())
                .collect(),
            None => vec![target.id.clone()],
        };
        self.active_element_ids = ids;
        self.handle_element_id = Some(target.id.clone());
        self.active_group_element_id = None;
    }

    /// Pick one member of a selected group for independent editing.
    pub fn set_active_group_element(&mut self, id: Option<ElementId>) {
        self.active_group_element_id = id.filter(|id| self.active_element_ids.contains(id));
    }

    pub fn clear(&mut self) {
        self.active_element_ids.clear();
        self.active_group_element_id = None;
        self.handle_element_id = None;
    }

    pub fn is_empty(&self) -> bool {
        self.active_element_ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.active_element_ids.iter().any(|selected| selected == id)
    }

    pub fn hide(&mut self, id: ElementId) {
        if !self.hidden_element_ids.contains(&id) {
            self.hidden_element_ids.push(id);
        }
    }

    pub fn show(&mut self, id: &str) {
        self.hidden_element_ids.retain(|hidden| hidden != id);
    }

    /// Select every element that is neither locked nor hidden.
    pub fn select_all(&mut self, elements: &[Element]) {
        let ids: Vec<ElementId> = elements
            .iter()
            .filter(|e| !e.lock && !self.hidden_element_ids.contains(&e.id))
            .map(|e| e.id.clone())
            .collect();
        self.select(ids);
    }
}

/// Elements of `slide` currently selected, in z-order.
pub fn active_elements<'a>(elements: &'a [Element], selection: &Selection) -> Vec<&'a Element> {
    elements
        .iter()
        .filter(|e| selection.contains(&e.id))
        .collect()
}
