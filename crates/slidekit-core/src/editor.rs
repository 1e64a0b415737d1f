//! Editor state and command dispatch.
//!
//! Every mutating command replaces the current slide's element list and
//! schedules a debounced history record. [`Editor::tick`] performs the record
//! once the debounce delay has passed.

use crate::align::{align_selection, align_to_canvas, AlignCommand};
use crate::config::EditorConfig;
use crate::distribute::{display_item_count, distribute, Axis};
use crate::drag::DragGesture;
use crate::edit::{delete_elements, lock_elements, move_elements, unlock_element, MoveDirection};
use crate::elements::{Element, ElementId};
use crate::group::{can_combine, combine_elements, uncombine_elements};
use crate::history::{HistoryLog, HistoryResult};
use crate::order::{reorder, OrderCommand};
use crate::schedule::{Debouncer, Throttle};
use crate::selection::{active_elements, Selection};
use crate::slides::{Deck, Slide};
use crate::snap::AlignmentGuide;
use crate::storage::SnapshotStore;
use kurbo::Point;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A user command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "camelCase")]
pub enum EditorCommand {
    Select(Vec<ElementId>),
    /// Select an element together with its group.
    SelectElement(ElementId),
    SelectAll,
    ClearSelection,
    SetActiveGroupElement(Option<ElementId>),
    Align(AlignCommand),
    AlignToCanvas(AlignCommand),
    Distribute(Axis),
    /// Change the layer of the handle element.
    Order(OrderCommand),
    Combine,
    Uncombine,
    Lock,
    Unlock(ElementId),
    Move { direction: MoveDirection, step: f64 },
    Delete,
    DeleteAll,
    AddElement(Element),
    AddSlide,
    DeleteSlide(String),
    GoToSlide(usize),
    Undo,
    Redo,
}

struct ActiveDrag {
    gesture: DragGesture,
    start_elements: Vec<Element>,
}

/// Editor state over a deck, with history persisted in `S`.
pub struct Editor<S> {
    deck: Deck,
    selection: Selection,
    config: EditorConfig,
    history: HistoryLog<S>,
    record_debounce: Debouncer,
    undo_throttle: Throttle,
    drag: Option<ActiveDrag>,
}

impl<S: SnapshotStore> Editor<S> {
    pub fn new(deck: Deck, store: S, config: EditorConfig) -> Self {
        Self {
            deck,
            selection: Selection::new(),
            history: HistoryLog::with_limit(store, config.history_limit),
            record_debounce: Debouncer::new(config.record_debounce()),
            undo_throttle: Throttle::new(config.undo_throttle()),
            config,
            drag: None,
        }
    }

    /// Reset history to the current deck.
    pub async fn init(&mut self) -> HistoryResult<()> {
        self.record_debounce.cancel();
        self.history.init(&self.deck).await
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn into_deck(self) -> Deck {
        self.deck
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryLog<S> {
        &self.history
    }

    pub fn active_elements(&self) -> Vec<&Element> {
        active_elements(self.deck.current_elements(), &self.selection)
    }

    pub fn can_combine(&self) -> bool {
        can_combine(self.deck.current_elements(), &self.selection.active_element_ids)
    }

    pub fn display_item_count(&self) -> usize {
        display_item_count(self.deck.current_elements(), &self.selection.active_element_ids)
    }

    /// Whether a history record is waiting for the debounce delay.
    pub fn has_pending_record(&self) -> bool {
        self.record_debounce.is_pending()
    }

    /// Apply a command. Returns whether the deck changed.
    pub async fn execute(&mut self, command: EditorCommand, now: Instant) -> HistoryResult<bool> {
        debug!("execute {:?}", command);
        let elements = self.deck.current_elements();
        let selected = &self.selection.active_element_ids;

        let updated = match command {
            EditorCommand::Select(ids) => {
                self.selection.select(ids);
                None
            }
            EditorCommand::SelectElement(id) => {
                self.selection.select_element(elements, &id);
                None
            }
            EditorCommand::SelectAll => {
                self.selection.select_all(elements);
                None
            }
            EditorCommand::ClearSelection => {
                self.selection.clear();
                None
            }
            EditorCommand::SetActiveGroupElement(id) => {
                self.selection.set_active_group_element(id);
                None
            }
            EditorCommand::Align(command) => align_selection(elements, selected, command),
            EditorCommand::AlignToCanvas(command) => {
                let canvas = self.deck.canvas_size(self.config.viewport_size);
                align_to_canvas(elements, selected, canvas, command)
            }
            EditorCommand::Distribute(axis) => distribute(elements, selected, axis),
            EditorCommand::Order(command) => match &self.selection.handle_element_id {
                Some(handle) => reorder(elements, handle, command),
                None => None,
            },
            EditorCommand::Combine => combine_elements(elements, selected).map(|(elements, _)| elements),
            EditorCommand::Uncombine => {
                let updated = uncombine_elements(elements, selected);
                if updated.is_some() {
                    let handle = self.selection.handle_element_id.clone();
                    self.selection.select(handle.into_iter().collect());
                }
                updated
            }
            EditorCommand::Lock => {
                let updated = lock_elements(elements, selected);
                if updated.is_some() {
                    self.selection.clear();
                }
                updated
            }
            EditorCommand::Unlock(id) => match unlock_element(elements, &id) {
                Some((updated, unlocked)) => {
                    self.selection.select(unlocked);
                    self.selection.handle_element_id = Some(id);
                    Some(updated)
                }
                None => None,
            },
            EditorCommand::Move { direction, step } => {
                move_elements(elements, &self.selection, direction, step)
            }
            EditorCommand::Delete => {
                let updated = delete_elements(elements, &self.selection);
                if updated.is_some() {
                    self.selection.clear();
                }
                updated
            }
            EditorCommand::DeleteAll => {
                self.selection.clear();
                Some(Vec::new())
            }
            EditorCommand::AddElement(element) => {
                let id = element.id.clone();
                if self.deck.add_element(element) {
                    self.selection.select(vec![id]);
                    self.schedule_record(now);
                    return Ok(true);
                }
                None
            }
            EditorCommand::AddSlide => {
                self.deck.add_slide(Slide::with_generated_id());
                self.selection.clear();
                self.schedule_record(now);
                return Ok(true);
            }
            EditorCommand::DeleteSlide(id) => {
                if self.deck.delete_slide(&id) {
                    self.selection.clear();
                    self.schedule_record(now);
                    return Ok(true);
                }
                None
            }
            EditorCommand::GoToSlide(index) => {
                self.deck.update_slide_index(index);
                self.selection.clear();
                return Ok(false);
            }
            EditorCommand::Undo => return self.undo(now).await,
            EditorCommand::Redo => return self.redo(now).await,
        };

        match updated {
            Some(elements) => {
                self.commit(elements, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn commit(&mut self, elements: Vec<Element>, now: Instant) {
        if self.deck.update_slide_elements(elements) {
            self.schedule_record(now);
        }
    }

    fn schedule_record(&mut self, now: Instant) {
        self.record_debounce.schedule(now);
    }

    /// Record history if the debounce delay has passed. Returns whether a record was written.
    pub async fn tick(&mut self, now: Instant) -> HistoryResult<bool> {
        if self.record_debounce.poll(now) {
            self.history.record(&self.deck).await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Record any pending change immediately.
    pub async fn flush(&mut self) -> HistoryResult<bool> {
        if self.record_debounce.flush() {
            self.history.record(&self.deck).await?;
            return Ok(true);
        }
        Ok(false)
    }

    async fn undo(&mut self, now: Instant) -> HistoryResult<bool> {
        if !self.undo_throttle.try_fire(now) {
            debug!("undo throttled");
            return Ok(false);
        }
        self.flush().await?;
        match self.history.undo().await? {
            Some(snapshot) => {
                self.install(snapshot.slides, snapshot.index);
                info!("undo to {:?}", self.history.cursor());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn redo(&mut self, now: Instant) -> HistoryResult<bool> {
        if !self.undo_throttle.try_fire(now) {
            debug!("redo throttled");
            return Ok(false);
        }
        self.flush().await?;
        match self.history.redo().await? {
            Some(snapshot) => {
                self.install(snapshot.slides, snapshot.index);
                info!("redo to {:?}", self.history.cursor());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn install(&mut self, slides: Vec<Slide>, index: usize) {
        self.drag = None;
        self.deck.set_slides(slides);
        self.deck.update_slide_index(index);
        self.selection.clear();
    }

    /// Start dragging `handle_id`, selecting it first if needed.
    ///
    /// `scale` is the canvas zoom (screen units per canvas unit).
    pub fn begin_drag(&mut self, handle_id: &str, pointer: Point, scale: f64) -> bool {
        let elements = self.deck.current_elements();
        if !self.selection.contains(handle_id) {
            self.selection.select_element(elements, handle_id);
        }
        let canvas = self.deck.canvas_size(self.config.viewport_size);
        let gesture = DragGesture::begin(
            elements,
            &self.selection,
            handle_id,
            pointer,
            scale,
            canvas,
            &self.config,
        );
        self.drag = gesture.map(|gesture| ActiveDrag {
            gesture,
            start_elements: elements.to_vec(),
        });
        self.drag.is_some()
    }

    /// Move the active drag. Returns whether the elements moved.
    pub fn drag_to(&mut self, pointer: Point, axis_lock: bool) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        match drag.gesture.pointer_move(pointer, axis_lock) {
            Some(elements) => {
                let elements = elements.to_vec();
                self.deck.update_slide_elements(elements)
            }
            None => false,
        }
    }

    /// Guides to display for the active drag.
    pub fn alignment_guides(&self) -> &[AlignmentGuide] {
        self.drag
            .as_ref()
            .map(|d| d.gesture.alignment_guides())
            .unwrap_or(&[])
    }

    /// Finish the active drag. Returns whether a change was committed.
    pub fn end_drag(&mut self, pointer: Point, now: Instant) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        match drag.gesture.release(pointer) {
            Some(elements) => {
                self.commit(elements, now);
                true
            }
            None => {
                self.deck.update_slide_elements(drag.start_elements);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;
    use crate::storage::MemoryStore;
    use pollster::block_on;
    use std::time::Duration;

    fn shape(id: &str, left: f64, top: f64) -> Element {
        Element::new(id, left, top, ElementKind::shape(10.0, 10.0))
    }

    fn editor(elements: Vec<Element>) -> Editor<MemoryStore> {
        let deck = Deck::new(vec![Slide::new("s0").with_elements(elements)]);
        let mut editor = Editor::new(deck, MemoryStore::new(), EditorConfig::default());
        block_on(editor.init()).unwrap();
        editor
    }

    fn ids(list: &[&str]) -> Vec<ElementId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn order(editor: &Editor<MemoryStore>) -> Vec<String> {
        editor.deck().current_elements().iter().map(|e| e.id.clone()).collect()
    }

    /// Execute and let the debounce settle.
    fn run(editor: &mut Editor<MemoryStore>, command: EditorCommand, now: &mut Instant) -> bool {
        let changed = block_on(editor.execute(command, *now)).unwrap();
        *now += Duration::from_millis(400);
        block_on(editor.tick(*now)).unwrap();
        changed
    }

    #[test]
    fn test_align_records_after_debounce() {
        let mut editor = editor(vec![shape("a", 0.0, 0.0), shape("b", 20.0, 30.0)]);
        let start = Instant::now();
        block_on(editor.execute(EditorCommand::Select(ids(&["a", "b"])), start)).unwrap();
        assert!(block_on(editor.execute(EditorCommand::Align(AlignCommand::Left), start)).unwrap());
        assert_eq!(editor.deck().current_elements()[1].left, 0.0);

        assert!(!block_on(editor.tick(start + Duration::from_millis(100))).unwrap());
        assert!(block_on(editor.tick(start + Duration::from_millis(300))).unwrap());
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_rapid_edits_record_once() {
        let mut editor = editor(vec![shape("a", 0.0, 0.0)]);
        let start = Instant::now();
        block_on(editor.execute(EditorCommand::Select(ids(&["a"])), start)).unwrap();
        for i in 0..5 {
            let now = start + Duration::from_millis(i * 100);
            let nudge = EditorCommand::Move {
                direction: MoveDirection::Right,
                step: 1.0,
            };
            block_on(editor.execute(nudge, now)).unwrap();
            block_on(editor.tick(now)).unwrap();
        }
        block_on(editor.tick(start + Duration::from_millis(1000))).unwrap();
        assert_eq!(editor.history().len(), 2);
        assert_eq!(editor.deck().current_elements()[0].left, 5.0);
    }

    #[test]
    fn test_undo_restores_and_clears_selection() {
        let mut editor = editor(vec![shape("a", 0.0, 0.0), shape("b", 0.0, 0.0), shape("c", 0.0, 0.0)]);
        let mut now = Instant::now();
        run(&mut editor, EditorCommand::SelectElement("a".to_string()), &mut now);
        assert!(run(&mut editor, EditorCommand::Order(OrderCommand::Top), &mut now));
        assert_eq!(order(&editor), vec!["b", "c", "a"]);

        assert!(run(&mut editor, EditorCommand::Undo, &mut now));
        assert_eq!(order(&editor), vec!["a", "b", "c"]);
        assert!(editor.selection().is_empty());

        assert!(run(&mut editor, EditorCommand::Redo, &mut now));
        assert_eq!(order(&editor), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_undo_flushes_pending_record() {
        let mut editor = editor(vec![shape("a", 0.0, 0.0)]);
        let start = Instant::now();
        block_on(editor.execute(EditorCommand::Select(ids(&["a"])), start)).unwrap();
        block_on(editor.execute(EditorCommand::Lock, start)).unwrap();
        assert!(editor.has_pending_record());

        assert!(block_on(editor.execute(EditorCommand::Undo, start)).unwrap());
        assert!(!editor.deck().current_elements()[0].lock);
        assert!(editor.history().can_redo());
    }

    #[test]
    fn test_undo_is_throttled() {
        let mut editor = editor(vec![shape("a", 0.0, 0.0), shape("b", 0.0, 0.0)]);
        let mut now = Instant::now();
        run(&mut editor, EditorCommand::SelectElement("a".to_string()), &mut now);
        run(&mut editor, EditorCommand::Order(OrderCommand::Up), &mut now);
        run(&mut editor, EditorCommand::SelectElement("a".to_string()), &mut now);
        run(&mut editor, EditorCommand::Order(OrderCommand::Down), &mut now);

        assert!(block_on(editor.execute(EditorCommand::Undo, now)).unwrap());
        let soon = now + Duration::from_millis(50);
        assert!(!block_on(editor.execute(EditorCommand::Undo, soon)).unwrap());
        assert_eq!(editor.history().cursor(), Some(1));
    }

    #[test]
    fn test_boundary_order_does_not_record() {
        let mut editor = editor(vec![shape("a", 0.0, 0.0), shape("b", 0.0, 0.0)]);
        let mut now = Instant::now();
        run(&mut editor, EditorCommand::SelectElement("b".to_string()), &mut now);
        assert!(!run(&mut editor, EditorCommand::Order(OrderCommand::Top), &mut now));
        assert!(!editor.has_pending_record());
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_combine_and_uncombine() {
        let mut editor = editor(vec![shape("a", 0.0, 0.0), shape("b", 0.0, 0.0), shape("c", 0.0, 0.0)]);
        let mut now = Instant::now();
        run(&mut editor, EditorCommand::Select(ids(&["a", "c"])), &mut now);
        assert!(editor.can_combine());
        assert!(run(&mut editor, EditorCommand::Combine, &mut now));
        assert_eq!(order(&editor), vec!["b", "a", "c"]);
        assert_eq!(editor.display_item_count(), 1);

        assert!(run(&mut editor, EditorCommand::Uncombine, &mut now));
        assert_eq!(editor.selection().active_element_ids, vec!["a"]);
        assert!(editor.deck().current_elements().iter().all(|e| e.group_id.is_none()));
    }

    #[test]
    fn test_unlock_selects_group() {
        let mut editor = editor(vec![
            shape("a", 0.0, 0.0).in_group("g").locked(),
            shape("b", 0.0, 0.0).in_group("g").locked(),
        ]);
        let mut now = Instant::now();
        assert!(run(&mut editor, EditorCommand::Unlock("b".to_string()), &mut now));
        assert_eq!(editor.selection().active_element_ids, vec!["a", "b"]);
        assert!(editor.deck().current_elements().iter().all(|e| !e.lock));
    }

    #[test]
    fn test_drag_commits_once() {
        let mut editor = editor(vec![shape("a", 100.0, 100.0)]);
        let start = Instant::now();
        assert!(editor.begin_drag("a", Point::ZERO, 1.0));
        assert!(!editor.drag_to(Point::new(2.0, 2.0), false));
        assert!(editor.drag_to(Point::new(37.0, 41.0), false));
        assert!(editor.drag_to(Point::new(73.0, 81.0), false));
        assert!(editor.end_drag(Point::new(73.0, 81.0), start));
        assert!(editor.alignment_guides().is_empty());

        block_on(editor.tick(start + Duration::from_millis(300))).unwrap();
        assert_eq!(editor.history().len(), 2);
        let a = &editor.deck().current_elements()[0];
        assert_eq!((a.left, a.top), (173.0, 181.0));
    }

    #[test]
    fn test_drag_back_to_start_restores() {
        let mut editor = editor(vec![shape("a", 100.0, 100.0)]);
        let start = Instant::now();
        editor.begin_drag("a", Point::ZERO, 1.0);
        editor.drag_to(Point::new(40.0, 40.0), false);
        editor.drag_to(Point::ZERO, false);
        assert!(!editor.end_drag(Point::ZERO, start));
        assert!(!editor.has_pending_record());
        assert_eq!(editor.deck().current_elements()[0].left, 100.0);
    }

    #[test]
    fn test_add_and_delete() {
        let mut editor = editor(Vec::new());
        let mut now = Instant::now();
        assert!(run(&mut editor, EditorCommand::AddElement(shape("x", 0.0, 0.0)), &mut now));
        assert_eq!(editor.selection().active_element_ids, vec!["x"]);
        assert!(run(&mut editor, EditorCommand::Delete, &mut now));
        assert!(editor.deck().current_elements().is_empty());
        assert_eq!(editor.history().len(), 3);
    }

    #[test]
    fn test_slides_and_undo_restores_slide_index() {
        let mut editor = editor(vec![shape("a", 0.0, 0.0)]);
        let mut now = Instant::now();
        assert!(run(&mut editor, EditorCommand::AddSlide, &mut now));
        assert_eq!(editor.deck().slides.len(), 2);
        assert_eq!(editor.deck().slide_index, 1);

        run(&mut editor, EditorCommand::Undo, &mut now);
        assert_eq!(editor.deck().slides.len(), 1);
        assert_eq!(editor.deck().slide_index, 0);
    }

    #[test]
    fn test_command_json() {
        let json = r#"{ "command": "align", "args": "left" }"#;
        let command: EditorCommand = serde_json::from_str(json).unwrap();
        assert_eq!(command, EditorCommand::Align(AlignCommand::Left));

        let json = r#"{ "command": "move", "args": { "direction": "up", "step": 10 } }"#;
        let command: EditorCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            command,
            EditorCommand::Move {
                direction: MoveDirection::Up,
                step: 10.0
            }
        );
    }
}
