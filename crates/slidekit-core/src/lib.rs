//! SlideKit Core Library
//!
//! Layout, z-order and undo-history engine for the SlideKit slide editor.

pub mod align;
pub mod config;
pub mod distribute;
pub mod drag;
pub mod edit;
pub mod editor;
pub mod elements;
pub mod geometry;
pub mod group;
pub mod history;
pub mod order;
pub mod schedule;
pub mod selection;
pub mod slides;
pub mod snap;
pub mod storage;

pub use align::{align_selection, align_to_canvas, AlignCommand, CanvasSize};
pub use config::{ConfigError, EditorConfig, HISTORY_LIMIT, SNAP_TOLERANCE, VIEWPORT_SIZE};
pub use distribute::{display_item_count, distribute, Axis};
pub use drag::DragGesture;
pub use edit::{MoveDirection, NUDGE_STEP};
pub use editor::{Editor, EditorCommand};
pub use elements::{Element, ElementId, ElementIdMap, ElementKind, GroupId};
pub use geometry::{element_range, list_range, merge_align_lines, rotated_bounding_range, rotation_offset, AlignLine};
pub use group::{can_combine, combine_elements, uncombine_elements};
pub use history::{HistoryError, HistoryLog};
pub use order::{reorder, OrderCommand};
pub use schedule::{Debouncer, Throttle};
pub use selection::{active_elements, Selection};
pub use slides::{Deck, Slide};
pub use snap::{snap_range, AlignmentGuide, GuideSet, SnapResult};
pub use storage::{FileStore, MemoryStore, Snapshot, SnapshotStore, StorageError};
