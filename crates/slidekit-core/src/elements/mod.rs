//! Slide element definitions.

mod content;
mod line;

pub use content::{
    AudioElement, ChartData, ChartElement, ImageElement, LatexElement, ShapeElement, TableCell,
    TableElement, TextElement, VideoElement,
};
pub use line::{LineElement, LineStyle};

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for elements within a slide.
pub type ElementId = String;

/// Correlation key shared by every member of a group.
pub type GroupId = String;

/// Length of generated element and group ids.
const GENERATED_ID_LEN: usize = 10;

/// Generate a fresh short id for an element, group or slide.
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(GENERATED_ID_LEN);
    id
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

/// Size and rotation shared by every element variant except lines.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, applied about the box center.
    #[serde(default)]
    pub rotate: f64,
}

impl Frame {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            rotate: 0.0,
        }
    }
}

/// Hyperlink attached to an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "target", rename_all = "lowercase")]
pub enum ElementLink {
    Web(String),
    Slide(String),
}

/// Variant-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextElement),
    Image(ImageElement),
    Shape(ShapeElement),
    Line(LineElement),
    Chart(ChartElement),
    Table(TableElement),
    Latex(LatexElement),
    Video(VideoElement),
    Audio(AudioElement),
}

impl ElementKind {
    /// A plain rectangular shape of the given size.
    pub fn shape(width: f64, height: f64) -> Self {
        ElementKind::Shape(ShapeElement::rectangle(width, height))
    }

    /// A text box of the given size.
    pub fn text(width: f64, height: f64, content: impl Into<String>) -> Self {
        ElementKind::Text(TextElement::new(Frame::new(width, height), content))
    }

    /// A straight line between two points relative to the element origin.
    pub fn line(start: Point, end: Point) -> Self {
        ElementKind::Line(LineElement::new(start, end))
    }

    /// Variant name as used in serialized documents.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Text(_) => "text",
            ElementKind::Image(_) => "image",
            ElementKind::Shape(_) => "shape",
            ElementKind::Line(_) => "line",
            ElementKind::Chart(_) => "chart",
            ElementKind::Table(_) => "table",
            ElementKind::Latex(_) => "latex",
            ElementKind::Video(_) => "video",
            ElementKind::Audio(_) => "audio",
        }
    }

    pub fn frame(&self) -> Option<&Frame> {
        match self {
            ElementKind::Text(e) => Some(&e.frame),
            ElementKind::Image(e) => Some(&e.frame),
            ElementKind::Shape(e) => Some(&e.frame),
            ElementKind::Chart(e) => Some(&e.frame),
            ElementKind::Table(e) => Some(&e.frame),
            ElementKind::Latex(e) => Some(&e.frame),
            ElementKind::Video(e) => Some(&e.frame),
            ElementKind::Audio(e) => Some(&e.frame),
            ElementKind::Line(_) => None,
        }
    }

    pub fn frame_mut(&mut self) -> Option<&mut Frame> {
        match self {
            ElementKind::Text(e) => Some(&mut e.frame),
            ElementKind::Image(e) => Some(&mut e.frame),
            ElementKind::Shape(e) => Some(&mut e.frame),
            ElementKind::Chart(e) => Some(&mut e.frame),
            ElementKind::Table(e) => Some(&mut e.frame),
            ElementKind::Latex(e) => Some(&mut e.frame),
            ElementKind::Video(e) => Some(&mut e.frame),
            ElementKind::Audio(e) => Some(&mut e.frame),
            ElementKind::Line(_) => None,
        }
    }
}

/// One visual object on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// Canvas-space left of the unrotated box.
    pub left: f64,
    /// Canvas-space top of the unrotated box.
    pub top: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub lock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<ElementLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create an element with an explicit id.
    pub fn new(id: impl Into<ElementId>, left: f64, top: f64, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            left,
            top,
            group_id: None,
            lock: false,
            link: None,
            name: None,
            kind,
        }
    }

    /// Create an element with a generated id.
    pub fn with_generated_id(left: f64, top: f64, kind: ElementKind) -> Self {
        Self::new(generate_id(), left, top, kind)
    }

    /// Builder: assign a group id.
    pub fn in_group(mut self, group_id: impl Into<GroupId>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Builder: set the rotation in degrees. Lines ignore rotation.
    pub fn rotated(mut self, rotate: f64) -> Self {
        if let Some(frame) = self.kind.frame_mut() {
            frame.rotate = rotate;
        }
        self
    }

    /// Builder: lock the element.
    pub fn locked(mut self) -> Self {
        self.lock = true;
        self
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.kind.frame()
    }

    /// Rotation in degrees (always 0 for lines).
    pub fn rotate(&self) -> f64 {
        self.frame().map(|f| f.rotate).unwrap_or(0.0)
    }

    pub fn is_line(&self) -> bool {
        matches!(self.kind, ElementKind::Line(_))
    }

    pub fn as_line(&self) -> Option<&LineElement> {
        match &self.kind {
            ElementKind::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    /// Whether this element shares a group with `other`.
    pub fn same_group(&self, other: &Element) -> bool {
        matches!((self.group_id(), other.group_id()), (Some(a), Some(b)) if a == b)
    }

    /// Horizontal extent used when writing back positions.
    /// For lines this is the larger endpoint x, otherwise the frame width.
    pub fn extent_width(&self) -> f64 {
        match &self.kind {
            ElementKind::Line(line) => line.start.x.max(line.end.x),
            kind => kind.frame().map(|f| f.width).unwrap_or(0.0),
        }
    }

    /// Vertical extent used when writing back positions.
    pub fn extent_height(&self) -> f64 {
        match &self.kind {
            ElementKind::Line(line) => line.start.y.max(line.end.y),
            kind => kind.frame().map(|f| f.height).unwrap_or(0.0),
        }
    }

    /// The unrotated box addressed by `left`/`top`, if the element has a frame.
    pub fn frame_rect(&self) -> Option<Rect> {
        self.frame()
            .map(|f| Rect::new(self.left, self.top, self.left + f.width, self.top + f.height))
    }

    /// Translate the element by a delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.left += dx;
        self.top += dy;
    }
}

/// Fresh ids for a set of elements being copied, keeping shared group ids shared.
#[derive(Debug, Clone, Default)]
pub struct ElementIdMap {
    pub elements: HashMap<ElementId, ElementId>,
    pub groups: HashMap<GroupId, GroupId>,
}

impl ElementIdMap {
    /// Build a map assigning one fresh id per element and one per distinct group.
    pub fn create(elements: &[Element]) -> Self {
        let mut map = Self::default();
        for element in elements {
            if let Some(group_id) = element.group_id() {
                map.groups
                    .entry(group_id.to_string())
                    .or_insert_with(generate_id);
            }
            map.elements
                .entry(element.id.clone())
                .or_insert_with(generate_id);
        }
        map
    }

    /// Return a copy of `elements` with ids and group ids rewritten.
    pub fn apply(&self, elements: &[Element]) -> Vec<Element> {
        elements
            .iter()
            .map(|element| {
                let mut copy = element.clone();
                if let Some(id) = self.elements.get(&element.id) {
                    copy.id = id.clone();
                }
                copy.group_id = element
                    .group_id
                    .as_ref()
                    .map(|g| self.groups.get(g).cloned().unwrap_or_else(|| g.clone()));
                copy
            })
            .collect()
    }
}
