//! Slides and the deck that owns them.

use crate::align::CanvasSize;
use crate::config::DEFAULT_VIEWPORT_RATIO;
use crate::elements::{generate_id, Element, ElementId, SerializableColor};
use log::debug;
use serde::{Deserialize, Serialize};

/// Slide background fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlideBackground {
    Solid { color: SerializableColor },
    Image { src: String },
}

impl Default for SlideBackground {
    fn default() -> Self {
        SlideBackground::Solid {
            color: SerializableColor::white(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationKind {
    In,
    Out,
    Attention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationTrigger {
    #[default]
    Click,
    Meantime,
    Auto,
}

/// An element animation. Playback is up to the presenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub id: String,
    pub el_id: ElementId,
    pub effect: String,
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    /// Milliseconds.
    pub duration: u32,
    #[serde(default)]
    pub trigger: AnimationTrigger,
}

/// Transition used when turning to this slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurningMode {
    No,
    Fade,
    Slide,
    SlideY,
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    /// Bottom layer first.
    pub elements: Vec<Element>,
    #[serde(default)]
    pub background: SlideBackground,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<Animation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turning_mode: Option<TurningMode>,
}

impl Slide {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            elements: Vec::new(),
            background: SlideBackground::default(),
            animations: Vec::new(),
            remark: None,
            turning_mode: None,
        }
    }

    pub fn with_generated_id() -> Self {
        Self::new(generate_id())
    }

    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }
}

/// A multi-slide document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub slide_index: usize,
    #[serde(default = "default_viewport_ratio")]
    pub viewport_ratio: f64,
}

fn default_viewport_ratio() -> f64 {
    DEFAULT_VIEWPORT_RATIO
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(vec![Slide::with_generated_id()])
    }
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            slides,
            slide_index: 0,
            viewport_ratio: DEFAULT_VIEWPORT_RATIO,
        }
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.slide_index)
    }

    fn current_slide_mut(&mut self) -> Option<&mut Slide> {
        self.slides.get_mut(self.slide_index)
    }

    /// Elements of the current slide, empty if the deck has no slides.
    pub fn current_elements(&self) -> &[Element] {
        self.current_slide().map(|s| s.elements.as_slice()).unwrap_or(&[])
    }

    /// Replace the current slide's elements wholesale.
    pub fn update_slide_elements(&mut self, elements: Vec<Element>) -> bool {
        match self.current_slide_mut() {
            Some(slide) => {
                slide.elements = elements;
                true
            }
            None => false,
        }
    }

    /// Append an element as the top layer of the current slide.
    pub fn add_element(&mut self, element: Element) -> bool {
        let Some(slide) = self.current_slide_mut() else {
            return false;
        };
        let mut elements = slide.elements.clone();
        elements.push(element);
        slide.elements = elements;
        true
    }

    /// Insert a slide after the current one and make it current.
    pub fn add_slide(&mut self, slide: Slide) {
        let at = if self.slides.is_empty() {
            0
        } else {
            self.slide_index + 1
        };
        self.slides.insert(at, slide);
        self.slide_index = at;
    }

    /// Delete a slide by id. The last remaining slide cannot be deleted.
    pub fn delete_slide(&mut self, id: &str) -> bool {
        if self.slides.len() <= 1 {
            debug!("refusing to delete the only slide");
            return false;
        }
        let Some(pos) = self.slides.iter().position(|s| s.id == id) else {
            return false;
        };
        self.slides.remove(pos);
        if pos < self.slide_index || self.slide_index >= self.slides.len() {
            self.slide_index = self.slide_index.saturating_sub(1);
        }
        true
    }

    /// Replace every slide, keeping the index in range.
    pub fn set_slides(&mut self, slides: Vec<Slide>) {
        self.slides = slides;
        self.slide_index = self.clamp_index(self.slide_index);
    }

    pub fn update_slide_index(&mut self, index: usize) {
        self.slide_index = self.clamp_index(index);
    }

    /// Clamp `index` to `[0, slides - 1]`.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.slides.len().saturating_sub(1))
    }

    /// Canvas dimensions for a given viewport width.
    pub fn canvas_size(&self, viewport_size: f64) -> CanvasSize {
        CanvasSize::new(viewport_size, self.viewport_ratio)
    }
}
