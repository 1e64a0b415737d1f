//! Framed element payloads: text, media, shapes, charts, tables and formulas.

use super::{Frame, SerializableColor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(flatten)]
    pub frame: Frame,
    /// Rich text content as HTML.
    pub content: String,
    #[serde(default)]
    pub default_font_name: String,
    #[serde(default)]
    pub default_color: SerializableColor,
    #[serde(default)]
    pub vertical: bool,
}

impl TextElement {
    pub fn new(frame: Frame, content: impl Into<String>) -> Self {
        Self {
            frame,
            content: content.into(),
            default_font_name: String::new(),
            default_color: SerializableColor::black(),
            vertical: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    #[serde(flatten)]
    pub frame: Frame,
    pub src: String,
    #[serde(default)]
    pub fixed_ratio: bool,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    #[serde(flatten)]
    pub frame: Frame,
    pub view_box: [f64; 2],
    /// SVG path data in view-box coordinates.
    pub path: String,
    #[serde(default)]
    pub fixed_ratio: bool,
    #[serde(default = "SerializableColor::white")]
    pub fill: SerializableColor,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

impl ShapeElement {
    pub const DEFAULT_VIEW_BOX: f64 = 200.0;

    /// A rectangle filling its frame.
    pub fn rectangle(width: f64, height: f64) -> Self {
        let size = Self::DEFAULT_VIEW_BOX;
        Self {
            frame: Frame::new(width, height),
            view_box: [size, size],
            path: format!("M 0 0 L {size} 0 L {size} {size} L 0 {size} Z"),
            fixed_ratio: false,
            fill: SerializableColor::white(),
            flip_h: false,
            flip_v: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub legends: Vec<String>,
    pub series: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartElement {
    #[serde(flatten)]
    pub frame: Frame,
    pub chart_type: String,
    #[serde(default)]
    pub data: ChartData,
    #[serde(default)]
    pub theme_colors: Vec<SerializableColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub id: String,
    #[serde(default = "one")]
    pub colspan: u32,
    #[serde(default = "one")]
    pub rowspan: u32,
    #[serde(default)]
    pub text: String,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableElement {
    #[serde(flatten)]
    pub frame: Frame,
    /// Column widths as fractions of the table width.
    pub col_widths: Vec<f64>,
    pub cell_min_height: f64,
    pub data: Vec<Vec<TableCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatexElement {
    #[serde(flatten)]
    pub frame: Frame,
    pub latex: String,
    /// Pre-rendered SVG path of the formula.
    pub path: String,
    #[serde(default)]
    pub color: SerializableColor,
    #[serde(default)]
    pub stroke_width: f64,
    pub view_box: [f64; 2],
    #[serde(default)]
    pub fixed_ratio: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoElement {
    #[serde(flatten)]
    pub frame: Frame,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default)]
    pub autoplay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioElement {
    #[serde(flatten)]
    pub frame: Frame,
    pub src: String,
    #[serde(default)]
    pub color: SerializableColor,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default, rename = "loop")]
    pub looped: bool,
}
