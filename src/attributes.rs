//! Visual description of one slide element, as derived from its computed style

use crate::dom::BoundingBox;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named numeric CSS filter values in declaration order (e.g. `invert`, `hueRotate`)
pub type Filters = IndexMap<String, f64>;

/// Tags that cannot be described declaratively and are captured as images instead
pub const SCREENSHOT_TAGS: [&str; 3] = ["svg", "canvas", "table"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAttributes {
    pub tag_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Text content, only for elements without element children
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,

    /// Window coordinates when parsed, slide-relative after walking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Edges>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Edges>,

    #[serde(default)]
    pub z_index: i64,

    /// Omitted for the default "left"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,

    /// Only present for multi-line text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,

    /// Top-left, top-right, bottom-right, bottom-left
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<[f64; 4]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_fit: Option<String>,

    #[serde(default)]
    pub clip: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeHint>,

    #[serde(default = "default_text_wrap")]
    pub text_wrap: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,

    #[serde(default, rename = "should_screenshot")]
    pub should_screenshot: bool,

    /// Page-global id of the live element this record came from
    #[serde(skip)]
    pub node_id: Option<u64>,
}

fn default_text_wrap() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Background {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Border {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// The single shadow layer chosen from a `box-shadow` list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// `[offsetX, offsetY]` in px
    pub offset: [f64; 2],
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Blur radius in px
    pub radius: f64,
    pub spread: f64,
    pub inset: bool,
    /// Direction of the offset in degrees
    pub angle: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub italic: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Position {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// True when there is nothing to paint
    pub fn is_empty_area(&self) -> bool {
        self.width == 0.0 || self.height == 0.0 || self.width.is_nan() || self.height.is_nan()
    }

    /// Same size, measured from `origin`'s top-left corner
    pub fn relative_to(&self, origin: &Position) -> Position {
        Position { left: self.left - origin.left, top: self.top - origin.top, ..*self }
    }

    /// Exactly covers a box of `frame`'s size at the origin
    pub fn occupies(&self, frame: &Position) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.width == frame.width && self.height == frame.height
    }

    /// Move back from slide-relative to window coordinates
    pub fn to_absolute(&self, origin: &BoundingBox) -> BoundingBox {
        BoundingBox::new(self.left + origin.x, self.top + origin.y, self.width, self.height)
    }
}

impl From<BoundingBox> for Position {
    fn from(rect: BoundingBox) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            left: finite(rect.x),
            top: finite(rect.y),
            width: finite(rect.width),
            height: finite(rect.height),
        }
    }
}

/// Margin or padding insets in px
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeHint {
    Rectangle,
    Circle,
}

impl ShapeHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeHint::Rectangle => "rectangle",
            ShapeHint::Circle => "circle",
        }
    }
}

impl ElementAttributes {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            text_wrap: true,
            ..Default::default()
        }
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name == tag
    }

    /// Text that is non-empty after trimming
    pub fn has_text(&self) -> bool {
        self.inner_text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background.as_ref().and_then(|b| b.color.as_deref())
    }

    pub fn border_color(&self) -> Option<&str> {
        self.border.as_ref().and_then(|b| b.color.as_deref())
    }

    pub fn has_positive_radius(&self) -> bool {
        self.border_radius.is_some_and(|r| r.iter().any(|v| *v > 0.0))
    }

    /// svg, canvas or table
    pub fn needs_raster(&self) -> bool {
        SCREENSHOT_TAGS.contains(&self.tag_name.as_str())
    }

    pub fn filter(&self, name: &str) -> Option<f64> {
        self.filters.as_ref().and_then(|f| f.get(name).copied())
    }
}

/// Everything extracted from one slide, elements in paint order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideAttributesResult {
    pub elements: Vec<ElementAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_note: Option<String>,
}
