use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The exported deck, ready to be written as a presentation file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxPresentationModel {
    pub slides: Vec<PptxSlide>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxSlide {
    /// Shapes in paint order; later shapes are drawn on top
    pub shapes: Vec<PptxShape>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<PptxFill>,

    /// Speaker note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One drawing primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "shape_type", rename_all = "lowercase")]
pub enum PptxShape {
    Textbox(PptxTextBox),
    Autoshape(PptxAutoShape),
    Picture(PptxPicture),
    Connector(PptxConnector),
}

/// Integer pixel geometry relative to the slide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PptxPosition {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxFill {
    /// Six digit hex without `#`
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxStroke {
    pub color: String,
    pub thickness: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxShadow {
    /// Blur radius in px
    pub radius: i64,
    /// Length of the offset vector in px
    pub offset: i64,
    pub color: String,
    pub opacity: f64,
    /// Offset direction in degrees
    pub angle: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxFont {
    pub name: String,
    pub size: i64,
    pub font_weight: i64,
    pub italic: bool,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxParagraph {
    /// 1 left, 2 center, 3 right, 4 justify
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PptxFont>,

    /// Multiplier relative to the font size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxTextBox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<PptxFill>,
    pub position: PptxPosition,
    pub text_wrap: bool,
    pub paragraphs: Vec<PptxParagraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxAutoShape {
    /// [`PptxAutoShape::RECTANGLE`] or [`PptxAutoShape::ROUNDED_RECTANGLE`]
    #[serde(rename = "type")]
    pub shape_type: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<PptxFill>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<PptxStroke>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<PptxShadow>,

    pub position: PptxPosition,
    pub text_wrap: bool,

    /// Corner radius of a rounded rectangle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<Vec<PptxParagraph>>,
}

impl PptxAutoShape {
    pub const RECTANGLE: u8 = 1;
    pub const ROUNDED_RECTANGLE: u8 = 5;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxObjectFit {
    /// "contain", "cover" or "fill"
    pub fit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxPictureSource {
    /// Remote URL rather than a local file
    pub is_network: bool,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxPicture {
    pub position: PptxPosition,
    pub clip: bool,
    pub invert: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    /// Per-corner radii, top-left first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<[i64; 4]>,

    /// "rectangle" or "circle"
    pub shape: String,
    pub object_fit: PptxObjectFit,
    pub picture: PptxPictureSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PptxConnector {
    /// Always [`PptxConnector::STRAIGHT`]
    #[serde(rename = "type")]
    pub connector_type: u8,
    pub position: PptxPosition,
    pub thickness: f64,
    pub color: String,
    pub opacity: f64,
}

impl PptxConnector {
    pub const STRAIGHT: u8 = 1;
}

/// JSON schema of [`PptxPresentationModel`]
pub fn presentation_schema() -> schemars::Schema {
    schemars::schema_for!(PptxPresentationModel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_tagging() {
        let shape = PptxShape::Connector(PptxConnector {
            connector_type: PptxConnector::STRAIGHT,
            position: PptxPosition { left: 1, top: 2, width: 300, height: 1 },
            thickness: 0.5,
            color: "000000".into(),
            opacity: 1.0,
        });

        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(value["shape_type"], "connector");
        assert_eq!(value["type"], 1);
        assert_eq!(value["position"]["width"], 300);

        let back: PptxShape = serde_json::from_value(value).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn test_schema_lists_shape_kinds() {
        let schema = serde_json::to_string(&presentation_schema()).unwrap();
        for kind in ["textbox", "autoshape", "picture", "connector"] {
            assert!(schema.contains(kind), "{kind} missing from schema");
        }
    }
}
