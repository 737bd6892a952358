use crate::attributes::{ElementAttributes, Font, Position, SlideAttributesResult};
use crate::pptx::model::*;

const DEFAULT_FONT_NAME: &str = "Inter";
const DEFAULT_FONT_SIZE: f64 = 16.0;
const DEFAULT_FONT_WEIGHT: i64 = 400;
const DEFAULT_COLOR: &str = "000000";
const DEFAULT_SHADOW_OPACITY: f64 = 0.5;

/// Convert every extracted slide, keeping slide order
pub fn convert_slides(slides: &[SlideAttributesResult]) -> PptxPresentationModel {
    PptxPresentationModel { slides: slides.iter().map(convert_slide).collect() }
}

pub fn convert_slide(slide: &SlideAttributesResult) -> PptxSlide {
    PptxSlide {
        shapes: slide.elements.iter().filter_map(convert_element).collect(),
        background: slide
            .background_color
            .as_ref()
            .map(|color| PptxFill { color: color.clone(), opacity: 1.0 }),
        note: slide.speaker_note.clone(),
    }
}

/// Map one element onto a shape; `None` only when it has no position
pub fn convert_element(element: &ElementAttributes) -> Option<PptxShape> {
    let position = element.position.as_ref().map(round_position)?;

    let is_picture = element.is_tag("img")
        || element.class_name.as_deref().is_some_and(|c| c.contains("image"))
        || element.image_src.is_some();

    let shape = if is_picture {
        PptxShape::Picture(picture(element, position))
    } else if element.has_text() {
        if element.background_color().is_some() && element.has_positive_radius() {
            PptxShape::Autoshape(autoshape(element, position))
        } else {
            PptxShape::Textbox(textbox(element, position))
        }
    } else if element.is_tag("hr") {
        PptxShape::Connector(connector(element, position))
    } else {
        PptxShape::Autoshape(autoshape(element, position))
    };
    Some(shape)
}

/// Fixed paragraph alignment codes; unknown values fall back to left
pub fn text_alignment(text_align: Option<&str>) -> Option<u8> {
    let align = text_align?.to_ascii_lowercase();
    Some(match align.as_str() {
        "center" => 2,
        "right" | "end" => 3,
        "justify" => 4,
        _ => 1,
    })
}

/// Pixel line height as a multiplier of the font size, minus 0.3
pub fn relative_line_height(line_height: Option<f64>, font_size: Option<f64>) -> Option<f64> {
    let line_height = line_height.filter(|lh| *lh != 0.0 && !lh.is_nan())?;

    let relative = match font_size {
        Some(size) if size > 0.0 => (line_height / size * 100.0).round() / 100.0,
        _ if line_height < 10.0 => line_height,
        _ => 1.2,
    };
    Some(((relative - 0.3) * 100.0).round() / 100.0)
}

/// Halves round toward positive infinity, so -10.5 becomes -10
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn round_position(position: &Position) -> PptxPosition {
    PptxPosition {
        left: round_half_up(position.left),
        top: round_half_up(position.top),
        width: round_half_up(position.width),
        height: round_half_up(position.height),
    }
}

fn fill(element: &ElementAttributes) -> Option<PptxFill> {
    let background = element.background.as_ref()?;
    Some(PptxFill {
        color: background.color.clone()?,
        opacity: background.opacity.unwrap_or(1.0),
    })
}

fn font(font: &Font) -> PptxFont {
    PptxFont {
        name: font.name.clone().unwrap_or_else(|| DEFAULT_FONT_NAME.to_string()),
        size: font.size.unwrap_or(DEFAULT_FONT_SIZE).round() as i64,
        font_weight: font.weight.unwrap_or(DEFAULT_FONT_WEIGHT),
        italic: font.italic,
        color: font.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
    }
}

fn paragraph(element: &ElementAttributes) -> PptxParagraph {
    PptxParagraph {
        alignment: text_alignment(element.text_align.as_deref()),
        font: element.font.as_ref().map(font),
        line_height: relative_line_height(element.line_height, element.font.as_ref().and_then(|f| f.size)),
        text: element.inner_text.clone(),
    }
}

fn textbox(element: &ElementAttributes, position: PptxPosition) -> PptxTextBox {
    PptxTextBox {
        fill: fill(element),
        position,
        text_wrap: element.text_wrap,
        paragraphs: vec![paragraph(element)],
    }
}

fn autoshape(element: &ElementAttributes, position: PptxPosition) -> PptxAutoShape {
    let stroke = element.border.as_ref().and_then(|border| {
        Some(PptxStroke {
            color: border.color.clone()?,
            thickness: border.width.unwrap_or(1.0),
            opacity: border.opacity.unwrap_or(1.0),
        })
    });

    let shadow = element.shadow.as_ref().map(|shadow| PptxShadow {
        radius: shadow.radius.round() as i64,
        offset: shadow.offset[0].hypot(shadow.offset[1]).round() as i64,
        color: shadow.color.clone(),
        opacity: shadow.opacity.unwrap_or(DEFAULT_SHADOW_OPACITY),
        angle: shadow.angle.round() as i64,
    });

    let border_radius = element
        .border_radius
        .iter()
        .flatten()
        .copied()
        .filter(|r| *r > 0.0)
        .reduce(f64::max);

    PptxAutoShape {
        shape_type: if element.border_radius.is_some() {
            PptxAutoShape::ROUNDED_RECTANGLE
        } else {
            PptxAutoShape::RECTANGLE
        },
        fill: fill(element),
        stroke,
        shadow,
        position,
        text_wrap: element.text_wrap,
        border_radius,
        paragraphs: element.inner_text.is_some().then(|| vec![paragraph(element)]),
    }
}

fn picture(element: &ElementAttributes, position: PptxPosition) -> PptxPicture {
    let path = element.image_src.clone().unwrap_or_default();
    let lower = path.to_ascii_lowercase();

    PptxPicture {
        position,
        clip: element.clip,
        invert: element.filter("invert") == Some(1.0),
        opacity: element.opacity,
        border_radius: element.border_radius.map(|corners| corners.map(|r| r.round() as i64)),
        shape: element.shape.map_or("rectangle", |s| s.as_str()).to_string(),
        object_fit: PptxObjectFit { fit: element.object_fit.clone().unwrap_or_else(|| "contain".to_string()) },
        picture: PptxPictureSource {
            is_network: lower.starts_with("http://") || lower.starts_with("https://"),
            path,
        },
    }
}

fn connector(element: &ElementAttributes, position: PptxPosition) -> PptxConnector {
    let border = element.border.as_ref();
    PptxConnector {
        connector_type: PptxConnector::STRAIGHT,
        position,
        thickness: border.and_then(|b| b.width).unwrap_or(0.5),
        color: element
            .border_color()
            .or_else(|| element.background_color())
            .unwrap_or(DEFAULT_COLOR)
            .to_string(),
        opacity: border.and_then(|b| b.opacity).unwrap_or(1.0),
    }
}
