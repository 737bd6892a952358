//! Style Parser
//!
//! Turns one snapshotted element and its raw computed style into
//! [`ElementAttributes`]. Sub-records with no visual effect are left as `None`.

pub mod color;
pub mod shadow;
pub mod values;

pub use color::{ParsedColor, parse_color};
pub use shadow::{parse_box_shadow, select_shadow_layer};
pub use values::{parse_border_radius, parse_css_float, parse_filters};

use crate::attributes::{ElementAttributes, Position, ShapeHint};
use crate::dom::SnapshotNode;

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Derive the visual attributes of a single element, ignoring its children
pub fn parse_element(node: &SnapshotNode) -> ElementAttributes {
    let style = &node.style;
    let tag_name = node.tag_name.to_ascii_lowercase();
    let position = Position::from(node.rect);

    let border_radius = values::parse_border_radius(&style.border_radius, position.width, position.height);
    let shape = (tag_name == "img").then(|| image_shape(border_radius, &position));

    let text_align = non_empty(Some(style.text_align.as_str())).filter(|align| align != "left");
    let image_src = non_empty(node.src.as_deref()).or_else(|| values::background_image_url(&style.background_image));

    ElementAttributes {
        id: non_empty(node.id.as_deref()),
        class_name: non_empty(node.class_name.as_deref()),
        inner_text: if node.has_element_children() { None } else { non_empty(node.text_content.as_deref()) },
        opacity: values::parse_css_float(&style.opacity),
        background: values::parse_background(style),
        border: values::parse_border(style),
        shadow: parse_box_shadow(&style.box_shadow),
        font: values::parse_font(style),
        position: Some(position),
        margin: values::parse_margin(style),
        padding: values::parse_padding(style),
        z_index: values::parse_css_int(&style.z_index).unwrap_or(0),
        text_align,
        line_height: values::parse_line_height(node),
        border_radius,
        image_src,
        object_fit: non_empty(Some(style.object_fit.as_str())),
        clip: false,
        shape,
        text_wrap: style.white_space != "nowrap",
        filters: values::parse_filters(&style.filter),
        should_screenshot: false,
        node_id: node.node_id,
        tag_name,
    }
}

/// Images whose four corners are rounded all the way are circles
fn image_shape(radius: Option<[f64; 4]>, position: &Position) -> ShapeHint {
    let limits = [position.width / 2.0, position.height / 2.0, position.width / 2.0, position.height / 2.0];
    match radius {
        Some(corners) if corners.iter().zip(limits).all(|(r, limit)| limit > 0.0 && *r >= limit) => {
            ShapeHint::Circle
        }
        _ => ShapeHint::Rectangle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ComputedStyle;

    fn styled(tag: &str, edit: impl FnOnce(&mut ComputedStyle)) -> SnapshotNode {
        let mut style = ComputedStyle::default();
        edit(&mut style);
        SnapshotNode::new(tag).with_rect(10.0, 20.0, 200.0, 100.0).with_style(style)
    }

    #[test]
    fn test_paragraph_attributes() {
        let node = styled("P", |s| {
            s.background_color = "rgba(0, 0, 0, 0)".into();
            s.border_width = "1px".into();
            s.border_color = "rgb(255, 0, 0)".into();
            s.color = "rgb(0, 0, 0)".into();
            s.font_size = "16px".into();
            s.text_align = "center".into();
            s.z_index = "auto".into();
            s.white_space = "normal".into();
            s.opacity = "1".into();
        })
        .with_text("Hello")
        .with_node_id(3);

        let attrs = parse_element(&node);
        assert_eq!(attrs.tag_name, "p");
        assert_eq!(attrs.inner_text.as_deref(), Some("Hello"));
        assert_eq!(attrs.background, None);
        assert_eq!(attrs.border_color(), Some("ff0000"));
        assert_eq!(attrs.text_align.as_deref(), Some("center"));
        assert_eq!(attrs.z_index, 0);
        assert_eq!(attrs.opacity, Some(1.0));
        assert_eq!(attrs.position, Some(Position::new(10.0, 20.0, 200.0, 100.0)));
        assert_eq!(attrs.node_id, Some(3));
        assert!(attrs.text_wrap);
        assert!(attrs.shape.is_none());
    }

    #[test]
    fn test_text_only_without_element_children() {
        let node = SnapshotNode::new("div")
            .with_text("outer inner")
            .with_children(vec![SnapshotNode::new("span").with_text("inner")]);
        assert_eq!(parse_element(&node).inner_text, None);
    }

    #[test]
    fn test_left_alignment_omitted() {
        let attrs = parse_element(&styled("div", |s| s.text_align = "left".into()));
        assert_eq!(attrs.text_align, None);
    }

    #[test]
    fn test_image_source_and_shape() {
        let node = styled("img", |s| s.border_radius = "50%".into()).with_src("https://cdn.test/cat.png");
        let attrs = parse_element(&node);
        assert_eq!(attrs.image_src.as_deref(), Some("https://cdn.test/cat.png"));
        assert_eq!(attrs.shape, Some(ShapeHint::Circle));

        let square = parse_element(&styled("img", |s| s.border_radius = "4px".into()));
        assert_eq!(square.shape, Some(ShapeHint::Rectangle));
    }

    #[test]
    fn test_background_image_url() {
        let attrs = parse_element(&styled("div", |s| s.background_image = "url(\"/static/bg.jpg\")".into()));
        assert_eq!(attrs.image_src.as_deref(), Some("/static/bg.jpg"));
    }

    #[test]
    fn test_nowrap_and_z_index() {
        let attrs = parse_element(&styled("span", |s| {
            s.white_space = "nowrap".into();
            s.z_index = "5".into();
        }));
        assert!(!attrs.text_wrap);
        assert_eq!(attrs.z_index, 5);
    }

    #[test]
    fn test_invert_filter() {
        let attrs = parse_element(&styled("img", |s| s.filter = "invert(1)".into()));
        assert_eq!(attrs.filter("invert"), Some(1.0));
    }
}
