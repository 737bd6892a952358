use serde::{Deserialize, Serialize};

/// One element of a rendered slide as captured by the snapshot page script
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    /// Page-global identifier assigned when the element was snapshotted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<u64>,

    /// Lowercase tag name (e.g. "div", "svg", "img")
    pub tag_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Bounding client rect in window coordinates
    #[serde(default)]
    pub rect: BoundingBox,

    /// Raw computed style values
    #[serde(default)]
    pub style: ComputedStyle,

    /// `textContent` of the element, descendants included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// `innerHTML`, only captured for paragraphs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_html: Option<String>,

    /// Resolved `src` property for elements that have one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(default)]
    pub offset_height: f64,

    #[serde(default)]
    pub scroll_height: f64,

    #[serde(default)]
    pub client_height: f64,

    /// Element children in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

/// Computed style strings exactly as `getComputedStyle` reported them
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyle {
    pub background_color: String,
    pub background_image: String,
    pub border_color: String,
    pub border_width: String,
    pub border_radius: String,
    pub box_shadow: String,
    pub color: String,
    pub font_family: String,
    pub font_size: String,
    pub font_style: String,
    pub font_weight: String,
    pub line_height: String,
    pub margin_top: String,
    pub margin_right: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub padding_top: String,
    pub padding_right: String,
    pub padding_bottom: String,
    pub padding_left: String,
    pub z_index: String,
    pub text_align: String,
    pub object_fit: String,
    pub white_space: String,
    pub filter: String,
    pub opacity: String,
}

/// Bounding box coordinates for an element
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SnapshotNode {
    /// Create a new SnapshotNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    /// Builder method: set the bounding rect
    pub fn with_rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = BoundingBox { x, y, width, height };
        self
    }

    /// Builder method: set computed style
    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set inner HTML
    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = Some(html.into());
        self
    }

    /// Builder method: set src
    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Builder method: set node id
    pub fn with_node_id(mut self, node_id: u64) -> Self {
        self.node_id = Some(node_id);
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<SnapshotNode>) -> Self {
        self.children = children;
        self
    }

    /// True when the element has element children (text-only nodes do not)
    pub fn has_element_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Tag names of every descendant element, depth-first
    pub fn descendant_tags(&self) -> Vec<&str> {
        let mut tags = Vec::new();
        self.collect_descendant_tags(&mut tags);
        tags
    }

    fn collect_descendant_tags<'a>(&'a self, tags: &mut Vec<&'a str>) {
        for child in &self.children {
            tags.push(child.tag_name.as_str());
            child.collect_descendant_tags(tags);
        }
    }
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Same box moved by (dx, dy)
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Euclidean distance over all four geometry components
    pub fn distance(&self, other: &BoundingBox) -> f64 {
        ((self.x - other.x).powi(2)
            + (self.y - other.y).powi(2)
            + (self.width - other.width).powi(2)
            + (self.height - other.height).powi(2))
        .sqrt()
    }

    /// Every component differs by less than `tolerance`
    pub fn approx_eq(&self, other: &BoundingBox, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance
            && (self.y - other.y).abs() < tolerance
            && (self.width - other.width).abs() < tolerance
            && (self.height - other.height).abs() < tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_deserialization() {
        let json = r#"{
            "nodeId": 7,
            "tagName": "p",
            "className": "title",
            "rect": {"x": 10, "y": 20, "width": 300, "height": 40},
            "style": {"backgroundColor": "rgb(255, 0, 0)", "fontSize": "24px"},
            "textContent": "Hello",
            "innerHtml": "Hello <strong>world</strong>",
            "offsetHeight": 40,
            "children": [{"tagName": "strong", "textContent": "world"}]
        }"#;

        let node: SnapshotNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_id, Some(7));
        assert_eq!(node.tag_name, "p");
        assert_eq!(node.rect, BoundingBox::new(10.0, 20.0, 300.0, 40.0));
        assert_eq!(node.style.background_color, "rgb(255, 0, 0)");
        assert_eq!(node.style.font_size, "24px");
        assert!(node.style.box_shadow.is_empty());
        assert_eq!(node.children.len(), 1);
        assert!(node.has_element_children());
        assert!(!node.children[0].has_element_children());
    }

    #[test]
    fn test_descendant_tags() {
        let node = SnapshotNode::new("p").with_children(vec![
            SnapshotNode::new("strong").with_children(vec![SnapshotNode::new("em")]),
            SnapshotNode::new("code"),
        ]);

        assert_eq!(node.descendant_tags(), vec!["strong", "em", "code"]);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);

        assert_eq!(bbox.translate(5.0, -5.0), BoundingBox::new(15.0, 15.0, 100.0, 50.0));
    }

    #[test]
    fn test_distance_and_tolerance() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(3.0, 4.0, 10.0, 10.0);

        assert_eq!(a.distance(&b), 5.0);
        assert!(a.approx_eq(&BoundingBox::new(1.5, 0.5, 11.0, 9.0), 2.0));
        assert!(!a.approx_eq(&b, 2.0));
    }
}
