//! Tree Walker
//!
//! Walks a snapshotted slide depth-first, threads inherited style down the
//! recursion and reduces the tree to the flat, paint-ordered list of shapes
//! worth exporting.

use crate::attributes::{Background, ElementAttributes, Font, Position, SlideAttributesResult};
use crate::dom::SnapshotNode;
use crate::style::parse_element;

/// Tags that never paint anything
const SKIPPED_TAGS: [&str; 5] = ["style", "script", "link", "meta", "path"];

/// Inline formatting a paragraph may contain and still be kept as one text run
const INLINE_TAGS: [&str; 5] = ["strong", "u", "em", "code", "s"];

/// Slide size assumed when the root reports no geometry
const FALLBACK_SLIDE: Position = Position { left: 0.0, top: 0.0, width: 1280.0, height: 720.0 };

/// Style handed from a parent to its children
#[derive(Debug, Clone, Default)]
struct Inherited {
    font: Option<Font>,
    background: Option<Background>,
    border_radius: Option<[f64; 4]>,
    z_index: Option<i64>,
    opacity: Option<f64>,
}

impl Inherited {
    fn apply(&self, attrs: &mut ElementAttributes) {
        if attrs.font.is_none() && attrs.has_text() {
            attrs.font = self.font.clone();
        }
        if attrs.background.is_none() && attrs.shadow.is_some() {
            attrs.background = self.background.clone();
        }
        if attrs.border_radius.is_none() {
            attrs.border_radius = self.border_radius;
        }
        if let Some(z_index) = self.z_index
            && attrs.z_index == 0
        {
            attrs.z_index = z_index;
        }
        if self.opacity.is_some() && attrs.opacity.is_none_or(|o| o == 1.0) {
            attrs.opacity = self.opacity;
        }
    }

    /// Context for the children of `attrs`
    fn for_children(&self, attrs: &ElementAttributes) -> Inherited {
        Inherited {
            font: attrs.font.clone().or_else(|| self.font.clone()),
            background: attrs.background.clone().or_else(|| self.background.clone()),
            border_radius: attrs.border_radius.or(self.border_radius),
            z_index: if attrs.z_index != 0 { Some(attrs.z_index) } else { self.z_index },
            opacity: attrs.opacity.filter(|o| *o != 0.0 && !o.is_nan()).or(self.opacity),
        }
    }
}

/// An extracted element and how deep in the slide it sits
#[derive(Debug, Clone)]
struct Collected {
    attributes: ElementAttributes,
    depth: usize,
}

/// Extract every paintable element of one slide, in paint order
pub fn walk_slide(root: &SnapshotNode) -> SlideAttributesResult {
    let root_attrs = parse_element(root);
    let frame = root_attrs
        .position
        .filter(|p| !p.is_empty_area())
        .unwrap_or(FALLBACK_SLIDE);

    let baseline = Inherited {
        font: root_attrs.font,
        background: root_attrs.background,
        border_radius: None,
        z_index: Some(root_attrs.z_index),
        opacity: root_attrs.opacity,
    };

    let mut collected = Vec::new();
    collect_children(root, &frame, 0, &baseline, &mut collected);
    log::debug!("Collected {} candidate elements", collected.len());

    let background_color = collected
        .iter()
        .filter(|c| c.attributes.position.is_some_and(|p| p.occupies(&frame)))
        .find_map(|c| c.attributes.background_color().map(str::to_string))
        .or_else(|| baseline.background.and_then(|b| b.color));

    let mut paintable: Vec<Collected> = collected
        .into_iter()
        .filter(|c| is_paintable(&c.attributes, &frame))
        .collect();
    sort_paint_order(&mut paintable);

    let elements = paintable
        .into_iter()
        .map(|c| {
            let mut attrs = c.attributes;
            if attrs.shadow.is_some()
                && attrs.background_color().is_none()
                && let Some(color) = &background_color
            {
                attrs.background = Some(Background { color: Some(color.clone()), opacity: None });
            }
            attrs
        })
        .collect();

    SlideAttributesResult { elements, background_color, speaker_note: None }
}

fn collect_children(
    node: &SnapshotNode,
    frame: &Position,
    depth: usize,
    inherited: &Inherited,
    out: &mut Vec<Collected>,
) {
    for child in &node.children {
        let mut attrs = parse_element(child);
        if SKIPPED_TAGS.contains(&attrs.tag_name.as_str()) {
            continue;
        }

        inherited.apply(&mut attrs);

        attrs.position = attrs.position.map(|p| p.relative_to(frame));
        if attrs.position.is_none_or(|p| p.is_empty_area()) {
            continue;
        }

        if attrs.is_tag("p") && is_inline_paragraph(child) {
            attrs.inner_text = child.inner_html.clone().or_else(|| child.text_content.clone());
            out.push(Collected { attributes: attrs, depth });
            continue;
        }

        attrs.should_screenshot = attrs.needs_raster();
        // svg keeps walking; canvas and table are captured whole
        let descend = !attrs.should_screenshot || attrs.is_tag("svg");
        let context = inherited.for_children(&attrs);

        out.push(Collected { attributes: attrs, depth });

        if descend {
            collect_children(child, frame, depth + 1, &context, out);
        }
    }
}

/// A `<p>` whose only descendants are simple inline formatting
fn is_inline_paragraph(node: &SnapshotNode) -> bool {
    let tags = node.descendant_tags();
    !tags.is_empty() && tags.iter().all(|tag| INLINE_TAGS.contains(tag))
}

fn is_paintable(attrs: &ElementAttributes, frame: &Position) -> bool {
    let has_visual = attrs.background_color().is_some()
        || attrs.border_color().is_some()
        || attrs.shadow.is_some()
        || attrs.has_text();
    let has_special_content = attrs.image_src.is_some() || attrs.needs_raster();
    let occupies_slide = attrs.position.is_some_and(|p| p.occupies(frame));

    (has_visual && !occupies_slide) || has_special_content
}

/// Higher z-index first, then shallower elements first; stable otherwise
fn sort_paint_order(elements: &mut [Collected]) {
    elements.sort_by(|a, b| {
        b.attributes
            .z_index
            .cmp(&a.attributes.z_index)
            .then(a.depth.cmp(&b.depth))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Shadow;
    use crate::dom::ComputedStyle;

    fn style(edit: impl FnOnce(&mut ComputedStyle)) -> ComputedStyle {
        let mut style = ComputedStyle::default();
        edit(&mut style);
        style
    }

    fn slide(children: Vec<SnapshotNode>) -> SnapshotNode {
        SnapshotNode::new("div")
            .with_rect(100.0, 50.0, 1280.0, 720.0)
            .with_children(children)
    }

    #[test]
    fn test_background_div_and_paragraph() {
        let paragraph = SnapshotNode::new("p")
            .with_rect(200.0, 150.0, 400.0, 40.0)
            .with_text("Hello")
            .with_style(style(|s| {
                s.border_width = "1px".into();
                s.border_color = "rgb(255, 0, 0)".into();
                s.color = "rgb(0, 0, 0)".into();
            }));
        let background = SnapshotNode::new("div")
            .with_rect(100.0, 50.0, 1280.0, 720.0)
            .with_style(style(|s| s.background_color = "#112233".into()))
            .with_children(vec![paragraph]);

        let result = walk_slide(&slide(vec![background]));

        assert_eq!(result.background_color.as_deref(), Some("112233"));
        assert_eq!(result.elements.len(), 1);
        let p = &result.elements[0];
        assert_eq!(p.tag_name, "p");
        assert_eq!(p.inner_text.as_deref(), Some("Hello"));
        assert_eq!(p.position, Some(Position::new(100.0, 100.0, 400.0, 40.0)));
    }

    #[test]
    fn test_zero_area_subtree_is_skipped() {
        let hidden_child = SnapshotNode::new("span")
            .with_rect(0.0, 0.0, 50.0, 50.0)
            .with_text("never seen");
        let collapsed = SnapshotNode::new("div")
            .with_rect(100.0, 50.0, 0.0, 30.0)
            .with_children(vec![hidden_child]);
        let sibling = SnapshotNode::new("span").with_rect(110.0, 60.0, 20.0, 10.0).with_text("seen");

        let result = walk_slide(&slide(vec![collapsed, sibling]));

        assert_eq!(result.elements.len(), 1);
        assert_eq!(result.elements[0].inner_text.as_deref(), Some("seen"));
    }

    #[test]
    fn test_root_font_inherited_by_text_without_font() {
        let root = slide(vec![SnapshotNode::new("span").with_rect(110.0, 60.0, 20.0, 10.0).with_text("hi")])
            .with_style(style(|s| {
                s.font_family = "Inter".into();
                s.font_size = "20px".into();
            }));

        let result = walk_slide(&root);
        let font = result.elements[0].font.as_ref().unwrap();
        assert_eq!(font.name.as_deref(), Some("Inter"));
        assert_eq!(font.size, Some(20.0));
    }

    #[test]
    fn test_own_values_win_over_inherited() {
        let inherited = Inherited {
            font: Some(Font { name: Some("Parent".into()), ..Default::default() }),
            background: Some(Background { color: Some("ffffff".into()), opacity: None }),
            border_radius: Some([4.0; 4]),
            z_index: Some(3),
            opacity: Some(0.5),
        };

        let mut attrs = ElementAttributes::new("div");
        attrs.inner_text = Some("text".into());
        attrs.font = Some(Font { name: Some("Own".into()), ..Default::default() });
        attrs.background = Some(Background { color: Some("000000".into()), opacity: None });
        attrs.shadow = Some(Shadow { color: "000000".into(), ..Default::default() });
        attrs.border_radius = Some([1.0; 4]);
        attrs.z_index = 7;
        attrs.opacity = Some(0.8);
        inherited.apply(&mut attrs);

        assert_eq!(attrs.font.as_ref().unwrap().name.as_deref(), Some("Own"));
        assert_eq!(attrs.background_color(), Some("000000"));
        assert_eq!(attrs.border_radius, Some([1.0; 4]));
        assert_eq!(attrs.z_index, 7);
        assert_eq!(attrs.opacity, Some(0.8));
    }

    #[test]
    fn test_defaults_receive_inherited() {
        let inherited = Inherited {
            font: Some(Font { name: Some("Parent".into()), ..Default::default() }),
            background: Some(Background { color: Some("ffffff".into()), opacity: None }),
            border_radius: Some([4.0; 4]),
            z_index: Some(3),
            opacity: Some(0.5),
        };

        let mut attrs = ElementAttributes::new("div");
        attrs.inner_text = Some("text".into());
        attrs.shadow = Some(Shadow { color: "000000".into(), ..Default::default() });
        attrs.opacity = Some(1.0);
        inherited.apply(&mut attrs);

        assert_eq!(attrs.font.as_ref().unwrap().name.as_deref(), Some("Parent"));
        assert_eq!(attrs.background_color(), Some("ffffff"));
        assert_eq!(attrs.border_radius, Some([4.0; 4]));
        assert_eq!(attrs.z_index, 3);
        assert_eq!(attrs.opacity, Some(0.5));

        // No shadow, no inherited background; blank text, no inherited font
        let mut plain = ElementAttributes::new("div");
        plain.inner_text = Some("   ".into());
        inherited.apply(&mut plain);
        assert!(plain.background.is_none());
        assert!(plain.font.is_none());
    }

    #[test]
    fn test_paint_order_z_then_depth() {
        let at = |z: i64, depth: usize| {
            let mut attributes = ElementAttributes::new("div");
            attributes.z_index = z;
            Collected { attributes, depth }
        };
        let mut elements = vec![at(2, 1), at(2, 0), at(1, 5)];
        sort_paint_order(&mut elements);

        let order: Vec<_> = elements.iter().map(|c| (c.attributes.z_index, c.depth)).collect();
        assert_eq!(order, vec![(2, 0), (2, 1), (1, 5)]);
    }

    #[test]
    fn test_inline_paragraph_is_one_leaf() {
        let strong = SnapshotNode::new("strong").with_rect(100.0, 50.0, 10.0, 10.0).with_text("bold");
        let p = SnapshotNode::new("p")
            .with_rect(100.0, 50.0, 200.0, 20.0)
            .with_text("Some bold")
            .with_inner_html("Some <strong>bold</strong>")
            .with_children(vec![strong]);

        let result = walk_slide(&slide(vec![p]));
        assert_eq!(result.elements.len(), 1);
        assert_eq!(result.elements[0].inner_text.as_deref(), Some("Some <strong>bold</strong>"));
    }

    #[test]
    fn test_paragraph_with_block_children_recurses() {
        let span = SnapshotNode::new("span").with_rect(100.0, 50.0, 10.0, 10.0).with_text("inner");
        let p = SnapshotNode::new("p")
            .with_rect(100.0, 50.0, 200.0, 20.0)
            .with_inner_html("<span>inner</span>")
            .with_children(vec![span]);

        let result = walk_slide(&slide(vec![p]));
        assert_eq!(result.elements.len(), 1);
        assert_eq!(result.elements[0].tag_name, "span");
    }

    #[test]
    fn test_raster_tags_flagged() {
        let svg = SnapshotNode::new("svg")
            .with_rect(120.0, 60.0, 24.0, 24.0)
            .with_children(vec![SnapshotNode::new("path").with_rect(120.0, 60.0, 24.0, 24.0)]);
        let cell = SnapshotNode::new("td").with_rect(300.0, 60.0, 50.0, 20.0).with_text("cell");
        let table = SnapshotNode::new("table")
            .with_rect(300.0, 60.0, 100.0, 40.0)
            .with_children(vec![cell]);

        let result = walk_slide(&slide(vec![svg, table]));
        let tags: Vec<_> = result.elements.iter().map(|e| e.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["svg", "table"]);
        assert!(result.elements.iter().all(|e| e.should_screenshot));
    }

    #[test]
    fn test_shadow_gets_slide_background() {
        let card = SnapshotNode::new("div")
            .with_rect(200.0, 100.0, 100.0, 100.0)
            .with_style(style(|s| s.box_shadow = "rgba(0, 0, 0, 0.2) 0px 4px 8px 0px".into()));
        let root = slide(vec![card]).with_style(style(|s| s.background_color = "rgb(250, 250, 250)".into()));

        let result = walk_slide(&root);
        assert_eq!(result.background_color.as_deref(), Some("fafafa"));
        assert_eq!(result.elements.len(), 1);
        assert_eq!(result.elements[0].background_color(), Some("fafafa"));
    }

    #[test]
    fn test_full_slide_image_is_kept() {
        let image = SnapshotNode::new("img")
            .with_rect(100.0, 50.0, 1280.0, 720.0)
            .with_src("https://cdn.test/bg.png");
        let result = walk_slide(&slide(vec![image]));
        assert_eq!(result.elements.len(), 1);
        assert_eq!(result.background_color, None);
    }

    #[test]
    fn test_script_and_style_tags_dropped() {
        let script = SnapshotNode::new("script").with_rect(100.0, 50.0, 10.0, 10.0).with_text("var x = 1;");
        let result = walk_slide(&slide(vec![script]));
        assert!(result.elements.is_empty());
    }
}
