//! Numeric and shorthand CSS value readers

use crate::attributes::{Background, Border, Edges, Filters, Font};
use crate::dom::{ComputedStyle, SnapshotNode};
use crate::style::color::parse_color;
use regex::Regex;
use std::sync::LazyLock;

static LEADING_FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

static LEADING_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[+-]?\d+").unwrap());

static FILTER_FUNCTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-zA-Z-]+)\(([^)]*)\)").unwrap());

static BACKGROUND_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"url\(['"]?([^'"]+)['"]?\)"#).unwrap());

/// Read the leading number of a CSS value (`"12.5px"` -> 12.5)
pub fn parse_css_float(value: &str) -> Option<f64> {
    LEADING_FLOAT
        .find(value)
        .and_then(|m| m.as_str().trim().parse().ok())
}

/// Read the leading integer of a CSS value (`"700"` -> 700, `"auto"` -> None)
pub fn parse_css_int(value: &str) -> Option<i64> {
    LEADING_INT
        .find(value)
        .and_then(|m| m.as_str().trim().parse().ok())
}

/// Split on `sep` outside of parentheses, dropping empty pieces
pub fn split_top_level(value: &str, sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 && sep(c) => {
                parts.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);

    parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}

pub fn parse_background(style: &ComputedStyle) -> Option<Background> {
    let color = parse_color(&style.background_color)?;
    Some(Background { color: Some(color.hex), opacity: color.opacity })
}

/// First `url(...)` of a background image
pub fn background_image_url(value: &str) -> Option<String> {
    if value.is_empty() || value == "none" {
        return None;
    }
    BACKGROUND_URL
        .captures(value)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn parse_border(style: &ComputedStyle) -> Option<Border> {
    let width = parse_css_float(&style.border_width);
    if width == Some(0.0) {
        return None;
    }

    // Per-side colors come back space separated; the first one wins
    let color = split_top_level(&style.border_color, char::is_whitespace)
        .first()
        .and_then(|c| parse_color(c));

    let border = Border {
        color: color.as_ref().map(|c| c.hex.clone()),
        width,
        opacity: color.and_then(|c| c.opacity),
    };

    if border.color.is_none() && border.width.is_none() && border.opacity.is_none() {
        return None;
    }
    Some(border)
}

pub fn parse_font(style: &ComputedStyle) -> Option<Font> {
    let name = if style.font_family == "initial" {
        None
    } else {
        split_top_level(&style.font_family, |c| c == ',')
            .first()
            .map(|family| family.replace(['"', '\''], ""))
            .filter(|family| !family.is_empty())
    };

    let font = Font {
        name,
        size: parse_css_float(&style.font_size),
        weight: parse_css_int(&style.font_weight),
        color: parse_color(&style.color).map(|c| c.hex),
        italic: style.font_style == "italic",
    };

    if font.name.is_none() && font.size.is_none() && font.weight.is_none() && font.color.is_none() && !font.italic {
        return None;
    }
    Some(font)
}

/// Line height in px, only when the element renders more than one line
pub fn parse_line_height(node: &SnapshotNode) -> Option<f64> {
    let style = &node.style;
    let text = node.text_content.as_deref().unwrap_or_default();

    let explicit = parse_css_float(&style.line_height);
    let single_line = explicit.or_else(|| parse_css_float(&style.font_size).map(|size| size * 1.2));

    let has_line_breaks = text.contains('\n') || text.contains('\r');
    let wraps = single_line.is_some_and(|line| node.offset_height > line * 2.0);
    let overflows = node.scroll_height > node.client_height;

    if !(has_line_breaks || wraps || overflows) || style.line_height == "normal" {
        return None;
    }
    explicit
}

fn edges(top: &str, right: &str, bottom: &str, left: &str) -> Option<Edges> {
    let edges = Edges {
        top: parse_css_float(top),
        bottom: parse_css_float(bottom),
        left: parse_css_float(left),
        right: parse_css_float(right),
    };

    let all_zero = [edges.top, edges.bottom, edges.left, edges.right]
        .iter()
        .all(|edge| edge.is_none_or(|v| v == 0.0));
    if all_zero { None } else { Some(edges) }
}

pub fn parse_margin(style: &ComputedStyle) -> Option<Edges> {
    edges(&style.margin_top, &style.margin_right, &style.margin_bottom, &style.margin_left)
}

pub fn parse_padding(style: &ComputedStyle) -> Option<Edges> {
    edges(&style.padding_top, &style.padding_right, &style.padding_bottom, &style.padding_left)
}

/// Expand `border-radius` into four corners clamped to half the box.
///
/// Corners 0 and 2 are limited by the width, 1 and 3 by the height.
pub fn parse_border_radius(value: &str, width: f64, height: f64) -> Option<[f64; 4]> {
    let value = value.trim();
    if value.is_empty() || value == "0px" {
        return None;
    }

    // Elliptical radii: keep the horizontal part
    let horizontal = value.split('/').next().unwrap_or_default();
    let limits = [width / 2.0, height / 2.0, width / 2.0, height / 2.0];
    let dimension = |corner: usize| if corner % 2 == 0 { width } else { height };

    let parts: Vec<&str> = horizontal.split_whitespace().collect();
    let read = |part: &str, corner: usize| -> f64 {
        let number = parse_css_float(part).unwrap_or(0.0);
        if part.ends_with('%') { number / 100.0 * dimension(corner) } else { number }
    };

    let corners = match parts.as_slice() {
        [a] => [read(a, 0), read(a, 1), read(a, 2), read(a, 3)],
        [a, b] => [read(a, 0), read(b, 1), read(a, 2), read(b, 3)],
        [a, b, c] => [read(a, 0), read(b, 1), read(c, 2), read(b, 3)],
        [a, b, c, d] => [read(a, 0), read(b, 1), read(c, 2), read(d, 3)],
        _ => return None,
    };

    let mut clamped = [0.0; 4];
    for (i, radius) in corners.iter().enumerate() {
        clamped[i] = radius.min(limits[i]).max(0.0);
    }

    if clamped.iter().all(|r| *r == 0.0) {
        return None;
    }
    Some(clamped)
}

/// Named numeric filter functions, e.g. `"invert(1) hue-rotate(90deg)"`
pub fn parse_filters(value: &str) -> Option<Filters> {
    if value.is_empty() || value == "none" {
        return None;
    }

    let mut filters = Filters::new();
    for capture in FILTER_FUNCTION.captures_iter(value) {
        let key = match &capture[1] {
            "invert" => "invert",
            "brightness" => "brightness",
            "contrast" => "contrast",
            "saturate" => "saturate",
            "hue-rotate" => "hueRotate",
            "blur" => "blur",
            "grayscale" => "grayscale",
            "sepia" => "sepia",
            "opacity" => "opacity",
            _ => continue,
        };
        if let Some(amount) = parse_css_float(&capture[2]) {
            filters.insert(key.to_string(), amount);
        }
    }

    if filters.is_empty() { None } else { Some(filters) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number_semantics() {
        assert_eq!(parse_css_float("12.5px"), Some(12.5));
        assert_eq!(parse_css_float(" -3em"), Some(-3.0));
        assert_eq!(parse_css_float(".5"), Some(0.5));
        assert_eq!(parse_css_float("1e2px"), Some(100.0));
        assert_eq!(parse_css_float("normal"), None);
        assert_eq!(parse_css_float(""), None);

        assert_eq!(parse_css_int("700"), Some(700));
        assert_eq!(parse_css_int("12.9"), Some(12));
        assert_eq!(parse_css_int("auto"), None);
    }

    #[test]
    fn test_split_respects_parentheses() {
        assert_eq!(
            split_top_level("rgb(1, 2, 3) 0px 0px, 4px 4px rgba(0, 0, 0, 0.5)", |c| c == ','),
            vec!["rgb(1, 2, 3) 0px 0px", "4px 4px rgba(0, 0, 0, 0.5)"]
        );
        assert_eq!(
            split_top_level("rgb(1, 2, 3) rgb(4, 5, 6)", char::is_whitespace),
            vec!["rgb(1, 2, 3)", "rgb(4, 5, 6)"]
        );
    }

    #[test]
    fn test_border_radius_two_values() {
        assert_eq!(parse_border_radius("10px 20px", 100.0, 100.0), Some([10.0, 20.0, 10.0, 20.0]));
        // Horizontal corners limited to half the width, vertical ones to half the height
        assert_eq!(parse_border_radius("10px 20px", 16.0, 30.0), Some([8.0, 15.0, 8.0, 15.0]));
    }

    #[test]
    fn test_border_radius_shorthands() {
        assert_eq!(parse_border_radius("4px", 100.0, 100.0), Some([4.0; 4]));
        assert_eq!(parse_border_radius("1px 2px 3px", 100.0, 100.0), Some([1.0, 2.0, 3.0, 2.0]));
        assert_eq!(parse_border_radius("1px 2px 3px 4px", 100.0, 100.0), Some([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(parse_border_radius("50%", 200.0, 100.0), Some([100.0, 50.0, 100.0, 50.0]));
        assert_eq!(parse_border_radius("10px / 4px", 100.0, 100.0), Some([10.0; 4]));
    }

    #[test]
    fn test_border_radius_absent() {
        assert_eq!(parse_border_radius("0px", 100.0, 100.0), None);
        assert_eq!(parse_border_radius("0px 0px", 100.0, 100.0), None);
        assert_eq!(parse_border_radius("", 100.0, 100.0), None);
        assert_eq!(parse_border_radius("1px 2px 3px 4px 5px", 100.0, 100.0), None);
    }

    #[test]
    fn test_filters() {
        let filters = parse_filters("invert(1) hue-rotate(90deg) drop-shadow(1px 1px red) blur(2px)").unwrap();
        assert_eq!(filters.keys().collect::<Vec<_>>(), vec!["invert", "hueRotate", "blur"]);
        assert_eq!(filters["hueRotate"], 90.0);

        assert_eq!(parse_filters("none"), None);
        assert_eq!(parse_filters("url(#f)"), None);
    }

    #[test]
    fn test_edges_all_zero_is_absent() {
        let mut style = ComputedStyle::default();
        style.margin_top = "0px".into();
        style.margin_right = "0px".into();
        style.margin_bottom = "0px".into();
        style.margin_left = "0px".into();
        assert_eq!(parse_margin(&style), None);
        assert_eq!(parse_padding(&style), None);

        style.margin_left = "8px".into();
        let margin = parse_margin(&style).unwrap();
        assert_eq!(margin.left, Some(8.0));
        assert_eq!(margin.top, Some(0.0));
    }

    #[test]
    fn test_font_first_family() {
        let mut style = ComputedStyle::default();
        style.font_family = "\"Open Sans\", Arial, sans-serif".into();
        style.font_size = "18px".into();
        style.font_weight = "600".into();
        style.color = "rgb(17, 34, 51)".into();
        style.font_style = "italic".into();

        let font = parse_font(&style).unwrap();
        assert_eq!(font.name.as_deref(), Some("Open Sans"));
        assert_eq!(font.size, Some(18.0));
        assert_eq!(font.weight, Some(600));
        assert_eq!(font.color.as_deref(), Some("112233"));
        assert!(font.italic);

        assert_eq!(parse_font(&ComputedStyle::default()), None);
    }

    #[test]
    fn test_border_requires_nonzero_width() {
        let mut style = ComputedStyle::default();
        style.border_width = "0px".into();
        style.border_color = "rgb(255, 0, 0)".into();
        assert_eq!(parse_border(&style), None);

        style.border_width = "2px".into();
        style.border_color = "rgb(255, 0, 0) rgb(0, 0, 255)".into();
        let border = parse_border(&style).unwrap();
        assert_eq!(border.color.as_deref(), Some("ff0000"));
        assert_eq!(border.width, Some(2.0));
    }

    #[test]
    fn test_line_height_only_for_multiline() {
        let mut node = SnapshotNode::new("p").with_text("one line");
        node.style.font_size = "16px".into();
        node.style.line_height = "24px".into();
        node.offset_height = 24.0;
        node.scroll_height = 24.0;
        node.client_height = 24.0;
        assert_eq!(parse_line_height(&node), None);

        node.offset_height = 72.0;
        assert_eq!(parse_line_height(&node), Some(24.0));

        node.style.line_height = "normal".into();
        assert_eq!(parse_line_height(&node), None);

        let mut broken = SnapshotNode::new("p").with_text("a\nb");
        broken.style.line_height = "30px".into();
        assert_eq!(parse_line_height(&broken), Some(30.0));
    }

    #[test]
    fn test_background_url() {
        assert_eq!(
            background_image_url("url(\"https://cdn.test/a.png\")").as_deref(),
            Some("https://cdn.test/a.png")
        );
        assert_eq!(background_image_url("linear-gradient(red, blue)"), None);
        assert_eq!(background_image_url("none"), None);
    }
}
