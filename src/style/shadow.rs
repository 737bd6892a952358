use crate::attributes::Shadow;
use crate::style::color::{ParsedColor, parse_color};
use crate::style::values::{parse_css_float, split_top_level};

/// One comma separated entry of a `box-shadow` list
#[derive(Debug, Clone, PartialEq)]
struct ShadowLayer {
    numbers: Vec<f64>,
    color: Option<ParsedColor>,
    inset: bool,
}

impl ShadowLayer {
    fn parse(layer: &str) -> Self {
        let mut numbers = Vec::new();
        let mut color_parts = Vec::new();
        let mut inset = false;

        for token in split_top_level(layer, char::is_whitespace) {
            if token.eq_ignore_ascii_case("inset") {
                inset = true;
            } else if token.contains('(') {
                color_parts.push(token);
            } else if let Some(number) = parse_css_float(token) {
                numbers.push(number);
            } else {
                color_parts.push(token);
            }
        }

        let color = if color_parts.is_empty() { None } else { parse_color(&color_parts.join(" ")) };
        Self { numbers, color, inset }
    }

    fn nonzero_count(&self) -> usize {
        self.numbers.iter().filter(|n| **n != 0.0).count()
    }

    fn has_visible_color(&self) -> bool {
        self.color.as_ref().is_some_and(ParsedColor::is_visible)
    }

    /// Non-zero lengths plus a bonus for a color that would actually show
    fn score(&self) -> usize {
        self.nonzero_count() + if self.has_visible_color() { 2 } else { 0 }
    }

    fn into_shadow(self) -> Option<Shadow> {
        if self.numbers.len() < 2 {
            return None;
        }
        let color = self.color?;

        let (x, y) = (self.numbers[0], self.numbers[1]);
        Some(Shadow {
            offset: [x, y],
            color: color.hex,
            opacity: color.opacity,
            radius: self.numbers.get(2).copied().unwrap_or(0.0),
            spread: self.numbers.get(3).copied().unwrap_or(0.0),
            inset: self.inset,
            angle: y.atan2(x).to_degrees(),
        })
    }
}

/// Index of the layer that best represents a multi-layer shadow.
///
/// Ties keep the earlier layer; when no layer has any visible effect the
/// first one is used.
pub fn select_shadow_layer(layers: &[&str]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;

    for (index, layer) in layers.iter().enumerate() {
        let parsed = ShadowLayer::parse(layer);
        if parsed.nonzero_count() == 0 && !parsed.has_visible_color() {
            continue;
        }
        let score = parsed.score();
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index).or((!layers.is_empty()).then_some(0))
}

/// Parse a computed `box-shadow` into the one layer worth drawing
pub fn parse_box_shadow(value: &str) -> Option<Shadow> {
    let value = value.trim();
    if value.is_empty() || value == "none" {
        return None;
    }

    let layers = split_top_level(value, |c| c == ',');
    let chosen = select_shadow_layer(&layers)?;
    ShadowLayer::parse(layers[chosen]).into_shadow()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_layer_beats_inert_one() {
        let layers = ["0 0 0 rgba(0,0,0,0)", "4px 4px 8px rgba(0,0,0,0.5)"];
        assert_eq!(select_shadow_layer(&layers), Some(1));

        let shadow = parse_box_shadow("0 0 0 rgba(0,0,0,0), 4px 4px 8px rgba(0,0,0,0.5)").unwrap();
        assert_eq!(shadow.offset, [4.0, 4.0]);
        assert_eq!(shadow.radius, 8.0);
        assert_eq!(shadow.color, "000000");
        assert_eq!(shadow.opacity, Some(0.5));
        assert!((shadow.angle - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_chrome_computed_order() {
        let shadow = parse_box_shadow("rgba(17, 34, 51, 0.25) 0px 10px 15px -3px").unwrap();
        assert_eq!(shadow.offset, [0.0, 10.0]);
        assert_eq!(shadow.radius, 15.0);
        assert_eq!(shadow.spread, -3.0);
        assert_eq!(shadow.color, "112233");
        assert_eq!(shadow.opacity, Some(0.25));
        assert!((shadow.angle - 90.0).abs() < 1e-9);
        assert!(!shadow.inset);
    }

    #[test]
    fn test_colored_layer_outscores_more_lengths() {
        // 3 non-zero lengths score 3; 1 length plus a visible color scores 3 too, first wins
        let layers = ["1px 2px 3px black", "0 1px 0 red"];
        assert_eq!(select_shadow_layer(&layers), Some(0));

        let layers = ["1px 0 0 black", "0 1px 0 red"];
        assert_eq!(select_shadow_layer(&layers), Some(1));
    }

    #[test]
    fn test_inert_layers_fall_back_to_first() {
        let layers = ["0 0 0 transparent", "0 0 0 rgba(0, 0, 0, 0)"];
        assert_eq!(select_shadow_layer(&layers), Some(0));
        assert_eq!(parse_box_shadow("0 0 0 transparent, 0 0 0 rgba(0, 0, 0, 0)"), None);
    }

    #[test]
    fn test_requires_two_lengths_and_color() {
        assert_eq!(parse_box_shadow("4px red"), None);
        assert_eq!(parse_box_shadow("4px 4px"), None);
        assert_eq!(parse_box_shadow("none"), None);
    }

    #[test]
    fn test_inset_flag() {
        let shadow = parse_box_shadow("inset 0 2px 4px #ff0000").unwrap();
        assert!(shadow.inset);
        assert_eq!(shadow.color, "ff0000");
        assert_eq!(shadow.opacity, None);
    }
}
