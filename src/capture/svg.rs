use crate::error::{ExportError, Result};
use crate::style::parse_css_float;
use regex::Regex;
use resvg::{tiny_skia, usvg};
use std::sync::LazyLock;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

static CURRENT_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)currentcolor").unwrap());

/// `fill`, `stroke` or `color` set to exactly `currentColor`
static CURRENT_COLOR_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(\s(?:fill|stroke|color)\s*=\s*)(["'])currentcolor(["'])"#).unwrap());

static STYLE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(\sstyle\s*=\s*")([^"]*)(")"#).unwrap());

static TAG_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#).unwrap());

/// Turns vector markup into PNG bytes
pub trait Rasterizer {
    /// Render `markup` fit-contained and centered in a `width` x `height`
    /// transparent canvas
    fn rasterize(&self, markup: &str, width: u32, height: u32) -> Result<Vec<u8>>;
}

/// [`Rasterizer`] backed by resvg, rendering text with the system fonts
pub struct ResvgRasterizer {
    options: usvg::Options<'static>,
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        log::debug!("Loaded {} font faces for SVG text", options.fontdb.len());
        Self { options }
    }

    /// Use caller-provided parse options, including their font database
    pub fn with_options(options: usvg::Options<'static>) -> Self {
        Self { options }
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, markup: &str, width: u32, height: u32) -> Result<Vec<u8>> {
        let tree = usvg::Tree::from_str(markup, &self.options)
            .map_err(|e| ExportError::RasterizeFailed(format!("SVG parsing error: {}", e)))?;

        // Without fonts every glyph renders as nothing
        if self.options.fontdb.len() == 0 && markup.contains("<text") {
            return Err(ExportError::RasterizeFailed("SVG contains text but no fonts are available".to_string()));
        }

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            ExportError::RasterizeFailed(format!("Unable to create a {}x{} pixel buffer", width, height))
        })?;

        let size = tree.size();
        let scale = (width as f32 / size.width()).min(height as f32 / size.height());
        let dx = (width as f32 - size.width() * scale) / 2.0;
        let dy = (height as f32 - size.height() * scale) / 2.0;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_translate(dx, dy).pre_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        pixmap
            .encode_png()
            .map_err(|e| ExportError::RasterizeFailed(format!("PNG encoding error: {}", e)))
    }
}

/// Make extracted `<svg>` markup standalone.
///
/// Adds the namespace and any missing `width`, `height` and `viewBox`, pins the
/// root `color`, and substitutes `currentColor` with the resolved text color.
pub fn prepare_svg_markup(markup: &str, color: &str, width: f64, height: f64) -> String {
    let markup = CURRENT_COLOR_ATTRIBUTE.replace_all(markup, |caps: &regex::Captures| {
        format!("{}{}{}{}", &caps[1], &caps[2], color, &caps[3])
    });
    let markup = STYLE_ATTRIBUTE.replace_all(&markup, |caps: &regex::Captures| {
        format!("{}{}{}", &caps[1], CURRENT_COLOR.replace_all(&caps[2], color), &caps[3])
    });

    let Some(start) = markup.find("<svg") else {
        return markup.into_owned();
    };
    let Some(end) = open_tag_end(&markup, start) else {
        return markup.into_owned();
    };

    let self_closing = markup[..end].ends_with('/');
    let tag_end = if self_closing { end - 1 } else { end };
    let open_tag = &markup[start..tag_end];

    let mut extra = String::new();
    if attribute(open_tag, "xmlns").is_none() {
        extra.push_str(&format!(r#" xmlns="{}""#, SVG_NAMESPACE));
    }
    if markup.contains("xlink:") && attribute(open_tag, "xmlns:xlink").is_none() {
        extra.push_str(&format!(r#" xmlns:xlink="{}""#, XLINK_NAMESPACE));
    }

    let declared_width = attribute(open_tag, "width");
    let declared_height = attribute(open_tag, "height");
    if declared_width.is_none() {
        extra.push_str(&format!(r#" width="{}""#, width));
    }
    if declared_height.is_none() {
        extra.push_str(&format!(r#" height="{}""#, height));
    }
    if attribute(open_tag, "viewBox").is_none() {
        let view_width = declared_width.as_deref().and_then(parse_css_float).unwrap_or(width);
        let view_height = declared_height.as_deref().and_then(parse_css_float).unwrap_or(height);
        extra.push_str(&format!(r#" viewBox="0 0 {} {}""#, view_width, view_height));
    }

    let open_tag = match attribute(open_tag, "style") {
        Some(style) => {
            let pinned = format!("{}; color: {}", style.trim_end_matches([';', ' ']), color);
            open_tag.replacen(&format!(r#"style="{}""#, style), &format!(r#"style="{}""#, pinned), 1)
        }
        None => format!(r#"{} style="color: {}""#, open_tag, color),
    };

    format!("{}{}{}{}", &markup[..start], open_tag, extra, &markup[tag_end..])
}

/// Index of the `>` closing the tag opened at `start`, skipping quoted values
fn open_tag_end(markup: &str, start: usize) -> Option<usize> {
    let mut quote = None;
    for (i, c) in markup[start..].char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return Some(start + i),
            _ => {}
        }
    }
    None
}

/// Value of a double-quoted attribute on an opening tag
fn attribute(open_tag: &str, name: &str) -> Option<String> {
    TAG_ATTRIBUTE
        .captures_iter(open_tag)
        .find(|caps| &caps[1] == name)
        .map(|caps| caps[2].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_missing_root_attributes() {
        let prepared = prepare_svg_markup(
            r#"<svg class="icon"><path fill="currentColor" d="M0 0h24v24H0z"/></svg>"#,
            "rgb(255, 0, 0)",
            24.0,
            24.0,
        );

        assert!(prepared.starts_with(r#"<svg class="icon" style="color: rgb(255, 0, 0)""#));
        assert!(prepared.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert!(prepared.contains(r#" width="24""#));
        assert!(prepared.contains(r#" height="24""#));
        assert!(prepared.contains(r#"viewBox="0 0 24 24""#));
        assert!(prepared.contains(r#"fill="rgb(255, 0, 0)""#));
        assert!(!prepared.to_lowercase().contains("currentcolor"));
    }

    #[test]
    fn test_keeps_declared_dimensions() {
        let prepared = prepare_svg_markup(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="32" style="stroke: currentColor;"></svg>"#,
            "#123456",
            10.0,
            10.0,
        );

        assert_eq!(prepared.matches("width=").count(), 1);
        assert!(prepared.contains(r#"viewBox="0 0 48 32""#));
        assert!(prepared.contains(r#"style="stroke: #123456; color: #123456""#));
        assert_eq!(prepared.matches("xmlns=").count(), 1);
    }

    #[test]
    fn test_current_color_only_in_paint_values() {
        let prepared = prepare_svg_markup(
            r#"<svg><text x="0" y="10" stroke='currentcolor'>currentColor</text></svg>"#,
            "#ff0000",
            10.0,
            10.0,
        );

        assert!(prepared.contains("stroke='#ff0000'"));
        assert!(prepared.contains(">currentColor</text>"));
    }

    #[test]
    fn test_non_svg_markup_untouched() {
        assert_eq!(prepare_svg_markup("<div></div>", "red", 1.0, 1.0), "<div></div>");
    }

    #[test]
    fn test_resvg_fit_contains() {
        let markup = prepare_svg_markup(
            r#"<svg viewBox="0 0 10 10" width="10" height="10"><rect width="10" height="10" fill="currentColor"/></svg>"#,
            "rgb(0, 128, 0)",
            10.0,
            10.0,
        );
        let png = ResvgRasterizer::new().rasterize(&markup, 40, 20).unwrap();

        let image = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (40, 20));
        // 20x20 square centered horizontally; the corners stay transparent
        assert_eq!(image.get_pixel(0, 0)[3], 0);
        assert_eq!(image.get_pixel(20, 10).0, [0, 128, 0, 255]);
    }

    #[test]
    fn test_resvg_renders_text() {
        let markup = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="60" viewBox="0 0 200 60"><text x="10" y="40" font-size="32" font-family="DejaVu Sans, Arial, sans-serif" fill="black">Q3 Sales</text></svg>"#;

        match ResvgRasterizer::new().rasterize(markup, 200, 60) {
            Ok(png) => {
                let image = image::load_from_memory(&png).unwrap().to_rgba8();
                let opaque = image.pixels().filter(|p| p[3] > 0).count();
                assert!(opaque > 0, "text rendered as a blank image");
            }
            // Hosts without any font must hand over to region capture
            Err(e) => assert!(matches!(e, ExportError::RasterizeFailed(_))),
        }
    }

    #[test]
    fn test_text_without_fonts_is_an_error() {
        let rasterizer = ResvgRasterizer::with_options(usvg::Options::default());
        let err = rasterizer
            .rasterize(r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><text y="8">a</text></svg>"#, 20, 10)
            .unwrap_err();
        assert!(matches!(err, ExportError::RasterizeFailed(_)));
    }

    #[test]
    fn test_resvg_rejects_garbage() {
        let err = ResvgRasterizer::new().rasterize("<svg", 10, 10).unwrap_err();
        assert!(matches!(err, ExportError::RasterizeFailed(_)));
    }
}
