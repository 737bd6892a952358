//! Screenshot Fallback
//!
//! Elements flagged by the walker (svg, canvas, table) are replaced by PNG
//! files. Vector graphics are rasterized from their markup when possible; every
//! other case, and any failed rasterization, captures the rendered region with
//! the rest of the page hidden.

pub mod locate;
pub mod svg;

pub use locate::match_candidate;
pub use svg::{Rasterizer, ResvgRasterizer, prepare_svg_markup};

use crate::attributes::{ElementAttributes, Position, SlideAttributesResult};
use crate::browser::RenderHost;
use crate::dom::{BoundingBox, Candidate, SlideFrame, SlidePage};
use crate::error::{ExportError, Result};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Rewrites screenshot-flagged elements into pictures backed by files
pub struct ScreenshotResolver<'p, 'a, H: RenderHost, R: Rasterizer> {
    page: &'p SlidePage<'a, H>,
    rasterizer: &'p R,
    screenshots_dir: &'p Path,
    isolation_delay: Duration,
    strict: bool,
}

impl<'p, 'a, H: RenderHost, R: Rasterizer> ScreenshotResolver<'p, 'a, H, R> {
    pub fn new(page: &'p SlidePage<'a, H>, rasterizer: &'p R, screenshots_dir: &'p Path) -> Self {
        Self {
            page,
            rasterizer,
            screenshots_dir,
            isolation_delay: Duration::from_millis(50),
            strict: false,
        }
    }

    /// Time given to the page to apply isolation styles before capturing
    pub fn isolation_delay(mut self, delay: Duration) -> Self {
        self.isolation_delay = delay;
        self
    }

    /// Fail the export when a region capture fails instead of dropping the element
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve every flagged element of one slide, returning a new result
    pub fn resolve_slide(&self, slide: usize, attributes: &SlideAttributesResult) -> Result<SlideAttributesResult> {
        let mut elements = Vec::with_capacity(attributes.elements.len());

        for element in &attributes.elements {
            if !element.should_screenshot {
                elements.push(element.clone());
                continue;
            }
            match self.resolve(slide, element)? {
                Some(resolved) => elements.push(resolved),
                None => log::warn!("Dropping <{}> on slide {} after failed capture", element.tag_name, slide),
            }
        }

        Ok(SlideAttributesResult { elements, ..attributes.clone() })
    }

    /// Produce a picture record for one flagged element.
    ///
    /// `Ok(None)` means the capture failed and the element should be left out.
    pub fn resolve(&self, slide: usize, element: &ElementAttributes) -> Result<Option<ElementAttributes>> {
        let Some(position) = element.position else {
            log::warn!("Flagged <{}> on slide {} has no position", element.tag_name, slide);
            return Ok(None);
        };

        let path = self.screenshots_dir.join(format!("{}.png", Uuid::new_v4()));
        let frame = self.page.slide_frame(slide)?;
        let target = position.to_absolute(&frame.rect);

        let candidates = self.page.locate_candidates(slide, &element.tag_name)?;
        let matched = match_candidate(&target, &candidates, element.node_id);
        log::debug!(
            "Slide {} <{}> at {:?}: {} candidates, matched {:?}",
            slide,
            element.tag_name,
            target,
            candidates.len(),
            matched.map(|c| c.node_id)
        );

        if element.is_tag("svg") {
            match matched {
                Some(candidate) => match self.rasterize_svg(candidate.node_id, &position) {
                    Ok(png) => {
                        std::fs::write(&path, png)?;
                        return Ok(Some(as_picture(element, &path)));
                    }
                    Err(e) => log::warn!("SVG conversion failed, falling back to screenshot: {}", e),
                },
                None => log::warn!("SVG not found on slide {}, using screenshot fallback", slide),
            }
        }

        match self.capture(&frame, &target, matched) {
            Ok(png) => {
                std::fs::write(&path, png)?;
                Ok(Some(as_picture(element, &path)))
            }
            Err(e) if self.strict => Err(e),
            Err(e) => {
                log::warn!("Screenshot of <{}> on slide {} failed: {}", element.tag_name, slide, e);
                Ok(None)
            }
        }
    }

    fn rasterize_svg(&self, node_id: u64, position: &Position) -> Result<Vec<u8>> {
        let source = self.page.extract_svg(node_id)?;
        let markup = prepare_svg_markup(&source.markup, &source.color, source.width, source.height);

        let width = position.width.round().max(1.0) as u32;
        let height = position.height.round().max(1.0) as u32;
        self.rasterizer.rasterize(&markup, width, height)
    }

    /// Capture the element's region with everything unrelated hidden
    fn capture(&self, frame: &SlideFrame, target: &BoundingBox, matched: Option<Candidate>) -> Result<Vec<u8>> {
        let isolation = match matched {
            Some(candidate) => self.page.isolate(candidate.node_id)?,
            None => None,
        };

        let png = match isolation {
            Some(guard) => {
                std::thread::sleep(self.isolation_delay);
                let captured = self.page.host().capture_region(&guard.rect());
                if let Err(e) = guard.release() {
                    log::warn!("Failed to restore opacity after capture: {}", e);
                }
                captured?
            }
            None => {
                log::warn!("Element not located, capturing its region without isolation");
                self.page.host().capture_region(&frame.to_page(target))?
            }
        };

        validate_png(&png)?;
        Ok(png)
    }
}

/// A decodable, non-empty raster
fn validate_png(bytes: &[u8]) -> Result<()> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ExportError::CaptureFailed(format!("Captured bytes are not an image: {}", e)))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ExportError::CaptureFailed("Captured image is empty".to_string()));
    }
    Ok(())
}

fn as_picture(element: &ElementAttributes, path: &Path) -> ElementAttributes {
    ElementAttributes {
        image_src: Some(path.to_string_lossy().into_owned()),
        should_screenshot: false,
        object_fit: Some("cover".to_string()),
        ..element.clone()
    }
}
