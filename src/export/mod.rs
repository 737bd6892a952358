//! Export orchestration: readiness, slide enumeration, per-slide extraction,
//! screenshot resolution and conversion, strictly one slide after another.

pub mod options;
pub mod response;
pub mod retry;

pub use options::ExportOptions;
pub use response::ExportResponse;
pub use retry::RetryPolicy;

use crate::attributes::SlideAttributesResult;
use crate::browser::RenderHost;
use crate::capture::{Rasterizer, ScreenshotResolver};
use crate::dom::{SlideListing, SlidePage};
use crate::error::{ExportError, Result};
use crate::pptx::{PptxPresentationModel, convert_slides};
use crate::walker::walk_slide;
use std::path::Path;
use std::time::Duration;

/// Runs one export against a page that already shows the deck
pub struct PresentationExporter<'a, H: RenderHost, R: Rasterizer> {
    host: &'a H,
    rasterizer: &'a R,
    options: &'a ExportOptions,
    screenshots_dir: &'a Path,
    sleep: Box<dyn Fn(Duration) + 'a>,
}

impl<'a, H: RenderHost, R: Rasterizer> PresentationExporter<'a, H, R> {
    pub fn new(host: &'a H, rasterizer: &'a R, options: &'a ExportOptions, screenshots_dir: &'a Path) -> Self {
        Self {
            host,
            rasterizer,
            options,
            screenshots_dir,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the sleep used between enumeration attempts
    pub fn sleeper(mut self, sleep: impl Fn(Duration) + 'a) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn export(&self) -> Result<PptxPresentationModel> {
        let page = SlidePage::new(self.host, &self.options.slides);

        self.wait_until_ready(&page);
        let listing = self.enumerate(&page)?;
        log::info!(
            "Exporting {} slides with {} speaker notes",
            listing.slides_count,
            listing.speaker_notes.len()
        );

        let slides = self.extract_slides(&page, &listing)?;
        let model = convert_slides(&slides);
        log::info!("Export finished with {} slides", model.slides.len());

        Ok(model)
    }

    /// Failures here are tolerated; enumeration decides whether slides exist
    fn wait_until_ready(&self, page: &SlidePage<'_, H>) {
        match page.wait_for_slides(self.options.ready_attempts, self.options.ready_interval) {
            Ok(ready) => log::info!(
                "Slides ready: {} slides after {} polls{}",
                ready.slides_count,
                ready.attempts,
                if ready.via_observer { " (observer)" } else { "" }
            ),
            Err(e) => log::warn!("Waiting for slides failed, continuing: {}", e),
        }
    }

    fn enumerate(&self, page: &SlidePage<'_, H>) -> Result<SlideListing> {
        let policy = self.options.enumeration;

        policy
            .run(&self.sleep, |attempt| {
                log::debug!("Enumerating slides, attempt {}/{}", attempt + 1, policy.attempts);
                let listing = page.enumerate_slides()?;

                if let Some(error) = &listing.error {
                    log::warn!("Attempt {} failed: {}", attempt + 1, error);
                    return Err(ExportError::SlidesNotReady(error.clone()));
                }
                if listing.slides_count == 0 {
                    log::warn!("Attempt {} found 0 slides", attempt + 1);
                    return Err(ExportError::SlidesNotReady("No slides found in presentation".to_string()));
                }
                Ok(listing)
            })
            .map_err(|e| {
                let reason = match e {
                    ExportError::SlidesNotReady(msg) => msg,
                    other => other.to_string(),
                };
                ExportError::SlidesNotReady(format!("Failed to get slides data: {}", reason))
            })
    }

    fn extract_slides(&self, page: &SlidePage<'_, H>, listing: &SlideListing) -> Result<Vec<SlideAttributesResult>> {
        let resolver = ScreenshotResolver::new(page, self.rasterizer, self.screenshots_dir)
            .isolation_delay(self.options.isolation_delay)
            .strict(self.options.strict_capture);

        let mut slides = Vec::with_capacity(listing.slides_count);
        for index in 0..listing.slides_count {
            log::info!("Processing slide {}/{}", index + 1, listing.slides_count);

            let snapshot = page.snapshot_slide(index)?;
            let walked = walk_slide(&snapshot);
            log::debug!(
                "Slide {}: {} elements, background {:?}",
                index,
                walked.elements.len(),
                walked.background_color
            );

            let mut resolved = resolver.resolve_slide(index, &walked)?;
            resolved.speaker_note = listing.speaker_notes.get(index).cloned();
            slides.push(resolved);
        }

        Ok(slides)
    }
}
