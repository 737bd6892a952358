use crate::browser::RenderHost;
use crate::dom::script::PageScript;
use crate::dom::{BoundingBox, SnapshotNode};
use crate::error::{ExportError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

/// Where the slides live inside the rendered document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideAddress {
    /// Id of the element wrapping every slide
    pub wrapper_id: String,
    /// Selector, relative to the wrapper, matching one element per slide
    pub slide_selector: String,
    /// Selector matching speaker note carriers inside the wrapper
    pub note_selector: String,
    /// Attribute holding the note text on each carrier
    pub note_attribute: String,
}

impl Default for SlideAddress {
    fn default() -> Self {
        Self {
            wrapper_id: "presentation-slides-wrapper".to_string(),
            slide_selector: ":scope > div > div".to_string(),
            note_selector: "[data-speaker-note]".to_string(),
            note_attribute: "data-speaker-note".to_string(),
        }
    }
}

/// Outcome of waiting for the slide container to fill up
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlidesReady {
    pub found: bool,
    pub slides_count: usize,
    pub attempts: u32,
    #[serde(default)]
    pub via_observer: bool,
}

/// Slide count and speaker notes as reported by the page
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideListing {
    #[serde(default)]
    pub slides_count: usize,
    #[serde(default)]
    pub speaker_notes: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A slide's current rectangle plus the document scroll offset
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideFrame {
    pub rect: BoundingBox,
    #[serde(default)]
    pub scroll_x: f64,
    #[serde(default)]
    pub scroll_y: f64,
}

impl SlideFrame {
    /// Convert a viewport rectangle to page-absolute coordinates
    pub fn to_page(&self, rect: &BoundingBox) -> BoundingBox {
        rect.translate(self.scroll_x, self.scroll_y)
    }
}

/// A live element that may correspond to an extracted one
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub node_id: u64,
    pub rect: BoundingBox,
}

/// Outer markup of a live `<svg>` and the text color it resolves to
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SvgSource {
    pub markup: String,
    pub color: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Deserialize)]
struct SnapshotResponse {
    root: SnapshotNode,
}

#[derive(Deserialize)]
struct CandidatesResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct IsolateResponse {
    found: bool,
    #[serde(default)]
    hidden: usize,
    rect: Option<BoundingBox>,
}

/// Typed slide operations over a [`RenderHost`]
pub struct SlidePage<'a, H: RenderHost> {
    host: &'a H,
    address: &'a SlideAddress,
}

impl<'a, H: RenderHost> SlidePage<'a, H> {
    pub fn new(host: &'a H, address: &'a SlideAddress) -> Self {
        Self { host, address }
    }

    pub fn host(&self) -> &'a H {
        self.host
    }

    fn call<T: DeserializeOwned>(&self, script: PageScript, args: Value, await_promise: bool) -> Result<T> {
        let value = self.host.evaluate(&script.render(&args)?, await_promise)?;

        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return Err(ExportError::EvaluationFailed(format!("{}: {}", script.name, error)));
        }

        serde_json::from_value(value)
            .map_err(|e| ExportError::InvalidResponse(format!("{} returned an unexpected shape: {}", script.name, e)))
    }

    fn slide_args(&self, slide: usize) -> Value {
        json!({
            "wrapperId": self.address.wrapper_id,
            "slideSelector": self.address.slide_selector,
            "slideIndex": slide,
        })
    }

    /// Poll until the wrapper holds at least one slide, racing a DOM mutation observer
    pub fn wait_for_slides(&self, max_attempts: u32, interval: Duration) -> Result<SlidesReady> {
        let args = json!({
            "wrapperId": self.address.wrapper_id,
            "slideSelector": self.address.slide_selector,
            "maxAttempts": max_attempts,
            "intervalMs": interval.as_millis() as u64,
        });
        self.call(PageScript::WAIT_FOR_SLIDES, args, true)
    }

    /// Count slides and collect speaker notes.
    ///
    /// A page-reported problem is returned in [`SlideListing::error`] rather than
    /// as an `Err`, so callers can decide whether to retry.
    pub fn enumerate_slides(&self) -> Result<SlideListing> {
        let args = json!({
            "wrapperId": self.address.wrapper_id,
            "slideSelector": self.address.slide_selector,
            "noteSelector": self.address.note_selector,
            "noteAttribute": self.address.note_attribute,
        });
        let value = self.host.evaluate(&PageScript::ENUMERATE_SLIDES.render(&args)?, false)?;

        serde_json::from_value(value)
            .map_err(|e| ExportError::InvalidResponse(format!("enumerate_slides returned an unexpected shape: {}", e)))
    }

    /// Serialize one slide's element tree with computed styles
    pub fn snapshot_slide(&self, slide: usize) -> Result<SnapshotNode> {
        self.call::<SnapshotResponse>(PageScript::SNAPSHOT_SLIDE, self.slide_args(slide), false)
            .map(|response| response.root)
            .map_err(|e| ExportError::SlideExtraction { slide, reason: e.to_string() })
    }

    pub fn slide_frame(&self, slide: usize) -> Result<SlideFrame> {
        self.call(PageScript::SLIDE_RECT, self.slide_args(slide), false)
    }

    /// All live elements with `tag_name` inside the slide, with current viewport rects
    pub fn locate_candidates(&self, slide: usize, tag_name: &str) -> Result<Vec<Candidate>> {
        let mut args = self.slide_args(slide);
        args["tagName"] = Value::from(tag_name);

        self.call::<CandidatesResponse>(PageScript::LOCATE_CANDIDATES, args, false)
            .map(|response| response.candidates)
    }

    pub fn extract_svg(&self, node_id: u64) -> Result<SvgSource> {
        self.call(PageScript::EXTRACT_SVG, json!({ "nodeId": node_id }), false)
    }

    /// Hide every element unrelated to `node_id` until the returned guard drops.
    ///
    /// Returns `None` if the element is no longer attached to the document.
    pub fn isolate(&self, node_id: u64) -> Result<Option<OpacityGuard<'_, 'a, H>>> {
        let response = match self.call::<IsolateResponse>(
            PageScript::ISOLATE_ELEMENT,
            json!({ "nodeId": node_id }),
            false,
        ) {
            Ok(response) => response,
            Err(e) => {
                // The script may have hidden elements before failing
                if let Err(restore_error) = self.restore_opacity() {
                    log::warn!("Failed to restore opacity after isolation error: {}", restore_error);
                }
                return Err(e);
            }
        };

        if !response.found {
            return Ok(None);
        }

        let guard = OpacityGuard { page: self, rect: response.rect, hidden: response.hidden, released: false };
        match guard.rect {
            Some(_) => Ok(Some(guard)),
            None => Err(ExportError::InvalidResponse("isolate_element did not report a rect".to_string())),
        }
    }

    /// Undo the most recent isolation; a no-op when nothing is hidden
    pub fn restore_opacity(&self) -> Result<bool> {
        #[derive(Deserialize)]
        struct Restored {
            restored: bool,
        }

        self.call::<Restored>(PageScript::RESTORE_OPACITY, json!({}), false)
            .map(|r| r.restored)
    }
}

/// Keeps unrelated elements hidden while alive; restores their opacity on drop
pub struct OpacityGuard<'p, 'a, H: RenderHost> {
    page: &'p SlidePage<'a, H>,
    rect: Option<BoundingBox>,
    hidden: usize,
    released: bool,
}

impl<H: RenderHost> OpacityGuard<'_, '_, H> {
    /// Page-absolute rect of the isolated element after scrolling it into view
    pub fn rect(&self) -> BoundingBox {
        self.rect.unwrap_or_default()
    }

    /// Number of elements hidden for this isolation
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    /// Restore opacities now and report failures
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.page.restore_opacity().map(|_| ())
    }
}

impl<H: RenderHost> Drop for OpacityGuard<'_, '_, H> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.page.restore_opacity() {
            log::warn!("Failed to restore element opacity: {}", e);
        }
    }
}
