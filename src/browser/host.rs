use crate::dom::{BoundingBox, ScriptHeader};
use crate::error::{ExportError, Result};
use headless_chrome::Tab;
use headless_chrome::protocol::cdp::Page;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// The narrow capability the exporter needs from whatever renders the slides.
///
/// All DOM inspection and mutation goes through `evaluate`; the exporter never
/// issues two calls concurrently against the same host.
pub trait RenderHost {
    /// Evaluate a page script and return its JSON result (`Value::Null` for `undefined`)
    fn evaluate(&self, script: &str, await_promise: bool) -> Result<Value>;

    /// Capture a PNG of the rendered page inside `rect` (page-absolute CSS pixels)
    fn capture_region(&self, rect: &BoundingBox) -> Result<Vec<u8>>;

    /// Release the page. Safe to call more than once.
    fn close(&self) -> Result<()>;
}

/// A Chrome tab used as the rendering host for one export
pub struct ChromePage {
    tab: Arc<Tab>,
    closed: AtomicBool,
}

impl ChromePage {
    /// Wrap an already created tab
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab, closed: AtomicBool::new(false) }
    }

    /// Navigate the tab to `url` and wait until the document reports `complete`
    pub fn load(&self, url: &str, script_timeout: Duration) -> Result<()> {
        self.tab.set_default_timeout(script_timeout);

        self.tab
            .navigate_to(url)
            .map_err(|e| ExportError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| ExportError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        let deadline = Instant::now() + script_timeout;
        loop {
            let state = self
                .tab
                .evaluate("document.readyState", false)
                .map_err(|e| ExportError::EvaluationFailed(e.to_string()))?;

            let ready = state.value.as_ref().and_then(Value::as_str) == Some("complete");
            if ready {
                log::debug!("Document ready at {}", url);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ExportError::NavigationFailed(format!("{} never finished loading", url)));
            }
            std::thread::sleep(Duration::from_millis(100));
        }
    }
}

impl RenderHost for ChromePage {
    fn evaluate(&self, script: &str, await_promise: bool) -> Result<Value> {
        if let Some(header) = ScriptHeader::parse(script) {
            log::debug!("Evaluating page script '{}' with {}", header.name, header.args);
        }

        let result = self
            .tab
            .evaluate(script, await_promise)
            .map_err(|e| ExportError::EvaluationFailed(e.to_string()))?;

        // Page scripts hand back JSON text so nested objects survive the protocol
        match result.value {
            Some(Value::String(text)) => serde_json::from_str(&text)
                .map_err(|e| ExportError::InvalidResponse(format!("Script did not return JSON: {}", e))),
            Some(other) => Ok(other),
            None => Ok(Value::Null),
        }
    }

    fn capture_region(&self, rect: &BoundingBox) -> Result<Vec<u8>> {
        let clip = Page::Viewport {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            scale: 1.0,
        };

        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
            .map_err(|e| ExportError::CaptureFailed(e.to_string()))
    }

    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.tab
            .close(false)
            .map_err(|e| ExportError::TabOperationFailed(format!("Failed to close tab: {}", e)))?;
        Ok(())
    }
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::debug!("Failed to close export tab on drop: {}", e);
        }
    }
}
