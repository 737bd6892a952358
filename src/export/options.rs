use crate::dom::SlideAddress;
use crate::error::{ExportError, Result};
use crate::export::retry::RetryPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Options for one export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory receiving screenshot files (required before export)
    pub screenshots_dir: Option<PathBuf>,

    /// Base URL of the frontend rendering the deck
    pub frontend_url: String,

    /// Where slides and speaker notes live in the page
    pub slides: SlideAddress,

    /// Polls of the readiness wait
    pub ready_attempts: u32,

    /// Interval between readiness polls
    pub ready_interval: Duration,

    /// Retry policy of slide enumeration
    pub enumeration: RetryPolicy,

    /// Pause after the page has loaded so images and fonts can arrive
    pub settle_delay: Duration,

    /// Pause between hiding the page around an element and capturing it
    pub isolation_delay: Duration,

    /// Timeout of navigation and of each page script
    pub script_timeout: Duration,

    /// Abort the export when a region capture fails
    pub strict_capture: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            screenshots_dir: None,
            frontend_url: "http://localhost:3000".to_string(),
            slides: SlideAddress::default(),
            ready_attempts: 150,
            ready_interval: Duration::from_millis(200),
            enumeration: RetryPolicy::default(),
            settle_delay: Duration::from_secs(2),
            isolation_delay: Duration::from_millis(50),
            script_timeout: Duration::from_secs(60),
            strict_capture: false,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `TEMP_DIRECTORY` and `NEXT_PUBLIC_URL`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(temp) = lookup("TEMP_DIRECTORY").filter(|v| !v.is_empty()) {
            options.screenshots_dir = Some(PathBuf::from(temp).join("screenshots"));
        }
        if let Some(url) = lookup("NEXT_PUBLIC_URL").filter(|v| !v.is_empty()) {
            options.frontend_url = url;
        }
        options
    }

    pub fn screenshots_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshots_dir = Some(dir.into());
        self
    }

    pub fn frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = url.into();
        self
    }

    /// Id of the element wrapping the slides
    pub fn wrapper_id(mut self, id: impl Into<String>) -> Self {
        self.slides.wrapper_id = id.into();
        self
    }

    pub fn slide_selector(mut self, selector: impl Into<String>) -> Self {
        self.slides.slide_selector = selector.into();
        self
    }

    /// Selector and attribute of speaker note carriers
    pub fn speaker_notes(mut self, selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.slides.note_selector = selector.into();
        self.slides.note_attribute = attribute.into();
        self
    }

    pub fn readiness(mut self, attempts: u32, interval: Duration) -> Self {
        self.ready_attempts = attempts;
        self.ready_interval = interval;
        self
    }

    pub fn enumeration(mut self, policy: RetryPolicy) -> Self {
        self.enumeration = policy;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn isolation_delay(mut self, delay: Duration) -> Self {
        self.isolation_delay = delay;
        self
    }

    pub fn script_timeout(mut self, timeout: Duration) -> Self {
        self.script_timeout = timeout;
        self
    }

    pub fn strict_capture(mut self, strict: bool) -> Self {
        self.strict_capture = strict;
        self
    }

    /// Page that renders the deck of `presentation_id` for export
    pub fn presentation_url(&self, presentation_id: &str) -> String {
        format!("{}/pdf-maker?id={}", self.frontend_url.trim_end_matches('/'), presentation_id)
    }

    /// Make sure the screenshots directory exists and return it
    pub fn prepare_screenshots_dir(&self) -> Result<PathBuf> {
        let dir = self
            .screenshots_dir
            .clone()
            .ok_or_else(|| ExportError::Setup("TEMP_DIRECTORY environment variable not set".to_string()))?;

        std::fs::create_dir_all(&dir)
            .map_err(|e| ExportError::Setup(format!("Cannot create screenshots directory {}: {}", dir.display(), e)))?;

        Ok(dir)
    }
}
