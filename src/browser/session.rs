use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            browser::host::{ChromePage, RenderHost},
            capture::ResvgRasterizer,
            error::{ExportError, Result},
            export::{ExportOptions, PresentationExporter},
            pptx::PptxPresentationModel};
use headless_chrome::Browser;
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that manages a Chrome/Chromium instance used for exports
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));

        // Exports of long decks can take minutes; keep the browser alive between CDP calls
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| ExportError::LaunchFailed(e.to_string()))?;

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        log::debug!("Connecting to {}", options.ws_url);
        let browser = Browser::connect_with_timeout(options.ws_url, Duration::from_millis(options.timeout))
            .map_err(|e| ExportError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser })
    }

    /// Open `url` in a fresh tab and wait until it has loaded and settled.
    ///
    /// The tab is closed again if loading fails.
    pub fn open_page(&self, url: &str, options: &ExportOptions) -> Result<ChromePage> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| ExportError::TabOperationFailed(format!("Failed to create tab: {}", e)))?;

        let page = ChromePage::new(Arc::clone(&tab));
        if let Err(e) = page.load(url, options.script_timeout) {
            if let Err(close_error) = page.close() {
                log::warn!("Failed to close page after load error: {}", close_error);
            }
            return Err(e);
        }

        // Let images and web fonts arrive before anything is measured
        log::debug!("Waiting {:?} for content to settle", options.settle_delay);
        std::thread::sleep(options.settle_delay);

        Ok(page)
    }

    /// Export the slide deck rendered at `url` into a presentation model.
    ///
    /// Setup problems surface before any page is opened; the page is released
    /// before returning on both the success and the failure path.
    pub fn export_presentation(&self, url: &str, options: &ExportOptions) -> Result<PptxPresentationModel> {
        let screenshots_dir = options.prepare_screenshots_dir()?;
        log::info!("Screenshots directory: {}", screenshots_dir.display());

        log::info!("Opening {}", url);
        let page = self.open_page(url, options)?;

        let rasterizer = ResvgRasterizer::default();
        let result = PresentationExporter::new(&page, &rasterizer, options, &screenshots_dir).export();

        if let Err(e) = page.close() {
            log::warn!("Failed to close export page: {}", e);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_options() {
        let opts = ConnectionOptions::new("ws://localhost:9222").timeout(5000);

        assert_eq!(opts.ws_url, "ws://localhost:9222");
        assert_eq!(opts.timeout, 5000);
    }

    // Integration tests (require Chrome to be installed)
    #[test]
    #[ignore] // Ignore by default, run with: cargo test -- --ignored
    fn test_launch_browser() {
        let result = BrowserSession::launch(LaunchOptions::new().headless(true));
        assert!(result.is_ok());
    }

    #[test]
    #[ignore]
    fn test_open_page() {
        let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
        let options = ExportOptions::new().settle_delay(Duration::from_millis(0));

        let page = session.open_page("about:blank", &options).expect("Failed to open page");
        assert!(page.close().is_ok());
    }
}
