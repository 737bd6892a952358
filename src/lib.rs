//! # slide-export
//!
//! Turns a slide deck rendered in Chrome into a structured presentation model:
//! text boxes, auto-shapes, pictures and connectors with slide-relative pixel
//! geometry, ready to be written as a presentation file.
//!
//! ## Pipeline
//!
//! 1. **Snapshot**: page scripts serialize each slide's element tree with its
//!    bounding boxes and raw computed styles.
//! 2. **Style parsing**: CSS values (colors, borders, shadows, radii, filters,
//!    fonts) are normalized into [`ElementAttributes`].
//! 3. **Tree walking**: styles are inherited down the tree, invisible and
//!    slide-covering elements are filtered, and the rest is sorted into paint order.
//! 4. **Screenshot fallback**: `<svg>`, `<canvas>` and `<table>` become PNG files,
//!    rasterized from markup when possible and captured from the page otherwise.
//! 5. **Conversion**: every record becomes a [`PptxShape`].
//!
//! ## Command line
//!
//! ```bash
//! # Export presentation `abc` from the local frontend
//! TEMP_DIRECTORY=/tmp/export cargo run -- export --presentation-id abc
//!
//! # Print the model schema
//! cargo run -- schema
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use slide_export::{BrowserSession, ExportOptions, ExportResponse, LaunchOptions};
//!
//! # fn main() -> slide_export::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let options = ExportOptions::new().screenshots_dir("/tmp/export/screenshots");
//!
//! let url = options.presentation_url("abc");
//! let response = ExportResponse::from(session.export_presentation(&url, &options));
//! println!("{}", serde_json::to_string_pretty(&response)?);
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline only talks to the page through [`RenderHost`], so it can run
//! against any host that evaluates scripts and captures regions:
//!
//! ```rust,no_run
//! use slide_export::{ExportOptions, PresentationExporter, RenderHost, ResvgRasterizer};
//! use std::path::Path;
//!
//! fn export<H: RenderHost>(host: &H) -> slide_export::Result<()> {
//!     let options = ExportOptions::new();
//!     let rasterizer = ResvgRasterizer::default();
//!     let model = PresentationExporter::new(host, &rasterizer, &options, Path::new("/tmp/shots")).export()?;
//!     println!("{} slides", model.slides.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Browser session management, configuration and the Chrome-backed [`RenderHost`]
//! - [`dom`]: Slide snapshots, page scripts and typed page operations
//! - [`style`]: CSS value parsing
//! - [`attributes`]: Normalized per-element attribute records
//! - [`walker`]: Style inheritance, filtering and paint order
//! - [`capture`]: Screenshot fallback and SVG rasterization
//! - [`pptx`]: Presentation model and converter
//! - [`export`]: Orchestration, options, retries and the caller-facing response
//! - [`error`]: Error types and result aliases

pub mod attributes;
pub mod browser;
pub mod capture;
pub mod dom;
pub mod error;
pub mod export;
pub mod pptx;
pub mod style;
pub mod walker;

pub use attributes::{ElementAttributes, SlideAttributesResult};
pub use browser::{BrowserSession, ChromePage, ConnectionOptions, LaunchOptions, RenderHost};
pub use capture::{Rasterizer, ResvgRasterizer, ScreenshotResolver};
pub use dom::{BoundingBox, SlidePage, SnapshotNode};
pub use error::{ExportError, Result};
pub use export::{ExportOptions, ExportResponse, PresentationExporter, RetryPolicy};
pub use pptx::{PptxPresentationModel, PptxShape, PptxSlide, convert_slides, presentation_schema};
pub use style::parse_element;
pub use walker::walk_slide;
