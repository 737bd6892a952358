use thiserror::Error;

/// Errors that can occur while exporting a rendered slide deck
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to launch the browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to connect to an existing browser
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Creating, configuring or closing a tab failed
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Navigation failed or timed out
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// A page script threw or could not be evaluated
    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    /// Region capture of the rendered page failed
    #[error("Screenshot capture failed: {0}")]
    CaptureFailed(String),

    /// Vector markup could not be rasterized
    #[error("Rasterization failed: {0}")]
    RasterizeFailed(String),

    /// A page script returned data of an unexpected shape
    #[error("Invalid page response: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Required configuration is missing or unusable
    #[error("Export setup failed: {0}")]
    Setup(String),

    /// The slide container never appeared or never contained slides
    #[error("Slides not ready: {0}")]
    SlidesNotReady(String),

    /// Attribute extraction failed for one slide
    #[error("Failed to analyze slide {slide}: {reason}")]
    SlideExtraction { slide: usize, reason: String },
}

impl ExportError {
    /// Whether this is a domain failure that can be shown to a user as-is,
    /// as opposed to an infrastructure failure with a technical message.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            ExportError::Setup(_) | ExportError::SlidesNotReady(_) | ExportError::SlideExtraction { .. }
        )
    }
}

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
