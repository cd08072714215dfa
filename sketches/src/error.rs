/// Error returned by fallible [`crate::surface::Surface`] operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The drawing backend rejected an operation (e.g. a browser canvas call threw).
    #[error("drawing backend error: {0}")]
    Backend(String),
    /// A surface was asked to take dimensions it cannot represent.
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Error returned when parsing a [`crate::config::SketchConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration string was not valid JSON for the config schema.
    #[error("invalid sketch config: {0}")]
    Json(#[from] serde_json::Error),
}
