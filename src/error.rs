use sketches::{ConfigError, SurfaceError};

/// Error raised while binding sketches to page containers.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// No global `window`; the page cannot draw, so mounting is a no-op.
    #[error("no window available")]
    NoWindow,
    /// The window has no document.
    #[error("no document available")]
    NoDocument,
    /// The container element is not in the DOM yet.
    #[error("container `{0}` not found")]
    MissingContainer(String),
    /// The container exists but has no layout size yet.
    #[error("container `{0}` has zero size")]
    ZeroSizedContainer(String),
    /// A DOM or canvas call failed.
    #[error("{0}")]
    Context(String),
    /// A sketch's drawing call failed.
    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),
    /// The host page passed a malformed config.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HostError {
    /// Whether the container may still appear, so mounting should be retried.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::MissingContainer(_) | Self::ZeroSizedContainer(_))
    }
}
