//! Build errors.

use std::path::PathBuf;

use holadoc_renderer::RenderError;
use holadoc_site::{ContextError, LoadError};

/// Error that aborts a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Output directory or file operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Configured languages or versions are unusable.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Source tree could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Page content could not be read or transformed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Template failed to parse or render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
