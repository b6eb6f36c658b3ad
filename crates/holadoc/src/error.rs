//! CLI error types.

use holadoc_build::BuildError;
use holadoc_config::ConfigError;
use holadoc_site::{ContextError, LoadError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Context(#[from] ContextError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Server(String),
}
