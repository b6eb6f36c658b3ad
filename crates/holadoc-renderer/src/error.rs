use std::path::PathBuf;

/// Errors raised while reading, converting or rewriting page content.
///
/// Every variant is fatal for the build.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A source file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Parsed markup did not have the expected shape.
    #[error("Failed to parse HTML: {0}")]
    Parse(String),
    /// The highlighter rejected a code block.
    #[error("Failed to highlight {language} code: {message}")]
    Highlight { language: String, message: String },
    /// The rewritten fragment could not be written back to text.
    #[error("Failed to serialize HTML: {0}")]
    Serialize(#[source] std::io::Error),
}
