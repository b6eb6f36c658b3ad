//! Source file formats and title extraction.

use std::borrow::Cow;
use std::path::Path;

use crate::RenderError;
use crate::dom::Fragment;
use crate::markdown::markdown_to_html;

/// Content file format, chosen by extension (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.html`: used as-is.
    Html,
    /// `.md`: converted with [`markdown_to_html`].
    Markdown,
}

impl SourceFormat {
    /// Format for a content file, `None` for anything else.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("html") {
            Some(Self::Html)
        } else if ext.eq_ignore_ascii_case("md") {
            Some(Self::Markdown)
        } else {
            None
        }
    }

    /// Convert source text to an HTML fragment.
    #[must_use]
    pub fn to_html(self, text: &str) -> Cow<'_, str> {
        match self {
            Self::Html => Cow::Borrowed(text),
            Self::Markdown => Cow::Owned(markdown_to_html(text)),
        }
    }
}

/// Read a content file and return it as HTML.
///
/// Files that are not Markdown are treated as HTML.
pub fn read_source(path: &Path) -> Result<String, RenderError> {
    let text = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = SourceFormat::from_path(path).unwrap_or(SourceFormat::Html);
    Ok(format.to_html(&text).into_owned())
}

/// Text of the first `h1` in an HTML fragment, trimmed.
///
/// Returns `None` when there is no `h1` or it has no text.
pub fn extract_title(html: &str) -> Result<Option<String>, RenderError> {
    let fragment = Fragment::parse(html)?;
    let doc = fragment.document();
    Ok(doc
        .find_element(fragment.body(), "h1")
        .map(|h1| doc.text_content(h1).trim().to_owned())
        .filter(|title| !title.is_empty()))
}
