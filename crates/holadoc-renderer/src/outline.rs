//! Heading anchors and the on-page outline.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::util::escape_html;

/// Bytes escaped in a URL path segment: everything except unreserved
/// characters and `$&+,:;=@`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Anchor identifier for a heading: its text, percent-escaped as a path
/// segment. Not a slug; `"Getting started"` becomes `"Getting%20started"`.
///
/// ```
/// use holadoc_renderer::anchor_id;
///
/// assert_eq!(anchor_id("Getting started"), "Getting%20started");
/// assert_eq!(anchor_id("a/b?"), "a%2Fb%3F");
/// ```
#[must_use]
pub fn anchor_id(text: &str) -> String {
    utf8_percent_encode(text, PATH_SEGMENT).to_string()
}

/// One heading of the on-page outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Heading level, 2 to 6.
    pub level: u8,
    /// Value of the heading's `id`.
    pub anchor: String,
    /// Heading text.
    pub text: String,
}

/// Render outline entries as `index-h{level}` blocks.
#[must_use]
pub fn render_outline(entries: &[OutlineEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "<div class=\"index-h{}\">\n<a href=\"#{}\">{}</a>\n</div>\n",
            entry.level,
            escape_html(&entry.anchor),
            escape_html(&entry.text)
        ));
    }
    out
}
