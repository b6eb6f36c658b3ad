//! Page content rendering for holadoc.
//!
//! Source files are either structural HTML fragments or Markdown. Both end up
//! as an HTML fragment which is parsed into an arena [`Document`], rewritten in
//! a single post-order pass and serialized back:
//!
//! - `h2`..`h6` headings get a percent-escaped `id` and an [`OutlineEntry`]
//! - `a` elements whose `href` names a site node are rewritten through a
//!   [`LinkResolver`]
//! - `code` elements are handed to a [`Highlighter`]
//!
//! # Example
//!
//! ```
//! use holadoc_renderer::{ContentTransformer, LineHighlighter, LinkResolver, ResolvedLink};
//!
//! struct NoLinks;
//!
//! impl LinkResolver for NoLinks {
//!     fn resolve(&self, _href: &str) -> Option<ResolvedLink> {
//!         None
//!     }
//! }
//!
//! let highlighter = LineHighlighter::new();
//! let transformer = ContentTransformer::new(&NoLinks, &highlighter);
//! let content = transformer.transform("<h2>Setup</h2><p>Text</p>").unwrap();
//!
//! assert_eq!(content.html, r#"<h2 id="Setup">Setup</h2><p>Text</p>"#);
//! assert_eq!(content.outline[0].anchor, "Setup");
//! ```

mod dom;
mod error;
mod highlight;
mod markdown;
mod outline;
mod serialize;
mod sink;
mod source;
mod transform;
mod util;

pub use dom::{Attribute, Document, Fragment, NodeData, NodeId};
pub use error::RenderError;
pub use highlight::{Highlighter, LineHighlighter, PLAIN_TEXT, detect_language, sniff_language};
pub use markdown::{markdown_to_html, parser_options};
pub use outline::{OutlineEntry, anchor_id, render_outline};
pub use source::{SourceFormat, extract_title, read_source};
pub use transform::{ContentTransformer, LinkResolver, ResolvedLink, TransformedContent};
pub use util::escape_html;
