//! Single-pass rewrite of a page's HTML fragment.

use crate::RenderError;
use crate::dom::{Document, Fragment, NodeData, NodeId};
use crate::highlight::{Highlighter, detect_language};
use crate::outline::{OutlineEntry, anchor_id, render_outline};

/// A site-internal link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// Canonical URL to write into `href`.
    pub href: String,
    /// Text used for anchors with no text of their own.
    pub label: String,
}

/// Maps `href` values to site nodes.
pub trait LinkResolver {
    /// Resolve `href` as a tree path, `None` if it names no node.
    fn resolve(&self, href: &str) -> Option<ResolvedLink>;
}

/// Rewritten page body plus the outline collected from its headings.
#[derive(Debug, Clone)]
pub struct TransformedContent {
    pub html: String,
    pub outline: Vec<OutlineEntry>,
}

impl TransformedContent {
    /// Outline as markup.
    #[must_use]
    pub fn outline_html(&self) -> String {
        render_outline(&self.outline)
    }
}

enum Action {
    /// Heading level and its text as written in the source.
    Heading(u8, String),
    Link,
    Code,
}

fn action_for(doc: &Document, id: NodeId) -> Option<Action> {
    let level = match doc.html_tag(id)? {
        "h2" => 2,
        "h3" => 3,
        "h4" => 4,
        "h5" => 5,
        "h6" => 6,
        "a" => return Some(Action::Link),
        "code" => return Some(Action::Code),
        _ => return None,
    };
    Some(Action::Heading(level, doc.text_content(id).trim().to_owned()))
}

/// Applies heading anchors, link rewriting and code highlighting.
pub struct ContentTransformer<'a> {
    links: &'a dyn LinkResolver,
    highlighter: &'a dyn Highlighter,
}

impl<'a> ContentTransformer<'a> {
    #[must_use]
    pub fn new(links: &'a dyn LinkResolver, highlighter: &'a dyn Highlighter) -> Self {
        Self { links, highlighter }
    }

    /// Parse `html` as a body fragment, rewrite it and serialize it back.
    ///
    /// Elements are visited children-first. Heading text is read before
    /// anything is rewritten, so anchors never see highlighter markup or
    /// relabelled links.
    pub fn transform(&self, html: &str) -> Result<TransformedContent, RenderError> {
        let mut fragment = Fragment::parse(html)?;
        let actions: Vec<(NodeId, Action)> = fragment
            .document()
            .descendants_post_order(fragment.body())
            .into_iter()
            .filter_map(|id| Some((id, action_for(fragment.document(), id)?)))
            .collect();
        let mut outline = Vec::new();

        for (id, action) in actions {
            let doc = fragment.document_mut();
            match action {
                Action::Heading(level, text) => {
                    if let Some(entry) = anchor_heading(doc, id, level, text) {
                        outline.push(entry);
                    }
                }
                Action::Link => self.rewrite_link(doc, id),
                Action::Code => self.highlight_code(doc, id)?,
            }
        }

        Ok(TransformedContent {
            html: fragment.to_html()?,
            outline,
        })
    }

    fn rewrite_link(&self, doc: &mut Document, id: NodeId) {
        let Some(href) = doc.attr(id, "href").filter(|h| !h.is_empty()) else {
            return;
        };
        let Some(target) = self.links.resolve(href) else {
            return;
        };

        doc.set_attr(id, "href", target.href);
        match doc.children(id).first().copied() {
            None => doc.append_text(id, &target.label),
            Some(first) if matches!(doc.data(first), NodeData::Text(_)) => {
                doc.set_text(first, target.label);
            }
            Some(_) => {}
        }
    }

    fn highlight_code(&self, doc: &mut Document, id: NodeId) -> Result<(), RenderError> {
        let children = doc.children(id);
        if children.is_empty()
            || !children
                .iter()
                .all(|&c| matches!(doc.data(c), NodeData::Text(_)))
        {
            return Ok(());
        }

        let text = doc.text_content(id);
        let code = text.strip_prefix('\n').unwrap_or(&text);
        let language = detect_language(
            self.highlighter,
            doc.attr(id, "lang"),
            doc.attr(id, "class"),
            code,
        );
        let markup = self.highlighter.highlight(code, &language)?;
        let highlighted = Fragment::parse(&markup)?;

        doc.clear_children(id);
        doc.import_children(highlighted.document(), highlighted.body(), id);
        Ok(())
    }
}

/// Set the heading's `id` from `text` and return its outline entry.
fn anchor_heading(
    doc: &mut Document,
    id: NodeId,
    level: u8,
    text: String,
) -> Option<OutlineEntry> {
    if text.is_empty() {
        return None;
    }

    let anchor = anchor_id(&text);
    doc.set_attr(id, "id", anchor.clone());
    Some(OutlineEntry {
        level,
        anchor,
        text,
    })
}
