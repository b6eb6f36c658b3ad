//! Arena-allocated HTML tree.
//!
//! Nodes live in one vector and reference each other by [`NodeId`]. A node
//! stores its parent index and the ordered indices of its children, so
//! mutation never fights the borrow checker and detached nodes simply stay
//! unreachable until the document is dropped.

use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, ParseOpts, QualName, local_name, ns, parse_fragment};

use crate::RenderError;
use crate::serialize::serialize_children;
use crate::sink::FragmentSink;

fn local_name_is(name: &QualName, expected: &str) -> bool {
    let local: &str = &name.local;
    local.eq_ignore_ascii_case(expected)
}

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// `<!DOCTYPE name>`.
    Doctype { name: String },
    /// Element with its attributes in source order.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    /// Character data.
    Text(String),
    /// `<!-- ... -->`.
    Comment(String),
}

/// Element attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

#[derive(Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable HTML tree.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only its root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub(crate) fn create(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeData::Text(text.into()))
    }

    #[must_use]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Element name, `None` for non-elements.
    #[must_use]
    pub fn qual_name(&self, id: NodeId) -> Option<&QualName> {
        match self.data(id) {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Local name of an HTML-namespace element.
    #[must_use]
    pub fn html_tag(&self, id: NodeId) -> Option<&str> {
        self.qual_name(id)
            .filter(|name| name.ns == ns!(html))
            .map(|name| &*name.local)
    }

    /// Attribute value by local name.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.data(id) {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| local_name_is(&a.name, name))
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            if let Some(existing) = attrs
                .iter_mut()
                .find(|a| local_name_is(&a.name, name))
            {
                existing.value = value;
            } else {
                attrs.push(Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(name)),
                    value,
                });
            }
        }
    }

    pub(crate) fn add_attrs_if_missing(&mut self, id: NodeId, extra: Vec<Attribute>) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            for attr in extra {
                if !attrs.iter().any(|a| a.name == attr.name) {
                    attrs.push(attr);
                }
            }
        }
    }

    /// Replace the contents of a text node. No-op for other nodes.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let NodeData::Text(existing) = &mut self.nodes[id.0].data {
            *existing = text.into();
        }
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let NodeData::Text(text) = self.data(current) {
                out.push_str(text);
            }
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Remove a node from its parent. The node keeps its own children.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` right before `sibling`, detaching it first.
    pub fn insert_before(&mut self, sibling: NodeId, child: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let pos = siblings.iter().position(|&c| c == sibling).unwrap_or(siblings.len());
        siblings.insert(pos, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Append text, merging with a trailing text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.children(parent).last()
            && let NodeData::Text(existing) = &mut self.nodes[last.0].data
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text);
        self.append(parent, node);
    }

    /// Insert text before `sibling`, merging with a preceding text node.
    pub(crate) fn insert_text_before(&mut self, sibling: NodeId, text: &str) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == sibling).unwrap_or(0);
        if pos > 0 {
            let prev = siblings[pos - 1];
            if let NodeData::Text(existing) = &mut self.nodes[prev.0].data {
                existing.push_str(text);
                return;
            }
        }
        let node = self.create_text(text);
        self.insert_before(sibling, node);
    }

    /// Move every child of `from` to the end of `to`.
    pub(crate) fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        let moved = std::mem::take(&mut self.nodes[from.0].children);
        for &child in &moved {
            self.nodes[child.0].parent = Some(to);
        }
        self.nodes[to.0].children.extend(moved);
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in std::mem::take(&mut self.nodes[id.0].children) {
            self.nodes[child.0].parent = None;
        }
    }

    /// Descendants of `id` (excluding `id`), children before their parent.
    #[must_use]
    pub fn descendants_post_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, bool)> = self
            .children(id)
            .iter()
            .rev()
            .map(|&c| (c, false))
            .collect();
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                out.push(current);
            } else {
                stack.push((current, true));
                stack.extend(self.children(current).iter().rev().map(|&c| (c, false)));
            }
        }
        out
    }

    /// First HTML element named `tag` below `id`, in document order.
    #[must_use]
    pub fn find_element(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.html_tag(current) == Some(tag) {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev());
        }
        None
    }

    /// Deep-copy the children of `from` in `other` to the end of `parent`.
    pub fn import_children(&mut self, other: &Document, from: NodeId, parent: NodeId) {
        let mut pending: Vec<(NodeId, NodeId)> = other
            .children(from)
            .iter()
            .rev()
            .map(|&c| (c, parent))
            .collect();
        while let Some((source, target_parent)) = pending.pop() {
            let copy = self.create(other.data(source).clone());
            self.append(target_parent, copy);
            pending.extend(other.children(source).iter().rev().map(|&c| (c, copy)));
        }
    }
}

/// An HTML fragment parsed in `<body>` context.
#[derive(Debug)]
pub struct Fragment {
    document: Document,
    body: NodeId,
}

impl Fragment {
    /// Parse an HTML fragment with `<body>` as the context element.
    ///
    /// Elements such as `<style>` or `<meta>` stay where they were written,
    /// and stray `<html>`, `<body>` or `</body>` tags cannot end the content
    /// early.
    pub fn parse(html: &str) -> Result<Self, RenderError> {
        let context = QualName::new(None, ns!(html), local_name!("body"));
        let document = parse_fragment(
            FragmentSink::default(),
            ParseOpts::default(),
            context,
            Vec::new(),
            false,
        )
        .from_utf8()
        .one(html.as_bytes());

        // The parser hangs the fragment's nodes off a synthetic <html> root.
        let body = document
            .children(document.root())
            .iter()
            .copied()
            .find(|&id| document.html_tag(id) == Some("html"))
            .ok_or_else(|| RenderError::Parse("fragment has no root element".to_owned()))?;

        Ok(Self { document, body })
    }

    /// Element holding the fragment's top-level nodes.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Serialize the fragment's top-level nodes back to HTML.
    pub fn to_html(&self) -> Result<String, RenderError> {
        serialize_children(&self.document, self.body)
    }
}
