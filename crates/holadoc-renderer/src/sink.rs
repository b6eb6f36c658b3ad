//! html5ever tree builder sink writing into a [`Document`].

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as ParsedAttribute, QualName, local_name, ns};

use crate::dom::{Attribute, Document, NodeData, NodeId};

static NO_NAME: QualName = QualName {
    prefix: None,
    ns: ns!(),
    local: local_name!(""),
};

/// Node reference handed to the tree builder.
///
/// Element handles carry their name so `elem_name` can borrow it from the
/// handle instead of from the `RefCell`-guarded arena.
#[derive(Debug, Clone)]
pub(crate) struct Handle {
    id: NodeId,
    name: Option<QualName>,
}

impl Handle {
    fn node(id: NodeId) -> Self {
        Self { id, name: None }
    }
}

/// Builds a [`Document`] while html5ever parses.
///
/// `TreeSink` methods take `&self`, hence the `RefCell`.
#[derive(Default)]
pub(crate) struct FragmentSink {
    document: RefCell<Document>,
}

impl FragmentSink {
    fn insert(&self, child: NodeOrText<Handle>, place: impl FnOnce(&mut Document, NodeId)) {
        let mut doc = self.document.borrow_mut();
        let id = match child {
            NodeOrText::AppendNode(node) => node.id,
            NodeOrText::AppendText(text) => doc.create_text(text.to_string()),
        };
        place(&mut doc, id);
    }
}

impl TreeSink for FragmentSink {
    type Handle = Handle;
    type Output = Document;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Document {
        self.document.into_inner()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        tracing::trace!(%msg, "Lenient HTML parse error");
    }

    fn get_document(&self) -> Handle {
        Handle::node(self.document.borrow().root())
    }

    fn elem_name<'a>(&'a self, target: &'a Handle) -> Self::ElemName<'a> {
        target.name.as_ref().unwrap_or(&NO_NAME)
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<ParsedAttribute>,
        _flags: ElementFlags,
    ) -> Handle {
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();
        let id = self.document.borrow_mut().create(NodeData::Element {
            name: name.clone(),
            attrs,
        });
        Handle {
            id,
            name: Some(name),
        }
    }

    fn create_comment(&self, text: StrTendril) -> Handle {
        Handle::node(
            self.document
                .borrow_mut()
                .create(NodeData::Comment(text.to_string())),
        )
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Handle {
        // Processing instructions only occur in XML; keep the data as a comment.
        Handle::node(
            self.document
                .borrow_mut()
                .create(NodeData::Comment(data.to_string())),
        )
    }

    fn append(&self, parent: &Handle, child: NodeOrText<Handle>) {
        if let NodeOrText::AppendText(text) = &child {
            self.document.borrow_mut().append_text(parent.id, text);
            return;
        }
        self.insert(child, |doc, id| doc.append(parent.id, id));
    }

    fn append_based_on_parent_node(
        &self,
        element: &Handle,
        prev_element: &Handle,
        child: NodeOrText<Handle>,
    ) {
        let has_parent = self.document.borrow().parent(element.id).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut doc = self.document.borrow_mut();
        let doctype = doc.create(NodeData::Doctype {
            name: name.to_string(),
        });
        let root = doc.root();
        doc.append(root, doctype);
    }

    fn get_template_contents(&self, target: &Handle) -> Handle {
        target.clone()
    }

    fn same_node(&self, x: &Handle, y: &Handle) -> bool {
        x.id == y.id
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Handle, new_node: NodeOrText<Handle>) {
        if let NodeOrText::AppendText(text) = &new_node {
            self.document
                .borrow_mut()
                .insert_text_before(sibling.id, text);
            return;
        }
        self.insert(new_node, |doc, id| doc.insert_before(sibling.id, id));
    }

    fn add_attrs_if_missing(&self, target: &Handle, attrs: Vec<ParsedAttribute>) {
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();
        self.document
            .borrow_mut()
            .add_attrs_if_missing(target.id, attrs);
    }

    fn remove_from_parent(&self, target: &Handle) {
        self.document.borrow_mut().detach(target.id);
    }

    fn reparent_children(&self, node: &Handle, new_parent: &Handle) {
        self.document
            .borrow_mut()
            .reparent_children(node.id, new_parent.id);
    }
}
