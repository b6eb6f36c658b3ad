//! Serialization of [`Document`] subtrees through html5ever's serializer.

use std::io;

use html5ever::QualName;
use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};

use crate::RenderError;
use crate::dom::{Document, NodeData, NodeId};

struct Subtree<'a> {
    doc: &'a Document,
    id: NodeId,
}

enum Step {
    Open(NodeId),
    Close(QualName),
}

impl Serialize for Subtree<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let mut steps: Vec<Step> = match traversal_scope {
            TraversalScope::IncludeNode => vec![Step::Open(self.id)],
            TraversalScope::ChildrenOnly(_) => self
                .doc
                .children(self.id)
                .iter()
                .rev()
                .map(|&c| Step::Open(c))
                .collect(),
        };

        while let Some(step) = steps.pop() {
            let id = match step {
                Step::Close(name) => {
                    serializer.end_elem(name)?;
                    continue;
                }
                Step::Open(id) => id,
            };

            match self.doc.data(id) {
                NodeData::Element { name, attrs } => {
                    serializer.start_elem(
                        name.clone(),
                        attrs.iter().map(|a| (&a.name, a.value.as_str())),
                    )?;
                    steps.push(Step::Close(name.clone()));
                }
                NodeData::Text(text) => serializer.write_text(text)?,
                NodeData::Comment(text) => serializer.write_comment(text)?,
                NodeData::Doctype { name } => serializer.write_doctype(name)?,
                NodeData::Document => {}
            }
            steps.extend(self.doc.children(id).iter().rev().map(|&c| Step::Open(c)));
        }
        Ok(())
    }
}

/// Serialize the children of `parent` as HTML.
///
/// The parent's name is passed as context so text inside raw-text parents
/// (`<script>`, `<style>`) is not escaped.
pub(crate) fn serialize_children(doc: &Document, parent: NodeId) -> Result<String, RenderError> {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(doc.qual_name(parent).cloned()),
        ..SerializeOpts::default()
    };

    let mut out = Vec::new();
    serialize(&mut out, &Subtree { doc, id: parent }, opts).map_err(RenderError::Serialize)?;
    String::from_utf8(out)
        .map_err(|e| RenderError::Serialize(io::Error::new(io::ErrorKind::InvalidData, e)))
}
