//! Content link resolution against the tree.

use holadoc_renderer::{LinkResolver, ResolvedLink};

use crate::context::SiteContext;
use crate::paths::link;
use crate::tree::SiteTree;

/// Resolves content `href`s as structural tree paths for one render.
///
/// Links are generated for the language and version being rendered, so a
/// fallback page links to siblings in the reader's language and version.
pub struct TreeLinks<'a> {
    tree: &'a SiteTree,
    context: &'a SiteContext,
    language: &'a str,
    version: &'a str,
}

impl<'a> TreeLinks<'a> {
    #[must_use]
    pub fn new(
        tree: &'a SiteTree,
        context: &'a SiteContext,
        language: &'a str,
        version: &'a str,
    ) -> Self {
        Self {
            tree,
            context,
            language,
            version,
        }
    }
}

impl LinkResolver for TreeLinks<'_> {
    fn resolve(&self, href: &str) -> Option<ResolvedLink> {
        let target = self.tree.find_node(href)?;
        Some(ResolvedLink {
            href: link(self.tree, self.context, target, self.language, self.version),
            label: self.tree.node(target).name.clone(),
        })
    }
}
