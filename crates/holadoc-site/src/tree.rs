//! Document tree.
//!
//! # Architecture
//!
//! Nodes are stored in a flat `Vec<Node>` with parent/children relationships
//! tracked by [`NodeId`] indices. This provides:
//! - O(1) parent and children access without reference cycles
//! - O(d) ancestor walks where d is the node depth
//! - `Send + Sync` sharing of the finished tree across render workers

use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::context::VERSION_PLACEHOLDER;

/// Index of a node in its [`SiteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One language/version specific content file of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variation {
    /// Friendly URL segment from the file name (`intro` for `intro_es_v1.md`).
    pub url: String,
    /// Language token, empty when the file name has none.
    pub language: String,
    /// Version token, empty when the file name has none.
    pub version: String,
    /// Source file.
    pub filename: PathBuf,
    /// First `h1` of the content, or `url`.
    pub title: String,
}

/// One position in the tree, backed by a source directory.
#[derive(Debug, Clone)]
pub struct Node {
    /// Sort key from the `<order>_` directory prefix.
    pub order: i64,
    /// Structural path segment, or [`VERSION_PLACEHOLDER`].
    pub name: String,
    /// Content files in declaration (file name) order.
    pub variations: Vec<Variation>,
    /// Template declared in this node's own directory.
    pub template: Option<PathBuf>,
    /// Directory the node was read from.
    pub source_dir: PathBuf,
}

impl Node {
    /// Whether this node stands for "every configured version".
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.name == VERSION_PLACEHOLDER
    }
}

/// Immutable document tree with index-based links.
#[derive(Debug)]
pub struct SiteTree {
    nodes: Vec<Node>,
    children: Vec<Vec<NodeId>>,
    parents: Vec<Option<NodeId>>,
}

impl SiteTree {
    /// The synthetic root. It has no name and no variations.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.0]
    }

    /// Children sorted by `order`.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.children[id.0]
    }

    /// Number of nodes including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds only the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// `id` followed by its ancestors up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&current| self.parent(current))
    }

    /// Every node in pre-order (parent before children), root first.
    #[must_use]
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Look up a node by its `/`-separated structural path.
    ///
    /// The empty path names the root. Each segment must match a child's
    /// `name` exactly; placeholder nodes are addressed as `{version}`.
    #[must_use]
    pub fn find_node(&self, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(self.root());
        }

        path.split('/').try_fold(self.root(), |current, segment| {
            self.children(current)
                .iter()
                .copied()
                .find(|&child| self.node(child).name == segment)
        })
    }

    /// True if `target` is `active` or one of its ancestors.
    #[must_use]
    pub fn is_under(&self, active: NodeId, target: NodeId) -> bool {
        self.ancestors(active).any(|id| id == target)
    }

    /// True if `id` is a placeholder or lies below one.
    #[must_use]
    pub fn has_versions(&self, id: NodeId) -> bool {
        self.ancestors(id).any(|a| self.node(a).is_placeholder())
    }

    /// Template of the nearest node, starting at `id`, that declares one.
    #[must_use]
    pub fn template(&self, id: NodeId) -> Option<&Path> {
        self.ancestors(id)
            .find_map(|a| self.node(a).template.as_deref())
    }

    /// Indented listing of every node below the root with its variation count.
    #[must_use]
    pub fn pretty_print(&self) -> String {
        fn walk(tree: &SiteTree, id: NodeId, depth: usize, out: &mut String) {
            for &child in tree.children(id) {
                let node = tree.node(child);
                let _ = writeln!(
                    out,
                    "{}{} ({})",
                    "    ".repeat(depth),
                    node.name,
                    node.variations.len()
                );
                walk(tree, child, depth + 1, out);
            }
        }

        let mut out = String::new();
        walk(self, self.root(), 0, &mut out);
        out
    }
}

/// Builder for [`SiteTree`].
#[derive(Debug)]
pub struct SiteTreeBuilder {
    nodes: Vec<Node>,
    children: Vec<Vec<NodeId>>,
    parents: Vec<Option<NodeId>>,
}

impl SiteTreeBuilder {
    /// Start a tree whose root is read from `source_dir`.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            nodes: vec![Node {
                order: 0,
                name: String::new(),
                variations: Vec::new(),
                template: None,
                source_dir: source_dir.into(),
            }],
            children: vec![Vec::new()],
            parents: vec![None],
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Add a child node and return its id.
    pub fn add_node(
        &mut self,
        parent: NodeId,
        order: i64,
        name: impl Into<String>,
        source_dir: impl Into<PathBuf>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            order,
            name: name.into(),
            variations: Vec::new(),
            template: None,
            source_dir: source_dir.into(),
        });
        self.children.push(Vec::new());
        self.parents.push(Some(parent));
        self.children[parent.0].push(id);
        id
    }

    /// Attach a variation.
    ///
    /// A later variation with the same language and version as an earlier
    /// one would never be resolved; it is dropped with a warning.
    pub fn add_variation(&mut self, node: NodeId, variation: Variation) {
        let variations = &mut self.nodes[node.0].variations;
        if let Some(existing) = variations
            .iter()
            .find(|v| v.language == variation.language && v.version == variation.version)
        {
            tracing::warn!(
                kept = %existing.filename.display(),
                ignored = %variation.filename.display(),
                language = %variation.language,
                version = %variation.version,
                "Duplicate variation"
            );
            return;
        }
        variations.push(variation);
    }

    pub fn set_template(&mut self, node: NodeId, template: impl Into<PathBuf>) {
        self.nodes[node.0].template = Some(template.into());
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Finish the tree. Children are stably sorted by `order`.
    #[must_use]
    pub fn build(mut self) -> SiteTree {
        let nodes = &self.nodes;
        for children in &mut self.children {
            children.sort_by_key(|&c| nodes[c.0].order);
        }
        SiteTree {
            nodes: self.nodes,
            children: self.children,
            parents: self.parents,
        }
    }
}
