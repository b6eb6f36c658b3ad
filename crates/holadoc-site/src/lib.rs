//! Site structure for holadoc.
//!
//! The source directory becomes a [`SiteTree`]: an arena of [`Node`]s, each
//! carrying the [`Variation`]s (language/version specific content files)
//! found in its directory. Everything downstream works on `(node, language,
//! version)` triples:
//!
//! - [`resolve`] picks the variation to show, falling back from an exact match
//!   to version-only, language-only and finally any variation
//! - [`output_path`] and [`link`] compute where a triple is written and linked
//! - [`breadcrumb`], [`tree_index`], [`language_menu`] and [`version_menu`]
//!   render navigation markup
//!
//! Configured languages and versions travel in an immutable [`SiteContext`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use holadoc_site::{SiteContext, SiteLoader, link};
//!
//! let context = SiteContext::new(vec!["en".into(), "es".into()], vec!["v1".into()]).unwrap();
//! let site = SiteLoader::new(&context, Path::new("src")).load().unwrap();
//!
//! if let Some(intro) = site.tree.find_node("guide/intro") {
//!     println!("{}", link(&site.tree, &context, intro, "es", "v1"));
//! }
//! ```

mod context;
mod links;
mod loader;
mod navigation;
mod paths;
mod resolver;
mod tree;

pub use context::{BASE_PATH, ContextError, SiteContext, TEMPLATE_EXTENSION, VERSION_PLACEHOLDER};
pub use links::TreeLinks;
pub use loader::{Asset, LoadError, LoadedSite, SiteLoader, parse_variation_name};
pub use navigation::{breadcrumb, display_title, language_menu, tree_index, version_menu};
pub use paths::{OutputPath, link, output_path};
pub use resolver::resolve;
pub use tree::{Node, NodeId, SiteTree, SiteTreeBuilder, Variation};
