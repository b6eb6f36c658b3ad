//! Output paths and links.

use std::fmt;
use std::path::PathBuf;

use crate::context::{BASE_PATH, SiteContext, VERSION_PLACEHOLDER};
use crate::resolver::resolve;
use crate::tree::{NodeId, SiteTree, Variation};

/// File name every page is written to.
const INDEX_FILE: &str = "index.html";

/// Output location of one `(node, language, version)`, as path segments
/// ending in `index.html`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputPath {
    segments: Vec<String>,
}

impl OutputPath {
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path relative to the output root.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        self.non_empty().collect()
    }

    /// Root-relative URL under [`BASE_PATH`].
    #[must_use]
    pub fn link(&self) -> String {
        let mut link = BASE_PATH.to_owned();
        link.push_str(&self.to_string());
        link
    }

    fn non_empty(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

impl fmt::Display for OutputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.non_empty().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// Compute where `node` is written for `language` and `version`.
///
/// Each node from `node` up to (excluding) the root contributes one segment:
/// the `url` of its variation in the target variation's language, else of
/// its variation in the target variation's version, else its structural
/// name. A placeholder segment becomes `version`. Non-default languages get a
/// leading language segment.
///
/// With `variation` `None` every segment is the structural name.
#[must_use]
pub fn output_path(
    tree: &SiteTree,
    context: &SiteContext,
    node: NodeId,
    variation: Option<&Variation>,
    language: &str,
    version: &str,
) -> OutputPath {
    let mut segments: Vec<String> = tree
        .ancestors(node)
        .filter(|&id| id != tree.root())
        .map(|id| {
            let current = tree.node(id);
            let localized = variation.and_then(|target| {
                current
                    .variations
                    .iter()
                    .find(|v| v.language == target.language)
                    .or_else(|| {
                        current
                            .variations
                            .iter()
                            .find(|v| v.version == target.version)
                    })
            });
            let segment = localized.map_or(current.name.as_str(), |v| v.url.as_str());
            if segment == VERSION_PLACEHOLDER {
                version.to_owned()
            } else {
                segment.to_owned()
            }
        })
        .collect();
    segments.reverse();

    if language != context.default_language() {
        segments.insert(0, language.to_owned());
    }
    segments.push(INDEX_FILE.to_owned());

    OutputPath { segments }
}

/// Link to `node` in `language` and `version`, using its resolved variation.
#[must_use]
pub fn link(
    tree: &SiteTree,
    context: &SiteContext,
    node: NodeId,
    language: &str,
    version: &str,
) -> String {
    let variation = resolve(&tree.node(node).variations, language, version);
    output_path(tree, context, node, variation, language, version).link()
}
