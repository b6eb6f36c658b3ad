//! Source directory scanning.
//!
//! Directory layout:
//! - `<order>_<name>/` is a node; `<order>` must be an integer
//! - `{version}/` is a placeholder node repeated for every version
//! - any other directory is an asset directory, copied as-is to the
//!   output root
//! - `<url>[_<language>][_<version>].md|html` is a variation of the
//!   enclosing node
//! - `*.jinja` is the node's page template
//! - any other file is an asset, also copied to the output root

use std::fs;
use std::path::{Path, PathBuf};

use holadoc_renderer::{RenderError, SourceFormat, extract_title, read_source};

use crate::context::{SiteContext, TEMPLATE_EXTENSION, VERSION_PLACEHOLDER};
use crate::tree::{NodeId, SiteTree, SiteTreeBuilder, Variation};

/// File or directory copied verbatim to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Absolute source location.
    pub source: PathBuf,
    /// Location relative to the output root: the entry's own name, however
    /// deep it sits in the source tree.
    pub target: PathBuf,
}

impl Asset {
    fn at_output_root(entry: Entry) -> Self {
        Self {
            target: PathBuf::from(entry.name),
            source: entry.path,
        }
    }
}

/// Loaded tree and the assets found next to it.
#[derive(Debug)]
pub struct LoadedSite {
    pub tree: SiteTree,
    pub assets: Vec<Asset>,
}

/// Fatal loading error.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A directory could not be listed.
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A directory entry could not be inspected.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A content file could not be read or converted.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Split a content file stem into `(url, language, version)`.
///
/// The stem is lower-cased and split on `_`. The first part is the URL
/// segment; later parts fill language and version, first match wins, and
/// unknown parts are ignored.
///
/// ```
/// use holadoc_site::{SiteContext, parse_variation_name};
///
/// let ctx = SiteContext::new(vec!["en".into(), "es".into()], vec!["v1".into()]).unwrap();
/// let (url, language, version) = parse_variation_name("Intro_ES_draft_v1", &ctx);
///
/// assert_eq!((url.as_str(), language.as_str(), version.as_str()), ("intro", "es", "v1"));
/// ```
#[must_use]
pub fn parse_variation_name(stem: &str, context: &SiteContext) -> (String, String, String) {
    let stem = stem.to_lowercase();
    let mut parts = stem.split('_');
    let url = parts.next().unwrap_or_default().to_owned();

    let mut language = String::new();
    let mut version = String::new();
    for part in parts {
        if language.is_empty() && context.is_language(part) {
            part.clone_into(&mut language);
        } else if version.is_empty() && context.is_version(part) {
            part.clone_into(&mut version);
        }
    }
    (url, language, version)
}

/// Parse `<order>_<name>`. `Err(())` when the name has two parts but the
/// order is not an integer. The name part may be empty.
fn parse_node_dir(name: &str) -> Option<Result<(i64, &str), ()>> {
    let (order, rest) = name.split_once('_')?;
    if rest.contains('_') {
        return None;
    }
    Some(order.parse().map(|order| (order, rest)).map_err(|_| ()))
}

/// Builds a [`SiteTree`] from a source directory.
pub struct SiteLoader<'a> {
    context: &'a SiteContext,
    source_dir: PathBuf,
}

struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

impl<'a> SiteLoader<'a> {
    #[must_use]
    pub fn new(context: &'a SiteContext, source_dir: &Path) -> Self {
        Self {
            context,
            source_dir: source_dir.to_path_buf(),
        }
    }

    /// Scan the source directory.
    ///
    /// Malformed directory names never fail the load: they become assets or
    /// are skipped. Unreadable directories and content files are fatal.
    pub fn load(&self) -> Result<LoadedSite, LoadError> {
        let mut builder = SiteTreeBuilder::new(&self.source_dir);
        let mut assets = Vec::new();
        let root = builder.root();
        self.load_dir(&mut builder, root, &self.source_dir, &mut assets)?;

        let tree = builder.build();
        tracing::debug!(
            nodes = tree.len(),
            assets = assets.len(),
            "Source tree loaded"
        );
        Ok(LoadedSite { tree, assets })
    }

    fn load_dir(
        &self,
        builder: &mut SiteTreeBuilder,
        node: NodeId,
        dir: &Path,
        assets: &mut Vec<Asset>,
    ) -> Result<(), LoadError> {
        for entry in read_entries(dir)? {
            if entry.is_dir {
                self.load_child_dir(builder, node, entry, assets)?;
                continue;
            }

            let is_template = entry
                .path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION));
            if is_template {
                builder.set_template(node, entry.path);
            } else if SourceFormat::from_path(&entry.path).is_some() {
                self.load_variation(builder, node, &entry)?;
            } else {
                assets.push(Asset::at_output_root(entry));
            }
        }
        Ok(())
    }

    fn load_child_dir(
        &self,
        builder: &mut SiteTreeBuilder,
        parent: NodeId,
        entry: Entry,
        assets: &mut Vec<Asset>,
    ) -> Result<(), LoadError> {
        let (order, name) = if entry.name == VERSION_PLACEHOLDER {
            (0, VERSION_PLACEHOLDER)
        } else {
            match parse_node_dir(&entry.name) {
                Some(Ok(parsed)) => parsed,
                Some(Err(())) => {
                    tracing::debug!(path = %entry.path.display(), "Skipping directory with non-numeric order");
                    return Ok(());
                }
                None => {
                    assets.push(Asset::at_output_root(entry));
                    return Ok(());
                }
            }
        };

        let child = builder.add_node(parent, order, name, &entry.path);
        self.load_dir(builder, child, &entry.path, assets)
    }

    fn load_variation(
        &self,
        builder: &mut SiteTreeBuilder,
        node: NodeId,
        entry: &Entry,
    ) -> Result<(), LoadError> {
        if node == builder.root() || builder.node(node).is_placeholder() {
            tracing::warn!(
                path = %entry.path.display(),
                "Content files must live in an ordered directory, ignoring"
            );
            return Ok(());
        }

        let stem = entry
            .path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let (url, language, version) = parse_variation_name(&stem, self.context);

        let html = read_source(&entry.path)?;
        let title = if let Some(title) = extract_title(&html)? {
            title
        } else {
            tracing::warn!(path = %entry.path.display(), "Page needs an <h1> title, using its URL");
            url.clone()
        };

        builder.add_variation(
            node,
            Variation {
                url,
                language,
                version,
                filename: entry.path.clone(),
                title,
            },
        );
        Ok(())
    }
}

/// Visible entries of `dir`, sorted by file name.
///
/// Symlinks are resolved; symlinked directories are skipped to keep the
/// walk free of cycles.
fn read_entries(dir: &Path) -> Result<Vec<Entry>, LoadError> {
    let read_dir = fs::read_dir(dir).map_err(|source| LoadError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| LoadError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let read_err = |source| LoadError::Read {
            path: path.clone(),
            source,
        };
        let file_type = entry.file_type().map_err(read_err)?;
        let is_dir = if file_type.is_symlink() {
            if fs::metadata(&path).map_err(read_err)?.is_dir() {
                tracing::warn!(path = %path.display(), "Not following symlinked directory");
                continue;
            }
            false
        } else {
            file_type.is_dir()
        };

        entries.push(Entry { name, path, is_dir });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
