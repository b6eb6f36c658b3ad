//! Build driver.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use holadoc_config::Config;
use holadoc_renderer::{ContentTransformer, LineHighlighter, escape_html, read_source};
use holadoc_site::{
    LoadedSite, NodeId, OutputPath, SiteContext, SiteLoader, SiteTree, TreeLinks, Variation,
    breadcrumb, language_menu, output_path, resolve, tree_index, version_menu,
};

use crate::assets::copy_asset;
use crate::error::BuildError;
use crate::template::{PageData, PageHelpers, PageTemplates};

/// One written page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPage {
    /// Location relative to the output directory.
    pub output_path: PathBuf,
    /// Requested language.
    pub language: String,
    /// Requested version.
    pub version: String,
    /// Title of the variation shown.
    pub title: String,
}

/// Summary of a finished build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Pages in enumeration order.
    pub pages: Vec<BuiltPage>,
    /// Combinations skipped because their node has no content.
    pub skipped: usize,
    /// Asset files copied.
    pub assets: usize,
}

/// Notice for pages showing content of an older version.
///
/// Versions are compared as plain strings, so `v10` sorts before `v2`.
#[must_use]
pub fn unchanged_banner(variation: &Variation, version: &str) -> Option<String> {
    if variation.version.is_empty() || variation.version.as_str() >= version {
        return None;
    }
    Some(format!(
        r#"<div class="alert">This has been unchanged since version {}</div>"#,
        escape_html(&variation.version)
    ))
}

/// A `(node, version, language)` combination that resolves to content.
struct Target<'a> {
    node: NodeId,
    variation: &'a Variation,
    language: &'a str,
    version: &'a str,
    path: OutputPath,
}

/// Structural path of `node`, for diagnostics.
fn node_path(tree: &SiteTree, node: NodeId) -> String {
    let mut names: Vec<&str> = tree
        .ancestors(node)
        .filter(|&id| id != tree.root())
        .map(|id| tree.node(id).name.as_str())
        .collect();
    names.reverse();
    names.join("/")
}

/// Every renderable combination, pre-order nodes × versions × languages.
///
/// When several combinations share an output file, only the last one is
/// kept. Returns the targets and the number of skipped combinations.
fn enumerate_targets<'a>(
    tree: &'a SiteTree,
    context: &'a SiteContext,
) -> (Vec<Target<'a>>, usize) {
    let mut targets = Vec::new();
    let mut skipped = 0;

    for node in tree.pre_order() {
        let current = tree.node(node);
        for version in context.versions() {
            for language in context.languages() {
                let Some(variation) = resolve(&current.variations, language, version) else {
                    if node != tree.root() && !current.is_placeholder() {
                        tracing::warn!(
                            node = %node_path(tree, node),
                            language = %language,
                            version = %version,
                            "No content for page, skipping"
                        );
                        skipped += 1;
                    }
                    continue;
                };

                let path = output_path(tree, context, node, Some(variation), language, version);
                targets.push(Target {
                    node,
                    variation,
                    language,
                    version,
                    path,
                });
            }
        }
    }

    let mut seen = HashSet::new();
    let total = targets.len();
    targets.reverse();
    targets.retain(|target| seen.insert(target.path.relative_path()));
    targets.reverse();
    if targets.len() < total {
        tracing::debug!(
            overwritten = total - targets.len(),
            "Combinations sharing an output file"
        );
    }

    (targets, skipped)
}

/// Remove everything under `output_dir` and recreate it.
fn prepare_output_dir(output_dir: &Path) -> Result<(), BuildError> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir).map_err(BuildError::io(output_dir))?;
    }
    fs::create_dir_all(output_dir).map_err(BuildError::io(output_dir))
}

/// Shared state for rendering the targets of one build.
struct PageRenderer<'a> {
    tree: &'a Arc<SiteTree>,
    context: &'a Arc<SiteContext>,
    templates: &'a PageTemplates,
    highlighter: &'a LineHighlighter,
    output_dir: &'a Path,
    unchanged_banner: bool,
}

impl PageRenderer<'_> {
    fn render(&self, target: &Target<'_>) -> Result<BuiltPage, BuildError> {
        let tree: &SiteTree = self.tree;
        let context: &SiteContext = self.context;
        let Target {
            node,
            variation,
            language,
            version,
            ..
        } = *target;

        let html = read_source(&variation.filename)?;
        let links = TreeLinks::new(tree, context, language, version);
        let transformed = ContentTransformer::new(&links, self.highlighter).transform(&html)?;

        let mut content = String::new();
        if self.unchanged_banner
            && let Some(banner) = unchanged_banner(variation, version)
        {
            content.push_str(&banner);
            content.push('\n');
        }
        content.push_str(&transformed.html);

        let data = PageData {
            language: language.to_owned(),
            languages: context.languages().to_vec(),
            version: version.to_owned(),
            versions: context.versions().to_vec(),
            title: variation.title.clone(),
            url: variation.url.clone(),
            filename: variation.filename.display().to_string(),
            source_language: variation.language.clone(),
            source_version: variation.version.clone(),
            content,
            outline: transformed.outline_html(),
            breadcrumb: breadcrumb(tree, context, node, language, version),
            tree: tree_index(tree, context, tree.root(), node, language, version),
            language_menu: language_menu(tree, context, node, language, version),
            version_menu: version_menu(tree, context, node, language, version),
        };
        let helpers = PageHelpers::new(
            Arc::clone(self.tree),
            Arc::clone(self.context),
            node,
            language,
            version,
        );
        let page = self.templates.render(tree.template(node), data, &helpers)?;

        let relative = target.path.relative_path();
        let file = self.output_dir.join(&relative);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(BuildError::io(parent))?;
        }
        fs::write(&file, page).map_err(BuildError::io(&file))?;
        tracing::debug!(path = %relative.display(), language, version, "Wrote page");

        Ok(BuiltPage {
            output_path: relative,
            language: language.to_owned(),
            version: version.to_owned(),
            title: variation.title.clone(),
        })
    }
}

/// Builds the whole site described by a [`Config`].
pub struct StaticSiteBuilder {
    config: Config,
    highlighter: LineHighlighter,
}

impl StaticSiteBuilder {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            highlighter: LineHighlighter::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a full build.
    ///
    /// The output directory is cleared first. Any I/O, parse or template
    /// failure aborts the build, leaving the pages written so far.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let source_dir = &self.config.site_resolved.source_dir;
        let output_dir = &self.config.site_resolved.output_dir;
        let context = Arc::new(SiteContext::new(
            self.config.content.languages.clone(),
            self.config.content.versions.clone(),
        )?);

        prepare_output_dir(output_dir)?;

        let LoadedSite { tree, assets } = SiteLoader::new(&context, source_dir).load()?;
        let tree = Arc::new(tree);

        let mut copied = 0;
        for asset in &assets {
            copied += copy_asset(asset, output_dir)?;
        }

        let (targets, skipped) = enumerate_targets(&tree, &context);
        let templates = PageTemplates::load(&tree)?;
        let renderer = PageRenderer {
            tree: &tree,
            context: &context,
            templates: &templates,
            highlighter: &self.highlighter,
            output_dir,
            unchanged_banner: self.config.build.unchanged_banner,
        };

        let pages = if self.config.build.parallel {
            targets
                .par_iter()
                .map(|target| renderer.render(target))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            targets
                .iter()
                .map(|target| renderer.render(target))
                .collect::<Result<Vec<_>, _>>()?
        };

        tracing::info!(
            pages = pages.len(),
            skipped,
            assets = copied,
            output = %output_dir.display(),
            "Build complete"
        );

        Ok(BuildReport {
            pages,
            skipped,
            assets: copied,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use holadoc_site::SiteTreeBuilder;

    fn variation(url: &str, language: &str, version: &str) -> Variation {
        Variation {
            url: url.to_owned(),
            language: language.to_owned(),
            version: version.to_owned(),
            filename: PathBuf::from(format!("{url}_{language}_{version}.md")),
            title: url.to_owned(),
        }
    }

    fn context() -> SiteContext {
        SiteContext::new(
            vec!["en".to_owned(), "es".to_owned()],
            vec!["v1".to_owned(), "v2".to_owned()],
        )
        .unwrap()
    }

    #[test]
    fn test_unchanged_banner() {
        let old = variation("intro", "en", "v1");
        let unversioned = variation("intro", "en", "");

        assert_eq!(
            unchanged_banner(&old, "v2").as_deref(),
            Some(r#"<div class="alert">This has been unchanged since version v1</div>"#)
        );
        assert_eq!(unchanged_banner(&old, "v1"), None);
        assert_eq!(unchanged_banner(&unversioned, "v2"), None);
    }

    #[test]
    fn test_unchanged_banner_compares_strings() {
        let v10 = variation("intro", "en", "v10");

        assert!(unchanged_banner(&v10, "v2").is_some());
        assert_eq!(unchanged_banner(&variation("intro", "en", "v2"), "v10"), None);
    }

    #[test]
    fn test_enumerate_targets_dedupes_and_skips() {
        let mut b = SiteTreeBuilder::new("/src");
        let root = b.root();
        let guide = b.add_node(root, 1, "guide", "/src/1_guide");
        b.add_node(root, 2, "empty", "/src/2_empty");
        b.add_variation(guide, variation("intro", "en", "v1"));
        b.add_variation(guide, variation("intro", "es", "v1"));
        let tree = b.build();
        let context = context();

        let (targets, skipped) = enumerate_targets(&tree, &context);
        let summary: Vec<_> = targets
            .iter()
            .map(|t| (t.path.to_string(), t.language, t.version))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("intro/index.html".to_owned(), "en", "v2"),
                ("es/intro/index.html".to_owned(), "es", "v2"),
            ]
        );
        assert_eq!(skipped, 4);
    }

    #[test]
    fn test_node_path() {
        let mut b = SiteTreeBuilder::new("/src");
        let root = b.root();
        let guide = b.add_node(root, 1, "guide", "/src/1_guide");
        let placeholder = b.add_node(guide, 0, "{version}", "/src/1_guide/{version}");
        let setup = b.add_node(placeholder, 1, "setup", "/src/1_guide/{version}/1_setup");
        let tree = b.build();

        assert_eq!(node_path(&tree, setup), "guide/{version}/setup");
        assert_eq!(node_path(&tree, tree.root()), "");
    }
}
