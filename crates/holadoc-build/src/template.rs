//! Page templates.
//!
//! Every `*.jinja` file in the source tree is parsed once per build and kept
//! in a shared [`Environment`]. Pages without a template of their own or
//! inherited from an ancestor use [`DEFAULT_TEMPLATE`].
//!
//! Template variables:
//! - `lang`, `langs`, `version`, `versions`: requested language/version and
//!   the configured lists
//! - `title`, `url`, `filename`: resolved variation title, URL segment and
//!   source file
//! - `source_lang`, `source_version`: what the resolved variation actually is
//! - `content`, `index`, `breadcrumb`, `tree`, `lang_menu`, `version_menu`:
//!   pre-rendered markup
//!
//! Template functions, scoped to the page's node:
//! - `link(path)`: anchor to the node at `path` in the page's language and
//!   version, with class `link selected` when it is the page itself
//! - `tree_at(path)`: tree index below the node at `path`
//! - `is_under(path)`: whether the page's node is the node at `path` or lies
//!   below it

use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, Error, ErrorKind, Value, context};

use holadoc_renderer::escape_html;
use holadoc_site::{NodeId, SiteContext, SiteTree, display_title, link, tree_index};

use crate::error::BuildError;

/// Layout used when no `*.jinja` template applies.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ title }}</title>
</head>
<body>
<header>
{{ lang_menu }}
{{ version_menu }}
</header>
{{ breadcrumb }}
<div class="layout">
<nav class="tree">
{{ tree }}</nav>
<main>
{{ content }}
</main>
<aside class="outline">
{{ index }}</aside>
</div>
</body>
</html>
"#;

const DEFAULT_TEMPLATE_NAME: &str = "holadoc:default";

fn template_name(path: &Path) -> Cow<'_, str> {
    path.to_string_lossy()
}

/// Values for one page, before helpers are attached.
#[derive(Debug, Default)]
pub(crate) struct PageData {
    pub language: String,
    pub languages: Vec<String>,
    pub version: String,
    pub versions: Vec<String>,
    pub title: String,
    pub url: String,
    pub filename: String,
    pub source_language: String,
    pub source_version: String,
    pub content: String,
    pub outline: String,
    pub breadcrumb: String,
    pub tree: String,
    pub language_menu: String,
    pub version_menu: String,
}

/// Template functions bound to one page.
#[derive(Clone)]
pub(crate) struct PageHelpers {
    tree: Arc<SiteTree>,
    context: Arc<SiteContext>,
    node: NodeId,
    language: Arc<str>,
    version: Arc<str>,
}

impl PageHelpers {
    pub(crate) fn new(
        tree: Arc<SiteTree>,
        context: Arc<SiteContext>,
        node: NodeId,
        language: &str,
        version: &str,
    ) -> Self {
        Self {
            tree,
            context,
            node,
            language: language.into(),
            version: version.into(),
        }
    }

    fn lookup(&self, path: &str) -> Result<NodeId, Error> {
        self.tree.find_node(path).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("no page at path '{path}'"),
            )
        })
    }

    fn link_function(&self) -> Value {
        let helpers = self.clone();
        Value::from_function(move |path: String| -> Result<Value, Error> {
            let target = helpers.lookup(&path)?;
            let class = if target == helpers.node {
                "link selected"
            } else {
                "link"
            };
            let href = link(
                &helpers.tree,
                &helpers.context,
                target,
                &helpers.language,
                &helpers.version,
            );
            let title = display_title(
                &helpers.tree,
                target,
                &helpers.language,
                &helpers.version,
            );
            Ok(Value::from_safe_string(format!(
                r#"<a class="{class}" href="{}">{}</a>"#,
                escape_html(&href),
                escape_html(title)
            )))
        })
    }

    fn tree_function(&self) -> Value {
        let helpers = self.clone();
        Value::from_function(move |path: String| -> Result<Value, Error> {
            let root = helpers.lookup(&path)?;
            Ok(Value::from_safe_string(tree_index(
                &helpers.tree,
                &helpers.context,
                root,
                helpers.node,
                &helpers.language,
                &helpers.version,
            )))
        })
    }

    fn is_under_function(&self) -> Value {
        let helpers = self.clone();
        Value::from_function(move |path: String| -> Result<bool, Error> {
            let target = helpers.lookup(&path)?;
            Ok(helpers.tree.is_under(helpers.node, target))
        })
    }
}

/// Parsed page templates for one build.
pub struct PageTemplates {
    env: Environment<'static>,
}

impl PageTemplates {
    /// Parse the default layout and every template declared in `tree`.
    pub fn load(tree: &SiteTree) -> Result<Self, BuildError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template(DEFAULT_TEMPLATE_NAME, DEFAULT_TEMPLATE)?;

        for id in tree.pre_order() {
            let Some(path) = tree.node(id).template.as_deref() else {
                continue;
            };
            let source = fs::read_to_string(path).map_err(BuildError::io(path))?;
            env.add_template_owned(template_name(path).into_owned(), source)?;
            tracing::debug!(template = %path.display(), "Loaded page template");
        }

        Ok(Self { env })
    }

    /// Render `data` with the template at `template`, or the default layout.
    pub(crate) fn render(
        &self,
        template: Option<&Path>,
        data: PageData,
        helpers: &PageHelpers,
    ) -> Result<String, BuildError> {
        let name = template.map_or(Cow::Borrowed(DEFAULT_TEMPLATE_NAME), template_name);
        let template = self.env.get_template(&name)?;

        let rendered = template.render(context! {
            lang => data.language,
            langs => data.languages,
            version => data.version,
            versions => data.versions,
            title => data.title,
            url => data.url,
            filename => data.filename,
            source_lang => data.source_language,
            source_version => data.source_version,
            content => Value::from_safe_string(data.content),
            index => Value::from_safe_string(data.outline),
            breadcrumb => Value::from_safe_string(data.breadcrumb),
            tree => Value::from_safe_string(data.tree),
            lang_menu => Value::from_safe_string(data.language_menu),
            version_menu => Value::from_safe_string(data.version_menu),
            link => helpers.link_function(),
            tree_at => helpers.tree_function(),
            is_under => helpers.is_under_function(),
        })?;
        Ok(rendered)
    }
}
