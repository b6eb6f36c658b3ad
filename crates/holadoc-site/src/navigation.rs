//! Navigation markup: breadcrumb, tree index and language/version menus.

use std::fmt::Write;

use holadoc_renderer::escape_html;

use crate::context::SiteContext;
use crate::paths::link;
use crate::resolver::resolve;
use crate::tree::{NodeId, SiteTree};

/// Title shown for `node`: its resolved variation's title, or its name.
#[must_use]
pub fn display_title<'a>(
    tree: &'a SiteTree,
    node: NodeId,
    language: &str,
    version: &str,
) -> &'a str {
    let current = tree.node(node);
    resolve(&current.variations, language, version)
        .map_or(current.name.as_str(), |v| v.title.as_str())
}

/// Breadcrumb from the outermost titled ancestor down to `active`.
///
/// The walk starts at `active` and climbs while nodes have variations.
/// Placeholder nodes are passed through without an entry. Returns an empty
/// string when fewer than two entries qualify.
#[must_use]
pub fn breadcrumb(
    tree: &SiteTree,
    context: &SiteContext,
    active: NodeId,
    language: &str,
    version: &str,
) -> String {
    let mut trail = Vec::new();
    for id in tree.ancestors(active) {
        let node = tree.node(id);
        if id == tree.root() {
            break;
        }
        if node.is_placeholder() {
            continue;
        }
        if node.variations.is_empty() {
            break;
        }
        trail.push(id);
    }

    if trail.len() < 2 {
        return String::new();
    }
    trail.reverse();

    let mut out = String::from(r#"<div class="breadcrumb">"#);
    let last = trail.len() - 1;
    for (i, &id) in trail.iter().enumerate() {
        if i > 0 {
            out.push_str(r#"<span class="arrow">→</span>"#);
        }
        let class = if i == last { "item selected" } else { "item" };
        let _ = write!(
            out,
            r#"<a class="{class}" href="{}">{}</a>"#,
            escape_html(&link(tree, context, id, language, version)),
            escape_html(display_title(tree, id, language, version))
        );
    }
    out.push_str("</div>");
    out
}

/// Nested index of everything below `index_root`.
///
/// Placeholder children are expanded in place. An entry is `active` when it
/// is `active` or one of its ancestors, and `selected` when it is `active`.
#[must_use]
pub fn tree_index(
    tree: &SiteTree,
    context: &SiteContext,
    index_root: NodeId,
    active: NodeId,
    language: &str,
    version: &str,
) -> String {
    let mut out = String::new();
    write_index(tree, context, index_root, active, language, version, &mut out);
    out
}

fn write_index(
    tree: &SiteTree,
    context: &SiteContext,
    parent: NodeId,
    active: NodeId,
    language: &str,
    version: &str,
    out: &mut String,
) {
    for &child in tree.children(parent) {
        if tree.node(child).is_placeholder() {
            write_index(tree, context, child, active, language, version, out);
            continue;
        }

        let mut class = String::from("item");
        if tree.is_under(active, child) {
            class.push_str(" active");
        }
        if child == active {
            class.push_str(" selected");
        }

        let _ = writeln!(
            out,
            r#"<div class="{class}"><a href="{}">{}</a></div>"#,
            escape_html(&link(tree, context, child, language, version)),
            escape_html(display_title(tree, child, language, version))
        );

        if tree.children(child).is_empty() {
            continue;
        }
        out.push_str("<div class=\"children\">\n");
        write_index(tree, context, child, active, language, version, out);
        out.push_str("</div>\n");
    }
}

/// Links to `node` in every configured language, keeping `version`.
#[must_use]
pub fn language_menu(
    tree: &SiteTree,
    context: &SiteContext,
    node: NodeId,
    language: &str,
    version: &str,
) -> String {
    let mut out = String::from(r#"<div class="languages">"#);
    for candidate in context.languages() {
        let class = if candidate == language { "selected" } else { "" };
        let _ = write!(
            out,
            r#"<a class="{class}" href="{}">{}</a>"#,
            escape_html(&link(tree, context, node, candidate, version)),
            escape_html(candidate)
        );
    }
    out.push_str("</div>");
    out
}

/// Links to `node` in every configured version, keeping `language`.
///
/// Empty unless the node lies below a version placeholder.
#[must_use]
pub fn version_menu(
    tree: &SiteTree,
    context: &SiteContext,
    node: NodeId,
    language: &str,
    version: &str,
) -> String {
    if !tree.has_versions(node) {
        return String::new();
    }

    let mut out = String::from(r#"<div class="versions">"#);
    for candidate in context.versions() {
        let class = if candidate == version { "selected" } else { "" };
        let _ = write!(
            out,
            r#"<a class="{class}" href="{}">{}</a>"#,
            escape_html(&link(tree, context, node, language, candidate)),
            escape_html(candidate)
        );
    }
    out.push_str("</div>");
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::{SiteTreeBuilder, Variation};

    fn context() -> SiteContext {
        SiteContext::new(
            vec!["en".to_owned(), "es".to_owned()],
            vec!["v1".to_owned(), "v2".to_owned()],
        )
        .unwrap()
    }

    fn variation(url: &str, title: &str) -> Variation {
        Variation {
            url: url.to_owned(),
            language: "en".to_owned(),
            version: String::new(),
            filename: PathBuf::from(format!("{url}_en.md")),
            title: title.to_owned(),
        }
    }

    struct Sample {
        tree: SiteTree,
        guide: NodeId,
        install: NodeId,
        linux: NodeId,
        api: NodeId,
    }

    /// root -> 10_guide -> {version} -> 1_install -> 1_linux ; 20_api (no content)
    fn sample() -> Sample {
        let mut b = SiteTreeBuilder::new("/src");
        let root = b.root();
        let guide = b.add_node(root, 10, "guide", "/src/10_guide");
        b.add_variation(guide, variation("guide", "Guide"));
        let placeholder = b.add_node(guide, 0, "{version}", "/src/10_guide/{version}");
        let install = b.add_node(placeholder, 1, "install", "/i");
        b.add_variation(install, variation("install", "Install"));
        let linux = b.add_node(install, 1, "linux", "/l");
        b.add_variation(linux, variation("linux", "Linux & BSD"));
        let api = b.add_node(root, 20, "api", "/src/20_api");
        Sample {
            tree: b.build(),
            guide,
            install,
            linux,
            api,
        }
    }

    #[test]
    fn test_breadcrumb_skips_placeholder() {
        let s = sample();

        assert_eq!(
            breadcrumb(&s.tree, &context(), s.linux, "en", "v2"),
            concat!(
                r#"<div class="breadcrumb">"#,
                r#"<a class="item" href="/guide/index.html">Guide</a>"#,
                r#"<span class="arrow">→</span>"#,
                r#"<a class="item" href="/guide/v2/install/index.html">Install</a>"#,
                r#"<span class="arrow">→</span>"#,
                r#"<a class="item selected" href="/guide/v2/install/linux/index.html">Linux &amp; BSD</a>"#,
                "</div>"
            )
        );
    }

    #[test]
    fn test_breadcrumb_suppressed_below_two_entries() {
        let s = sample();
        let ctx = context();

        assert_eq!(breadcrumb(&s.tree, &ctx, s.guide, "en", "v1"), "");
        assert_eq!(breadcrumb(&s.tree, &ctx, s.api, "en", "v1"), "");
        assert_eq!(breadcrumb(&s.tree, &ctx, s.tree.root(), "en", "v1"), "");
    }

    #[test]
    fn test_breadcrumb_stops_at_node_without_variations() {
        let mut b = SiteTreeBuilder::new("/src");
        let root = b.root();
        let bare = b.add_node(root, 1, "bare", "/b");
        let a = b.add_node(bare, 1, "a", "/a");
        b.add_variation(a, variation("a", "A"));
        let c = b.add_node(a, 1, "c", "/c");
        b.add_variation(c, variation("c", "C"));
        let tree = b.build();

        let html = breadcrumb(&tree, &context(), c, "en", "v1");

        assert!(html.contains(">A</a>"));
        assert!(!html.contains(">bare</a>"));
        assert_eq!(html.matches("<a ").count(), 2);
    }

    #[test]
    fn test_tree_index_marks_active_and_selected() {
        let s = sample();

        assert_eq!(
            tree_index(&s.tree, &context(), s.tree.root(), s.install, "en", "v1"),
            concat!(
                "<div class=\"item active\"><a href=\"/guide/index.html\">Guide</a></div>\n",
                "<div class=\"children\">\n",
                "<div class=\"item active selected\"><a href=\"/guide/v1/install/index.html\">Install</a></div>\n",
                "<div class=\"children\">\n",
                "<div class=\"item\"><a href=\"/guide/v1/install/linux/index.html\">Linux &amp; BSD</a></div>\n",
                "</div>\n",
                "</div>\n",
                "<div class=\"item\"><a href=\"/api/index.html\">api</a></div>\n",
            )
        );
    }

    #[test]
    fn test_tree_index_of_subtree() {
        let s = sample();

        let html = tree_index(&s.tree, &context(), s.install, s.linux, "es", "v2");

        assert_eq!(
            html,
            "<div class=\"item active selected\"><a href=\"/es/guide/v2/install/linux/index.html\">Linux &amp; BSD</a></div>\n"
        );
    }

    #[test]
    fn test_language_menu() {
        let s = sample();

        assert_eq!(
            language_menu(&s.tree, &context(), s.guide, "es", "v1"),
            concat!(
                r#"<div class="languages">"#,
                r#"<a class="" href="/guide/index.html">en</a>"#,
                r#"<a class="selected" href="/es/guide/index.html">es</a>"#,
                "</div>"
            )
        );
    }

    #[test]
    fn test_version_menu_only_below_placeholder() {
        let s = sample();
        let ctx = context();

        assert_eq!(version_menu(&s.tree, &ctx, s.guide, "en", "v1"), "");
        assert_eq!(
            version_menu(&s.tree, &ctx, s.install, "en", "v2"),
            concat!(
                r#"<div class="versions">"#,
                r#"<a class="" href="/guide/v1/install/index.html">v1</a>"#,
                r#"<a class="selected" href="/guide/v2/install/index.html">v2</a>"#,
                "</div>"
            )
        );
    }

    #[test]
    fn test_display_title_falls_back_to_name() {
        let s = sample();

        assert_eq!(display_title(&s.tree, s.api, "en", "v1"), "api");
        assert_eq!(display_title(&s.tree, s.guide, "es", "v1"), "Guide");
    }
}
