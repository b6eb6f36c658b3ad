//! End-to-end builds over temporary source trees.

use std::fs;
use std::path::{Path, PathBuf};

use holadoc_build::{BuildError, BuiltPage, StaticSiteBuilder};
use holadoc_config::Config;
use pretty_assertions::assert_eq;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn config(root: &Path) -> Config {
    let mut config = Config::default();
    config.site_resolved.source_dir = root.join("src");
    config.site_resolved.output_dir = root.join("www");
    config.content.languages = vec!["en".to_owned(), "es".to_owned()];
    config.content.versions = vec!["v1".to_owned(), "v2".to_owned()];
    config
}

fn page(output_path: &str, language: &str, version: &str, title: &str) -> BuiltPage {
    BuiltPage {
        output_path: PathBuf::from(output_path),
        language: language.to_owned(),
        version: version.to_owned(),
        title: title.to_owned(),
    }
}

#[test]
fn test_fallback_between_languages_and_versions() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    write(&src, "10_guide/intro_en_v1.md", "# Intro\n\nHello.");
    write(&src, "10_guide/intro_es_v1.md", "# Introducción\n\nHola.");

    let report = StaticSiteBuilder::new(config(dir.path())).build().unwrap();

    // v1 and v2 share a path; the v2 rendering is written last.
    assert_eq!(
        report.pages,
        vec![
            page("intro/index.html", "en", "v2", "Intro"),
            page("es/intro/index.html", "es", "v2", "Introducción"),
        ]
    );
    assert_eq!(report.skipped, 0);

    let www = dir.path().join("www");
    let english = fs::read_to_string(www.join("intro/index.html")).unwrap();
    let spanish = fs::read_to_string(www.join("es/intro/index.html")).unwrap();

    assert!(english.contains("<title>Intro</title>"));
    assert!(english.contains("<p>Hello.</p>"));
    assert!(english.contains("This has been unchanged since version v1"));
    assert!(spanish.contains("<title>Introducción</title>"));
    assert!(spanish.contains(r#"<html lang="es">"#));
}

#[test]
fn test_version_placeholder_writes_one_page_per_version() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    write(&src, "10_guide/{version}/1_setup/setup_en_v1.md", "# Setup\n");
    write(&src, "10_guide/{version}/1_setup/setup_es_v1.md", "# Instalación\n");
    write(&src, "10_guide/{version}/1_setup/setup_en_v2.md", "# Setup 2\n");

    let report = StaticSiteBuilder::new(config(dir.path())).build().unwrap();

    assert_eq!(
        report.pages,
        vec![
            page("guide/v1/setup/index.html", "en", "v1", "Setup"),
            page("es/guide/v1/setup/index.html", "es", "v1", "Instalación"),
            page("guide/v2/setup/index.html", "en", "v2", "Setup 2"),
            page("es/guide/v2/setup/index.html", "es", "v2", "Setup 2"),
        ]
    );
    // The guide node itself has no content in any combination.
    assert_eq!(report.skipped, 4);

    let www = dir.path().join("www");
    let menu = fs::read_to_string(www.join("es/guide/v2/setup/index.html")).unwrap();
    assert!(menu.contains(r#"<a class="selected" href="/es/guide/v2/setup/index.html">v2</a>"#));
    assert!(menu.contains(r#"<a class="" href="/es/guide/v1/setup/index.html">v1</a>"#));
}

#[test]
fn test_links_anchors_and_templates() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    write(
        &src,
        "layout.jinja",
        "<title>{{ title }}</title>{{ breadcrumb }}<div id=\"toc\">{{ index }}</div>{{ content }}",
    );
    write(&src, "1_guide/guide_en.md", "# Guide\n");
    write(
        &src,
        "1_guide/1_setup/setup_en.md",
        "# Setup\n\n## First steps\n\nSee [](guide) or <a href=\"https://example.com\">x</a>.",
    );

    let mut config = config(dir.path());
    config.content.versions = vec!["v1".to_owned()];
    config.content.languages = vec!["en".to_owned()];
    StaticSiteBuilder::new(config).build().unwrap();

    let html = fs::read_to_string(dir.path().join("www/guide/setup/index.html")).unwrap();

    assert!(html.starts_with("<title>Setup</title><div class=\"breadcrumb\">"));
    assert!(html.contains(r##"<a href="#First%20steps">First steps</a>"##));
    assert!(html.contains(r#"<h2 id="First%20steps">First steps</h2>"#));
    assert!(html.contains(r#"<a href="/guide/index.html">guide</a>"#));
    assert!(html.contains(r#"<a href="https://example.com">x</a>"#));
}

#[test]
fn test_assets_are_copied_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let bytes: Vec<u8> = (0..=255).collect();
    fs::create_dir_all(src.join("10_guide/1_setup/images")).unwrap();
    fs::write(src.join("10_guide/1_setup/images/logo.png"), &bytes).unwrap();
    fs::write(src.join("10_guide/data.bin"), &bytes).unwrap();
    write(&src, "10_guide/guide_en.md", "# Guide\n");
    write(&src, "10_guide/1_setup/setup_en.md", "# Setup\n");

    let report = StaticSiteBuilder::new(config(dir.path())).build().unwrap();

    // Assets land at the output root under their own name.
    let www = dir.path().join("www");
    assert_eq!(report.assets, 2);
    assert_eq!(fs::read(www.join("images/logo.png")).unwrap(), bytes);
    assert_eq!(fs::read(www.join("data.bin")).unwrap(), bytes);
    assert!(!www.join("10_guide").exists());
    assert!(!www.join("guide/setup/images").exists());
}

#[test]
fn test_heading_with_inline_code_keeps_plain_anchor() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    write(
        &src,
        "1_guide/guide_en.md",
        "# Guide\n\n## Using `foo`\n\nBody.",
    );

    let mut config = config(dir.path());
    config.content.versions = vec!["v1".to_owned()];
    config.content.languages = vec!["en".to_owned()];
    StaticSiteBuilder::new(config).build().unwrap();

    let html = fs::read_to_string(dir.path().join("www/guide/index.html")).unwrap();

    assert!(html.contains(r#"<h2 id="Using%20foo">"#));
    assert!(html.contains(r##"<a href="#Using%20foo">Using foo</a>"##));
    assert!(!html.contains("Using%201foo"));
}

#[test]
fn test_output_directory_is_cleared() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("src"), "1_guide/guide_en.md", "# Guide\n");
    write(&dir.path().join("www"), "stale/index.html", "old");

    StaticSiteBuilder::new(config(dir.path())).build().unwrap();

    assert!(!dir.path().join("www/stale").exists());
    assert!(dir.path().join("www/guide/index.html").exists());
}

#[test]
fn test_sequential_build_matches_parallel() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    write(&src, "1_a/a_en.md", "# A\n");
    write(&src, "1_a/a_es.md", "# A es\n");
    write(&src, "2_b/b_en_v2.md", "# B\n");

    let parallel = StaticSiteBuilder::new(config(dir.path())).build().unwrap();
    let mut sequential_config = config(dir.path());
    sequential_config.build.parallel = false;
    let sequential = StaticSiteBuilder::new(sequential_config).build().unwrap();

    assert_eq!(parallel.pages, sequential.pages);
}

#[test]
fn test_missing_source_dir_fails() {
    let dir = tempfile::tempdir().unwrap();

    let result = StaticSiteBuilder::new(config(dir.path())).build();

    assert!(matches!(result, Err(BuildError::Load(_))));
}
