//! Benchmarks for tree loading, variation resolution and link generation.

use std::fs;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use holadoc_site::{SiteContext, SiteLoader, breadcrumb, link, resolve, tree_index};

fn context() -> SiteContext {
    SiteContext::new(
        vec!["en".to_owned(), "es".to_owned(), "zh".to_owned()],
        vec!["v1".to_owned(), "v2".to_owned()],
    )
    .unwrap()
}

/// Create `breadth` ordered sections per level, `depth` levels deep, each
/// with an English and a Spanish variation.
fn create_site_structure(root: &Path, depth: usize, breadth: usize) {
    fn create_level(dir: &Path, current_depth: usize, max_depth: usize, breadth: usize) {
        if current_depth > max_depth {
            return;
        }

        fs::create_dir_all(dir).unwrap();
        if current_depth > 0 {
            for language in ["en", "es"] {
                fs::write(
                    dir.join(format!("page_{language}_v1.md")),
                    format!("# Level {current_depth}\n\nContent at depth {current_depth}."),
                )
                .unwrap();
            }
        }

        for i in 0..breadth {
            let child_dir = dir.join(format!("{i}_section{i}"));
            create_level(&child_dir, current_depth + 1, max_depth, breadth);
        }
    }

    create_level(root, 0, depth, breadth);
}

fn bench_load(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    let context = context();

    let mut group = c.benchmark_group("load");

    for (depth, breadth) in [(2, 5), (3, 4), (4, 3)] {
        let source_dir = temp_dir.path().join(format!("src_{depth}_{breadth}"));
        create_site_structure(&source_dir, depth, breadth);

        group.bench_with_input(
            BenchmarkId::new("tree", format!("d{depth}_b{breadth}")),
            &source_dir,
            |b, source_dir| b.iter(|| SiteLoader::new(&context, source_dir).load().unwrap()),
        );
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_dir = temp_dir.path().join("src");
    create_site_structure(&source_dir, 4, 3);
    let context = context();
    let site = SiteLoader::new(&context, &source_dir).load().unwrap();
    let tree = &site.tree;
    let deep = tree
        .find_node("section0/section1/section2/section0")
        .unwrap();

    let mut group = c.benchmark_group("lookup");

    group.bench_function("resolve_exact", |b| {
        b.iter(|| resolve(&tree.node(deep).variations, "es", "v1"))
    });

    group.bench_function("resolve_fallback", |b| {
        b.iter(|| resolve(&tree.node(deep).variations, "zh", "v2"))
    });

    group.bench_function("find_node", |b| {
        b.iter(|| tree.find_node("section0/section1/section2/section0"))
    });

    group.bench_function("link", |b| {
        b.iter(|| link(tree, &context, deep, "es", "v2"))
    });

    group.finish();
}

fn bench_navigation(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_dir = temp_dir.path().join("src");
    create_site_structure(&source_dir, 3, 4);
    let context = context();
    let site = SiteLoader::new(&context, &source_dir).load().unwrap();
    let tree = &site.tree;
    let active = tree.find_node("section1/section2/section3").unwrap();

    let mut group = c.benchmark_group("navigation");

    group.bench_function("breadcrumb", |b| {
        b.iter(|| breadcrumb(tree, &context, active, "en", "v1"))
    });

    group.bench_function("tree_index", |b| {
        b.iter(|| tree_index(tree, &context, tree.root(), active, "en", "v1"))
    });

    group.finish();
}

criterion_group!(benches, bench_load, bench_lookup, bench_navigation);
criterion_main!(benches);
