//! Benchmarks for sidebar building and navigation lookups.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ds_content::{Collection, ContentIndex};
use ds_site::{breadcrumbs, build_sidebar, prev_next};
use ds_storage::SourceFile;

/// Sources for a tree of `depth` levels with `breadth` sections per level.
fn create_sources(depth: usize, breadth: usize) -> Vec<SourceFile> {
    fn create_level(
        dir: &str,
        current_depth: usize,
        max_depth: usize,
        breadth: usize,
        out: &mut Vec<SourceFile>,
    ) {
        out.push(SourceFile::new(
            format!("{dir}/index.mdx"),
            format!("---\ntitle: Level {current_depth}\n---\nContent at depth {current_depth}."),
        ));
        for i in 0..breadth {
            out.push(SourceFile::new(
                format!("{dir}/page-{i}.mdx"),
                format!("---\ntitle: Page {i}\nsidebar_position: {}\n---\n", breadth - i),
            ));
        }
        if current_depth == max_depth {
            return;
        }
        for i in 0..breadth {
            create_level(
                &format!("{dir}/section-{i}"),
                current_depth + 1,
                max_depth,
                breadth,
                out,
            );
        }
    }

    let mut out = Vec::new();
    create_level("doc-surrealql", 0, depth, breadth, &mut out);
    out
}

fn bench_build_sidebar(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_sidebar");

    for (depth, breadth) in [(2, 5), (3, 5), (4, 4)] {
        let index = ContentIndex::load(&create_sources(depth, breadth)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("tree", format!("d{depth}_b{breadth}_{}", index.len())),
            &index,
            |b, index| b.iter(|| build_sidebar(index, Collection::Surrealql, "/docs")),
        );
    }

    group.finish();
}

fn bench_navigation(c: &mut Criterion) {
    let index = ContentIndex::load(&create_sources(4, 4)).unwrap();
    let sidebar = build_sidebar(&index, Collection::Surrealql, "/docs");
    let deep = "/docs/surrealql/section-3/section-3/section-3/section-3/page-0";

    let mut group = c.benchmark_group("navigation");

    group.bench_function("breadcrumbs_deep", |b| {
        b.iter(|| breadcrumbs(&sidebar.items, deep));
    });

    group.bench_function("prev_next_deep", |b| {
        b.iter(|| prev_next(&sidebar.items, deep));
    });

    group.finish();
}

criterion_group!(benches, bench_build_sidebar, bench_navigation);
criterion_main!(benches);
