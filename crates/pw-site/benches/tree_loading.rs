//! Benchmarks for content tree loading.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pw_renderer::MarkdownConverter;
use pw_site::TreeLoader;
use pw_storage::{MockStorage, join_path};

/// Create a tree with specified depth and breadth.
fn create_tree(depth: usize, breadth: usize) -> MockStorage {
    fn create_level(
        storage: MockStorage,
        path: &str,
        current_depth: usize,
        max_depth: usize,
        breadth: usize,
    ) -> MockStorage {
        let mut storage = storage.with_file(
            &join_path(path, "page.md"),
            format!("---\ntitle: Level {current_depth}\n---\n# Level {current_depth}\n\nContent."),
        );
        if current_depth == max_depth {
            return storage;
        }
        for i in 0..breadth {
            let child = join_path(path, &format!("section-{i}"));
            storage = create_level(storage, &child, current_depth + 1, max_depth, breadth);
        }
        storage
    }

    create_level(MockStorage::new(), "", 0, depth, breadth)
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_tree");

    for (depth, breadth) in [(2, 5), (3, 5), (5, 3)] {
        let storage = Arc::new(create_tree(depth, breadth));
        let loader = TreeLoader::new(storage, Arc::new(MarkdownConverter::new()));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{depth}x{breadth}")),
            &loader,
            |b, loader| b.iter(|| loader.load().unwrap()),
        );
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let storage = Arc::new(create_tree(3, 5));
    let tree = TreeLoader::new(storage, Arc::new(MarkdownConverter::new()))
        .load()
        .unwrap();

    let mut group = c.benchmark_group("tree_lookup");

    group.bench_function("find_by_path_hit", |b| {
        b.iter(|| tree.find_by_path("section-0/section-1/section-2"));
    });

    group.bench_function("find_by_path_miss", |b| {
        b.iter(|| tree.find_by_path("nonexistent/path"));
    });

    group.finish();
}

criterion_group!(benches, bench_load, bench_lookup);
criterion_main!(benches);
