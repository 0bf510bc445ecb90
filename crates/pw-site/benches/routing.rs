//! Benchmarks for template routing.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pw_site::Router;

/// Build rules with `count` specific patterns followed by a catch-all.
fn rules_source(count: usize) -> String {
    let mut source = String::from("# generated\nindex\nhome.html\n");
    for i in 0..count {
        source.push_str(&format!("section-{i}/*\nsection-{i}.html\n"));
    }
    source.push_str("**\npage.html\n");
    source
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for count in [1, 10, 50] {
        let mut router = Router::load_rules(&rules_source(count));
        router.compile().unwrap();

        group.bench_with_input(BenchmarkId::new("first_rule", count), &router, |b, router| {
            b.iter(|| router.resolve("index"));
        });

        group.bench_with_input(BenchmarkId::new("catch_all", count), &router, |b, router| {
            b.iter(|| router.resolve("deep/nested/page/path"));
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let source = rules_source(50);

    c.bench_function("compile_50_rules", |b| {
        b.iter(|| {
            let mut router = Router::load_rules(&source);
            router.compile().unwrap();
            router
        });
    });
}

criterion_group!(benches, bench_resolve, bench_compile);
criterion_main!(benches);
