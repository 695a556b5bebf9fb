// Dataset generation and search throughput benchmarks.
//
// Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dbperf::backend::{MemorySearchBackend, SearchBackend, SqliteSearchBackend};
use dbperf::dataset::values::DEFAULT_SEED;
use dbperf::dataset::{FixtureGenerator, SeededRandom, ZipfianGenerator};
use dbperf::search::SearchScenario;

fn bench_random_stream(c: &mut Criterion) {
    c.bench_function("seeded_random_next_f64", |b| {
        let mut rng = SeededRandom::new(DEFAULT_SEED);
        b.iter(|| black_box(rng.next_f64()));
    });
}

fn bench_zipf_index(c: &mut Criterion) {
    let zipf = ZipfianGenerator::new(1.3, 100);
    let mut rng = SeededRandom::new(DEFAULT_SEED);
    c.bench_function("zipf_index_for", |b| {
        b.iter(|| black_box(zipf.index_for(rng.next_f64())));
    });
}

fn bench_flat_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_flat");
    for count in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let generator = FixtureGenerator::new(DEFAULT_SEED);
            b.iter(|| black_box(generator.generate_flat(count)));
        });
    }
    group.finish();
}

fn bench_product_generation(c: &mut Criterion) {
    let generator = FixtureGenerator::new(DEFAULT_SEED);
    c.bench_function("generate_products_1k", |b| {
        b.iter(|| black_box(generator.generate_products(1_000)));
    });
}

fn bench_search_backends(c: &mut Criterion) {
    let products = FixtureGenerator::new(DEFAULT_SEED).generate_products(10_000);

    let memory = MemorySearchBackend::from_products("memory", products.clone());
    let mut sqlite = SqliteSearchBackend::in_memory().expect("open sqlite");
    sqlite.load_products(&products).expect("load products");

    let mut group = c.benchmark_group("search_equality_10k");
    let params = SearchScenario::Equality.query_params();
    group.bench_function("memory", |b| {
        b.iter(|| black_box(memory.search(&params).expect("search")));
    });
    group.bench_function("sqlite", |b| {
        b.iter(|| black_box(sqlite.search(&params).expect("search")));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_random_stream,
    bench_zipf_index,
    bench_flat_generation,
    bench_product_generation,
    bench_search_backends,
);
criterion_main!(benches);
