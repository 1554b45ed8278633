//! Benchmarks for the predictive search
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mediaseek::search::{DurationStats, SearchConfig, SearchEngine};
use mediaseek::store::{GenerateOptions, ShardedStore};
use std::sync::Arc;
use std::time::Duration;

fn create_store(count: u64) -> ShardedStore {
    ShardedStore::generate(&GenerateOptions {
        record_count: count,
        timeline_start: Some(0),
        seed: Some(1),
        latency: Duration::ZERO,
        ..Default::default()
    })
    .unwrap()
}

fn bench_locate(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("locate");

    for size in [1_000u64, 100_000] {
        let store = create_store(size);
        let extent = store.extent().unwrap();
        let engine = SearchEngine::new(store, Arc::new(DurationStats::new()));
        let step = (extent.end - extent.start) / 997;

        group.throughput(Throughput::Elements(1));

        group.bench_function(format!("warm_{}", size), |b| {
            let mut target = extent.start;
            b.to_async(&runtime).iter(|| {
                target = extent.start + (target - extent.start + step) % (extent.end - extent.start);
                let engine = &engine;
                let position = target;
                async move { engine.locate(black_box(position), extent.length).await.unwrap() }
            })
        });
    }

    group.finish();
}

fn bench_bisect_fallback(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("skewed");

    let mut durations = vec![1_000_000i64];
    durations.extend(std::iter::repeat(1).take(9_999));

    for clamps in [0u32, 3] {
        let store = ShardedStore::from_durations(0, &durations, 9000).unwrap();
        let engine = SearchEngine::new(store, Arc::new(DurationStats::new()))
            .with_config(SearchConfig {
                bisect_after_clamps: clamps,
            });

        group.bench_function(format!("bisect_after_{}", clamps), |b| {
            b.to_async(&runtime).iter(|| {
                let engine = &engine;
                async move { engine.locate(black_box(1_005_000), 10_000).await.unwrap() }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_locate, bench_bisect_fallback);
criterion_main!(benches);
