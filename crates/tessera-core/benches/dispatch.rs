//! Benchmarks for batch dispatch.
//!
//! Run with: cargo bench -p tessera-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use std::sync::Arc;
use tessera_core::config::DispatchConfig;
use tessera_core::dispatch::{Dispatcher, NoopObserver, ProgressCounter};
use tessera_core::{Image, ThresholdClassifier};

fn slices(count: usize, side: usize) -> Vec<Image> {
    (0..count)
        .map(|i| {
            Array2::from_shape_fn((side, side), |(y, x)| ((x * 31 + y * 17 + i) % 255) as f32 / 255.0)
                .into_dyn()
        })
        .collect()
}

fn benchmark_threshold_batch(c: &mut Criterion) {
    let images = slices(64, 256);
    let classifier = ThresholdClassifier::new(0.5, false);
    let mut group = c.benchmark_group("threshold_batch_64x256");

    for parallelism in [1, 2, 4, 8] {
        let config = DispatchConfig {
            parallelism,
            ..DispatchConfig::default()
        };
        let dispatcher = Dispatcher::new(&classifier, config)
            .with_observer(Arc::new(NoopObserver))
            .with_sink(Arc::new(ProgressCounter::new()));

        group.bench_with_input(
            BenchmarkId::from_parameter(parallelism),
            &images,
            |b, images| b.iter(|| dispatcher.classify_batch(black_box(images))),
        );
    }
    group.finish();
}

fn benchmark_probability_maps(c: &mut Criterion) {
    let images = slices(16, 256);
    let classifier = ThresholdClassifier::new(0.5, false);
    let config = DispatchConfig {
        probability_maps: true,
        ..DispatchConfig::default()
    };
    let dispatcher = Dispatcher::new(&classifier, config).with_observer(Arc::new(NoopObserver));

    c.bench_function("probability_maps_16x256", |b| {
        b.iter(|| dispatcher.classify_batch(black_box(&images)))
    });
}

criterion_group!(benches, benchmark_threshold_batch, benchmark_probability_maps);
criterion_main!(benches);
