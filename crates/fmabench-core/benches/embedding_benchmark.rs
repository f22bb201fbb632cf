//! Benchmark the embedding training-step operations.
//!
//! Run with: `cargo bench --bench embedding_benchmark`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fmabench_core::embedding::{EmbeddingKernel, InnerProduct, UpdateMode};
use fmabench_core::suite::EmbeddingCase;

const ROWS: usize = 1 << 17;

fn bench_compute_f(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_f");

    for dim in [64_usize, 256] {
        let mut kernel = EmbeddingKernel::random(ROWS, dim, Some(42)).expect("valid shape");
        for variant in InnerProduct::ALL {
            group.bench_with_input(BenchmarkId::new(variant.name(), dim), &dim, |bencher, _| {
                bencher.iter(|| black_box(kernel.sample_inner_product(black_box(variant))));
            });
        }
    }

    group.finish();
}

fn bench_update_eh(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_eh");
    let mut kernel = EmbeddingKernel::random(ROWS, 256, Some(42)).expect("valid shape");

    for (name, mode) in [("fma", UpdateMode::Fused), ("manual", UpdateMode::Separate)] {
        group.bench_function(name, |bencher| {
            bencher.iter(|| kernel.sample_accumulate_gradient(black_box(mode)));
            kernel.accumulator_mut().reset();
        });
    }

    group.finish();
}

fn bench_update_input_vector(c: &mut Criterion) {
    let mut kernel = EmbeddingKernel::random(ROWS, 256, Some(42)).expect("valid shape");
    c.bench_function("update_input_vector", |bencher| {
        bencher.iter(|| kernel.sample_apply_update());
    });
}

/// Same operations driven through the named cases the CLI runs.
fn bench_cases(c: &mut Criterion) {
    let mut group = c.benchmark_group("embedding_cases");
    let mut kernel = EmbeddingKernel::random(ROWS, 256, Some(7)).expect("valid shape");

    for case in EmbeddingCase::ALL {
        group.bench_function(case.name(), |bencher| {
            bencher.iter(|| case.run(&mut kernel));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_f,
    bench_update_eh,
    bench_update_input_vector,
    bench_cases
);
criterion_main!(benches);
