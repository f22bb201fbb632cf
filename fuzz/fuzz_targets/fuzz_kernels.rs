//! Fuzz target for the reduction and embedding kernels.
//!
//! Drives every reduction strategy and every embedding operation with
//! arbitrary values (NaN, Inf, subnormals) and arbitrary row ids. Nothing
//! may panic: bad ids must come back as `RowOutOfRange`.
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_kernels
//! ```

#![no_main]

use arbitrary::Arbitrary;
use fmabench_core::embedding::{
    EmbeddingKernel, EmbeddingTable, GradientAccumulator, InnerProduct, UpdateMode,
};
use fmabench_core::reduction::{dot_error_bound, ReductionKernel, ReductionStrategy};
use fmabench_core::rows::ScriptedRows;
use libfuzzer_sys::fuzz_target;

const MAX_DIM: usize = 512;
const MAX_ROWS: usize = 8;

#[derive(Arbitrary, Debug)]
struct KernelInput {
    vec_a: Vec<f64>,
    vec_b: Vec<f64>,
    /// Flat table values, reshaped to `rows x dim`.
    table: Vec<f32>,
    rows: u8,
    ids: Vec<u16>,
    gains: Vec<f32>,
}

fuzz_target!(|input: KernelInput| {
    // Reduction: equal lengths by construction.
    let dim = input.vec_a.len().min(MAX_DIM);
    let a: Vec<f64> = input.vec_a.into_iter().take(dim).collect();
    let mut b: Vec<f64> = input.vec_b.into_iter().take(dim).collect();
    b.resize(dim, 0.0);

    if let Ok(kernel) = ReductionKernel::new(a, b) {
        for strategy in ReductionStrategy::ALL {
            let _ = kernel.run(strategy);
        }
        let _ = dot_error_bound(kernel.a(), kernel.b());
    }

    // Embedding: arbitrary ids, possibly out of range.
    let rows = usize::from(input.rows).clamp(1, MAX_ROWS);
    let dim = (input.table.len() / rows).min(MAX_DIM);
    let mut values: Vec<f32> = input.table.into_iter().take(rows * dim).collect();
    values.resize(rows * dim, 0.0);

    let ids: Vec<usize> = if input.ids.is_empty() {
        vec![0]
    } else {
        input.ids.into_iter().map(usize::from).collect()
    };
    let gains = if input.gains.is_empty() {
        vec![1.0]
    } else {
        input.gains
    };

    let (Ok(table_in), Ok(table_out)) = (
        EmbeddingTable::from_flat(rows, dim, values.clone()),
        EmbeddingTable::from_flat(rows, dim, values),
    ) else {
        return;
    };
    let Ok(mut kernel) = EmbeddingKernel::new(
        table_in,
        table_out,
        GradientAccumulator::zeros(dim),
        ScriptedRows::new(ids, gains),
    ) else {
        return;
    };

    for variant in InnerProduct::ALL {
        let _ = kernel.sample_inner_product(variant);
    }
    let _ = kernel.sample_accumulate_gradient(UpdateMode::Fused);
    let _ = kernel.sample_accumulate_gradient(UpdateMode::Separate);
    let _ = kernel.sample_apply_update();
});
