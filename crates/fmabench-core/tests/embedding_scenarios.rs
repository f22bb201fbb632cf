//! End-to-end scenarios for the embedding kernel with deterministic rows.

use fmabench_core::embedding::{
    EmbeddingKernel, EmbeddingTable, GradientAccumulator, InnerProduct, UpdateMode,
};
use fmabench_core::rows::{ScriptedRows, UniformRows};
use fmabench_core::Error;

fn zeros_with_output_row(output_row: Vec<f32>) -> EmbeddingKernel<ScriptedRows> {
    let dimension = output_row.len();
    EmbeddingKernel::new(
        EmbeddingTable::zeros(3, dimension).unwrap(),
        EmbeddingTable::from_rows(vec![vec![0.5; dimension], output_row, vec![-1.0; dimension]])
            .unwrap(),
        GradientAccumulator::zeros(dimension),
        // accumulate draws row 1, apply draws row 2
        ScriptedRows::new(vec![1, 2], vec![1.0]),
    )
    .unwrap()
}

#[test]
fn scenario_inner_product_of_exact_rows_is_exact() {
    let kernel = EmbeddingKernel::new(
        EmbeddingTable::from_rows(vec![vec![1.0, 0.0, 2.0]]).unwrap(),
        EmbeddingTable::from_rows(vec![vec![2.0, 1.0, 0.0]]).unwrap(),
        GradientAccumulator::zeros(3),
        ScriptedRows::rows(vec![0]),
    )
    .unwrap();

    for variant in InnerProduct::ALL {
        assert_eq!(
            kernel.compute_inner_product(0, 0, variant).unwrap().to_bits(),
            2.0_f32.to_bits()
        );
    }
}

#[test]
fn scenario_sampled_accumulate_then_apply_for_both_modes() {
    for mode in [UpdateMode::Fused, UpdateMode::Separate] {
        let mut kernel = zeros_with_output_row(vec![1.0, 2.0, 3.0, 4.0]);
        kernel.sample_accumulate_gradient(mode).unwrap();
        kernel.sample_apply_update().unwrap();

        assert_eq!(kernel.input().row(2).unwrap(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(kernel.input().row(0).unwrap(), &[0.0; 4]);
        assert_eq!(kernel.input().row(1).unwrap(), &[0.0; 4]);
    }
}

#[test]
fn scenario_stale_accumulator_then_reset_cycle() {
    let mut kernel = zeros_with_output_row(vec![1.0, 2.0, 3.0, 4.0]);
    kernel.accumulate_gradient(1, 1.0, UpdateMode::Fused).unwrap();

    kernel.apply_accumulated_update(0).unwrap();
    kernel.apply_accumulated_update(0).unwrap();
    assert_eq!(kernel.input().row(0).unwrap(), &[2.0, 4.0, 6.0, 8.0]);

    // Fresh cycle: reset, then accumulate a different row with gain 0.5.
    kernel.accumulator_mut().reset();
    kernel.accumulate_gradient(2, 0.5, UpdateMode::Separate).unwrap();
    kernel.apply_accumulated_update(0).unwrap();
    assert_eq!(kernel.input().row(0).unwrap(), &[1.5, 3.5, 5.5, 7.5]);
}

#[test]
fn scenario_out_of_range_ids_fail_without_side_effects() {
    let mut kernel = EmbeddingKernel::new(
        EmbeddingTable::zeros(2, 2).unwrap(),
        EmbeddingTable::from_rows(vec![vec![1.0, 1.0], vec![2.0, 2.0]]).unwrap(),
        GradientAccumulator::from_vec(vec![3.0, 3.0]),
        ScriptedRows::rows(vec![0, 5]),
    )
    .unwrap();

    // id1 = 0 is fine, id2 = 5 is not.
    assert_eq!(
        kernel.sample_inner_product(InnerProduct::Separate).unwrap_err(),
        Error::RowOutOfRange { row: 5, rows: 2 }
    );
    assert!(kernel.apply_accumulated_update(2).is_err());
    assert_eq!(kernel.input().as_slice(), &[0.0; 4]);
}

#[test]
fn scenario_seeded_kernels_replay_identically() {
    let mut first = EmbeddingKernel::random(128, 32, Some(2024)).unwrap();
    let mut second = EmbeddingKernel::random(128, 32, Some(2024)).unwrap();

    for _ in 0..50 {
        let a = first.sample_inner_product(InnerProduct::FusedUnrolled4).unwrap();
        let b = second.sample_inner_product(InnerProduct::FusedUnrolled4).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
        first.sample_accumulate_gradient(UpdateMode::Fused).unwrap();
        second.sample_accumulate_gradient(UpdateMode::Fused).unwrap();
        first.sample_apply_update().unwrap();
        second.sample_apply_update().unwrap();
    }

    assert_eq!(first.input(), second.input());
    assert_eq!(first.accumulator(), second.accumulator());
}

#[test]
fn scenario_custom_uniform_source_stays_in_range() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let mut kernel = EmbeddingKernel::new(
        EmbeddingTable::zeros(7, 4).unwrap(),
        EmbeddingTable::zeros(7, 4).unwrap(),
        GradientAccumulator::zeros(4),
        UniformRows::new(StdRng::seed_from_u64(1)),
    )
    .unwrap();

    for _ in 0..1_000 {
        kernel.sample_inner_product(InnerProduct::Separate).unwrap();
        kernel.sample_accumulate_gradient(UpdateMode::Separate).unwrap();
        kernel.sample_apply_update().unwrap();
    }
}
