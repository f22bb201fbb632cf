//! Property-based agreement tests for the reduction strategies.
//!
//! Random finite inputs must agree within `dot_error_bound`; integer-valued
//! inputs (exact in binary floating point) must agree bit for bit.

use proptest::{
    collection::vec,
    prelude::{prop_assert, prop_assert_eq, prop_oneof, Just, Strategy},
    proptest,
    test_runner::{Config as ProptestConfig, FileFailurePersistence},
};
use fmabench_core::fma::{dot_fused_native, Float};
use fmabench_core::reduction::{
    dot_error_bound, dot_fused, dot_fused_unrolled4, dot_separate, dot_separate_unrolled4,
    ReductionKernel, ReductionStrategy,
};

const REDUCTION_PROP_CASES: u32 = 256;
const REDUCTION_PROP_MAX_SHRINK_ITERS: u32 = 2048;

/// Absorbs rounding of products that land in the subnormal range.
const UNDERFLOW_SLACK: f64 = 1.0e-30;

fn length_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(0_usize),
        Just(1_usize),
        Just(3_usize),
        Just(4_usize),
        Just(5_usize),
        Just(8_usize),
        Just(255_usize),
        Just(256_usize),
        Just(257_usize),
        0_usize..=2048,
    ]
}

fn finite_f32_pair_strategy() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    length_strategy().prop_flat_map(|len| {
        let a = vec(-100.0_f32..100.0_f32, len);
        let b = vec(-100.0_f32..100.0_f32, len);
        (a, b)
    })
}

fn finite_f64_pair_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    length_strategy().prop_flat_map(|len| {
        let a = vec(-1.0e3_f64..1.0e3_f64, len);
        let b = vec(-1.0e3_f64..1.0e3_f64, len);
        (a, b)
    })
}

/// Small integers keep every partial sum exact in f32 for these lengths.
fn integer_pair_strategy() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    length_strategy().prop_flat_map(|len| {
        let a = vec((-64_i16..=64).prop_map(f32::from), len);
        let b = vec((-64_i16..=64).prop_map(f32::from), len);
        (a, b)
    })
}

fn reduction_proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: REDUCTION_PROP_CASES,
        max_shrink_iters: REDUCTION_PROP_MAX_SHRINK_ITERS,
        failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
            "reduction-property-regressions",
        ))),
        ..ProptestConfig::default()
    }
}

fn within_bound<T: Float>(x: T, y: T, bound: f64) -> bool {
    (x.to_f64() - y.to_f64()).abs() <= bound + UNDERFLOW_SLACK
}

proptest! {
    #![proptest_config(reduction_proptest_config())]

    #[test]
    fn test_fused_and_separate_agree_within_bound_f32((a, b) in finite_f32_pair_strategy()) {
        let fused = dot_fused(&a, &b);
        let separate = dot_separate(&a, &b);
        let bound = dot_error_bound(&a, &b);
        prop_assert!(
            within_bound(fused, separate, bound),
            "len={} fused={} separate={} bound={}",
            a.len(),
            fused,
            separate,
            bound
        );
    }

    #[test]
    fn test_every_strategy_agrees_within_bound_f64((a, b) in finite_f64_pair_strategy()) {
        let kernel = ReductionKernel::new(a, b).unwrap();
        let bound = dot_error_bound(kernel.a(), kernel.b());
        let reference = kernel.run(ReductionStrategy::Fused);
        for strategy in ReductionStrategy::ALL {
            let value = kernel.run(strategy);
            prop_assert!(
                within_bound(value, reference, bound),
                "strategy={} value={} reference={} bound={}",
                strategy,
                value,
                reference,
                bound
            );
        }
    }

    #[test]
    fn test_native_path_is_bit_identical_to_portable((a, b) in finite_f32_pair_strategy()) {
        prop_assert_eq!(
            dot_fused_native(&a, &b).to_bits(),
            dot_fused(&a, &b).to_bits()
        );
    }

    #[test]
    fn test_unrolled_matches_plain_on_exact_data((a, b) in integer_pair_strategy()) {
        prop_assert_eq!(dot_fused_unrolled4(&a, &b), dot_fused(&a, &b));
        prop_assert_eq!(dot_separate_unrolled4(&a, &b), dot_separate(&a, &b));
        prop_assert_eq!(dot_fused(&a, &b), dot_separate(&a, &b));
    }

    #[test]
    fn test_reduction_is_symmetric_in_its_operands((a, b) in finite_f32_pair_strategy()) {
        let forward = ReductionKernel::new(a.clone(), b.clone()).unwrap();
        let swapped = ReductionKernel::new(b, a).unwrap();
        for strategy in ReductionStrategy::ALL {
            prop_assert_eq!(
                forward.run(strategy).to_bits(),
                swapped.run(strategy).to_bits(),
                "strategy={}",
                strategy
            );
        }
    }
}

#[test]
fn test_empty_vectors_reduce_to_zero_for_every_strategy() {
    let kernel = ReductionKernel::<f32>::new(Vec::new(), Vec::new()).unwrap();
    for strategy in ReductionStrategy::ALL {
        assert_eq!(kernel.run(strategy).to_bits(), 0.0_f32.to_bits());
    }
}
