#![allow(clippy::float_cmp)]
//! Tests for `ReductionKernel` state and strategy selection.

use std::str::FromStr;

use super::kernel::ReductionKernel;
use super::kernels::dot_separate;
use super::strategy::ReductionStrategy;
use crate::error::Error;
use crate::fma::separate;

#[test]
fn test_new_rejects_unequal_lengths() {
    let err = ReductionKernel::<f64>::new(vec![1.0; 4], vec![1.0; 3]).unwrap_err();
    assert_eq!(
        err,
        Error::DimensionMismatch {
            expected: 4,
            actual: 3
        }
    );
}

#[test]
fn test_seeded_pattern_follows_counter() {
    let kernel = ReductionKernel::<f64>::seeded(8);
    assert_eq!(kernel.a(), &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    assert_eq!(kernel.b(), &[1.0, 3.0, 5.0, 7.0, 9.0, 0.0, 2.0, 4.0]);
}

#[test]
fn test_seeded_data_is_exact_so_all_strategies_agree_bitwise() {
    let kernel = ReductionKernel::<f64>::seeded(1 << 14);
    let expected = kernel.run(ReductionStrategy::Fused);
    for strategy in ReductionStrategy::ALL {
        assert_eq!(
            kernel.run(strategy).to_bits(),
            expected.to_bits(),
            "strategy={strategy}"
        );
    }
}

#[test]
fn test_empty_kernel_returns_zero_for_every_strategy() {
    let kernel = ReductionKernel::<f32>::new(Vec::new(), Vec::new()).unwrap();
    assert!(kernel.is_empty());
    for strategy in ReductionStrategy::ALL {
        assert_eq!(kernel.run(strategy), 0.0, "strategy={strategy}");
    }
}

#[test]
fn test_with_closure_routes_closure_strategy() {
    let x = 1.0_f64 + 2.0_f64.powi(-30);
    let a = vec![-1.0, x];
    let b = vec![1.0 + 2.0_f64.powi(-29), x];
    let kernel = ReductionKernel::new(a.clone(), b.clone()).unwrap();

    assert_eq!(kernel.run(ReductionStrategy::Closure), 2.0_f64.powi(-60));

    let kernel = kernel.with_closure(separate);
    assert_eq!(kernel.run(ReductionStrategy::Closure), dot_separate(&a, &b));
}

#[test]
fn test_with_dynamic_resolves_by_name() {
    let kernel = ReductionKernel::<f64>::seeded(16);
    let kernel = kernel.with_dynamic("mul_then_add").unwrap();
    assert!(format!("{kernel:?}").contains("mul_then_add"));

    let err = ReductionKernel::<f64>::seeded(16)
        .with_dynamic("invoke_exact")
        .unwrap_err();
    assert_eq!(err, Error::UnknownOperation("invoke_exact".to_string()));
}

#[test]
fn test_strategy_names_roundtrip_through_from_str() {
    for strategy in ReductionStrategy::ALL {
        assert_eq!(ReductionStrategy::from_str(strategy.name()).unwrap(), strategy);
    }
    assert_eq!(
        "FUSED_NATIVE".parse::<ReductionStrategy>().unwrap(),
        ReductionStrategy::FusedNative
    );
    assert!(matches!(
        "fused8".parse::<ReductionStrategy>(),
        Err(Error::UnknownStrategy(_))
    ));
}

#[test]
fn test_strategy_fusion_flag() {
    assert!(ReductionStrategy::Closure.is_fused());
    assert!(ReductionStrategy::DynamicLookup.is_fused());
    assert!(!ReductionStrategy::Separate.is_fused());
    assert!(!ReductionStrategy::SeparateUnrolled4.is_fused());
}
