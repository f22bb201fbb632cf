#![allow(clippy::float_cmp, clippy::cast_precision_loss)]
//! Tests for the free reduction kernels.

use super::kernels::{
    dot_dyn, dot_error_bound, dot_fused, dot_fused_unrolled4, dot_separate,
    dot_separate_unrolled4, dot_with,
};
use super::ops::{lookup_op, FusedOp, SeparateOp};
use crate::fma::{fused, separate};

fn generate_vector(dim: usize, seed: f64) -> Vec<f64> {
    (0..dim).map(|i| (seed + i as f64 * 0.1).sin()).collect()
}

// ---------------------------------------------------------------------------
// Empty input is the additive identity
// ---------------------------------------------------------------------------

#[test]
fn test_empty_vectors_reduce_to_zero() {
    let empty: [f64; 0] = [];
    assert_eq!(dot_fused(&empty, &empty), 0.0);
    assert_eq!(dot_separate(&empty, &empty), 0.0);
    assert_eq!(dot_with(&empty, &empty, fused), 0.0);
    assert_eq!(dot_dyn(&empty, &empty, &FusedOp), 0.0);
    assert_eq!(dot_fused_unrolled4(&empty, &empty), 0.0);
    assert_eq!(dot_separate_unrolled4(&empty, &empty), 0.0);
}

// ---------------------------------------------------------------------------
// Exact inputs give exact results on every path
// ---------------------------------------------------------------------------

#[test]
fn test_small_exact_example_all_paths() {
    let a = [1.0_f64, 0.0, 2.0];
    let b = [2.0_f64, 1.0, 0.0];
    assert_eq!(dot_fused(&a, &b), 2.0);
    assert_eq!(dot_separate(&a, &b), 2.0);
    assert_eq!(dot_with(&a, &b, separate), 2.0);
    assert_eq!(dot_dyn(&a, &b, &SeparateOp), 2.0);
    assert_eq!(dot_fused_unrolled4(&a, &b), 2.0);
    assert_eq!(dot_separate_unrolled4(&a, &b), 2.0);
}

#[test]
fn test_fused_differs_from_separate_when_rounding_matters() {
    // Second step: fma(x, x, -(1 + 2^-29)) keeps 2^-60, the separate path loses it.
    let x = 1.0_f64 + 2.0_f64.powi(-30);
    let a = [-1.0, x];
    let b = [1.0 + 2.0_f64.powi(-29), x];

    assert_eq!(dot_fused(&a, &b), 2.0_f64.powi(-60));
    assert_eq!(dot_separate(&a, &b), 0.0);
}

// ---------------------------------------------------------------------------
// Indirect call paths match their inlined counterparts bit for bit
// ---------------------------------------------------------------------------

#[test]
fn test_function_value_matches_inlined_kernels() {
    let a = generate_vector(777, 0.0);
    let b = generate_vector(777, 2.0);
    assert_eq!(dot_with(&a, &b, fused).to_bits(), dot_fused(&a, &b).to_bits());
    assert_eq!(dot_with(&a, &b, separate).to_bits(), dot_separate(&a, &b).to_bits());
}

#[test]
fn test_dynamic_lookup_matches_inlined_kernels() {
    let a = generate_vector(513, 0.5);
    let b = generate_vector(513, 1.5);
    let fma = lookup_op::<f64>("fma").unwrap();
    let plain = lookup_op::<f64>("mul_then_add").unwrap();
    assert_eq!(dot_dyn(&a, &b, fma).to_bits(), dot_fused(&a, &b).to_bits());
    assert_eq!(dot_dyn(&a, &b, plain).to_bits(), dot_separate(&a, &b).to_bits());
}

// ---------------------------------------------------------------------------
// Unrolled kernels: lane assignment and tail handling
// ---------------------------------------------------------------------------

fn reference_lanes(a: &[f64], b: &[f64], step: fn(f64, f64, f64) -> f64) -> f64 {
    let mut lanes = [0.0_f64; 4];
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        lanes[i % 4] = step(*x, *y, lanes[i % 4]);
    }
    lanes[0] + lanes[1] + lanes[2] + lanes[3]
}

#[test]
fn test_unrolled_kernels_follow_lane_reference_for_every_tail() {
    for dim in [1, 2, 3, 4, 5, 6, 7, 8, 255, 256, 257, 1023] {
        let a = generate_vector(dim, 0.0);
        let b = generate_vector(dim, 1.0);
        assert_eq!(
            dot_fused_unrolled4(&a, &b).to_bits(),
            reference_lanes(&a, &b, fused).to_bits(),
            "fused dim={dim}"
        );
        assert_eq!(
            dot_separate_unrolled4(&a, &b).to_bits(),
            reference_lanes(&a, &b, separate).to_bits(),
            "separate dim={dim}"
        );
    }
}

#[test]
fn test_unrolled_matches_sequential_on_integer_data() {
    // All partial sums are exact integers, so reassociation cannot change bits.
    let a: Vec<f64> = (0..256).map(|i| f64::from(i % 17)).collect();
    let b: Vec<f64> = (0..256).map(|i| f64::from(i % 5)).collect();
    assert_eq!(dot_fused_unrolled4(&a, &b), dot_fused(&a, &b));
    assert_eq!(dot_separate_unrolled4(&a, &b), dot_separate(&a, &b));
}

// ---------------------------------------------------------------------------
// Error bound
// ---------------------------------------------------------------------------

#[test]
fn test_strategies_agree_within_error_bound_f32() {
    let a: Vec<f32> = (0..4096).map(|i| (i as f32 * 0.013).sin() * 50.0).collect();
    let b: Vec<f32> = (0..4096).map(|i| (i as f32 * 0.029).cos() * 50.0).collect();
    let bound = dot_error_bound(&a, &b);

    let results = [
        dot_fused(&a, &b),
        dot_separate(&a, &b),
        dot_fused_unrolled4(&a, &b),
        dot_separate_unrolled4(&a, &b),
    ];
    for x in results {
        for y in results {
            let diff = (f64::from(x) - f64::from(y)).abs();
            assert!(diff <= bound, "diff={diff} bound={bound}");
        }
    }
}

#[test]
fn test_error_bound_is_zero_for_empty_and_infinite_for_huge_n() {
    let empty: [f32; 0] = [];
    assert_eq!(dot_error_bound(&empty, &empty), 0.0);

    // n * u >= 1 for f32 once n >= 2^24.
    let n = 1 << 24;
    let zeros = vec![0.0_f32; n];
    assert_eq!(dot_error_bound(&zeros, &zeros), f64::INFINITY);
}

#[test]
fn test_nan_propagates_through_every_kernel() {
    let a = [1.0_f64, f64::NAN, 3.0, 4.0, 5.0];
    let b = [1.0_f64; 5];
    assert!(dot_fused(&a, &b).is_nan());
    assert!(dot_separate(&a, &b).is_nan());
    assert!(dot_fused_unrolled4(&a, &b).is_nan());
    assert!(dot_separate_unrolled4(&a, &b).is_nan());
}

#[test]
#[should_panic(expected = "Vector dimensions must match")]
fn test_mismatched_lengths_panic() {
    let _ = dot_fused_unrolled4(&[1.0_f32, 2.0, 3.0], &[1.0, 2.0]);
}
