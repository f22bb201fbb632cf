//! Dot-product reductions under each evaluation strategy.
//!
//! Every kernel computes `f = Σ a[i] * b[i]` starting from `f = 0`. They differ
//! in rounding (fused vs separate), in call dispatch (inlined, function value,
//! virtual call) and in loop shape (sequential vs four lane accumulators).

#![allow(clippy::inline_always)] // Reason: the unrolled body must be inlined per primitive.

use super::ops::MulAddOp;
use crate::fma::{Float, MulAddFn};

/// Unroll factor of the `*_unrolled4` kernels.
pub const UNROLL: usize = 4;

/// Fused reduction `f = fma(a[i], b[i], f)` using the std intrinsic.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
#[must_use]
pub fn dot_fused<T: Float>(a: &[T], b: &[T]) -> T {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    let mut f = T::ZERO;
    for (&x, &y) in a.iter().zip(b) {
        f = x.fused_mul_add(y, f);
    }
    f
}

/// Two-rounding baseline `f = a[i] * b[i] + f`.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
#[must_use]
pub fn dot_separate<T: Float>(a: &[T], b: &[T]) -> T {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    let mut f = T::ZERO;
    for (&x, &y) in a.iter().zip(b) {
        f = x * y + f;
    }
    f
}

/// Reduction calling through a stored function value.
///
/// Pass the pointer through `std::hint::black_box` at the call site to keep
/// the compiler from devirtualizing it.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
#[must_use]
pub fn dot_with<T: Float>(a: &[T], b: &[T], op: MulAddFn<T>) -> T {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    let mut f = T::ZERO;
    for (&x, &y) in a.iter().zip(b) {
        f = op(x, y, f);
    }
    f
}

/// Reduction calling through a late-bound trait object.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
#[must_use]
pub fn dot_dyn<T: Float>(a: &[T], b: &[T], op: &dyn MulAddOp<T>) -> T {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    let mut f = T::ZERO;
    for (&x, &y) in a.iter().zip(b) {
        f = op.mul_add(x, y, f);
    }
    f
}

#[inline(always)]
fn unrolled4<T: Float>(a: &[T], b: &[T], step: impl Fn(T, T, T) -> T) -> T {
    let (mut f0, mut f1, mut f2, mut f3) = (T::ZERO, T::ZERO, T::ZERO, T::ZERO);

    let chunks_a = a.chunks_exact(UNROLL);
    let chunks_b = b.chunks_exact(UNROLL);
    let (tail_a, tail_b) = (chunks_a.remainder(), chunks_b.remainder());

    for (x, y) in chunks_a.zip(chunks_b) {
        f0 = step(x[0], y[0], f0);
        f1 = step(x[1], y[1], f1);
        f2 = step(x[2], y[2], f2);
        f3 = step(x[3], y[3], f3);
    }

    // Tail element i keeps lane i % 4.
    if let Some((&x, &y)) = tail_a.first().zip(tail_b.first()) {
        f0 = step(x, y, f0);
    }
    if let Some((&x, &y)) = tail_a.get(1).zip(tail_b.get(1)) {
        f1 = step(x, y, f1);
    }
    if let Some((&x, &y)) = tail_a.get(2).zip(tail_b.get(2)) {
        f2 = step(x, y, f2);
    }

    f0 + f1 + f2 + f3
}

/// Fused reduction into four lane accumulators, summed as `f0 + f1 + f2 + f3`.
///
/// Element `i` always lands in lane `i % 4`; a length that is not a multiple
/// of four simply leaves the higher lanes one step short.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
#[must_use]
pub fn dot_fused_unrolled4<T: Float>(a: &[T], b: &[T]) -> T {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    unrolled4(a, b, |x, y, f| x.fused_mul_add(y, f))
}

/// Separate multiply-add into four lane accumulators.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
#[must_use]
pub fn dot_separate_unrolled4<T: Float>(a: &[T], b: &[T]) -> T {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    unrolled4(a, b, |x, y, f| x * y + f)
}

/// Upper bound on the difference between any two strategies on `(a, b)`.
///
/// Any summation order with one or two roundings per step stays within
/// `γ_n · Σ|a_i b_i|` of the exact dot product (`γ_n = n·u / (1 - n·u)`,
/// `u = ε / 2`), so two results differ by at most twice that. Returns
/// `f64::INFINITY` once `n·u >= 1`. Assumes no underflow to subnormals.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[must_use]
pub fn dot_error_bound<T: Float>(a: &[T], b: &[T]) -> f64 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    #[allow(clippy::cast_precision_loss)] // Reason: lengths are far below 2^52.
    let nu = a.len() as f64 * T::EPSILON.to_f64() / 2.0;
    if nu >= 1.0 {
        return f64::INFINITY;
    }

    let magnitude: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| (x.to_f64() * y.to_f64()).abs())
        .sum();

    2.0 * nu / (1.0 - nu) * magnitude
}
