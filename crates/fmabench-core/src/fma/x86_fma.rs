//! FMA-enabled kernel bodies for x86_64.
//!
//! These are the same loops as the portable kernels, compiled with
//! `#[target_feature(enable = "fma")]` so that `mul_add` lowers to a single
//! `vfmadd` instruction instead of a libm call. Results are bit-identical to
//! the portable path because both are correctly rounded.
//!
//! All functions require runtime FMA detection before calling.

use super::scalar::Float;

/// Sequential fused reduction `f = fma(a[i], b[i], f)`.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports FMA (enforced by `#[target_feature]` and runtime detection)
/// - `a.len() == b.len()` (enforced by public API assert)
#[target_feature(enable = "fma")]
#[inline]
pub(crate) unsafe fn dot_fused_fma<T: Float>(a: &[T], b: &[T]) -> T {
    let mut f = T::ZERO;
    for (&x, &y) in a.iter().zip(b) {
        f = x.fused_mul_add(y, f);
    }
    f
}

/// Fused gradient accumulation `acc[i] = fma(gain, row[i], acc[i])`.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports FMA (enforced by `#[target_feature]` and runtime detection)
/// - `acc.len() == row.len()` (enforced by public API assert)
#[target_feature(enable = "fma")]
#[inline]
pub(crate) unsafe fn accumulate_fused_fma<T: Float>(acc: &mut [T], row: &[T], gain: T) {
    for (e, &o) in acc.iter_mut().zip(row) {
        *e = gain.fused_mul_add(o, *e);
    }
}
