//! Row-level update kernels.

use serde::{Deserialize, Serialize};

use crate::fma::accumulate_fused_native;

/// Rounding used by gradient accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// `acc[i] = fma(gain, row[i], acc[i])`
    Fused,
    /// `acc[i] += gain * row[i]`
    Separate,
}

/// `acc[i] = fma(gain, row[i], acc[i])` for every i.
///
/// # Panics
///
/// Panics if `acc.len() != row.len()`.
#[inline]
pub fn accumulate_fused(acc: &mut [f32], row: &[f32], gain: f32) {
    assert_eq!(acc.len(), row.len(), "Vector dimensions must match");
    for (e, &o) in acc.iter_mut().zip(row) {
        *e = gain.mul_add(o, *e);
    }
}

/// `acc[i] += gain * row[i]` for every i, two roundings per element.
///
/// # Panics
///
/// Panics if `acc.len() != row.len()`.
#[inline]
pub fn accumulate_separate(acc: &mut [f32], row: &[f32], gain: f32) {
    assert_eq!(acc.len(), row.len(), "Vector dimensions must match");
    for (e, &o) in acc.iter_mut().zip(row) {
        *e += gain * o;
    }
}

/// Dispatches on `mode`; the fused case takes the hardware FMA body when present.
#[inline]
pub fn accumulate(acc: &mut [f32], row: &[f32], gain: f32, mode: UpdateMode) {
    match mode {
        UpdateMode::Fused => accumulate_fused_native(acc, row, gain),
        UpdateMode::Separate => accumulate_separate(acc, row, gain),
    }
}

/// `row[i] += delta[i]` for every i.
///
/// # Panics
///
/// Panics if `row.len() != delta.len()`.
#[inline]
pub fn add_assign(row: &mut [f32], delta: &[f32]) {
    assert_eq!(row.len(), delta.len(), "Vector dimensions must match");
    for (w, &d) in row.iter_mut().zip(delta) {
        *w += d;
    }
}
