//! Runtime FMA detection and dispatch wiring.
//!
//! This module provides:
//! - `FmaSupport` describing compile-time and runtime FMA availability
//! - `fma_support()` for cached runtime detection
//! - Dispatch functions that route fused loops to the FMA-enabled bodies

use serde::Serialize;

use super::scalar::Float;

// =============================================================================
// Cached FMA Detection
// =============================================================================

/// Path taken by the `*_native` dispatch functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FmaPath {
    /// Loop compiled with the `fma` target feature (single `vfmadd`/`fmadd`).
    Hardware,
    /// Baseline-target `mul_add`, which may lower to a libm call.
    Portable,
}

impl FmaPath {
    /// Lowercase name used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hardware => "hardware",
            Self::Portable => "portable",
        }
    }
}

/// FMA capability of the current build and CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FmaSupport {
    /// The `fma` target feature is enabled for the whole crate (or implied by the ISA).
    pub compile_time: bool,
    /// The CPU running this process executes FMA instructions.
    pub runtime: bool,
}

impl FmaSupport {
    /// Returns the path the native dispatch functions take.
    #[must_use]
    pub fn path(&self) -> FmaPath {
        if self.runtime {
            FmaPath::Hardware
        } else {
            FmaPath::Portable
        }
    }
}

/// Cached FMA support - detected once at first use.
static FMA_SUPPORT: std::sync::OnceLock<FmaSupport> = std::sync::OnceLock::new();

fn detect_fma_support() -> FmaSupport {
    // aarch64 has fused multiply-add in the base ISA.
    let compile_time = cfg!(any(target_feature = "fma", target_arch = "aarch64"));

    #[cfg(target_arch = "x86_64")]
    let runtime = is_x86_feature_detected!("fma");
    #[cfg(not(target_arch = "x86_64"))]
    let runtime = compile_time;

    FmaSupport {
        compile_time,
        runtime,
    }
}

/// Returns the cached FMA support of this process.
#[inline]
#[must_use]
pub fn fma_support() -> FmaSupport {
    *FMA_SUPPORT.get_or_init(|| {
        let support = detect_fma_support();
        tracing::debug!(
            compile_time = support.compile_time,
            runtime = support.runtime,
            path = support.path().as_str(),
            "Detected FMA support"
        );
        support
    })
}

// =============================================================================
// Public API with cached dispatch
// =============================================================================

/// Sequential fused reduction routed to the hardware FMA body when available.
///
/// Always bit-identical to `reduction::dot_fused`: both paths round once per
/// step, only the instruction selection differs.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
#[must_use]
pub fn dot_fused_native<T: Float>(a: &[T], b: &[T]) -> T {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    match fma_support().path() {
        // SAFETY: `path()` is `Hardware` only after `is_x86_feature_detected!("fma")`.
        #[cfg(target_arch = "x86_64")]
        FmaPath::Hardware => unsafe { super::x86_fma::dot_fused_fma(a, b) },
        _ => {
            let mut f = T::ZERO;
            for (&x, &y) in a.iter().zip(b) {
                f = x.fused_mul_add(y, f);
            }
            f
        }
    }
}

/// Fused gradient accumulation routed to the hardware FMA body when available.
///
/// # Panics
///
/// Panics if `acc.len() != row.len()`.
#[inline]
pub fn accumulate_fused_native<T: Float>(acc: &mut [T], row: &[T], gain: T) {
    assert_eq!(acc.len(), row.len(), "Vector dimensions must match");
    match fma_support().path() {
        // SAFETY: `path()` is `Hardware` only after `is_x86_feature_detected!("fma")`.
        #[cfg(target_arch = "x86_64")]
        FmaPath::Hardware => unsafe { super::x86_fma::accumulate_fused_fma(acc, row, gain) },
        _ => {
            for (e, &o) in acc.iter_mut().zip(row) {
                *e = gain.fused_mul_add(o, *e);
            }
        }
    }
}
