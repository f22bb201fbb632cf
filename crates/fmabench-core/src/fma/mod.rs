//! Multiply-add primitives and FMA dispatch.
//!
//! # Module Structure
//!
//! - `scalar`: `Float` element trait, `fused`/`separate` primitives
//! - `x86_fma`: loop bodies compiled with the `fma` target feature (x86_64 only)
//! - `dispatch`: runtime FMA detection and dispatch wiring
//!
//! # Portable vs hardware
//!
//! `f64::mul_add` is correctly rounded everywhere. When the crate is built
//! for the baseline x86_64 target it compiles to a libm `fma` call, which is
//! the analogue of running a JVM with its FMA intrinsic disabled. The
//! `*_native` functions select a body compiled with `fma` enabled at runtime,
//! which is the analogue of the intrinsic being on.

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for unsafe blocks in this module tree.
// - Condition 1: Target-featured functions are called only after runtime feature
//   checks cached in `fma_support()`.
// - Condition 2: Bodies only use safe slice iteration; no raw pointer math.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
mod x86_fma;

mod dispatch;

pub use dispatch::{accumulate_fused_native, dot_fused_native, fma_support, FmaPath, FmaSupport};
pub use scalar::{fused, separate, Float, MulAddFn};

// =============================================================================
// Tests (separate files per project rules)
// =============================================================================
