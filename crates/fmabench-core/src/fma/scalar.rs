//! Scalar multiply-add primitives shared by every kernel.
//!
//! The two primitives differ only in rounding:
//! - [`fused`] rounds `x * y + z` once (IEEE-754 `fusedMultiplyAdd`)
//! - [`separate`] rounds the product, then rounds the sum
//!
//! Rust never contracts `x * y + z` into an FMA on its own, so [`separate`]
//! is a genuine two-rounding baseline on every target.

#![allow(clippy::inline_always)] // Reason: primitives must vanish into the kernel loops.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul};

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Floating-point element type accepted by the kernels (`f32` or `f64`).
pub trait Float:
    Copy
    + Debug
    + Default
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + Send
    + Sync
    + 'static
    + sealed::Sealed
{
    /// Additive identity.
    const ZERO: Self;
    /// Machine epsilon (distance from 1.0 to the next representable value).
    const EPSILON: Self;
    /// Short type name used in logs and benchmark ids.
    const NAME: &'static str;

    /// Computes `self * b + c` with a single rounding.
    ///
    /// Backed by the std `mul_add`, which is correctly rounded on every
    /// target: a hardware FMA instruction when the `fma` target feature is
    /// enabled, otherwise the platform libm `fma`.
    fn fused_mul_add(self, b: Self, c: Self) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// Widens to `f64` (lossless for both implementors).
    fn to_f64(self) -> f64;

    /// Narrows from `f64` with round-to-nearest.
    fn from_f64(value: f64) -> Self;
}

impl Float for f32 {
    const ZERO: Self = 0.0;
    const EPSILON: Self = f32::EPSILON;
    const NAME: &'static str = "f32";

    #[inline(always)]
    fn fused_mul_add(self, b: Self, c: Self) -> Self {
        self.mul_add(b, c)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)] // Reason: narrowing is the documented contract.
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Float for f64 {
    const ZERO: Self = 0.0;
    const EPSILON: Self = f64::EPSILON;
    const NAME: &'static str = "f64";

    #[inline(always)]
    fn fused_mul_add(self, b: Self, c: Self) -> Self {
        self.mul_add(b, c)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Signature shared by the multiply-add primitives: `(x, y, z) -> x * y + z`.
pub type MulAddFn<T> = fn(T, T, T) -> T;

/// Fused multiply-add: `x * y + z` with one rounding.
#[inline(always)]
#[must_use]
pub fn fused<T: Float>(x: T, y: T, z: T) -> T {
    x.fused_mul_add(y, z)
}

/// Separate multiply then add: `round(round(x * y) + z)`.
#[inline(always)]
#[must_use]
pub fn separate<T: Float>(x: T, y: T, z: T) -> T {
    x * y + z
}
