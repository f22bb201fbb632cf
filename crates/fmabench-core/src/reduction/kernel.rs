//! Benchmark state for the vector reduction: two fixed vectors plus the
//! call-through targets used by the indirect strategies.

use std::fmt;
use std::hint::black_box;

use super::kernels::{
    dot_dyn, dot_fused, dot_fused_unrolled4, dot_separate, dot_separate_unrolled4, dot_with,
};
use super::ops::{lookup_op, MulAddOp};
use super::strategy::ReductionStrategy;
use crate::error::{Error, Result};
use crate::fma::{dot_fused_native, fused, Float, MulAddFn};

/// Owns the two reduction inputs, allocated once and reused by every call.
pub struct ReductionKernel<T: Float> {
    a: Vec<T>,
    b: Vec<T>,
    closure: MulAddFn<T>,
    dynamic: &'static dyn MulAddOp<T>,
}

impl<T: Float> fmt::Debug for ReductionKernel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReductionKernel")
            .field("len", &self.a.len())
            .field("element", &T::NAME)
            .field("dynamic", &self.dynamic.name())
            .finish_non_exhaustive()
    }
}

impl<T: Float> ReductionKernel<T> {
    /// Creates a kernel over two equal-length vectors.
    ///
    /// The closure defaults to [`fused`] and the dynamic operation to the
    /// registry entry `"fma"`.
    pub fn new(a: Vec<T>, b: Vec<T>) -> Result<Self> {
        if a.len() != b.len() {
            return Err(Error::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        Ok(Self {
            a,
            b,
            closure: fused::<T>,
            dynamic: lookup_op("fma")?,
        })
    }

    /// Creates a kernel filled with a deterministic counter pattern.
    ///
    /// With a running counter `r` starting at zero, `a[i] = floor(r++ / 10)`
    /// and `b[i] = r++ % 11`. All values are small integers, so at the
    /// default sizes every strategy is exact in `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Reason: r < 2^53 for any allocatable length.
    pub fn seeded(len: usize) -> Self {
        let mut a = Vec::with_capacity(len);
        let mut b = Vec::with_capacity(len);
        let mut r = 0_usize;
        for _ in 0..len {
            a.push(T::from_f64((r / 10) as f64));
            r += 1;
            b.push(T::from_f64((r % 11) as f64));
            r += 1;
        }
        Self {
            a,
            b,
            closure: fused::<T>,
            dynamic: &super::ops::FusedOp,
        }
    }

    /// Replaces the function value used by [`ReductionStrategy::Closure`].
    #[must_use]
    pub fn with_closure(mut self, op: MulAddFn<T>) -> Self {
        self.closure = op;
        self
    }

    /// Replaces the operation used by [`ReductionStrategy::DynamicLookup`].
    pub fn with_dynamic(mut self, name: &str) -> Result<Self> {
        self.dynamic = lookup_op(name)?;
        Ok(self)
    }

    /// Vector length N.
    #[must_use]
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// Whether N is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Left operand.
    #[must_use]
    pub fn a(&self) -> &[T] {
        &self.a
    }

    /// Right operand.
    #[must_use]
    pub fn b(&self) -> &[T] {
        &self.b
    }

    /// Evaluates the reduction with `strategy`.
    ///
    /// Returns the scalar so callers can keep the computation observable.
    #[must_use]
    pub fn run(&self, strategy: ReductionStrategy) -> T {
        let (a, b) = (self.a.as_slice(), self.b.as_slice());
        match strategy {
            ReductionStrategy::Fused => dot_fused(a, b),
            ReductionStrategy::FusedNative => dot_fused_native(a, b),
            ReductionStrategy::Separate => dot_separate(a, b),
            ReductionStrategy::Closure => dot_with(a, b, black_box(self.closure)),
            ReductionStrategy::DynamicLookup => dot_dyn(a, b, black_box(self.dynamic)),
            ReductionStrategy::FusedUnrolled4 => dot_fused_unrolled4(a, b),
            ReductionStrategy::SeparateUnrolled4 => dot_separate_unrolled4(a, b),
        }
    }
}
