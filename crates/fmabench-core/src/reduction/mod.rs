//! Vector fused multiply-add reduction.
//!
//! Computes `f = Σ a[i] * b[i]` over two equal-length vectors, starting from
//! zero, under several evaluation strategies that are compared for
//! throughput:
//!
//! | strategy | rounding | dispatch |
//! |---|---|---|
//! | `fused` | once per step | inlined std intrinsic |
//! | `fused_native` | once per step | runtime-selected FMA body |
//! | `separate` | twice per step | inlined |
//! | `closure` | once per step | stored `fn` pointer |
//! | `dynamic_lookup` | once per step | trait object found by name |
//! | `fused_unrolled4` | once per step | four lane accumulators |
//! | `separate_unrolled4` | twice per step | four lane accumulators |
//!
//! Fused and separate results are not bit-identical in general; both stay
//! within [`dot_error_bound`] of each other. NaN and infinity propagate per
//! IEEE-754 and are never special-cased.
//!
//! # Example
//!
//! ```
//! use fmabench_core::reduction::{ReductionKernel, ReductionStrategy};
//!
//! let kernel = ReductionKernel::<f64>::new(vec![1.0, 0.0, 2.0], vec![2.0, 1.0, 0.0]).unwrap();
//! for strategy in ReductionStrategy::ALL {
//!     assert_eq!(kernel.run(strategy), 2.0);
//! }
//! ```

mod kernel;
mod kernels;
mod ops;
mod strategy;

pub use kernel::ReductionKernel;
pub use kernels::{
    dot_dyn, dot_error_bound, dot_fused, dot_fused_unrolled4, dot_separate,
    dot_separate_unrolled4, dot_with, UNROLL,
};
pub use ops::{lookup_op, FusedOp, MulAddOp, SeparateOp, OPERATION_NAMES};
pub use strategy::ReductionStrategy;

#[cfg(test)]
mod kernels_tests;

#[cfg(test)]
mod kernel_tests;
