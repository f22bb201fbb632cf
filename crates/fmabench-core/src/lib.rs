//! # fmabench core
//!
//! Microbenchmark kernels comparing fused multiply-add (one rounding) with
//! separate multiply-then-add (two roundings).
//!
//! ## Kernels
//!
//! - **[`reduction`]**: `Σ a[i] * b[i]` under seven evaluation strategies
//!   (inlined, runtime-dispatched, stored `fn`, trait object by name, 4-way
//!   unrolled, each fused or separate).
//! - **[`embedding`]**: one word-vector training step split into an inner
//!   product, a gradient accumulation and an input-row update.
//!
//! Around them sit [`config`] (figment layering), [`harness`] (warm-up and
//! measurement loops with latency percentiles) and [`suite`], which maps
//! every benchmark case to a kernel call.
//!
//! ## Quick Start
//!
//! ```rust
//! use fmabench_core::reduction::{dot_error_bound, ReductionKernel, ReductionStrategy};
//!
//! let kernel = ReductionKernel::<f64>::seeded(1024);
//! let fused = kernel.run(ReductionStrategy::Fused);
//! let separate = kernel.run(ReductionStrategy::Separate);
//! assert!((fused - separate).abs() <= dot_error_bound(kernel.a(), kernel.b()));
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::float_cmp,
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::cast_lossless,
        clippy::cast_precision_loss,
        clippy::manual_assert
    )
)]

pub mod config;
pub mod embedding;
pub mod error;
pub mod fma;
pub mod harness;
pub mod reduction;
pub mod rows;
pub mod suite;

pub use config::{BenchConfig, EmbeddingConfig, ReductionConfig, Schedule};
pub use error::{Error, Result};
pub use harness::{Harness, IterationResult, LatencyStats, Measurement};
pub use suite::{run_embedding_suite, run_reduction_suite, EmbeddingCase, SuiteReport};
