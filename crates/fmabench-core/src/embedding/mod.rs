//! Embedding-update kernel resembling one step of word-vector training.
//!
//! State is an input table, an output table and a gradient accumulator, all
//! of row dimension D. Three independent operations run against it:
//!
//! 1. inner product of `input[id1]` and `output[id2]`
//! 2. `accumulator += gain * output[id2]`
//! 3. `input[id1] += accumulator`
//!
//! Row ids come either from the caller or from an injected
//! [`RowSource`](crate::rows::RowSource).
//!
//! # Example
//!
//! ```
//! use fmabench_core::embedding::{
//!     EmbeddingKernel, EmbeddingTable, GradientAccumulator, InnerProduct,
//! };
//! use fmabench_core::rows::ScriptedRows;
//!
//! let input = EmbeddingTable::from_rows(vec![vec![1.0, 0.0, 2.0]]).unwrap();
//! let output = EmbeddingTable::from_rows(vec![vec![2.0, 1.0, 0.0]]).unwrap();
//! let kernel = EmbeddingKernel::new(
//!     input,
//!     output,
//!     GradientAccumulator::zeros(3),
//!     ScriptedRows::rows(vec![0]),
//! )
//! .unwrap();
//!
//! assert_eq!(kernel.compute_inner_product(0, 0, InnerProduct::Fused).unwrap(), 2.0);
//! ```

mod accumulator;
mod kernel;
mod table;
mod update;

pub use accumulator::GradientAccumulator;
pub use kernel::{EmbeddingKernel, InnerProduct};
pub use table::EmbeddingTable;
pub use update::{accumulate, accumulate_fused, accumulate_separate, add_assign, UpdateMode};
