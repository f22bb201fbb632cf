//! Benchmark suites: every named case bound to one kernel call.
//!
//! Reduction cases and what they measure:
//!
//! | case | strategy |
//! |---|---|
//! | `math_fma` | [`ReductionStrategy::Fused`] |
//! | `math_fma_native` | [`ReductionStrategy::FusedNative`] |
//! | `manual` | [`ReductionStrategy::Separate`] |
//! | `manual_via_closure` | [`ReductionStrategy::Closure`] bound to [`separate`] |
//! | `fma_via_dynamic_lookup` | [`ReductionStrategy::DynamicLookup`] |
//! | `unrolled4x_fma` | [`ReductionStrategy::FusedUnrolled4`] |
//! | `unrolled4x_manual` | [`ReductionStrategy::SeparateUnrolled4`] |
//!
//! Embedding cases are listed by [`EmbeddingCase`]. Each embedding call draws
//! fresh row ids from the kernel's generator.

use std::fmt;
use std::hint::black_box;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{EmbeddingConfig, ReductionConfig};
use crate::embedding::{EmbeddingKernel, InnerProduct, UpdateMode};
use crate::error::{Error, Result};
use crate::fma::separate;
use crate::harness::{Harness, Measurement};
use crate::reduction::{ReductionKernel, ReductionStrategy};
use crate::rows::RowSource;

/// Measurements of one suite plus the checksum of a single evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    /// `"reduction"` or `"embedding"`.
    pub suite: &'static str,
    /// Result of one fused evaluation on the suite's data.
    pub checksum: f64,
    /// One entry per requested case, in request order.
    pub measurements: Vec<Measurement>,
}

/// Benchmark case name of a reduction strategy.
#[must_use]
pub fn reduction_case_name(strategy: ReductionStrategy) -> &'static str {
    match strategy {
        ReductionStrategy::Fused => "math_fma",
        ReductionStrategy::FusedNative => "math_fma_native",
        ReductionStrategy::Separate => "manual",
        ReductionStrategy::Closure => "manual_via_closure",
        ReductionStrategy::DynamicLookup => "fma_via_dynamic_lookup",
        ReductionStrategy::FusedUnrolled4 => "unrolled4x_fma",
        ReductionStrategy::SeparateUnrolled4 => "unrolled4x_manual",
    }
}

/// The suite's closure case is the unfused `x * y + z`; the fused closure
/// is already covered by `math_fma`.
pub(crate) fn bind_suite_closure(kernel: ReductionKernel<f64>) -> ReductionKernel<f64> {
    kernel.with_closure(separate::<f64>)
}

/// Measures `strategies` over seeded `f64` vectors of `config.length`.
pub fn run_reduction_suite(
    config: &ReductionConfig,
    strategies: &[ReductionStrategy],
) -> Result<SuiteReport> {
    if config.length == 0 {
        return Err(Error::InvalidConfig(
            "reduction.length must be at least 1".to_string(),
        ));
    }
    let kernel = bind_suite_closure(ReductionKernel::<f64>::seeded(config.length));
    let checksum = kernel.run(ReductionStrategy::Fused);
    info!(length = config.length, checksum, "reduction suite ready");

    let harness = Harness::new(config.schedule);
    let measurements = strategies
        .iter()
        .map(|&strategy| {
            harness.measure(reduction_case_name(strategy), || kernel.run(strategy))
        })
        .collect();

    Ok(SuiteReport {
        suite: "reduction",
        checksum,
        measurements,
    })
}

/// One benchmarked embedding operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingCase {
    /// Inner product, sequential fused.
    FmaComputeF,
    /// Inner product, sequential separate.
    ManualComputeF,
    /// Inner product, four lanes fused.
    Unrolled4xFmaComputeF,
    /// Inner product, four lanes separate.
    Unrolled4xManualComputeF,
    /// Gradient accumulation, fused.
    FmaUpdateEh,
    /// Gradient accumulation, separate.
    ManualUpdateEh,
    /// Input-row update from the accumulator.
    UpdateInputVector,
}

impl EmbeddingCase {
    /// Every case, in report order.
    pub const ALL: [Self; 7] = [
        Self::FmaComputeF,
        Self::ManualComputeF,
        Self::Unrolled4xFmaComputeF,
        Self::Unrolled4xManualComputeF,
        Self::FmaUpdateEh,
        Self::ManualUpdateEh,
        Self::UpdateInputVector,
    ];

    /// Stable snake_case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FmaComputeF => "fma_compute_f",
            Self::ManualComputeF => "manual_compute_f",
            Self::Unrolled4xFmaComputeF => "unrolled4x_fma_compute_f",
            Self::Unrolled4xManualComputeF => "unrolled4x_manual_compute_f",
            Self::FmaUpdateEh => "fma_update_eh",
            Self::ManualUpdateEh => "manual_update_eh",
            Self::UpdateInputVector => "update_input_vector",
        }
    }

    /// Performs one sampled step of this case against `kernel`.
    pub fn run<S: RowSource>(self, kernel: &mut EmbeddingKernel<S>) -> Result<()> {
        match self {
            Self::FmaComputeF => Self::inner(kernel, InnerProduct::Fused),
            Self::ManualComputeF => Self::inner(kernel, InnerProduct::Separate),
            Self::Unrolled4xFmaComputeF => Self::inner(kernel, InnerProduct::FusedUnrolled4),
            Self::Unrolled4xManualComputeF => Self::inner(kernel, InnerProduct::SeparateUnrolled4),
            Self::FmaUpdateEh => kernel.sample_accumulate_gradient(UpdateMode::Fused),
            Self::ManualUpdateEh => kernel.sample_accumulate_gradient(UpdateMode::Separate),
            Self::UpdateInputVector => kernel.sample_apply_update(),
        }
    }

    fn inner<S: RowSource>(kernel: &mut EmbeddingKernel<S>, variant: InnerProduct) -> Result<()> {
        black_box(kernel.sample_inner_product(variant)?);
        Ok(())
    }
}

impl fmt::Display for EmbeddingCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts snake_case (`fma_update_eh`) or camelCase (`fmaUpdateEH`).
impl FromStr for EmbeddingCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = squash(s);
        Self::ALL
            .into_iter()
            .find(|case| squash(case.name()) == wanted)
            .ok_or_else(|| Error::UnknownStrategy(s.to_string()))
    }
}

fn squash(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Measures `cases` against one randomly initialised embedding kernel.
///
/// Cases share the kernel, so update cases leave their effect on the
/// tables for the cases after them.
pub fn run_embedding_suite(
    config: &EmbeddingConfig,
    cases: &[EmbeddingCase],
) -> Result<SuiteReport> {
    let mut kernel = EmbeddingKernel::random(config.rows, config.dimension, config.seed)?;
    let checksum = f64::from(kernel.sample_inner_product(InnerProduct::Fused)?);
    info!(
        rows = config.rows,
        dimension = config.dimension,
        seed = ?config.seed,
        checksum,
        "embedding suite ready"
    );

    let harness = Harness::new(config.schedule);
    let measurements = measure_embedding_cases(&harness, &mut kernel, cases)?;

    Ok(SuiteReport {
        suite: "embedding",
        checksum,
        measurements,
    })
}

/// Times each case in order, stopping at the first case call that fails.
pub(crate) fn measure_embedding_cases<S: RowSource>(
    harness: &Harness,
    kernel: &mut EmbeddingKernel<S>,
    cases: &[EmbeddingCase],
) -> Result<Vec<Measurement>> {
    cases
        .iter()
        .map(|&case| harness.try_measure(case.name(), || case.run(kernel)))
        .collect()
}
