//! One-shot agreement check across every reduction strategy.

use fmabench_core::reduction::{dot_error_bound, ReductionKernel, ReductionStrategy};
use fmabench_core::suite::reduction_case_name;
use serde::Serialize;

/// Scalar produced by one strategy.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyValue {
    pub strategy: ReductionStrategy,
    pub case: &'static str,
    pub value: f64,
}

/// All strategy results plus their worst pairwise disagreement.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub length: usize,
    pub values: Vec<StrategyValue>,
    pub max_difference: f64,
    pub bound: f64,
}

impl CheckReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.max_difference <= self.bound
    }
}

/// Runs every strategy once on seeded vectors of `length`.
#[must_use]
pub fn run(length: usize) -> CheckReport {
    let kernel = ReductionKernel::<f64>::seeded(length);
    let values: Vec<StrategyValue> = ReductionStrategy::ALL
        .into_iter()
        .map(|strategy| StrategyValue {
            strategy,
            case: reduction_case_name(strategy),
            value: kernel.run(strategy),
        })
        .collect();

    let mut max_difference = 0.0_f64;
    for (i, x) in values.iter().enumerate() {
        for y in &values[i + 1..] {
            max_difference = max_difference.max((x.value - y.value).abs());
        }
    }

    CheckReport {
        length,
        values,
        max_difference,
        bound: dot_error_bound(kernel.a(), kernel.b()),
    }
}
