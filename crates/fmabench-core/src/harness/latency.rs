//! Latency percentile statistics.
//!
//! Computes min, max, mean and p50/p95/p99 from duration samples. The
//! harness feeds it one per-call latency per measurement batch.

use std::time::Duration;

use serde::Serialize;

/// Statistics for latency measurements including percentiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencyStats {
    /// Minimum latency observed
    pub min: Duration,
    /// Maximum latency observed
    pub max: Duration,
    /// Mean (average) latency
    pub mean: Duration,
    /// 50th percentile (median)
    pub p50: Duration,
    /// 95th percentile
    pub p95: Duration,
    /// 99th percentile
    pub p99: Duration,
}

/// Computes latency percentiles from a list of duration samples.
///
/// Returns all-zero statistics for an empty slice.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use fmabench_core::harness::compute_latency_percentiles;
///
/// let samples: Vec<Duration> = (1..=100)
///     .map(|i| Duration::from_nanos(i * 10))
///     .collect();
///
/// let stats = compute_latency_percentiles(&samples);
/// assert_eq!(stats.min, Duration::from_nanos(10));
/// assert!(stats.p99 > stats.p50);
/// ```
#[must_use]
pub fn compute_latency_percentiles(samples: &[Duration]) -> LatencyStats {
    if samples.is_empty() {
        return LatencyStats::default();
    }

    let mut sorted: Vec<Duration> = samples.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let sum: Duration = sorted.iter().sum();

    // The mean cannot exceed the largest sample, which fits in u64 nanoseconds.
    #[allow(clippy::cast_possible_truncation)]
    let mean = Duration::from_nanos((sum.as_nanos() / n as u128) as u64);

    LatencyStats {
        min: sorted[0],
        max: sorted[n - 1],
        mean,
        p50: percentile(&sorted, 50),
        p95: percentile(&sorted, 95),
        p99: percentile(&sorted, 99),
    }
}

/// Nearest-rank percentile of a non-empty sorted slice.
fn percentile(sorted: &[Duration], p: usize) -> Duration {
    let n = sorted.len();
    // p in [0, 100] keeps the rounded index in [0, n - 1].
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let idx = ((p as f64 / 100.0) * (n - 1) as f64).round() as usize;
    sorted[idx.min(n - 1)]
}
