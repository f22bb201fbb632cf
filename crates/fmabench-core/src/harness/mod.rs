//! Warm-up and measurement loops.
//!
//! A [`Harness`] runs a kernel closure for a fixed number of timed
//! iterations. Every call result goes through [`std::hint::black_box`] so
//! the optimizer cannot drop the arithmetic being measured.
//!
//! Calls run in doubling batches; each batch contributes one per-call
//! latency sample to the reported percentiles.

mod latency;

use std::convert::Infallible;
use std::hint::black_box;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::config::Schedule;

pub use latency::{compute_latency_percentiles, LatencyStats};

/// Batches stop doubling once a single batch takes this long.
const BATCH_TARGET: Duration = Duration::from_millis(1);
const MAX_BATCH: u64 = 1 << 16;

/// One timed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IterationResult {
    /// Kernel calls completed.
    pub operations: u64,
    /// Wall time spent on them.
    pub elapsed: Duration,
}

impl IterationResult {
    /// Calls per second; zero when no time was recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Reason: throughput is reported, not accumulated.
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.operations as f64 / secs
        } else {
            0.0
        }
    }

    /// Average wall time per call.
    #[must_use]
    pub fn per_call(&self) -> Duration {
        if self.operations == 0 {
            return Duration::ZERO;
        }
        let nanos = self.elapsed.as_nanos() / u128::from(self.operations);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Aggregated result of one benchmark case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Case name.
    pub name: String,
    /// Mean of the per-iteration throughputs, in calls per second.
    pub ops_per_sec: f64,
    /// Per-call latency statistics across measurement batches.
    pub latency: LatencyStats,
    /// Batches the latency statistics were computed from.
    pub latency_samples: usize,
    /// Raw measurement iterations (warm-up excluded).
    pub iterations: Vec<IterationResult>,
}

impl Measurement {
    fn from_iterations(
        name: &str,
        iterations: Vec<IterationResult>,
        batch_latencies: &[Duration],
    ) -> Self {
        #[allow(clippy::cast_precision_loss)] // Reason: iteration counts are tiny.
        let ops_per_sec = if iterations.is_empty() {
            0.0
        } else {
            iterations.iter().map(IterationResult::ops_per_sec).sum::<f64>()
                / iterations.len() as f64
        };
        Self {
            name: name.to_string(),
            ops_per_sec,
            latency: compute_latency_percentiles(batch_latencies),
            latency_samples: batch_latencies.len(),
            iterations,
        }
    }

    /// Total calls across measurement iterations.
    #[must_use]
    pub fn total_operations(&self) -> u64 {
        self.iterations.iter().map(|it| it.operations).sum()
    }
}

/// Time-budgeted benchmark runner.
#[derive(Debug, Clone, Copy)]
pub struct Harness {
    schedule: Schedule,
}

impl Harness {
    /// Creates a harness following `schedule`.
    #[must_use]
    pub fn new(schedule: Schedule) -> Self {
        Self { schedule }
    }

    /// Active schedule.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Runs `f` through the warm-up and then the measurement iterations.
    ///
    /// Each iteration calls `f` at least once and keeps calling until the
    /// iteration's time budget has elapsed.
    pub fn measure<R, F>(&self, name: &str, mut f: F) -> Measurement
    where
        F: FnMut() -> R,
    {
        let outcome = self.run_phases(name, || {
            black_box(f());
            Ok::<(), Infallible>(())
        });
        match outcome {
            Ok(measurement) => measurement,
            Err(never) => match never {},
        }
    }

    /// Like [`Harness::measure`] for fallible kernels.
    ///
    /// Stops at the first call that returns `Err` and hands that error
    /// back instead of a measurement.
    pub fn try_measure<R, E, F>(&self, name: &str, mut f: F) -> Result<Measurement, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        self.run_phases(name, || {
            f().map(|value| {
                black_box(value);
            })
        })
    }

    fn run_phases<E, F>(&self, name: &str, mut f: F) -> Result<Measurement, E>
    where
        F: FnMut() -> Result<(), E>,
    {
        let span = info_span!("benchmark", name);
        let _guard = span.enter();

        let warmup = self.schedule.warmup_time();
        let mut discarded = Vec::new();
        for index in 0..self.schedule.warmup_iterations {
            let it = run_iteration(&mut f, warmup, &mut discarded)?;
            discarded.clear();
            debug!(
                phase = "warmup",
                index,
                operations = it.operations,
                ops_per_sec = it.ops_per_sec(),
                "iteration done"
            );
        }

        let budget = self.schedule.measurement_time();
        let mut iterations = Vec::with_capacity(self.schedule.measurement_iterations);
        let mut batch_latencies = Vec::new();
        for index in 0..self.schedule.measurement_iterations {
            let it = run_iteration(&mut f, budget, &mut batch_latencies)?;
            debug!(
                phase = "measurement",
                index,
                operations = it.operations,
                ops_per_sec = it.ops_per_sec(),
                "iteration done"
            );
            iterations.push(it);
        }

        let measurement = Measurement::from_iterations(name, iterations, &batch_latencies);
        info!(
            ops_per_sec = measurement.ops_per_sec,
            p50_ns = u64::try_from(measurement.latency.p50.as_nanos()).unwrap_or(u64::MAX),
            p99_ns = u64::try_from(measurement.latency.p99.as_nanos()).unwrap_or(u64::MAX),
            batches = measurement.latency_samples,
            "benchmark complete"
        );
        Ok(measurement)
    }
}

/// Calls `f` in doubling batches until `budget` has elapsed, pushing each
/// batch's per-call latency onto `batch_latencies`.
fn run_iteration<E, F>(
    f: &mut F,
    budget: Duration,
    batch_latencies: &mut Vec<Duration>,
) -> Result<IterationResult, E>
where
    F: FnMut() -> Result<(), E>,
{
    let start = Instant::now();
    let mut operations = 0_u64;
    let mut batch = 1_u64;
    loop {
        let batch_start = Instant::now();
        for _ in 0..batch {
            f()?;
        }
        let batch_elapsed = batch_start.elapsed();
        operations += batch;
        batch_latencies.push(batch_elapsed / u32::try_from(batch).unwrap_or(u32::MAX));

        let elapsed = start.elapsed();
        if elapsed >= budget {
            return Ok(IterationResult {
                operations,
                elapsed,
            });
        }
        if batch_elapsed < BATCH_TARGET && batch < MAX_BATCH {
            batch *= 2;
        }
    }
}
