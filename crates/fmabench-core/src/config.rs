//! Benchmark configuration.
//!
//! Values are layered with figment, later layers overriding earlier ones:
//!
//! 1. built-in defaults ([`BenchConfig::default`])
//! 2. an optional TOML file
//! 3. environment variables prefixed `FMABENCH_`, with `__` separating
//!    nested keys (`FMABENCH_EMBEDDING__ROWS=4096`)
//!
//! ```toml
//! [reduction]
//! length = 65536
//!
//! [embedding]
//! dimension = 128
//! seed = 42
//!
//! [embedding.schedule]
//! measurement_iterations = 3
//! ```

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "FMABENCH_";

/// Warm-up and measurement plan for one suite.
///
/// Each iteration keeps invoking the kernel until its time budget elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Discarded iterations run before measuring.
    pub warmup_iterations: usize,
    /// Time budget of each warm-up iteration.
    pub warmup_time_ms: u64,
    /// Recorded iterations.
    pub measurement_iterations: usize,
    /// Time budget of each recorded iteration.
    pub measurement_time_ms: u64,
}

impl Schedule {
    /// Reduction defaults: warm-up 3 x 1 s, measurement 4 x 2 s.
    pub const REDUCTION: Self = Self {
        warmup_iterations: 3,
        warmup_time_ms: 1_000,
        measurement_iterations: 4,
        measurement_time_ms: 2_000,
    };

    /// Embedding defaults: warm-up 3 x 2 s, measurement 5 x 5 s.
    pub const EMBEDDING: Self = Self {
        warmup_iterations: 3,
        warmup_time_ms: 2_000,
        measurement_iterations: 5,
        measurement_time_ms: 5_000,
    };

    /// Smoke-run plan: one short warm-up, two short measurements.
    pub const QUICK: Self = Self {
        warmup_iterations: 1,
        warmup_time_ms: 10,
        measurement_iterations: 2,
        measurement_time_ms: 50,
    };

    /// Warm-up budget per iteration.
    #[must_use]
    pub fn warmup_time(&self) -> Duration {
        Duration::from_millis(self.warmup_time_ms)
    }

    /// Measurement budget per iteration.
    #[must_use]
    pub fn measurement_time(&self) -> Duration {
        Duration::from_millis(self.measurement_time_ms)
    }

    fn validate(&self, section: &str) -> Result<()> {
        if self.measurement_iterations == 0 {
            return Err(Error::InvalidConfig(format!(
                "{section}.schedule.measurement_iterations must be at least 1"
            )));
        }
        Ok(())
    }
}

/// Vector reduction suite settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionConfig {
    /// Vector length N.
    pub length: usize,
    /// Timing plan.
    pub schedule: Schedule,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            length: 1 << 20,
            schedule: Schedule::REDUCTION,
        }
    }
}

/// Embedding step suite settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Row dimension D.
    pub dimension: usize,
    /// Rows per table.
    pub rows: usize,
    /// Generator seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Timing plan.
    pub schedule: Schedule,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 256,
            rows: 1 << 17,
            seed: None,
            schedule: Schedule::EMBEDDING,
        }
    }
}

/// Complete configuration for both suites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Vector reduction suite.
    pub reduction: ReductionConfig,
    /// Embedding step suite.
    pub embedding: EmbeddingConfig,
}

impl BenchConfig {
    /// Builds the layered figment without extracting it.
    ///
    /// A missing `path` is an error; `None` skips the file layer.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Loads and validates the layered configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(path)?.extract()?;
        config.validate()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Rejects values no benchmark can run with.
    pub fn validate(&self) -> Result<()> {
        if self.reduction.length == 0 {
            return Err(Error::InvalidConfig(
                "reduction.length must be at least 1".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(Error::InvalidConfig(
                "embedding.dimension must be at least 1".to_string(),
            ));
        }
        if self.embedding.rows == 0 {
            return Err(Error::InvalidConfig(
                "embedding.rows must be at least 1".to_string(),
            ));
        }
        if self
            .embedding
            .rows
            .checked_mul(self.embedding.dimension)
            .is_none()
        {
            return Err(Error::InvalidConfig(
                "embedding.rows x embedding.dimension overflows usize".to_string(),
            ));
        }
        self.reduction.schedule.validate("reduction")?;
        self.embedding.schedule.validate("embedding")
    }

    /// Replaces both schedules with [`Schedule::QUICK`].
    #[must_use]
    pub fn quick(mut self) -> Self {
        self.reduction.schedule = Schedule::QUICK;
        self.embedding.schedule = Schedule::QUICK;
        self
    }
}
