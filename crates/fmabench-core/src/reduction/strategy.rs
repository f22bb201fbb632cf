//! Reduction strategies selectable by name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a reduction is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionStrategy {
    /// Std fused intrinsic, inlined.
    Fused,
    /// Fused loop on the runtime-dispatched hardware FMA body.
    FusedNative,
    /// Separate multiply then add.
    Separate,
    /// Fused operation through a stored function value.
    Closure,
    /// Fused operation looked up by name and called through a trait object.
    DynamicLookup,
    /// Fused, four lane accumulators.
    FusedUnrolled4,
    /// Separate, four lane accumulators.
    SeparateUnrolled4,
}

impl ReductionStrategy {
    /// Every strategy, in report order.
    pub const ALL: [Self; 7] = [
        Self::Fused,
        Self::FusedNative,
        Self::Separate,
        Self::Closure,
        Self::DynamicLookup,
        Self::FusedUnrolled4,
        Self::SeparateUnrolled4,
    ];

    /// Stable snake_case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Fused => "fused",
            Self::FusedNative => "fused_native",
            Self::Separate => "separate",
            Self::Closure => "closure",
            Self::DynamicLookup => "dynamic_lookup",
            Self::FusedUnrolled4 => "fused_unrolled4",
            Self::SeparateUnrolled4 => "separate_unrolled4",
        }
    }

    /// Whether this strategy rounds once per step.
    #[must_use]
    pub fn is_fused(self) -> bool {
        !matches!(self, Self::Separate | Self::SeparateUnrolled4)
    }
}

impl fmt::Display for ReductionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReductionStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownStrategy(s.to_string()))
    }
}
