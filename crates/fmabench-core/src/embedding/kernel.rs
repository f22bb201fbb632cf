//! One training step of a shallow embedding model, split into its three
//! measurable operations.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::accumulator::GradientAccumulator;
use super::table::{element_count, EmbeddingTable};
use super::update::{accumulate, add_assign, UpdateMode};
use crate::error::{Error, Result};
use crate::fma::dot_fused_native;
use crate::reduction::{dot_fused_unrolled4, dot_separate, dot_separate_unrolled4};
use crate::rows::{RowSource, UniformRows};

/// Loop shape and rounding of the row inner product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InnerProduct {
    /// Sequential, fused.
    Fused,
    /// Sequential, separate multiply then add.
    Separate,
    /// Four lane accumulators, fused.
    FusedUnrolled4,
    /// Four lane accumulators, separate.
    SeparateUnrolled4,
}

impl InnerProduct {
    /// Every variant, in report order.
    pub const ALL: [Self; 4] = [
        Self::Fused,
        Self::Separate,
        Self::FusedUnrolled4,
        Self::SeparateUnrolled4,
    ];

    /// Stable snake_case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Fused => "fused",
            Self::Separate => "separate",
            Self::FusedUnrolled4 => "fused_unrolled4",
            Self::SeparateUnrolled4 => "separate_unrolled4",
        }
    }

    /// Evaluates the inner product of two equal-length rows.
    #[inline]
    #[must_use]
    pub fn evaluate(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Fused => dot_fused_native(a, b),
            Self::Separate => dot_separate(a, b),
            Self::FusedUnrolled4 => dot_fused_unrolled4(a, b),
            Self::SeparateUnrolled4 => dot_separate_unrolled4(a, b),
        }
    }
}

impl fmt::Display for InnerProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InnerProduct {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownStrategy(s.to_string()))
    }
}

/// Input table, output table, gradient accumulator and the injected row source.
///
/// All three buffers share dimension D and are never reallocated. The kernel
/// is meant for exclusive single-thread use: parallel callers need one
/// kernel (or at least one accumulator) each.
#[derive(Debug, Clone)]
pub struct EmbeddingKernel<S> {
    input: EmbeddingTable,
    output: EmbeddingTable,
    accumulator: GradientAccumulator,
    source: S,
}

impl EmbeddingKernel<UniformRows<StdRng>> {
    /// Random tables and accumulator, drawn from one generator in a
    /// fixed order: input and output interleaved per element, then the
    /// accumulator. The same generator then drives row selection.
    pub fn random(rows: usize, dimension: usize, seed: Option<u64>) -> Result<Self> {
        let mut source = seed.map_or_else(UniformRows::<StdRng>::from_entropy, UniformRows::seeded);
        let (input, output, accumulator) = random_state(rows, dimension, source.rng_mut())?;
        Self::new(input, output, accumulator, source)
    }
}

#[allow(clippy::cast_possible_truncation)] // Reason: narrowing to f32 is the table element type.
fn random_state<R: Rng>(
    rows: usize,
    dimension: usize,
    rng: &mut R,
) -> Result<(EmbeddingTable, EmbeddingTable, GradientAccumulator)> {
    let len = element_count(rows, dimension)?;
    let mut input = Vec::with_capacity(len);
    let mut output = Vec::with_capacity(len);
    for _ in 0..len {
        input.push(rng.gen::<f64>() as f32);
        output.push(rng.gen::<f64>() as f32);
    }
    Ok((
        EmbeddingTable::from_flat(rows, dimension, input)?,
        EmbeddingTable::from_flat(rows, dimension, output)?,
        GradientAccumulator::random(dimension, rng),
    ))
}

impl<S: RowSource> EmbeddingKernel<S> {
    /// Assembles a kernel, checking that every buffer shares one dimension.
    pub fn new(
        input: EmbeddingTable,
        output: EmbeddingTable,
        accumulator: GradientAccumulator,
        source: S,
    ) -> Result<Self> {
        let dimension = input.dimension();
        for actual in [output.dimension(), accumulator.dimension()] {
            if actual != dimension {
                return Err(Error::DimensionMismatch {
                    expected: dimension,
                    actual,
                });
            }
        }
        Ok(Self {
            input,
            output,
            accumulator,
            source,
        })
    }

    // -------------------------------------------------------------------------
    // Explicit-id operations
    // -------------------------------------------------------------------------

    /// Inner product of `input[id1]` and `output[id2]`.
    pub fn compute_inner_product(
        &self,
        id1: usize,
        id2: usize,
        variant: InnerProduct,
    ) -> Result<f32> {
        let a = self.input.row(id1)?;
        let b = self.output.row(id2)?;
        Ok(variant.evaluate(a, b))
    }

    /// `accumulator[i] += gain * output[id2][i]` (fused or separate).
    pub fn accumulate_gradient(&mut self, id2: usize, gain: f32, mode: UpdateMode) -> Result<()> {
        let row = self.output.row(id2)?;
        accumulate(self.accumulator.as_mut_slice(), row, gain, mode);
        Ok(())
    }

    /// `input[id1][i] += accumulator[i]`. The accumulator is left untouched.
    pub fn apply_accumulated_update(&mut self, id1: usize) -> Result<()> {
        let row = self.input.row_mut(id1)?;
        add_assign(row, self.accumulator.as_slice());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sampled operations (ids and gain from the injected source)
    // -------------------------------------------------------------------------

    /// Draws `id1`, then `id2`, and computes their inner product.
    pub fn sample_inner_product(&mut self, variant: InnerProduct) -> Result<f32> {
        let id1 = self.source.next_row(self.input.rows());
        let id2 = self.source.next_row(self.output.rows());
        self.compute_inner_product(id1, id2, variant)
    }

    /// Draws `id2` and a gain, then accumulates the scaled output row.
    pub fn sample_accumulate_gradient(&mut self, mode: UpdateMode) -> Result<()> {
        let id2 = self.source.next_row(self.output.rows());
        let gain = self.source.next_gain();
        self.accumulate_gradient(id2, gain, mode)
    }

    /// Draws `id1` and adds the accumulator to that input row.
    pub fn sample_apply_update(&mut self) -> Result<()> {
        let id1 = self.source.next_row(self.input.rows());
        self.apply_accumulated_update(id1)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Row dimension D.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.input.dimension()
    }

    /// Input ("word") table.
    #[must_use]
    pub fn input(&self) -> &EmbeddingTable {
        &self.input
    }

    /// Output ("context") table.
    #[must_use]
    pub fn output(&self) -> &EmbeddingTable {
        &self.output
    }

    /// Gradient accumulator.
    #[must_use]
    pub fn accumulator(&self) -> &GradientAccumulator {
        &self.accumulator
    }

    /// Mutable gradient accumulator, e.g. to reset it between cycles.
    pub fn accumulator_mut(&mut self) -> &mut GradientAccumulator {
        &mut self.accumulator
    }

    /// Row source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Splits the kernel back into its parts.
    pub fn into_parts(self) -> (EmbeddingTable, EmbeddingTable, GradientAccumulator, S) {
        (self.input, self.output, self.accumulator, self.source)
    }
}
