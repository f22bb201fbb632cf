//! Injected sources of row ids and gains for the embedding kernel.
//!
//! The kernel never owns a random generator directly: every sampled
//! operation pulls from a [`RowSource`], so tests can replay a fixed script.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies row ids and gains to the sampled embedding operations.
pub trait RowSource {
    /// Next row id for a table with `rows` rows.
    ///
    /// Random sources return ids in `[0, rows)`; scripted sources return
    /// whatever they were given and let the kernel reject bad ids.
    fn next_row(&mut self, rows: usize) -> usize;

    /// Next gradient gain.
    fn next_gain(&mut self) -> f32;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn next_row(&mut self, rows: usize) -> usize {
        (**self).next_row(rows)
    }

    fn next_gain(&mut self) -> f32 {
        (**self).next_gain()
    }
}

/// Uniform random rows and gains in `[0, 1)`, backed by any [`Rng`].
#[derive(Debug, Clone)]
pub struct UniformRows<R> {
    rng: R,
}

impl<R: Rng> UniformRows<R> {
    /// Wraps an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Mutable access to the generator, e.g. to initialize tables from it.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl UniformRows<StdRng> {
    /// Reproducible source seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Non-reproducible source seeded from the OS.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RowSource for UniformRows<R> {
    #[inline]
    fn next_row(&mut self, rows: usize) -> usize {
        self.rng.gen_range(0..rows)
    }

    #[inline]
    // Reason: gains are drawn in f64 and narrowed like the table values.
    #[allow(clippy::cast_possible_truncation)]
    fn next_gain(&mut self) -> f32 {
        self.rng.gen::<f64>() as f32
    }
}

/// Deterministic source that cycles through fixed ids and gains.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedRows {
    rows: Vec<usize>,
    gains: Vec<f32>,
    row_cursor: usize,
    gain_cursor: usize,
}

impl ScriptedRows {
    /// Creates a script. An empty gain list yields a gain of `1.0`.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is empty.
    #[must_use]
    pub fn new(rows: Vec<usize>, gains: Vec<f32>) -> Self {
        assert!(!rows.is_empty(), "ScriptedRows needs at least one row id");
        Self {
            rows,
            gains,
            row_cursor: 0,
            gain_cursor: 0,
        }
    }

    /// Script of row ids with unit gain.
    #[must_use]
    pub fn rows(rows: Vec<usize>) -> Self {
        Self::new(rows, Vec::new())
    }
}

impl RowSource for ScriptedRows {
    fn next_row(&mut self, _rows: usize) -> usize {
        let row = self.rows[self.row_cursor % self.rows.len()];
        self.row_cursor += 1;
        row
    }

    fn next_gain(&mut self) -> f32 {
        if self.gains.is_empty() {
            return 1.0;
        }
        let gain = self.gains[self.gain_cursor % self.gains.len()];
        self.gain_cursor += 1;
        gain
    }
}
