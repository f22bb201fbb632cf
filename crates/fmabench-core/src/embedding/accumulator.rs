//! Reusable gradient buffer shared across kernel invocations.

use rand::Rng;

/// Additive error/gradient buffer of dimension D.
///
/// Nothing clears it implicitly: applying it twice applies the same contents
/// twice. Call [`GradientAccumulator::reset`] to start a fresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientAccumulator {
    values: Vec<f32>,
}

impl GradientAccumulator {
    /// All-zero buffer.
    #[must_use]
    pub fn zeros(dimension: usize) -> Self {
        Self {
            values: vec![0.0; dimension],
        }
    }

    /// Buffer with explicit contents.
    #[must_use]
    pub fn from_vec(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Buffer of uniform values in `[0, 1)`.
    #[must_use]
    // Reason: narrowing to f32 is the buffer's element type.
    #[allow(clippy::cast_possible_truncation)]
    pub fn random<R: Rng>(dimension: usize, rng: &mut R) -> Self {
        Self {
            values: (0..dimension).map(|_| rng.gen::<f64>() as f32).collect(),
        }
    }

    /// Zeroes every element.
    pub fn reset(&mut self) {
        self.values.fill(0.0);
    }

    /// Dimension D.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Current contents.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Mutable contents.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values
    }
}
