//! Fixed-size embedding tables stored row-major in one allocation.

use std::ops::Range;

use rand::Rng;

use crate::error::{Error, Result};

/// `rows × dimension` matrix of `f32` rows with stable ids `[0, rows)`.
///
/// The table is never resized after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingTable {
    dimension: usize,
    rows: usize,
    data: Vec<f32>,
}

/// Number of values in a `rows × dimension` table.
///
/// Rejects empty tables and shapes whose element count does not fit in
/// `usize`.
pub(crate) fn element_count(rows: usize, dimension: usize) -> Result<usize> {
    if rows == 0 {
        return Err(Error::EmptyTable);
    }
    rows.checked_mul(dimension).ok_or_else(|| {
        Error::InvalidConfig(format!(
            "embedding table of {rows} x {dimension} values overflows usize"
        ))
    })
}

impl EmbeddingTable {
    /// All-zero table.
    pub fn zeros(rows: usize, dimension: usize) -> Result<Self> {
        let len = element_count(rows, dimension)?;
        Ok(Self {
            dimension,
            rows,
            data: vec![0.0; len],
        })
    }

    /// Builds a table from explicit rows, which must all share one length.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = rows.first().ok_or(Error::EmptyTable)?.len();
        let count = rows.len();
        let mut data = Vec::with_capacity(count * dimension);
        for row in rows {
            if row.len() != dimension {
                return Err(Error::DimensionMismatch {
                    expected: dimension,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(&row);
        }
        Ok(Self {
            dimension,
            rows: count,
            data,
        })
    }

    /// Wraps a row-major buffer of exactly `rows * dimension` values.
    pub fn from_flat(rows: usize, dimension: usize, data: Vec<f32>) -> Result<Self> {
        let expected = element_count(rows, dimension)?;
        if data.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            dimension,
            rows,
            data,
        })
    }

    /// Table of uniform values in `[0, 1)`, drawn in `f64` and narrowed.
    // Reason: narrowing to f32 is the table's element type.
    #[allow(clippy::cast_possible_truncation)]
    pub fn random<R: Rng>(rows: usize, dimension: usize, rng: &mut R) -> Result<Self> {
        let len = element_count(rows, dimension)?;
        let data = (0..len)
            .map(|_| rng.gen::<f64>() as f32)
            .collect();
        Ok(Self {
            dimension,
            rows,
            data,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row length D.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn span(&self, row: usize) -> Result<Range<usize>> {
        if row >= self.rows {
            return Err(Error::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        let start = row * self.dimension;
        Ok(start..start + self.dimension)
    }

    /// Borrows row `row`.
    pub fn row(&self, row: usize) -> Result<&[f32]> {
        let span = self.span(row)?;
        Ok(&self.data[span])
    }

    /// Mutably borrows row `row`.
    pub fn row_mut(&mut self, row: usize) -> Result<&mut [f32]> {
        let span = self.span(row)?;
        Ok(&mut self.data[span])
    }

    /// Whole table, row-major.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
