//! Time series and time-delay embedding.
//!
//! This module defines the [`TimeSeries`] input record and the
//! [`EmbeddedVectorSet`] produced by reconstructing phase space from it.
//!
//! # Delay vectors
//!
//! For a series `x` of length `T`, dimension `dim` and delay `tau`, vector `i` is
//!
//! ```text
//! v_i = (x_i, x_{i+tau}, ..., x_{i+(dim-1)tau}),   i = 0 .. N-1
//! N   = T - (dim-1) * tau
//! ```

use nalgebra::DMatrix;

use crate::error::{RecurrenceError, Result};
use crate::math::stats::standardize_rows;

/// An ordered, finite, non-empty sequence of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    values: Vec<f64>,
}

impl TimeSeries {
    /// Wrap a vector of samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is empty or contains NaN or infinities.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(RecurrenceError::invalid_input("time series is empty"));
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(RecurrenceError::NonFiniteValue { index });
        }
        Ok(Self { values })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The samples.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Time-delay embed this series.
    ///
    /// # Errors
    ///
    /// See [`EmbeddedVectorSet::embed`].
    pub fn embed(&self, dim: usize, tau: usize) -> Result<EmbeddedVectorSet> {
        EmbeddedVectorSet::embed(self, dim, tau)
    }
}

impl TryFrom<Vec<f64>> for TimeSeries {
    type Error = RecurrenceError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(values)
    }
}

impl TryFrom<&[f64]> for TimeSeries {
    type Error = RecurrenceError;

    fn try_from(values: &[f64]) -> Result<Self> {
        Self::new(values.to_vec())
    }
}

/// Number of delay vectors obtained from `len` samples.
///
/// # Errors
///
/// Returns an error if `dim` is zero or the series is too short to hold a
/// single delay vector.
pub fn embedded_len(len: usize, dim: usize, tau: usize) -> Result<usize> {
    if dim < 1 {
        return Err(RecurrenceError::invalid_config("dim must be at least 1"));
    }
    let span = (dim - 1)
        .checked_mul(tau)
        .ok_or_else(|| RecurrenceError::invalid_config("dim * tau overflows"))?;
    if len <= span {
        return Err(RecurrenceError::series_too_short(span + 1, len));
    }
    Ok(len - span)
}

/// Delay vectors reconstructed from a time series.
///
/// Vectors are stored as the columns of a `dim x N` matrix, so every vector is
/// a contiguous slice of the column-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedVectorSet {
    vectors: DMatrix<f64>,
    tau: usize,
}

impl EmbeddedVectorSet {
    /// Build the delay vectors of `series`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `dim == 0` or if
    /// `len < (dim - 1) * tau + 1`.
    pub fn embed(series: &TimeSeries, dim: usize, tau: usize) -> Result<Self> {
        let x = series.as_slice();
        let n = embedded_len(x.len(), dim, tau)?;
        let vectors = DMatrix::from_fn(dim, n, |d, i| x[i + d * tau]);
        Ok(Self { vectors, tau })
    }

    /// Use pre-built phase-space points directly (one slice per point).
    ///
    /// # Errors
    ///
    /// Returns an error if there are no points, the points have differing or
    /// zero dimension, or a coordinate is not finite.
    pub fn from_points(points: &[Vec<f64>]) -> Result<Self> {
        let first = points
            .first()
            .ok_or_else(|| RecurrenceError::invalid_input("no phase-space points"))?;
        let dim = first.len();
        if dim == 0 {
            return Err(RecurrenceError::invalid_input("points must have at least one coordinate"));
        }
        for (i, p) in points.iter().enumerate() {
            if p.len() != dim {
                return Err(RecurrenceError::invalid_input(format!(
                    "point {i} has {} coordinates, expected {dim}",
                    p.len()
                )));
            }
            if let Some(index) = p.iter().position(|v| !v.is_finite()) {
                return Err(RecurrenceError::NonFiniteValue { index: i * dim + index });
            }
        }
        let vectors = DMatrix::from_fn(dim, points.len(), |d, i| points[i][d]);
        Ok(Self { vectors, tau: 0 })
    }

    /// Number of vectors `N`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.ncols()
    }

    /// Never true: an embedding always holds at least one vector.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.ncols() == 0
    }

    /// Embedding dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.vectors.nrows()
    }

    /// Delay used to build the vectors (0 for [`Self::from_points`]).
    #[must_use]
    pub const fn tau(&self) -> usize {
        self.tau
    }

    /// The `i`-th delay vector.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[must_use]
    pub fn vector(&self, i: usize) -> &[f64] {
        let dim = self.dim();
        &self.vectors.as_slice()[i * dim..(i + 1) * dim]
    }

    /// Iterate over all vectors in time order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.vectors.as_slice().chunks_exact(self.dim())
    }

    /// Underlying `dim x N` matrix.
    #[must_use]
    pub const fn as_matrix(&self) -> &DMatrix<f64> {
        &self.vectors
    }

    /// Copy with every axis rescaled to zero mean and unit standard deviation.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::ZeroVariance`] if an axis is constant.
    pub fn normalized(&self) -> Result<Self> {
        let mut vectors = self.vectors.clone();
        standardize_rows(&mut vectors)?;
        Ok(Self {
            vectors,
            tau: self.tau,
        })
    }
}
