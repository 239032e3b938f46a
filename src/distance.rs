//! Pairwise distances between embedded states.
//!
//! This module provides the phase-space metrics and the [`DistanceMatrix`],
//! a symmetric zero-diagonal matrix stored as its flattened strict upper
//! triangle.

use rayon::prelude::*;

use crate::config::Metric;
use crate::embedding::EmbeddedVectorSet;
use crate::error::Result;

impl Metric {
    /// Distance between two points of equal dimension.
    #[must_use]
    pub fn distance(self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let diffs = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs());
        match self {
            Self::Manhattan => diffs.sum(),
            Self::Euclidean => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            Self::Supremum => diffs.fold(0.0, f64::max),
        }
    }
}

/// Position of pair `(i, j)`, `i < j`, in a flattened strict upper triangle
/// of an `n x n` matrix.
#[inline]
#[must_use]
pub(crate) const fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n);
    i * n - i * (i + 1) / 2 + (j - i - 1)
}

/// Number of unordered off-diagonal pairs of an `n x n` matrix.
#[inline]
#[must_use]
pub(crate) const fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Symmetric all-pairs distance matrix with zero diagonal.
///
/// Only the `N(N-1)/2` values above the diagonal are stored, row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    metric: Metric,
    condensed: Vec<f64>,
}

impl DistanceMatrix {
    /// Compute all pairwise distances of `vectors`.
    ///
    /// Rows of the upper triangle are computed in parallel and concatenated in
    /// row order, so the result does not depend on the thread count.
    #[must_use]
    pub fn compute(vectors: &EmbeddedVectorSet, metric: Metric) -> Self {
        let n = vectors.len();
        let condensed: Vec<f64> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                let vi = vectors.vector(i);
                ((i + 1)..n).map(move |j| metric.distance(vi, vectors.vector(j)))
            })
            .collect();

        debug_assert_eq!(condensed.len(), pair_count(n));
        Self {
            n,
            metric,
            condensed,
        }
    }

    /// Matrix size `N`.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.n
    }

    /// Metric the distances were computed with.
    #[must_use]
    pub const fn metric(&self) -> Metric {
        self.metric
    }

    /// Distance between states `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of bounds for size {}", self.n);
        match i.cmp(&j) {
            std::cmp::Ordering::Equal => 0.0,
            std::cmp::Ordering::Less => self.condensed[condensed_index(self.n, i, j)],
            std::cmp::Ordering::Greater => self.condensed[condensed_index(self.n, j, i)],
        }
    }

    /// Off-diagonal distances, strict upper triangle in row order.
    #[must_use]
    pub fn condensed(&self) -> &[f64] {
        &self.condensed
    }

    /// Largest pairwise distance (0 for fewer than two states).
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        self.condensed.iter().copied().fold(0.0, f64::max)
    }

    /// Expand to a full `N x N` row-major matrix.
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

/// Compute the distance matrix of `vectors`, optionally standardizing every
/// embedding axis first.
///
/// # Errors
///
/// Returns [`crate::RecurrenceError::ZeroVariance`] if `normalize` is set and
/// an axis is constant.
pub fn compute_distance_matrix(
    vectors: &EmbeddedVectorSet,
    metric: Metric,
    normalize: bool,
) -> Result<DistanceMatrix> {
    if normalize {
        let normalized = vectors.normalized()?;
        Ok(DistanceMatrix::compute(&normalized, metric))
    } else {
        Ok(DistanceMatrix::compute(vectors, metric))
    }
}
