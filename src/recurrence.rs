//! Recurrence matrix construction.
//!
//! A [`RecurrenceMatrix`] marks which pairs of embedded states lie within a
//! threshold distance of each other. The threshold is either given directly
//! ([`ThresholdMode::FixedThreshold`]) or chosen to hit a target density
//! ([`ThresholdMode::RecurrenceRate`]).
//!
//! The matrix is symmetric with an empty main diagonal, so only the strict
//! upper triangle is stored, one bit per pair.

use bitvec::prelude::*;
use tracing::debug;

use crate::config::ThresholdMode;
use crate::distance::{condensed_index, pair_count, DistanceMatrix};
use crate::error::{RecurrenceError, Result};

/// Symmetric binary recurrence matrix without self-recurrences.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceMatrix {
    n: usize,
    threshold: Option<f64>,
    bits: BitVec<u64, Lsb0>,
    ones: usize,
}

impl RecurrenceMatrix {
    /// Threshold `distances` at `epsilon` (inclusive).
    #[must_use]
    pub fn from_distances(distances: &DistanceMatrix, epsilon: f64) -> Self {
        let bits: BitVec<u64, Lsb0> = distances.condensed().iter().map(|&d| d <= epsilon).collect();
        let ones = bits.count_ones();
        Self {
            n: distances.size(),
            threshold: Some(epsilon),
            bits,
            ones,
        }
    }

    /// Build from a dense `N x N` 0/1 matrix. The diagonal is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not square, not binary or not symmetric.
    pub fn from_dense(rows: &[Vec<u8>]) -> Result<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(RecurrenceError::invalid_input(format!(
                "row {i} has {} entries, expected {n}",
                row.len()
            )));
        }

        let mut bits = BitVec::<u64, Lsb0>::repeat(false, pair_count(n));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                if v > 1 {
                    return Err(RecurrenceError::invalid_input(format!(
                        "entry ({i}, {j}) is {v}, expected 0 or 1"
                    )));
                }
                if i < j {
                    if rows[j][i] != v {
                        return Err(RecurrenceError::invalid_input(format!(
                            "matrix is not symmetric at ({i}, {j})"
                        )));
                    }
                    bits.set(condensed_index(n, i, j), v == 1);
                }
            }
        }
        let ones = bits.count_ones();
        Ok(Self {
            n,
            threshold: None,
            bits,
            ones,
        })
    }

    /// Build an `n x n` matrix from a list of recurrent pairs.
    ///
    /// Pairs are unordered; duplicates are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range indices or self-pairs.
    pub fn from_pairs(n: usize, pairs: &[(usize, usize)]) -> Result<Self> {
        let mut bits = BitVec::<u64, Lsb0>::repeat(false, pair_count(n));
        for &(a, b) in pairs {
            if a >= n || b >= n {
                return Err(RecurrenceError::invalid_input(format!(
                    "pair ({a}, {b}) out of range for size {n}"
                )));
            }
            if a == b {
                return Err(RecurrenceError::invalid_input(format!(
                    "self-recurrence ({a}, {a}) is not allowed"
                )));
            }
            let (i, j) = if a < b { (a, b) } else { (b, a) };
            bits.set(condensed_index(n, i, j), true);
        }
        let ones = bits.count_ones();
        Ok(Self {
            n,
            threshold: None,
            bits,
            ones,
        })
    }

    /// Matrix size `N`.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.n
    }

    /// Threshold the matrix was built with, if it came from distances.
    #[must_use]
    pub const fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Whether states `i` and `j` are recurrent. Always false on the diagonal.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> bool {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of bounds for size {}", self.n);
        match i.cmp(&j) {
            std::cmp::Ordering::Equal => false,
            std::cmp::Ordering::Less => self.bits[condensed_index(self.n, i, j)],
            std::cmp::Ordering::Greater => self.bits[condensed_index(self.n, j, i)],
        }
    }

    /// Number of recurrent unordered pairs `{i, j}`, `i != j`.
    #[must_use]
    pub const fn pair_count(&self) -> usize {
        self.ones
    }

    /// Number of off-diagonal 1-entries (both triangles).
    #[must_use]
    pub const fn recurrence_count(&self) -> usize {
        2 * self.ones
    }

    /// Fraction of off-diagonal entries that are 1, `count / (N^2 - N)`.
    ///
    /// Defined as 0 when `N < 2`.
    #[must_use]
    pub fn recurrence_rate(&self) -> f64 {
        let pairs = pair_count(self.n);
        if pairs == 0 {
            0.0
        } else {
            self.ones as f64 / pairs as f64
        }
    }

    /// Expand to a full `N x N` matrix of 0/1 entries (zero diagonal).
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<u8>> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| u8::from(self.get(i, j))).collect())
            .collect()
    }
}

/// Smallest threshold for which at least `recurrence_rate` of the
/// off-diagonal pairs are recurrent.
///
/// With `M = N(N-1)/2` pairs, this is the `k`-th smallest distance, where
/// `k` is the least count with `k / M >= recurrence_rate`. Distances tied
/// with it are recurrent as well, so only ties push the realized rate above
/// the request.
///
/// # Errors
///
/// Returns an error if `recurrence_rate` is outside `(0, 1]` or the matrix
/// has fewer than two states.
pub fn threshold_for_recurrence_rate(distances: &DistanceMatrix, recurrence_rate: f64) -> Result<f64> {
    ThresholdMode::RecurrenceRate(recurrence_rate).validate()?;

    let m = distances.condensed().len();
    if m == 0 {
        return Err(RecurrenceError::invalid_config(format!(
            "a recurrence rate needs at least 2 embedded states, got {}",
            distances.size()
        )));
    }

    let k = rate_rank(recurrence_rate, m);
    let mut values = distances.condensed().to_vec();
    let (_, kth, _) = values.select_nth_unstable_by(k - 1, f64::total_cmp);
    Ok(*kth)
}

/// Least `k` in `1..=m` with `k / m >= recurrence_rate`, evaluated the way
/// [`RecurrenceMatrix::recurrence_rate`] evaluates the realized rate.
fn rate_rank(recurrence_rate: f64, m: usize) -> usize {
    let reaches = |k: usize| k as f64 / m as f64 >= recurrence_rate;
    // `ceil` is within one of the answer; float rounding decides the side
    let mut k = ((recurrence_rate * m as f64).ceil() as usize).clamp(1, m);
    while k > 1 && reaches(k - 1) {
        k -= 1;
    }
    while k < m && !reaches(k) {
        k += 1;
    }
    k
}

/// The distance threshold `mode` selects for `distances`.
///
/// # Errors
///
/// Returns an error if the mode parameter is invalid or a recurrence rate is
/// requested for fewer than two states.
pub fn resolve_threshold(distances: &DistanceMatrix, mode: ThresholdMode) -> Result<f64> {
    mode.validate()?;
    match mode {
        ThresholdMode::FixedThreshold(eps) => Ok(eps),
        ThresholdMode::RecurrenceRate(rr) => threshold_for_recurrence_rate(distances, rr),
    }
}

/// Threshold `distances` according to `mode`.
///
/// # Errors
///
/// Returns an error if the mode parameter is invalid, see
/// [`ThresholdMode::validate`] and [`threshold_for_recurrence_rate`].
pub fn build_recurrence_matrix(distances: &DistanceMatrix, mode: ThresholdMode) -> Result<RecurrenceMatrix> {
    let epsilon = resolve_threshold(distances, mode)?;
    let matrix = RecurrenceMatrix::from_distances(distances, epsilon);
    debug!(
        size = matrix.size(),
        epsilon,
        realized_rate = matrix.recurrence_rate(),
        "Built recurrence matrix"
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Metric;
    use crate::embedding::TimeSeries;
    use approx::assert_relative_eq;

    fn line_distances(values: &[f64]) -> DistanceMatrix {
        let ts = TimeSeries::new(values.to_vec()).unwrap();
        DistanceMatrix::compute(&ts.embed(1, 0).unwrap(), Metric::Supremum)
    }

    #[test]
    fn test_fixed_threshold() {
        let dm = line_distances(&[0.0, 1.0, 3.0, 6.0]);
        let rm = build_recurrence_matrix(&dm, ThresholdMode::FixedThreshold(2.0)).unwrap();

        assert!(rm.get(0, 1));
        assert!(rm.get(1, 2));
        assert!(rm.get(2, 1));
        assert!(!rm.get(0, 2));
        assert!(!rm.get(2, 3));
        assert!(!rm.get(1, 1));
        assert_eq!(rm.pair_count(), 2);
        assert_eq!(rm.recurrence_count(), 4);
        assert_relative_eq!(rm.recurrence_rate(), 4.0 / 12.0);
        assert_eq!(rm.threshold(), Some(2.0));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let dm = line_distances(&[0.0, 0.5, 1.0]);
        let rm = RecurrenceMatrix::from_distances(&dm, 0.5);
        assert!(rm.get(0, 1));
        assert!(rm.get(1, 2));
        assert!(!rm.get(0, 2));
    }

    #[test]
    fn test_rate_threshold_quantile() {
        // Pair distances: 1, 3, 6, 2, 5, 3
        let dm = line_distances(&[0.0, 1.0, 3.0, 6.0]);

        // k = ceil(0.5 * 6) = 3 -> sorted [1, 2, 3, 3, 5, 6] -> 3
        let eps = threshold_for_recurrence_rate(&dm, 0.5).unwrap();
        assert_relative_eq!(eps, 3.0);

        // Tie at 3 pulls in a fourth pair
        let rm = build_recurrence_matrix(&dm, ThresholdMode::RecurrenceRate(0.5)).unwrap();
        assert_eq!(rm.pair_count(), 4);
        assert!(rm.recurrence_rate() >= 0.5);

        assert_relative_eq!(threshold_for_recurrence_rate(&dm, 0.01).unwrap(), 1.0);
        assert_relative_eq!(threshold_for_recurrence_rate(&dm, 1.0).unwrap(), 6.0);
    }

    #[test]
    fn test_rate_rank_is_least_reaching_count() {
        // 0.07 * 300 evaluates to 21.000000000000004
        assert_eq!(rate_rank(0.07, 300), 21);
        assert_eq!(rate_rank(0.5, 6), 3);
        assert_eq!(rate_rank(0.51, 6), 4);
        assert_eq!(rate_rank(1e-9, 10), 1);
        assert_eq!(rate_rank(1.0, 10), 10);
        for m in 1..200 {
            for k in 1..=m {
                let rr = k as f64 / m as f64;
                assert_eq!(rate_rank(rr, m), k, "rr = {k}/{m}");
            }
        }
    }

    #[test]
    fn test_rate_threshold_without_ties_hits_request() {
        // Powers of two give pairwise distinct distances
        let values: Vec<f64> = (0..25).map(|i| f64::from(1u32 << i)).collect();
        let dm = line_distances(&values);
        assert_eq!(dm.condensed().len(), 300);

        let mut sorted = dm.condensed().to_vec();
        sorted.sort_by(f64::total_cmp);

        let eps = threshold_for_recurrence_rate(&dm, 0.07).unwrap();
        assert_eq!(eps, sorted[20]);

        let rm = build_recurrence_matrix(&dm, ThresholdMode::RecurrenceRate(0.07)).unwrap();
        assert_eq!(rm.pair_count(), 21);
        assert!(rm.recurrence_rate() >= 0.07);
    }

    #[test]
    fn test_rate_full_density() {
        let dm = line_distances(&[0.2, 0.9, 0.4, 0.7]);
        let rm = build_recurrence_matrix(&dm, ThresholdMode::RecurrenceRate(1.0)).unwrap();
        assert_relative_eq!(rm.recurrence_rate(), 1.0);
    }

    #[test]
    fn test_invalid_modes() {
        let dm = line_distances(&[0.0, 1.0, 2.0]);
        let err = build_recurrence_matrix(&dm, ThresholdMode::FixedThreshold(-1.0)).unwrap_err();
        assert!(err.is_configuration());
        assert!(build_recurrence_matrix(&dm, ThresholdMode::RecurrenceRate(0.0)).is_err());
        assert!(build_recurrence_matrix(&dm, ThresholdMode::RecurrenceRate(1.01)).is_err());
    }

    #[test]
    fn test_rate_needs_two_states() {
        let dm = line_distances(&[0.4]);
        assert!(threshold_for_recurrence_rate(&dm, 0.5).is_err());

        // A fixed threshold on a single state is fine and empty
        let rm = build_recurrence_matrix(&dm, ThresholdMode::FixedThreshold(1.0)).unwrap();
        assert_eq!(rm.size(), 1);
        assert_eq!(rm.recurrence_rate(), 0.0);
    }

    #[test]
    fn test_dense_round_trip() {
        let dense = vec![
            vec![0, 1, 0, 1],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![1, 0, 0, 0],
        ];
        let rm = RecurrenceMatrix::from_dense(&dense).unwrap();
        assert_eq!(rm.to_dense(), dense);
        assert_eq!(rm.pair_count(), 3);
        assert_eq!(rm.threshold(), None);
    }

    #[test]
    fn test_from_dense_ignores_diagonal() {
        let rm = RecurrenceMatrix::from_dense(&[vec![1, 1], vec![1, 1]]).unwrap();
        assert!(!rm.get(0, 0));
        assert!(rm.get(0, 1));
        assert_eq!(rm.to_dense(), vec![vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn test_from_dense_rejects_invalid() {
        assert!(RecurrenceMatrix::from_dense(&[vec![0, 1], vec![0, 0]]).is_err());
        assert!(RecurrenceMatrix::from_dense(&[vec![0, 2], vec![2, 0]]).is_err());
        assert!(RecurrenceMatrix::from_dense(&[vec![0, 1, 0], vec![1, 0]]).is_err());
    }

    #[test]
    fn test_from_pairs() {
        let rm = RecurrenceMatrix::from_pairs(4, &[(0, 1), (3, 2), (1, 0)]).unwrap();
        assert!(rm.get(1, 0));
        assert!(rm.get(2, 3));
        assert_eq!(rm.pair_count(), 2);

        assert!(RecurrenceMatrix::from_pairs(3, &[(0, 3)]).is_err());
        assert!(RecurrenceMatrix::from_pairs(3, &[(1, 1)]).is_err());
    }
}
