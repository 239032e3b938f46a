//! Recurrence quantification analysis (RQA).
//!
//! Measures computed directly from a [`RecurrenceMatrix`]:
//!
//! | Measure | Definition |
//! |---------|------------|
//! | RR | off-diagonal recurrence points / (N² − N) |
//! | DET | points on diagonal lines of length ≥ `l_min` / all points |
//! | LAM | points on vertical lines of length ≥ `v_min` / all points |
//! | L, L_max | mean / longest diagonal line |
//! | ENTR | Shannon entropy of the diagonal line length distribution |
//! | TT, V_max | mean / longest vertical line (trapping time) |
//!
//! Lines are maximal runs of consecutive recurrence points. The main
//! diagonal is never part of a line: it is skipped for diagonal lines and
//! breaks vertical lines. Measures with an empty denominator are 0.

use crate::error::{RecurrenceError, Result};
use crate::math::stats::shannon_entropy;
use crate::recurrence::RecurrenceMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Histogram of line lengths: `counts()[l]` is the number of lines of length `l`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineDistribution {
    counts: Vec<usize>,
}

impl LineDistribution {
    fn record(&mut self, length: usize, times: usize) {
        if length == 0 {
            return;
        }
        if self.counts.len() <= length {
            self.counts.resize(length + 1, 0);
        }
        self.counts[length] += times;
    }

    /// Raw histogram indexed by length (index 0 is always 0).
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    fn qualifying(&self, min_length: usize) -> impl Iterator<Item = (usize, usize)> + Clone + '_ {
        self.counts
            .iter()
            .copied()
            .enumerate()
            .skip(min_length.max(1))
            .filter(|&(_, c)| c > 0)
    }

    /// Number of lines with length `>= min_length`.
    #[must_use]
    pub fn lines_at_least(&self, min_length: usize) -> usize {
        self.qualifying(min_length).map(|(_, c)| c).sum()
    }

    /// Number of recurrence points on lines with length `>= min_length`.
    #[must_use]
    pub fn points_at_least(&self, min_length: usize) -> usize {
        self.qualifying(min_length).map(|(l, c)| l * c).sum()
    }

    /// Length of the longest line (0 if there is none).
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.counts.iter().rposition(|&c| c > 0).unwrap_or(0)
    }

    /// Mean length of lines with length `>= min_length` (0 if there is none).
    #[must_use]
    pub fn mean_length(&self, min_length: usize) -> f64 {
        let lines = self.lines_at_least(min_length);
        if lines == 0 {
            0.0
        } else {
            self.points_at_least(min_length) as f64 / lines as f64
        }
    }

    /// Shannon entropy (nats) of the lengths of lines with length `>= min_length`.
    #[must_use]
    pub fn entropy(&self, min_length: usize) -> f64 {
        shannon_entropy(self.qualifying(min_length).map(|(_, c)| c))
    }
}

/// Diagonal line lengths of `matrix`, excluding the main diagonal.
///
/// Lines in the lower triangle mirror the upper triangle and are counted too.
#[must_use]
pub fn diagonal_line_distribution(matrix: &RecurrenceMatrix) -> LineDistribution {
    let n = matrix.size();
    let mut dist = LineDistribution::default();
    for offset in 1..n {
        let mut run = 0;
        for i in 0..(n - offset) {
            if matrix.get(i, i + offset) {
                run += 1;
            } else {
                dist.record(run, 2);
                run = 0;
            }
        }
        dist.record(run, 2);
    }
    dist
}

/// Vertical line lengths of `matrix`, column by column.
#[must_use]
pub fn vertical_line_distribution(matrix: &RecurrenceMatrix) -> LineDistribution {
    let n = matrix.size();
    let mut dist = LineDistribution::default();
    for j in 0..n {
        let mut run = 0;
        for i in 0..n {
            if matrix.get(i, j) {
                run += 1;
            } else {
                dist.record(run, 1);
                run = 0;
            }
        }
        dist.record(run, 1);
    }
    dist
}

fn check_min_length(name: &str, value: usize) -> Result<()> {
    if value < 1 {
        return Err(RecurrenceError::invalid_config(format!("{name} must be at least 1")));
    }
    Ok(())
}

fn fraction(points: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        points as f64 / total as f64
    }
}

/// Recurrence rate of `matrix`.
#[must_use]
pub fn recurrence_rate(matrix: &RecurrenceMatrix) -> f64 {
    matrix.recurrence_rate()
}

/// Fraction of recurrence points on diagonal lines of length `>= l_min`.
///
/// # Errors
///
/// Returns an error if `l_min == 0`.
pub fn determinism(matrix: &RecurrenceMatrix, l_min: usize) -> Result<f64> {
    check_min_length("l_min", l_min)?;
    let dist = diagonal_line_distribution(matrix);
    Ok(fraction(dist.points_at_least(l_min), matrix.recurrence_count()))
}

/// Fraction of recurrence points on vertical lines of length `>= v_min`.
///
/// # Errors
///
/// Returns an error if `v_min == 0`.
pub fn laminarity(matrix: &RecurrenceMatrix, v_min: usize) -> Result<f64> {
    check_min_length("v_min", v_min)?;
    let dist = vertical_line_distribution(matrix);
    Ok(fraction(dist.points_at_least(v_min), matrix.recurrence_count()))
}

/// The full set of RQA measures for one matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RqaMeasures {
    /// Minimal diagonal line length used.
    pub l_min: usize,
    /// Minimal vertical line length used.
    pub v_min: usize,
    /// RR.
    pub recurrence_rate: f64,
    /// DET.
    pub determinism: f64,
    /// LAM.
    pub laminarity: f64,
    /// L: mean diagonal line length (lines `>= l_min`).
    pub average_diagonal_line_length: f64,
    /// L_max over all diagonal lines.
    pub max_diagonal_line_length: usize,
    /// ENTR over diagonal lines `>= l_min`.
    pub diagonal_entropy: f64,
    /// TT: mean vertical line length (lines `>= v_min`).
    pub trapping_time: f64,
    /// V_max over all vertical lines.
    pub max_vertical_line_length: usize,
    /// Entropy over vertical lines `>= v_min`.
    pub vertical_entropy: f64,
}

impl RqaMeasures {
    /// Compute every measure, scanning each line family once.
    ///
    /// # Errors
    ///
    /// Returns an error if `l_min` or `v_min` is zero.
    pub fn compute(matrix: &RecurrenceMatrix, l_min: usize, v_min: usize) -> Result<Self> {
        check_min_length("l_min", l_min)?;
        check_min_length("v_min", v_min)?;

        let total = matrix.recurrence_count();
        let diagonal = diagonal_line_distribution(matrix);
        let vertical = vertical_line_distribution(matrix);

        Ok(Self {
            l_min,
            v_min,
            recurrence_rate: matrix.recurrence_rate(),
            determinism: fraction(diagonal.points_at_least(l_min), total),
            laminarity: fraction(vertical.points_at_least(v_min), total),
            average_diagonal_line_length: diagonal.mean_length(l_min),
            max_diagonal_line_length: diagonal.max_length(),
            diagonal_entropy: diagonal.entropy(l_min),
            trapping_time: vertical.mean_length(v_min),
            max_vertical_line_length: vertical.max_length(),
            vertical_entropy: vertical.entropy(v_min),
        })
    }
}
