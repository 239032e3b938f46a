//! Small statistical helpers shared by the analysis stages.

use nalgebra::DMatrix;

use crate::error::{RecurrenceError, Result};

/// Relative tolerance below which a standard deviation counts as zero.
pub const ZERO_VARIANCE_EPS: f64 = 1e-12;

/// Rescale each row of `m` to zero mean and unit (population) standard deviation.
///
/// # Errors
///
/// Returns [`RecurrenceError::ZeroVariance`] for the first row whose standard
/// deviation is zero relative to its magnitude. `m` is left untouched in that case.
pub fn standardize_rows(m: &mut DMatrix<f64>) -> Result<()> {
    let mut moments = Vec::with_capacity(m.nrows());
    for axis in 0..m.nrows() {
        let row = m.row(axis);
        let mean = row.mean();
        let std = row.variance().sqrt();
        if !std.is_finite() || std <= ZERO_VARIANCE_EPS * mean.abs().max(1.0) {
            return Err(RecurrenceError::zero_variance(axis));
        }
        moments.push((mean, std));
    }

    for (axis, (mean, std)) in moments.into_iter().enumerate() {
        m.row_mut(axis).apply(|x| *x = (*x - mean) / std);
    }
    Ok(())
}

/// Shannon entropy (natural log) of a histogram, ignoring empty bins.
///
/// Returns 0 for an empty or all-zero histogram.
#[must_use]
pub fn shannon_entropy(counts: impl IntoIterator<Item = usize> + Clone) -> f64 {
    let total: usize = counts.clone().into_iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    -counts
        .into_iter()
        .filter(|&c| c > 0)
        .map(|c| {
            let p = c as f64 / total;
            p * p.ln()
        })
        .sum::<f64>()
}
