//! Configuration for recurrence analysis.
//!
//! This module provides the [`RecurrenceConfig`] struct which collects every
//! parameter of the pipeline (embedding, metric, threshold selection and line
//! minima) into one validated record.
//!
//! # Example
//!
//! ```
//! use recurrence_network::{Metric, RecurrenceConfig};
//!
//! // 5% of all state pairs recurrent, supremum norm
//! let config = RecurrenceConfig::fixed_recurrence_rate(0.05);
//!
//! // Fixed distance threshold with a 3-dimensional delay embedding
//! let config = RecurrenceConfig::fixed_threshold(0.1)
//!     .with_embedding(3, 2)
//!     .with_metric(Metric::Euclidean);
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{RecurrenceError, Result};
use crate::DEFAULT_MIN_LINE_LENGTH;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distance metric in phase space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Metric {
    /// L1 norm: sum of absolute coordinate differences.
    Manhattan,
    /// L2 norm.
    Euclidean,
    /// L-infinity (Chebyshev) norm: largest absolute coordinate difference.
    #[default]
    Supremum,
}

impl Metric {
    /// All supported metrics.
    pub const ALL: [Self; 3] = [Self::Manhattan, Self::Euclidean, Self::Supremum];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
            Self::Supremum => "supremum",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Self::Manhattan),
            "euclidean" => Ok(Self::Euclidean),
            "supremum" | "chebyshev" => Ok(Self::Supremum),
            _ => Err(RecurrenceError::UnknownMetric(s.to_string())),
        }
    }
}

/// How the recurrence threshold is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ThresholdMode {
    /// States closer than or equal to `epsilon` are recurrent.
    FixedThreshold(f64),
    /// Pick the threshold so that at least this fraction of off-diagonal
    /// state pairs is recurrent.
    RecurrenceRate(f64),
}

impl Default for ThresholdMode {
    fn default() -> Self {
        Self::RecurrenceRate(0.05)
    }
}

impl ThresholdMode {
    /// Validate the parameter of the mode.
    ///
    /// # Errors
    ///
    /// Returns an error if epsilon is negative or non-finite, or if the
    /// recurrence rate lies outside `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::FixedThreshold(eps) => {
                if !eps.is_finite() || eps < 0.0 {
                    return Err(RecurrenceError::invalid_config(format!(
                        "threshold must be finite and non-negative, got {eps}"
                    )));
                }
            }
            Self::RecurrenceRate(rr) => {
                if !rr.is_finite() || rr <= 0.0 || rr > 1.0 {
                    return Err(RecurrenceError::invalid_config(format!(
                        "recurrence_rate must lie in (0, 1], got {rr}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Configuration for a recurrence analysis run.
///
/// # Parameters
///
/// - `dim`, `tau`: time-delay embedding dimension and delay.
/// - `metric`: phase-space distance.
/// - `normalize`: standardize each embedding axis before measuring distances.
/// - `threshold`: fixed threshold or fixed recurrence rate.
/// - `l_min`, `v_min`: minimal diagonal / vertical line lengths for RQA.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecurrenceConfig {
    /// Embedding dimension (>= 1).
    pub dim: usize,

    /// Embedding delay in samples.
    pub tau: usize,

    /// Phase-space distance metric.
    pub metric: Metric,

    /// Rescale every embedding axis to zero mean and unit variance.
    pub normalize: bool,

    /// Threshold selection.
    pub threshold: ThresholdMode,

    /// Minimal diagonal line length counted by determinism.
    pub l_min: usize,

    /// Minimal vertical line length counted by laminarity.
    pub v_min: usize,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            dim: 1,
            tau: 0,
            metric: Metric::Supremum,
            normalize: false,
            threshold: ThresholdMode::default(),
            l_min: DEFAULT_MIN_LINE_LENGTH,
            v_min: DEFAULT_MIN_LINE_LENGTH,
        }
    }
}

impl RecurrenceConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration thresholded at a fixed distance.
    #[must_use]
    pub fn fixed_threshold(epsilon: f64) -> Self {
        Self {
            threshold: ThresholdMode::FixedThreshold(epsilon),
            ..Self::default()
        }
    }

    /// Default configuration thresholded at a fixed recurrence rate.
    #[must_use]
    pub fn fixed_recurrence_rate(recurrence_rate: f64) -> Self {
        Self {
            threshold: ThresholdMode::RecurrenceRate(recurrence_rate),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.dim < 1 {
            return Err(RecurrenceError::invalid_config("dim must be at least 1"));
        }
        if self.l_min < 1 {
            return Err(RecurrenceError::invalid_config("l_min must be at least 1"));
        }
        if self.v_min < 1 {
            return Err(RecurrenceError::invalid_config("v_min must be at least 1"));
        }
        self.threshold.validate()
    }

    /// Set embedding dimension and delay.
    #[must_use]
    pub const fn with_embedding(mut self, dim: usize, tau: usize) -> Self {
        self.dim = dim;
        self.tau = tau;
        self
    }

    /// Set the distance metric.
    #[must_use]
    pub const fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Enable/disable per-axis normalization.
    #[must_use]
    pub const fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the threshold selection mode.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: ThresholdMode) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set minimal diagonal and vertical line lengths.
    #[must_use]
    pub const fn with_line_minima(mut self, l_min: usize, v_min: usize) -> Self {
        self.l_min = l_min;
        self.v_min = v_min;
        self
    }
}
