//! Error types for recurrence analysis.
//!
//! Errors fall into two families, reported by [`RecurrenceError::kind`]:
//! configuration errors (bad parameters or input that cannot be embedded) and
//! numerical errors (a computation that has no defined result).

use thiserror::Error;

/// Main error type for recurrence analysis operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecurrenceError {
    /// Input validation errors.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A parameter of the analysis is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Series is too short for the requested embedding.
    #[error("Time series too short: need at least {min} samples, got {actual}")]
    SeriesTooShort { min: usize, actual: usize },

    /// The time series contains NaN or an infinity.
    #[error("Non-finite value in time series at index {index}")]
    NonFiniteValue { index: usize },

    /// Metric name not recognised.
    #[error("Unknown metric '{0}' (expected manhattan, euclidean or supremum)")]
    UnknownMetric(String),

    /// An embedding axis cannot be standardized.
    #[error("Axis {axis} has zero variance and cannot be normalized")]
    ZeroVariance { axis: usize },

    /// Numerical computation resulted in NaN or Inf.
    #[error("Numerical instability: {context}")]
    NumericalInstability { context: String },
}

/// Broad classification of a [`RecurrenceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid parameters or input; detected before any pairwise work starts.
    Configuration,
    /// A numerical operation without a defined result.
    Numerical,
}

/// Result type alias for recurrence analysis operations.
pub type Result<T> = std::result::Result<T, RecurrenceError>;

impl RecurrenceError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a series too short error.
    #[must_use]
    pub const fn series_too_short(min: usize, actual: usize) -> Self {
        Self::SeriesTooShort { min, actual }
    }

    /// Create a zero variance error.
    #[must_use]
    pub const fn zero_variance(axis: usize) -> Self {
        Self::ZeroVariance { axis }
    }

    /// Create a numerical instability error.
    #[must_use]
    pub fn numerical_instability(context: impl Into<String>) -> Self {
        Self::NumericalInstability {
            context: context.into(),
        }
    }

    /// Which family this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_)
            | Self::InvalidConfig(_)
            | Self::SeriesTooShort { .. }
            | Self::NonFiniteValue { .. }
            | Self::UnknownMetric(_) => ErrorKind::Configuration,
            Self::ZeroVariance { .. } | Self::NumericalInstability { .. } => ErrorKind::Numerical,
        }
    }

    /// Shorthand for `kind() == ErrorKind::Configuration`.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}
