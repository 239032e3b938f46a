//! End-to-end recurrence analysis.
//!
//! [`analyze`] runs every stage for one series and configuration:
//!
//! 1. Validate the configuration and the embedding length (no pairwise work yet)
//! 2. Time-delay embed the series
//! 3. Compute the distance matrix (optionally on standardized axes)
//! 4. Threshold it into a recurrence matrix
//!
//! The returned [`RecurrenceAnalysis`] owns the immutable artifacts; RQA and
//! network measures are computed from it on demand.

use tracing::debug;

use crate::config::{RecurrenceConfig, ThresholdMode};
use crate::distance::{compute_distance_matrix, DistanceMatrix};
use crate::embedding::{embedded_len, EmbeddedVectorSet, TimeSeries};
use crate::error::{RecurrenceError, Result};
use crate::graph_stats::NetworkMeasures;
use crate::network::RecurrenceNetwork;
use crate::recurrence::{build_recurrence_matrix, RecurrenceMatrix};
use crate::rqa::{self, RqaMeasures};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Artifacts of one recurrence analysis run.
#[derive(Debug, Clone)]
pub struct RecurrenceAnalysis {
    config: RecurrenceConfig,
    embedding: EmbeddedVectorSet,
    distances: DistanceMatrix,
    matrix: RecurrenceMatrix,
}

/// Check `config` against a series of `len` samples without doing any work.
///
/// # Errors
///
/// Returns the configuration error [`analyze`] would return.
pub fn validate_inputs(len: usize, config: &RecurrenceConfig) -> Result<usize> {
    config.validate()?;
    let n = embedded_len(len, config.dim, config.tau)?;
    if matches!(config.threshold, ThresholdMode::RecurrenceRate(_)) && n < 2 {
        return Err(RecurrenceError::invalid_config(format!(
            "a recurrence rate needs at least 2 embedded states, got {n}"
        )));
    }
    Ok(n)
}

/// Run the recurrence analysis of `series` under `config`.
///
/// # Errors
///
/// Returns a configuration error for invalid parameters or a series too
/// short for the embedding, and a numerical error if normalization meets a
/// constant axis. All of these are raised before the distance matrix is built.
///
/// # Example
///
/// ```
/// use recurrence_network::{analyze, RecurrenceConfig, TimeSeries};
///
/// let series = TimeSeries::new((0..100).map(|i| (i as f64 * 0.3).sin()).collect())?;
/// let analysis = analyze(&series, &RecurrenceConfig::fixed_recurrence_rate(0.1))?;
///
/// assert!(analysis.recurrence_rate() >= 0.1);
/// # Ok::<(), recurrence_network::RecurrenceError>(())
/// ```
#[tracing::instrument(skip_all, fields(len = series.len(), dim = config.dim, tau = config.tau, metric = %config.metric))]
pub fn analyze(series: &TimeSeries, config: &RecurrenceConfig) -> Result<RecurrenceAnalysis> {
    let n = validate_inputs(series.len(), config)?;
    debug!(n, "Validated configuration");

    let embedding = series.embed(config.dim, config.tau)?;
    analyze_embedding(embedding, config)
}

/// Run the analysis on already reconstructed phase-space points.
///
/// `config.dim` and `config.tau` are ignored; every other field applies.
///
/// # Errors
///
/// As [`analyze`].
pub fn analyze_embedding(embedding: EmbeddedVectorSet, config: &RecurrenceConfig) -> Result<RecurrenceAnalysis> {
    config.validate()?;
    if matches!(config.threshold, ThresholdMode::RecurrenceRate(_)) && embedding.len() < 2 {
        return Err(RecurrenceError::invalid_config(format!(
            "a recurrence rate needs at least 2 embedded states, got {}",
            embedding.len()
        )));
    }

    let distances = compute_distance_matrix(&embedding, config.metric, config.normalize)?;
    let matrix = build_recurrence_matrix(&distances, config.threshold)?;

    Ok(RecurrenceAnalysis {
        config: config.clone(),
        embedding,
        distances,
        matrix,
    })
}

impl RecurrenceAnalysis {
    /// Configuration the analysis ran with.
    #[must_use]
    pub const fn config(&self) -> &RecurrenceConfig {
        &self.config
    }

    /// Embedded states.
    #[must_use]
    pub const fn embedding(&self) -> &EmbeddedVectorSet {
        &self.embedding
    }

    /// Pairwise distances.
    #[must_use]
    pub const fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Binary recurrence matrix.
    #[must_use]
    pub const fn recurrence_matrix(&self) -> &RecurrenceMatrix {
        &self.matrix
    }

    /// Threshold that produced the matrix (chosen or given).
    #[must_use]
    pub const fn threshold(&self) -> Option<f64> {
        self.matrix.threshold()
    }

    /// Realized recurrence rate.
    #[must_use]
    pub fn recurrence_rate(&self) -> f64 {
        self.matrix.recurrence_rate()
    }

    /// Determinism for minimal diagonal line length `l_min`.
    ///
    /// # Errors
    ///
    /// Returns an error if `l_min == 0`.
    pub fn determinism(&self, l_min: usize) -> Result<f64> {
        rqa::determinism(&self.matrix, l_min)
    }

    /// Laminarity for minimal vertical line length `v_min`.
    ///
    /// # Errors
    ///
    /// Returns an error if `v_min == 0`.
    pub fn laminarity(&self, v_min: usize) -> Result<f64> {
        rqa::laminarity(&self.matrix, v_min)
    }

    /// RQA measures with the configured line minima.
    ///
    /// # Errors
    ///
    /// Never fails for a validated configuration.
    pub fn rqa(&self) -> Result<RqaMeasures> {
        RqaMeasures::compute(&self.matrix, self.config.l_min, self.config.v_min)
    }

    /// Recurrence network of the matrix.
    #[must_use]
    pub fn network(&self) -> RecurrenceNetwork {
        RecurrenceNetwork::from_matrix(&self.matrix)
    }

    /// All RQA and network statistics.
    ///
    /// # Errors
    ///
    /// Never fails for a validated configuration.
    pub fn statistics(&self) -> Result<RecurrenceStatistics> {
        let rqa = self.rqa()?;
        let network = NetworkMeasures::compute(&self.network());
        if !network.average_path_length.is_connected() {
            debug!(
                coverage = network.average_path_length.coverage(),
                components = network.component_count,
                "Recurrence network is disconnected"
            );
        }
        Ok(RecurrenceStatistics {
            threshold: self.threshold(),
            rqa,
            network,
        })
    }
}

/// Every scalar produced by a recurrence analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecurrenceStatistics {
    /// Threshold behind the recurrence matrix.
    pub threshold: Option<f64>,
    /// Recurrence quantification measures.
    pub rqa: RqaMeasures,
    /// Recurrence network measures.
    pub network: NetworkMeasures,
}

impl RecurrenceStatistics {
    /// Realized recurrence rate.
    #[must_use]
    pub const fn recurrence_rate(&self) -> f64 {
        self.rqa.recurrence_rate
    }

    /// Average path length over reachable pairs.
    #[must_use]
    pub const fn average_path_length(&self) -> f64 {
        self.network.average_path_length.average
    }

    /// Network transitivity.
    #[must_use]
    pub const fn transitivity(&self) -> f64 {
        self.network.transitivity
    }

    /// Network global clustering.
    #[must_use]
    pub const fn global_clustering(&self) -> f64 {
        self.network.global_clustering
    }

    /// Network degree assortativity.
    #[must_use]
    pub const fn assortativity(&self) -> f64 {
        self.network.assortativity
    }
}
