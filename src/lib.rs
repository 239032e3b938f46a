//! Recurrence Network Library
//!
//! Recurrence plots, recurrence quantification analysis (RQA) and recurrence
//! networks for scalar time series.
//!
//! A series is time-delay embedded into phase space, all pairwise state
//! distances are measured, and pairs closer than a threshold are marked as
//! recurrent. The resulting binary matrix is analysed directly (RQA) and as
//! the adjacency matrix of an undirected graph (recurrence network).
//!
//! # Quick Start
//!
//! ```
//! use recurrence_network::{analyze, RecurrenceConfig, TimeSeries};
//!
//! // Logistic map in its chaotic regime
//! let mut x = 0.7;
//! let samples: Vec<f64> = (0..150)
//!     .map(|_| {
//!         let current = x;
//!         x = 3.679 * x * (1.0 - x);
//!         current
//!     })
//!     .collect();
//! let series = TimeSeries::new(samples)?;
//!
//! let analysis = analyze(&series, &RecurrenceConfig::fixed_recurrence_rate(0.05))?;
//! let stats = analysis.statistics()?;
//!
//! assert!(stats.recurrence_rate() >= 0.05);
//! println!("DET = {}", stats.rqa.determinism);
//! println!("L   = {}", stats.average_path_length());
//! # Ok::<(), recurrence_network::RecurrenceError>(())
//! ```
//!
//! # Stages
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Embedding | [`embedding`] | [`EmbeddedVectorSet`] |
//! | Distances | [`distance`] | [`DistanceMatrix`] |
//! | Thresholding | [`recurrence`] | [`RecurrenceMatrix`] |
//! | RQA | [`rqa`] | [`RqaMeasures`] |
//! | Network | [`network`] | [`RecurrenceNetwork`] |
//! | Graph statistics | [`graph_stats`] | [`NetworkMeasures`] |
//!
//! Every stage is a pure function of its inputs and can be used on its own.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod config;
pub mod distance;
pub mod embedding;
pub mod error;
pub mod graph_stats;
pub mod math;
pub mod network;
pub mod pipeline;
pub mod recurrence;
pub mod rqa;

// Re-exports for convenient access
pub use config::{Metric, RecurrenceConfig, ThresholdMode};
pub use distance::{compute_distance_matrix, DistanceMatrix};
pub use embedding::{embedded_len, EmbeddedVectorSet, TimeSeries};
pub use error::{ErrorKind, RecurrenceError, Result};
pub use graph_stats::{
    assortativity, average_path_length, global_clustering, local_clustering, transitivity,
    NetworkMeasures, PathLengthSummary,
};
pub use network::RecurrenceNetwork;
pub use pipeline::{analyze, analyze_embedding, validate_inputs, RecurrenceAnalysis, RecurrenceStatistics};
pub use recurrence::{
    build_recurrence_matrix, resolve_threshold, threshold_for_recurrence_rate, RecurrenceMatrix,
};
pub use rqa::{determinism, laminarity, recurrence_rate, LineDistribution, RqaMeasures};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default minimal line length for determinism and laminarity.
pub const DEFAULT_MIN_LINE_LENGTH: usize = 2;
