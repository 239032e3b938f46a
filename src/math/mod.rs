//! Mathematical utilities for recurrence analysis.
//!
//! This module provides:
//! - [`stats`]: axis standardization and histogram entropy

pub mod stats;

pub use stats::{shannon_entropy, standardize_rows};
