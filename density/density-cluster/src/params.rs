//! Clustering parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, ClusterResult};

/// Parameters for density-tiered clustering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterParams {
    /// Density tiers, visited from highest to lowest. Default: `[0.75, 0.5, 0.25]`.
    pub thresholds: Vec<f64>,

    /// Minimum neighbours (self included) for a core point, and minimum
    /// cluster size. Default: 5.
    pub min_cluster_size: usize,

    /// Neighbourhood radius in scan units. Default: 0.05.
    pub epsilon: f64,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            thresholds: vec![0.75, 0.5, 0.25],
            min_cluster_size: 5,
            epsilon: 0.05,
        }
    }
}

impl ClusterParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for dense, high-resolution scans.
    ///
    /// More tiers and a tighter neighbourhood.
    #[must_use]
    pub fn fine() -> Self {
        Self {
            thresholds: vec![0.9, 0.75, 0.6, 0.45, 0.3, 0.15],
            min_cluster_size: 8,
            epsilon: 0.025,
        }
    }

    /// Parameters for sparse scans.
    ///
    /// Two tiers and a wide neighbourhood.
    #[must_use]
    pub fn coarse() -> Self {
        Self {
            thresholds: vec![0.6, 0.3],
            min_cluster_size: 3,
            epsilon: 0.1,
        }
    }

    /// Sets the density thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: impl Into<Vec<f64>>) -> Self {
        self.thresholds = thresholds.into();
        self
    }

    /// Sets the minimum cluster size.
    #[must_use]
    pub const fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    /// Sets the neighbourhood radius.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidParams`] if `epsilon` is not positive
    /// and finite, `min_cluster_size` is zero, or a threshold is not finite.
    pub fn validate(&self) -> ClusterResult<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ClusterError::invalid_params(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.min_cluster_size == 0 {
            return Err(ClusterError::invalid_params(
                "min_cluster_size must be at least 1",
            ));
        }
        if let Some(bad) = self.thresholds.iter().find(|t| !t.is_finite()) {
            return Err(ClusterError::invalid_params(format!(
                "thresholds must be finite, got {bad}"
            )));
        }
        Ok(())
    }

    /// Thresholds sorted from highest to lowest with duplicates removed.
    #[must_use]
    pub fn descending_thresholds(&self) -> Vec<f64> {
        let mut tiers = self.thresholds.clone();
        tiers.sort_by(|a, b| b.total_cmp(a));
        tiers.dedup();
        tiers
    }
}
