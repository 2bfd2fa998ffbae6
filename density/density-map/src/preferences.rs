//! Density analysis preferences.

use std::collections::BTreeMap;

use density_cluster::ClusterParams;
use density_segment::RegionSegmenter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::backend::BackendChoice;
use crate::error::{DensityMapError, DensityMapResult};

/// Smallest cluster that can still form a region boundary.
pub const MIN_REGION_POINTS: usize = 3;

/// Everything needed to run clustering, segmentation and interpolation.
///
/// # Example
///
/// ```
/// use density_map::{BackendChoice, DensityPreferences};
///
/// let prefs = DensityPreferences::default()
///     .with_resolution(0.02)
///     .with_backend(BackendChoice::Sequential)
///     .with_region_target("crown", 0.8);
///
/// assert!(prefs.validate().is_ok());
/// assert_eq!(prefs.cluster_params().min_cluster_size, prefs.min_region_size);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DensityPreferences {
    /// Clustering density tiers. Default: `[0.75, 0.5, 0.25]`.
    pub thresholds: Vec<f64>,
    /// Minimum points per region. Default: 5.
    pub min_region_size: usize,
    /// Clustering neighbourhood radius. Default: 0.05.
    pub epsilon: f64,
    /// Grid cell size as a fraction of the unit domain. Default: 0.01.
    pub resolution: f64,
    /// Share of the Gaussian kernel applied, in `[0, 1]`. Default: 1.0.
    pub smoothing_factor: f64,
    /// Target densities by region name.
    pub region_targets: BTreeMap<String, f64>,
    /// Interpolation backend. Default: [`BackendChoice::Auto`].
    pub backend: BackendChoice,
}

impl Default for DensityPreferences {
    fn default() -> Self {
        let cluster = ClusterParams::default();
        Self {
            thresholds: cluster.thresholds,
            min_region_size: cluster.min_cluster_size,
            epsilon: cluster.epsilon,
            resolution: 0.01,
            smoothing_factor: 1.0,
            region_targets: BTreeMap::new(),
            backend: BackendChoice::Auto,
        }
    }
}

impl DensityPreferences {
    /// Sets the grid resolution.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the smoothing factor.
    #[must_use]
    pub const fn with_smoothing_factor(mut self, factor: f64) -> Self {
        self.smoothing_factor = factor;
        self
    }

    /// Sets the interpolation backend.
    #[must_use]
    pub const fn with_backend(mut self, backend: BackendChoice) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the minimum region size.
    #[must_use]
    pub const fn with_min_region_size(mut self, size: usize) -> Self {
        self.min_region_size = size;
        self
    }

    /// Sets the clustering radius.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the clustering thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: impl Into<Vec<f64>>) -> Self {
        self.thresholds = thresholds.into();
        self
    }

    /// Sets the target density for one region.
    #[must_use]
    pub fn with_region_target(mut self, name: impl Into<String>, density: f64) -> Self {
        self.region_targets.insert(name.into(), density);
        self
    }

    /// Check the map-level parameters.
    ///
    /// Thresholds and epsilon are validated by the clusterer.
    ///
    /// # Errors
    ///
    /// - [`DensityMapError::InvalidResolution`] for a resolution outside `(0, 1]`
    /// - [`DensityMapError::InvalidParams`] for a smoothing factor outside
    ///   `[0, 1]` or a `min_region_size` below [`MIN_REGION_POINTS`]
    pub fn validate(&self) -> DensityMapResult<()> {
        crate::grid::grid_size_for(self.resolution)?;
        if self.min_region_size < MIN_REGION_POINTS {
            return Err(DensityMapError::invalid_params(format!(
                "min_region_size must be at least {MIN_REGION_POINTS}, got {}",
                self.min_region_size
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing_factor) {
            return Err(DensityMapError::invalid_params(format!(
                "smoothing_factor must lie in [0, 1], got {}",
                self.smoothing_factor
            )));
        }
        Ok(())
    }

    /// Clustering parameters derived from these preferences.
    #[must_use]
    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams::default()
            .with_thresholds(self.thresholds.clone())
            .with_min_cluster_size(self.min_region_size)
            .with_epsilon(self.epsilon)
    }

    /// Segmenter carrying the region target table.
    #[must_use]
    pub fn segmenter(&self) -> RegionSegmenter {
        RegionSegmenter::new().with_targets(
            self.region_targets
                .iter()
                .map(|(name, density)| (name.clone(), *density)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_region_size_needs_a_polygon() {
        for size in [0, 1, 2] {
            let prefs = DensityPreferences::default().with_min_region_size(size);
            assert!(matches!(
                prefs.validate(),
                Err(DensityMapError::InvalidParams(_))
            ));
        }
        assert!(DensityPreferences::default().with_min_region_size(3).validate().is_ok());
    }

    #[test]
    fn test_default_valid() {
        assert!(DensityPreferences::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_resolution() {
        let prefs = DensityPreferences::default().with_resolution(0.0);
        assert_eq!(
            prefs.validate(),
            Err(DensityMapError::InvalidResolution(0.0))
        );
    }

    #[test]
    fn test_invalid_smoothing() {
        let prefs = DensityPreferences::default().with_smoothing_factor(1.5);
        assert!(matches!(
            prefs.validate(),
            Err(DensityMapError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_derived_components() {
        let prefs = DensityPreferences::default()
            .with_thresholds([0.9])
            .with_epsilon(0.2)
            .with_min_region_size(7)
            .with_region_target("crown", 0.6);

        let params = prefs.cluster_params();
        assert_eq!(params.thresholds, vec![0.9]);
        assert_eq!(params.min_cluster_size, 7);
        assert!((params.epsilon - 0.2).abs() < f64::EPSILON);

        assert_eq!(prefs.segmenter().target_for("crown"), Some(0.6));
    }
}
