//! Threshold-tiered clustering driver.

use nalgebra::Point3;
use scan_types::{AbortSignal, DensityPoint};
use tracing::{debug, info};

use crate::dbscan::dbscan;
use crate::error::{ClusterError, ClusterResult};
use crate::params::ClusterParams;

/// Groups density points into spatial clusters, highest density tier first.
#[derive(Debug, Clone, Default)]
pub struct DensityClusterer {
    params: ClusterParams,
    abort: AbortSignal,
}

impl DensityClusterer {
    /// Create a clusterer with the given parameters.
    #[must_use]
    pub fn new(params: ClusterParams) -> Self {
        Self {
            params,
            abort: AbortSignal::new(),
        }
    }

    /// Attach a cancellation signal.
    #[must_use]
    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.abort = abort;
        self
    }

    /// The clustering parameters.
    #[must_use]
    pub const fn params(&self) -> &ClusterParams {
        &self.params
    }

    /// Cluster `points` tier by tier.
    ///
    /// Each point belongs to at most one returned cluster. Every returned
    /// cluster has at least `min_cluster_size` points. Clusters appear in
    /// tier order, then discovery order within a tier.
    ///
    /// # Errors
    ///
    /// - [`ClusterError::InvalidParams`] if the parameters fail validation
    /// - [`ClusterError::Cancelled`] if the abort signal is raised
    /// - [`ClusterError::Spatial`] if a position is non-finite
    pub fn cluster(&self, points: &[DensityPoint]) -> ClusterResult<Vec<Vec<DensityPoint>>> {
        self.params.validate()?;
        let min_size = self.params.min_cluster_size;

        let mut pool: Vec<usize> = (0..points.len()).collect();
        let mut clustered = vec![false; points.len()];
        let mut clusters = Vec::new();

        for threshold in self.params.descending_thresholds() {
            if self.abort.is_aborted() {
                return Err(ClusterError::Cancelled);
            }

            let candidates: Vec<usize> = pool
                .iter()
                .copied()
                .filter(|&i| points[i].density >= threshold)
                .collect();
            if candidates.len() < min_size {
                debug!(threshold, candidates = candidates.len(), "tier skipped");
                continue;
            }

            let positions: Vec<Point3<f64>> = candidates.iter().map(|&i| points[i].position).collect();
            let groups = dbscan(&positions, self.params.epsilon, min_size, &self.abort)?;

            let before = clusters.len();
            for group in groups.into_iter().filter(|g| g.len() >= min_size) {
                let cluster: Vec<DensityPoint> = group
                    .iter()
                    .map(|&k| {
                        let original = candidates[k];
                        clustered[original] = true;
                        points[original]
                    })
                    .collect();
                clusters.push(cluster);
            }
            pool.retain(|&i| !clustered[i]);

            debug!(
                threshold,
                candidates = candidates.len(),
                clusters = clusters.len() - before,
                remaining = pool.len(),
                "tier clustered"
            );
        }

        info!(
            points = points.len(),
            clusters = clusters.len(),
            unclustered = pool.len(),
            "density clustering complete"
        );
        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    /// Ten points inside a 0.05-radius circle around `(cx, cy)`.
    fn blob(cx: f64, cy: f64, density: f64) -> Vec<DensityPoint> {
        (0..10)
            .map(|i| {
                let t = f64::from(i) / 10.0;
                let r = 0.045 * (0.3 + 0.7 * t);
                let angle = TAU * t * 3.0;
                DensityPoint::from_coords(cx + r * angle.cos(), cy + r * angle.sin(), 0.0, density)
            })
            .collect()
    }

    fn noise(density: f64) -> Vec<DensityPoint> {
        [(0.05, 0.05), (0.95, 0.05), (0.05, 0.95), (0.95, 0.95), (0.5, 0.9)]
            .into_iter()
            .map(|(x, y)| DensityPoint::from_coords(x, y, 0.0, density))
            .collect()
    }

    #[test]
    fn test_blob_with_noise() {
        let mut points = blob(0.5, 0.5, 0.9);
        points.extend(noise(0.9));

        let params = ClusterParams::default()
            .with_min_cluster_size(5)
            .with_epsilon(0.1);
        let clusters = DensityClusterer::new(params).cluster(&points).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 10);
    }

    #[test]
    fn test_tiers_do_not_reclaim_points() {
        let mut points = blob(0.3, 0.3, 0.9);
        points.extend(blob(0.7, 0.7, 0.4));

        let params = ClusterParams::default()
            .with_thresholds([0.3, 0.8])
            .with_min_cluster_size(5)
            .with_epsilon(0.1);
        let clusters = DensityClusterer::new(params).cluster(&points).unwrap();

        assert_eq!(clusters.len(), 2);
        // High tier first
        assert!(clusters[0].iter().all(|p| p.density > 0.8));
        assert!(clusters[1].iter().all(|p| p.density < 0.5));

        let total: usize = clusters.iter().map(Vec::len).sum();
        assert_eq!(total, points.len());
    }

    #[test]
    fn test_below_every_threshold() {
        let points = blob(0.5, 0.5, 0.1);
        let params = ClusterParams::default().with_thresholds([0.5]);
        let clusters = DensityClusterer::new(params).cluster(&points).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_small_clusters_dropped() {
        let points: Vec<DensityPoint> = blob(0.5, 0.5, 0.9).into_iter().take(4).collect();
        let params = ClusterParams::default()
            .with_min_cluster_size(5)
            .with_epsilon(0.1);
        let clusters = DensityClusterer::new(params).cluster(&points).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let clusters = DensityClusterer::default().cluster(&[]).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_invalid_params() {
        let params = ClusterParams::default().with_epsilon(-1.0);
        let result = DensityClusterer::new(params).cluster(&blob(0.5, 0.5, 0.9));
        assert!(matches!(result, Err(ClusterError::InvalidParams(_))));
    }

    #[test]
    fn test_cancelled_before_start() {
        let signal = AbortSignal::new();
        signal.abort();
        let clusterer = DensityClusterer::default().with_abort(signal);
        let result = clusterer.cluster(&blob(0.5, 0.5, 0.9));
        assert!(matches!(result, Err(ClusterError::Cancelled)));
    }
}
