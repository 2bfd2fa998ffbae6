//! Cluster-to-region segmentation.

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use scan_polygon::convex_hull;
use scan_types::DensityPoint;
use tracing::{debug, info};

use crate::error::{SegmentError, SegmentResult};
use crate::region::SegmentedRegion;

/// Builds [`SegmentedRegion`]s from density clusters.
///
/// Optionally carries a table of target densities keyed by region name,
/// applied to every region whose name matches.
#[derive(Debug, Clone, Default)]
pub struct RegionSegmenter {
    targets: HashMap<String, f64>,
}

impl RegionSegmenter {
    /// Create a segmenter with no target densities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target density for the region named `name`.
    #[must_use]
    pub fn with_target(mut self, name: impl Into<String>, density: f64) -> Self {
        self.targets.insert(name.into(), density);
        self
    }

    /// Add every entry of `targets` to the target table.
    #[must_use]
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.targets
            .extend(targets.into_iter().map(|(name, density)| (name.into(), density)));
        self
    }

    /// Target density configured for `name`.
    #[must_use]
    pub fn target_for(&self, name: &str) -> Option<f64> {
        self.targets.get(name).copied()
    }

    /// Segment clusters into regions named `region-0`, `region-1`, ...
    ///
    /// # Errors
    ///
    /// - [`SegmentError::InsufficientPoints`] if any cluster has fewer than three points
    /// - [`SegmentError::Boundary`] if any cluster's hull cannot be built
    pub fn segment(&self, clusters: &[Vec<DensityPoint>]) -> SegmentResult<Vec<SegmentedRegion>> {
        let names: Vec<String> = (0..clusters.len()).map(|i| format!("region-{i}")).collect();
        self.segment_named(clusters, &names)
    }

    /// Segment clusters into regions with caller-supplied names.
    ///
    /// # Errors
    ///
    /// - [`SegmentError::NameCountMismatch`] if `names` and `clusters` differ in length
    /// - [`SegmentError::DuplicateName`] if a name repeats
    /// - [`SegmentError::InsufficientPoints`] if any cluster has fewer than three points
    /// - [`SegmentError::Boundary`] if any cluster's hull cannot be built
    pub fn segment_named<S: AsRef<str>>(
        &self,
        clusters: &[Vec<DensityPoint>],
        names: &[S],
    ) -> SegmentResult<Vec<SegmentedRegion>> {
        if names.len() != clusters.len() {
            return Err(SegmentError::NameCountMismatch {
                clusters: clusters.len(),
                names: names.len(),
            });
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.as_ref()) {
                return Err(SegmentError::DuplicateName(name.as_ref().to_string()));
            }
        }

        // Point counts for every cluster first, then geometry
        if let Some((cluster, members)) = clusters.iter().enumerate().find(|(_, c)| c.len() < 3) {
            return Err(SegmentError::InsufficientPoints {
                cluster,
                actual: members.len(),
            });
        }

        let boundaries = clusters
            .iter()
            .enumerate()
            .map(|(cluster, members)| {
                let positions: Vec<Point3<f64>> = members.iter().map(|p| p.position).collect();
                convex_hull(&positions).map_err(|source| SegmentError::Boundary { cluster, source })
            })
            .collect::<SegmentResult<Vec<_>>>()?;

        let regions: Vec<SegmentedRegion> = clusters
            .iter()
            .zip(boundaries)
            .zip(names)
            .map(|((members, boundary), name)| {
                let (mean_density, density_variance) = density_stats(members);
                let name = name.as_ref().to_string();
                debug!(
                    region = %name,
                    points = members.len(),
                    hull = boundary.len(),
                    mean_density,
                    "region segmented"
                );
                SegmentedRegion {
                    target_density: self.target_for(&name),
                    name,
                    boundary,
                    mean_density,
                    density_variance,
                    point_count: members.len(),
                }
            })
            .collect();

        info!(regions = regions.len(), "segmentation complete");
        Ok(regions)
    }
}

/// Mean and population variance of member densities.
fn density_stats(members: &[DensityPoint]) -> (f64, f64) {
    if members.is_empty() {
        return (0.0, 0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    // Precision: cluster sizes are far below 2^52
    let n = members.len() as f64;
    let mean = members.iter().map(|p| p.density).sum::<f64>() / n;
    let variance = members
        .iter()
        .map(|p| (p.density - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scan_polygon::polygon_area;

    fn square_cluster(x0: f64, y0: f64, size: f64, density: f64) -> Vec<DensityPoint> {
        vec![
            DensityPoint::from_coords(x0, y0, 0.0, density),
            DensityPoint::from_coords(x0 + size, y0, 0.0, density),
            DensityPoint::from_coords(x0 + size, y0 + size, 0.0, density),
            DensityPoint::from_coords(x0, y0 + size, 0.0, density),
            DensityPoint::from_coords(x0 + size / 2.0, y0 + size / 2.0, 0.0, density),
        ]
    }

    #[test]
    fn test_generated_names() {
        let clusters = vec![
            square_cluster(0.0, 0.0, 0.1, 0.5),
            square_cluster(0.5, 0.5, 0.1, 0.7),
        ];
        let regions = RegionSegmenter::new().segment(&clusters).unwrap();
        assert_eq!(regions[0].name, "region-0");
        assert_eq!(regions[1].name, "region-1");
        assert_eq!(regions[1].point_count, 5);
        assert_relative_eq!(regions[1].mean_density, 0.7, epsilon = 1e-12);
        assert_relative_eq!(regions[1].density_variance, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_population_variance() {
        let cluster = vec![
            DensityPoint::from_coords(0.0, 0.0, 0.0, 0.2),
            DensityPoint::from_coords(1.0, 0.0, 0.0, 0.4),
            DensityPoint::from_coords(0.0, 1.0, 0.0, 0.6),
            DensityPoint::from_coords(1.0, 1.0, 0.0, 0.8),
        ];
        let regions = RegionSegmenter::new().segment(&[cluster]).unwrap();
        assert_relative_eq!(regions[0].mean_density, 0.5, epsilon = 1e-12);
        assert_relative_eq!(regions[0].density_variance, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_area_round_trip() {
        let cluster: Vec<DensityPoint> = (0..40)
            .map(|i| {
                let t = f64::from(i) * 0.61;
                let r = 0.1 + 0.05 * (t * 3.0).sin();
                DensityPoint::from_coords(0.5 + r * t.cos(), 0.5 + r * t.sin(), 0.0, 0.6)
            })
            .collect();
        let positions: Vec<Point3<f64>> = cluster.iter().map(|p| p.position).collect();
        let direct = polygon_area(&convex_hull(&positions).unwrap()).unwrap();

        let regions = RegionSegmenter::new().segment(&[cluster]).unwrap();
        let measured = regions[0].area().unwrap();
        assert!((measured - direct).abs() <= 0.01 * direct);
    }

    #[test]
    fn test_targets_applied_by_name() {
        let clusters = vec![
            square_cluster(0.0, 0.0, 0.1, 0.5),
            square_cluster(0.5, 0.5, 0.1, 0.7),
        ];
        let segmenter = RegionSegmenter::new().with_targets([("crown", 0.9)]);
        let regions = segmenter
            .segment_named(&clusters, &["crown", "temple"])
            .unwrap();
        assert_eq!(regions[0].target_density, Some(0.9));
        assert_eq!(regions[1].target_density, None);
    }

    #[test]
    fn test_duplicate_names() {
        let clusters = vec![
            square_cluster(0.0, 0.0, 0.1, 0.5),
            square_cluster(0.5, 0.5, 0.1, 0.7),
        ];
        let result = RegionSegmenter::new().segment_named(&clusters, &["crown", "crown"]);
        assert!(matches!(result, Err(SegmentError::DuplicateName(name)) if name == "crown"));
    }

    #[test]
    fn test_name_count_mismatch() {
        let clusters = vec![square_cluster(0.0, 0.0, 0.1, 0.5)];
        let result = RegionSegmenter::new().segment_named(&clusters, &["a", "b"]);
        assert!(matches!(
            result,
            Err(SegmentError::NameCountMismatch {
                clusters: 1,
                names: 2
            })
        ));
    }

    #[test]
    fn test_small_cluster_reported_before_geometry() {
        // Cluster 0 is collinear, cluster 1 is too small: the size check wins
        let collinear = vec![
            DensityPoint::from_coords(0.0, 0.0, 0.0, 0.5),
            DensityPoint::from_coords(0.1, 0.1, 0.0, 0.5),
            DensityPoint::from_coords(0.2, 0.2, 0.0, 0.5),
        ];
        let tiny = vec![DensityPoint::from_coords(0.5, 0.5, 0.0, 0.5)];
        let result = RegionSegmenter::new().segment(&[collinear, tiny]);
        assert!(matches!(
            result,
            Err(SegmentError::InsufficientPoints {
                cluster: 1,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_collinear_cluster() {
        let collinear = vec![
            DensityPoint::from_coords(0.0, 0.0, 0.0, 0.5),
            DensityPoint::from_coords(0.1, 0.1, 0.0, 0.5),
            DensityPoint::from_coords(0.2, 0.2, 0.0, 0.5),
        ];
        let result = RegionSegmenter::new().segment(&[collinear]);
        assert!(matches!(
            result,
            Err(SegmentError::Boundary { cluster: 0, .. })
        ));
    }

    #[test]
    fn test_no_clusters() {
        let regions = RegionSegmenter::new().segment(&[]).unwrap();
        assert!(regions.is_empty());
    }
}
