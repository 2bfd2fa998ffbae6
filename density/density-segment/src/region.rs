//! Segmented density regions.

use nalgebra::Point3;
use scan_polygon::{PolygonResult, point_in_polygon, polygon_area};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named region of similar density with a convex boundary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentedRegion {
    /// Region name, unique within one segmentation.
    pub name: String,

    /// Counter-clockwise convex boundary in XY, at least three non-collinear points.
    pub boundary: Vec<Point3<f64>>,

    /// Mean density of the member points.
    pub mean_density: f64,

    /// Population variance of the member densities.
    pub density_variance: f64,

    /// Desired density for this region, if one was configured.
    pub target_density: Option<f64>,

    /// Number of member points.
    pub point_count: usize,
}

/// Name used by density maps for their regions.
pub type DensityRegion = SegmentedRegion;

impl SegmentedRegion {
    /// Area enclosed by the boundary, measured in XY.
    ///
    /// # Errors
    ///
    /// Propagates geometry failures from [`polygon_area`]; a boundary built
    /// by the segmenter is always valid.
    pub fn area(&self) -> PolygonResult<f64> {
        polygon_area(&self.boundary)
    }

    /// Whether `point` lies inside the boundary (XY, even-odd rule).
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point_in_polygon(point, &self.boundary)
    }

    /// Standard deviation of member densities.
    #[must_use]
    pub fn density_std_dev(&self) -> f64 {
        self.density_variance.sqrt()
    }

    /// Shortfall between the target and the measured mean, if a target is set.
    ///
    /// Positive when the region is below target.
    #[must_use]
    pub fn density_deficit(&self) -> Option<f64> {
        self.target_density.map(|target| target - self.mean_density)
    }
}
