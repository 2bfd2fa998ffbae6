//! Density-annotated surface samples.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A surface position annotated with coverage density.
///
/// Produced per scan by external feature analysis and consumed by clustering
/// and interpolation. Both scalars are normalized to `[0, 1]`.
///
/// # Example
///
/// ```
/// use scan_types::{DensityPoint, Point3};
///
/// // Out-of-range values are clamped
/// let p = DensityPoint::new(Point3::new(0.1, 0.2, 0.0), 1.4, -0.2);
/// assert!((p.density - 1.0).abs() < f64::EPSILON);
/// assert!(p.confidence.abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DensityPoint {
    /// Surface position.
    pub position: Point3<f64>,
    /// Normalized coverage density in `[0, 1]`.
    pub density: f64,
    /// Detection confidence in `[0, 1]`.
    pub confidence: f64,
}

impl DensityPoint {
    /// Create a density point, clamping density and confidence to `[0, 1]`.
    ///
    /// Non-finite scalars are treated as `0.0`.
    #[must_use]
    pub fn new(position: Point3<f64>, density: f64, confidence: f64) -> Self {
        Self {
            position,
            density: unit_clamp(density),
            confidence: unit_clamp(confidence),
        }
    }

    /// Create a fully confident density point from raw coordinates.
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64, density: f64) -> Self {
        Self::new(Point3::new(x, y, z), density, 1.0)
    }

    /// Squared Euclidean distance between two points' positions.
    #[inline]
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        (self.position - other.position).norm_squared()
    }
}

fn unit_clamp(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
