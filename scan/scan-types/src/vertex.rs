//! Scanned surface vertices.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vertex of a captured scalp scan.
///
/// Mirrors the per-vertex payload produced by the capture layer: position,
/// surface normal and capture confidence. Scans that carry a depth sample
/// below the surface also provide a `thickness` value.
///
/// # Example
///
/// ```
/// use scan_types::{ScanVertex, Vector3};
///
/// let v = ScanVertex::from_coords(1.0, 2.0, 3.0)
///     .with_normal(Vector3::z())
///     .with_confidence(0.75)
///     .with_thickness(0.6);
///
/// assert_eq!(v.normal, Some(Vector3::z()));
/// assert!((v.confidence - 0.75).abs() < f64::EPSILON);
/// assert_eq!(v.thickness, Some(0.6));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanVertex {
    /// Vertex position.
    pub position: Point3<f64>,
    /// Unit surface normal, if the capture layer provided one.
    pub normal: Option<Vector3<f64>>,
    /// Capture confidence in `[0, 1]`.
    pub confidence: f64,
    /// Tissue thickness sampled at this vertex, if available.
    pub thickness: Option<f64>,
}

impl ScanVertex {
    /// Create a fully confident vertex with no normal or thickness.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
            confidence: 1.0,
            thickness: None,
        }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Attach a surface normal. Zero-length normals are dropped.
    #[must_use]
    pub fn with_normal(mut self, normal: Vector3<f64>) -> Self {
        self.normal = normal.try_normalize(f64::EPSILON);
        self
    }

    /// Set the capture confidence, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Attach a thickness sample. Negative or non-finite values are dropped.
    #[must_use]
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = (thickness.is_finite() && thickness >= 0.0).then_some(thickness);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let v = ScanVertex::from_coords(0.0, 0.0, 0.0);
        assert!(v.normal.is_none());
        assert!(v.thickness.is_none());
        assert!((v.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normal_is_normalized() {
        let v = ScanVertex::from_coords(0.0, 0.0, 0.0).with_normal(Vector3::new(0.0, 0.0, 5.0));
        let n = v.normal.unwrap();
        assert!((n.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_normal_dropped() {
        let v = ScanVertex::from_coords(0.0, 0.0, 0.0).with_normal(Vector3::zeros());
        assert!(v.normal.is_none());
    }

    #[test]
    fn test_invalid_thickness_dropped() {
        let v = ScanVertex::from_coords(0.0, 0.0, 0.0).with_thickness(-1.0);
        assert!(v.thickness.is_none());
    }
}
