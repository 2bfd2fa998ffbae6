//! Scan mesh.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, ScanVertex};

/// An indexed triangle mesh of scan vertices.
///
/// Faces use counter-clockwise winding when viewed from outside the head.
/// Face indices that point past the vertex array are skipped by every
/// accessor rather than panicking.
///
/// # Example
///
/// ```
/// use scan_types::{ScanMesh, ScanVertex};
///
/// let mesh = ScanMesh::from_parts(
///     vec![
///         ScanVertex::from_coords(0.0, 0.0, 0.0),
///         ScanVertex::from_coords(2.0, 0.0, 0.0),
///         ScanVertex::from_coords(2.0, 2.0, 0.0),
///         ScanVertex::from_coords(0.0, 2.0, 0.0),
///     ],
///     vec![[0, 1, 2], [0, 2, 3]],
/// );
///
/// assert!((mesh.surface_area() - 4.0).abs() < 1e-12);
/// assert_eq!(mesh.triangles().count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanMesh {
    /// Vertex data.
    pub vertices: Vec<ScanVertex>,
    /// Triangle faces as indices into `vertices`.
    pub faces: Vec<[u32; 3]>,
}

impl ScanMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<ScanVertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// True if the mesh has no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex positions in index order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Iterate over faces as vertex position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.faces.iter().filter_map(|face| {
            let a = self.vertices.get(face[0] as usize)?;
            let b = self.vertices.get(face[1] as usize)?;
            let c = self.vertices.get(face[2] as usize)?;
            Some([a.position, b.position, c.position])
        })
    }

    /// Total surface area of all triangles.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }

    /// Bounding box of all vertices, or `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }

    /// Mean capture confidence over all vertices (0 for an empty mesh).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_confidence(&self) -> f64 {
        if self.vertices.is_empty() {
            return 0.0;
        }
        self.vertices.iter().map(|v| v.confidence).sum::<f64>() / self.vertices.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> ScanMesh {
        ScanMesh::from_parts(
            vec![
                ScanVertex::from_coords(0.0, 0.0, 0.0),
                ScanVertex::from_coords(1.0, 0.0, 0.0),
                ScanVertex::from_coords(1.0, 1.0, 0.0),
                ScanVertex::from_coords(0.0, 1.0, 0.0).with_confidence(0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_surface_area() {
        assert_relative_eq!(unit_square().surface_area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_range_face_skipped() {
        let mut mesh = unit_square();
        mesh.faces.push([0, 1, 99]);
        assert_eq!(mesh.triangles().count(), 2);
        assert_relative_eq!(mesh.surface_area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bounds() {
        let bounds = unit_square().bounds().unwrap();
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 0.0));
        assert!(ScanMesh::new().bounds().is_none());
    }

    #[test]
    fn test_mean_confidence() {
        assert_relative_eq!(unit_square().mean_confidence(), 0.75);
        assert_relative_eq!(ScanMesh::new().mean_confidence(), 0.0);
    }
}
