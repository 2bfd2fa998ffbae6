//! Per-region metrics: area, perimeter, thickness and curvature.

use nalgebra::{Point3, Vector3};
use scan_polygon::{perimeter, surface_area};
use scan_spatial::{GrowParams, SpatialIndex};
use scan_types::ScanMesh;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeasureError, MeasureResult};
use crate::region::{DetectedRegion, MeasurementRegion};

/// Area enclosed by a boundary, measured in its best-fit plane.
///
/// # Errors
///
/// Propagates [`PolygonError`](scan_polygon::PolygonError) for boundaries
/// with fewer than three points, non-finite coordinates, or self-intersections.
///
/// # Example
///
/// ```
/// use scan_measure::area;
/// use nalgebra::Point3;
///
/// // 2 x 3 rectangle tilted out of the XY plane
/// let boundary = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
///     Point3::new(2.0, 3.0, 3.0),
///     Point3::new(0.0, 3.0, 3.0),
/// ];
/// let expected = 2.0 * (18.0_f64).sqrt();
/// assert!((area(&boundary).unwrap() - expected).abs() < 1e-9);
/// ```
pub fn area(boundary: &[Point3<f64>]) -> MeasureResult<f64> {
    Ok(surface_area(boundary)?)
}

/// Geometric metrics of one resolved region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionMetrics {
    /// Boundary area.
    pub area: f64,
    /// Closed boundary length.
    pub perimeter: f64,
    /// Confidence-weighted mean tissue thickness, if any vertex was sampled.
    pub thickness: Option<f64>,
    /// Mean normal deviation in radians per unit of region extent.
    pub curvature: f64,
    /// Mesh vertices gathered for the region.
    pub vertex_count: usize,
}

/// Mesh vertices belonging to a requested region.
///
/// Starts at the vertex nearest the expected location and follows vertices no
/// further than `link_radius` apart, never straying more than
/// `approximate_size` from the starting vertex.
///
/// # Errors
///
/// Propagates [`SpatialError`](scan_spatial::SpatialError) for an invalid
/// link radius.
pub fn region_vertices(
    index: &SpatialIndex,
    request: &MeasurementRegion,
    link_radius: f64,
) -> MeasureResult<Vec<usize>> {
    let Some(seed) = index.nearest(&request.expected_location) else {
        return Ok(Vec::new());
    };
    let params = GrowParams::new(link_radius).with_max_extent(request.approximate_size.max(0.0));
    Ok(index.connected_region(seed, &params)?)
}

/// Compute metrics for a detected region.
///
/// `index` must be built over `mesh.positions()`.
///
/// # Errors
///
/// - [`MeasureError::AnalysisFailure`] if `index` does not match `mesh`
/// - [`MeasureError::Polygon`] if the boundary area cannot be computed
/// - [`MeasureError::Spatial`] for an invalid link radius
pub fn region_metrics(
    mesh: &ScanMesh,
    index: &SpatialIndex,
    detected: &DetectedRegion,
    request: &MeasurementRegion,
    link_radius: f64,
) -> MeasureResult<RegionMetrics> {
    if index.len() != mesh.vertices.len() {
        return Err(MeasureError::analysis(format!(
            "vertex index holds {} points but mesh has {} vertices",
            index.len(),
            mesh.vertices.len()
        )));
    }

    let members = region_vertices(index, request, link_radius)?;
    Ok(RegionMetrics {
        area: area(&detected.boundary)?,
        perimeter: perimeter(&detected.boundary),
        thickness: weighted_thickness(mesh, &members),
        curvature: normal_curvature(mesh, &members),
        vertex_count: members.len(),
    })
}

fn weighted_thickness(mesh: &ScanMesh, members: &[usize]) -> Option<f64> {
    let (sum, weight) = members
        .iter()
        .map(|&i| &mesh.vertices[i])
        .filter_map(|v| v.thickness.map(|t| (t, v.confidence)))
        .fold((0.0, 0.0), |(sum, weight), (t, c)| (sum + t * c, weight + c));
    (weight > 0.0).then(|| sum / weight)
}

#[allow(clippy::cast_precision_loss)]
// Precision: region vertex counts are far below 2^52
fn normal_curvature(mesh: &ScanMesh, members: &[usize]) -> f64 {
    let normals: Vec<Vector3<f64>> = members
        .iter()
        .filter_map(|&i| mesh.vertices[i].normal)
        .filter_map(|n| n.try_normalize(f64::EPSILON))
        .collect();
    if normals.len() < 2 {
        return 0.0;
    }
    let Some(mean) = normals
        .iter()
        .fold(Vector3::zeros(), |acc, n| acc + n)
        .try_normalize(f64::EPSILON)
    else {
        return 0.0;
    };

    let deviation =
        normals.iter().map(|n| n.dot(&mean).clamp(-1.0, 1.0).acos()).sum::<f64>() / normals.len() as f64;

    let positions: Vec<Point3<f64>> = members.iter().map(|&i| mesh.vertices[i].position).collect();
    let centroid = Point3::from(
        positions.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / positions.len() as f64,
    );
    let extent = positions
        .iter()
        .map(|p| (p - centroid).norm())
        .fold(0.0, f64::max);
    if extent <= f64::EPSILON {
        return 0.0;
    }
    deviation / extent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionKind;
    use approx::assert_relative_eq;
    use scan_types::ScanVertex;

    /// `n` x `n` vertex grid with unit spacing in the XY plane.
    fn flat_grid(n: u32) -> ScanMesh {
        let mut mesh = ScanMesh::new();
        for j in 0..n {
            for i in 0..n {
                mesh.vertices
                    .push(ScanVertex::from_coords(f64::from(i), f64::from(j), 0.0));
            }
        }
        for j in 0..n - 1 {
            for i in 0..n - 1 {
                let a = j * n + i;
                mesh.faces.push([a, a + 1, a + n + 1]);
                mesh.faces.push([a, a + n + 1, a + n]);
            }
        }
        mesh
    }

    fn square(x0: f64, y0: f64, side: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(x0, y0, 0.0),
            Point3::new(x0 + side, y0, 0.0),
            Point3::new(x0 + side, y0 + side, 0.0),
            Point3::new(x0, y0 + side, 0.0),
        ]
    }

    #[test]
    fn test_area_of_square() {
        assert_relative_eq!(area(&square(1.0, 1.0, 3.0)).unwrap(), 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_area_rejects_short_boundary() {
        let result = area(&square(0.0, 0.0, 1.0)[..2]);
        assert!(matches!(result, Err(MeasureError::Polygon(_))));
    }

    #[test]
    fn test_region_vertices_bounded_by_size() {
        let mesh = flat_grid(11);
        let index = SpatialIndex::build(&mesh.positions(), 1.0).unwrap();
        let request = MeasurementRegion::new(RegionKind::Recipient, Point3::new(5.1, 4.9, 0.0), 1.0);
        let members = region_vertices(&index, &request, 1.05).unwrap();
        // Seed (5, 5) and its four axis neighbours
        assert_eq!(members.len(), 5);
    }

    #[test]
    fn test_thickness_confidence_weighted() {
        let mut mesh = flat_grid(5);
        for (i, v) in mesh.vertices.iter_mut().enumerate() {
            if i % 2 == 0 {
                v.thickness = Some(0.4);
                v.confidence = 1.0;
            } else {
                v.thickness = Some(1.0);
                v.confidence = 0.5;
            }
        }
        let members: Vec<usize> = vec![0, 1];
        // (0.4 * 1 + 1.0 * 0.5) / 1.5
        assert_relative_eq!(weighted_thickness(&mesh, &members).unwrap(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_thickness_absent() {
        let mesh = flat_grid(3);
        assert!(weighted_thickness(&mesh, &[0, 1, 2]).is_none());
    }

    #[test]
    fn test_flat_region_has_zero_curvature() {
        let mut mesh = flat_grid(5);
        for v in &mut mesh.vertices {
            v.normal = Some(Vector3::z());
        }
        let members: Vec<usize> = (0..25).collect();
        assert_relative_eq!(normal_curvature(&mesh, &members), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bent_region_has_curvature() {
        let mut mesh = flat_grid(5);
        for v in &mut mesh.vertices {
            let tilt = (v.position.x - 2.0) * 0.1;
            v.normal = Some(Vector3::new(tilt.sin(), 0.0, tilt.cos()));
        }
        let members: Vec<usize> = (0..25).collect();
        assert!(normal_curvature(&mesh, &members) > 0.0);
    }

    #[test]
    fn test_region_metrics() {
        let mut mesh = flat_grid(11);
        for v in &mut mesh.vertices {
            v.thickness = Some(0.7);
        }
        let index = SpatialIndex::build(&mesh.positions(), 1.0).unwrap();
        let request = MeasurementRegion::new(RegionKind::Donor, Point3::new(3.0, 3.0, 0.0), 2.0);
        let detected = DetectedRegion::new(RegionKind::Donor, square(1.0, 1.0, 4.0), 0.9);

        let metrics = region_metrics(&mesh, &index, &detected, &request, 1.05).unwrap();
        assert_relative_eq!(metrics.area, 16.0, epsilon = 1e-9);
        assert_relative_eq!(metrics.perimeter, 16.0, epsilon = 1e-9);
        assert_relative_eq!(metrics.thickness.unwrap(), 0.7, epsilon = 1e-12);
        assert!(metrics.vertex_count > 1);
    }

    #[test]
    fn test_region_metrics_index_mismatch() {
        let mesh = flat_grid(4);
        let index = SpatialIndex::build(&flat_grid(3).positions(), 1.0).unwrap();
        let request = MeasurementRegion::new(RegionKind::Donor, Point3::origin(), 1.0);
        let detected = DetectedRegion::new(RegionKind::Donor, square(0.0, 0.0, 1.0), 1.0);
        assert!(matches!(
            region_metrics(&mesh, &index, &detected, &request, 1.0),
            Err(MeasureError::AnalysisFailure(_))
        ));
    }
}
