//! Region detection collaborators.
//!
//! A [`RegionDetector`] turns a [`MeasurementRegion`] request into zero or
//! one [`DetectedRegion`]. Production detectors (image segmentation, manual
//! markup) live outside this crate; two simple detectors ship here:
//!
//! - [`StaticDetector`] answers from boundaries supplied up front
//! - [`MeshRegionDetector`] grows the region over the mesh itself and returns
//!   the convex hull of the gathered vertices

use std::sync::Arc;

use async_trait::async_trait;
use scan_polygon::{PolygonError, Projection, convex_hull_2d};
use scan_spatial::SpatialIndex;
use scan_types::ScanMesh;
use tracing::debug;

use crate::error::{MeasureError, MeasureResult};
use crate::metrics::region_vertices;
use crate::region::{DetectedRegion, MeasurementRegion};

/// Resolves measurement requests into region boundaries.
///
/// Returning `Ok(None)` means the region was not found. Failures should be
/// reported as [`MeasureError::SegmentationFailure`].
#[async_trait]
pub trait RegionDetector: Send + Sync {
    /// Locate the region described by `request` on `mesh`.
    async fn detect(
        &self,
        mesh: &ScanMesh,
        request: &MeasurementRegion,
    ) -> MeasureResult<Option<DetectedRegion>>;
}

#[async_trait]
impl<T: RegionDetector + ?Sized> RegionDetector for Arc<T> {
    async fn detect(
        &self,
        mesh: &ScanMesh,
        request: &MeasurementRegion,
    ) -> MeasureResult<Option<DetectedRegion>> {
        (**self).detect(mesh, request).await
    }
}

/// Detector backed by a fixed list of regions.
///
/// Each request is answered with the first region of the same kind.
///
/// # Example
///
/// ```
/// use scan_measure::{DetectedRegion, MeasurementRegion, RegionDetector, RegionKind, StaticDetector};
/// use scan_types::ScanMesh;
/// use nalgebra::Point3;
///
/// let boundary = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let detector = StaticDetector::new(vec![DetectedRegion::new(RegionKind::Donor, boundary, 0.9)]);
///
/// let request = MeasurementRegion::new(RegionKind::Donor, Point3::origin(), 1.0);
/// let found = pollster::block_on(detector.detect(&ScanMesh::new(), &request)).unwrap();
/// assert!(found.is_some());
///
/// let request = MeasurementRegion::new(RegionKind::Recipient, Point3::origin(), 1.0);
/// let found = pollster::block_on(detector.detect(&ScanMesh::new(), &request)).unwrap();
/// assert!(found.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    regions: Vec<DetectedRegion>,
}

impl StaticDetector {
    /// Detector answering from `regions`.
    #[must_use]
    pub const fn new(regions: Vec<DetectedRegion>) -> Self {
        Self { regions }
    }

    /// Add a region.
    #[must_use]
    pub fn with_region(mut self, region: DetectedRegion) -> Self {
        self.regions.push(region);
        self
    }

    /// Regions this detector answers with.
    #[must_use]
    pub fn regions(&self) -> &[DetectedRegion] {
        &self.regions
    }
}

#[async_trait]
impl RegionDetector for StaticDetector {
    async fn detect(
        &self,
        _mesh: &ScanMesh,
        request: &MeasurementRegion,
    ) -> MeasureResult<Option<DetectedRegion>> {
        Ok(self.regions.iter().find(|r| r.kind == request.kind).cloned())
    }
}

/// Detector that grows regions over the scan mesh.
///
/// The region is every vertex reachable from the vertex nearest the expected
/// location through links of at most `link_radius`, within
/// `approximate_size` of that vertex. The boundary is the convex hull of
/// those vertices in their best-fit plane and the confidence is their mean
/// capture confidence.
///
/// Requests whose nearest vertex is further than `approximate_size` away, or
/// whose vertices do not span an area, are not found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshRegionDetector {
    link_radius: f64,
}

impl Default for MeshRegionDetector {
    fn default() -> Self {
        Self { link_radius: 0.5 }
    }
}

impl MeshRegionDetector {
    /// Detector with the given vertex link radius.
    #[must_use]
    pub const fn new(link_radius: f64) -> Self {
        Self { link_radius }
    }

    /// Vertex link radius.
    #[must_use]
    pub const fn link_radius(&self) -> f64 {
        self.link_radius
    }

    /// Synchronous form of [`RegionDetector::detect`].
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::SegmentationFailure`] if the vertex index
    /// cannot be built or the gathered vertices contain non-finite values.
    pub fn resolve(
        &self,
        mesh: &ScanMesh,
        request: &MeasurementRegion,
    ) -> MeasureResult<Option<DetectedRegion>> {
        if mesh.is_empty() {
            return Ok(None);
        }
        let index = SpatialIndex::build(&mesh.positions(), self.link_radius)
            .map_err(|e| MeasureError::segmentation(e.to_string()))?;

        let Some(seed) = index.nearest(&request.expected_location) else {
            return Ok(None);
        };
        if (mesh.vertices[seed].position - request.expected_location).norm() > request.approximate_size {
            debug!(region = %request.kind, "no vertex near expected location");
            return Ok(None);
        }

        let members = region_vertices(&index, request, self.link_radius)
            .map_err(|e| MeasureError::segmentation(e.to_string()))?;
        if members.len() < 3 {
            return Ok(None);
        }
        let points: Vec<_> = members.iter().map(|&i| mesh.vertices[i].position).collect();

        let projection =
            Projection::best_fit(&points).map_err(|e| MeasureError::segmentation(e.to_string()))?;
        let hull = match convex_hull_2d(&projection.project_all(&points)) {
            Ok(hull) => hull,
            Err(PolygonError::Degenerate) => return Ok(None),
            Err(e) => return Err(MeasureError::segmentation(e.to_string())),
        };

        #[allow(clippy::cast_precision_loss)]
        // Precision: region vertex counts are far below 2^52
        let confidence =
            members.iter().map(|&i| mesh.vertices[i].confidence).sum::<f64>() / members.len() as f64;

        debug!(
            region = %request.kind,
            vertices = members.len(),
            hull = hull.len(),
            confidence,
            "region grown over mesh"
        );
        Ok(Some(DetectedRegion::new(
            request.kind.clone(),
            hull.into_iter().map(|i| points[i]).collect(),
            confidence,
        )))
    }
}

#[async_trait]
impl RegionDetector for MeshRegionDetector {
    async fn detect(
        &self,
        mesh: &ScanMesh,
        request: &MeasurementRegion,
    ) -> MeasureResult<Option<DetectedRegion>> {
        self.resolve(mesh, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::area;
    use crate::region::RegionKind;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use scan_types::ScanVertex;

    fn flat_grid(n: u32) -> ScanMesh {
        let mut mesh = ScanMesh::new();
        for j in 0..n {
            for i in 0..n {
                mesh.vertices.push(
                    ScanVertex::from_coords(f64::from(i), f64::from(j), 0.0).with_confidence(0.8),
                );
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

    #[test]
    fn test_mesh_detector_diamond() {
        let mesh = flat_grid(11);
        let detector = MeshRegionDetector::new(1.05);
        let request = MeasurementRegion::new(RegionKind::Recipient, Point3::new(5.0, 5.0, 0.0), 2.0);

        let region = pollster::block_on(detector.detect(&mesh, &request))
            .unwrap()
            .unwrap();
        // Lattice points within distance 2 of (5, 5) span a diamond with diagonals of 4
        assert!(region.boundary.len() >= 4);
        assert_relative_eq!(area(&region.boundary).unwrap(), 8.0, epsilon = 1e-9);
        assert_relative_eq!(region.confidence, 0.8, epsilon = 1e-12);
        assert_eq!(region.kind, RegionKind::Recipient);
    }

    #[test]
    fn test_mesh_detector_far_request() {
        let mesh = flat_grid(5);
        let request = MeasurementRegion::new(RegionKind::Donor, Point3::new(50.0, 50.0, 0.0), 1.0);
        assert!(MeshRegionDetector::new(1.05).resolve(&mesh, &request).unwrap().is_none());
    }

    #[test]
    fn test_mesh_detector_empty_mesh() {
        let request = MeasurementRegion::new(RegionKind::Donor, Point3::origin(), 1.0);
        assert!(MeshRegionDetector::default()
            .resolve(&ScanMesh::new(), &request)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_mesh_detector_bad_radius() {
        let mesh = flat_grid(3);
        let request = MeasurementRegion::new(RegionKind::Donor, Point3::origin(), 1.0);
        assert!(matches!(
            MeshRegionDetector::new(-1.0).resolve(&mesh, &request),
            Err(MeasureError::SegmentationFailure(_))
        ));
    }

    #[test]
    fn test_arc_detector_forwards() {
        let detector: Arc<dyn RegionDetector> = Arc::new(StaticDetector::default().with_region(
            DetectedRegion::new(RegionKind::Donor, Vec::new(), 1.0),
        ));
        let request = MeasurementRegion::new(RegionKind::Donor, Point3::origin(), 1.0);
        let found = pollster::block_on(detector.detect(&ScanMesh::new(), &request)).unwrap();
        assert!(found.is_some());
    }
}
