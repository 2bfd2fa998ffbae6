//! Measurement of requested regions over a scan.

use scan_polygon::perimeter;
use scan_spatial::SpatialIndex;
use scan_types::ScanMesh;
use tracing::{debug, info, warn};

use crate::detector::RegionDetector;
use crate::error::{MeasureError, MeasureResult};
use crate::measurements::{CustomMeasurement, Measurements, RegionMeasurement};
use crate::metrics::{RegionMetrics, area, region_metrics};
use crate::params::MeasureParams;
use crate::region::{MeasurementRegion, RegionKind};

/// Resolves requested regions through a detector and measures them.
///
/// # Example
///
/// ```
/// use scan_measure::{
///     DetectedRegion, MeasurementEngine, MeasurementRegion, RegionKind, StaticDetector,
/// };
/// use scan_types::ScanMesh;
/// use nalgebra::Point3;
///
/// let square = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(5.0, 0.0, 0.0),
///     Point3::new(5.0, 5.0, 0.0),
///     Point3::new(0.0, 5.0, 0.0),
/// ];
/// let detector =
///     StaticDetector::new(vec![DetectedRegion::new(RegionKind::Recipient, square, 0.95)]);
/// let engine = MeasurementEngine::new(detector);
///
/// let requests = [MeasurementRegion::new(RegionKind::Recipient, Point3::new(2.5, 2.5, 0.0), 3.0)];
/// let m = pollster::block_on(engine.measurements(&ScanMesh::new(), &requests)).unwrap();
/// assert!((m.recipient_area - 25.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeasurementEngine<D> {
    detector: D,
    params: MeasureParams,
}

impl<D: RegionDetector> MeasurementEngine<D> {
    /// Engine with default parameters.
    #[must_use]
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            params: MeasureParams::default(),
        }
    }

    /// Replace the parameters.
    #[must_use]
    pub const fn with_params(mut self, params: MeasureParams) -> Self {
        self.params = params;
        self
    }

    /// Current parameters.
    #[must_use]
    pub const fn params(&self) -> &MeasureParams {
        &self.params
    }

    /// The region detector.
    #[must_use]
    pub const fn detector(&self) -> &D {
        &self.detector
    }

    /// Resolve and measure every requested region.
    ///
    /// Requests are resolved in order. Recipient and donor areas accumulate
    /// into their buckets; custom kinds become [`CustomMeasurement`]s.
    /// Regions the detector does not find, or finds with confidence below
    /// `min_confidence`, are listed in [`Measurements::unresolved`].
    ///
    /// # Errors
    ///
    /// - [`MeasureError::InvalidParams`] for invalid parameters or a request
    ///   with a non-positive size
    /// - [`MeasureError::InvalidRegion`] if a resolved boundary has fewer than
    ///   three points
    /// - [`MeasureError::SegmentationFailure`] from the detector
    /// - [`MeasureError::Polygon`] if a boundary area cannot be computed
    pub async fn measurements(
        &self,
        mesh: &ScanMesh,
        regions: &[MeasurementRegion],
    ) -> MeasureResult<Measurements> {
        self.params.validate()?;
        if let Some(bad) = regions
            .iter()
            .find(|r| !(r.approximate_size.is_finite() && r.approximate_size > 0.0))
        {
            return Err(MeasureError::invalid_params(format!(
                "region '{}' approximate_size must be positive, got {}",
                bad.kind, bad.approximate_size
            )));
        }

        let index = if mesh.is_empty() {
            None
        } else {
            Some(SpatialIndex::build(&mesh.positions(), self.params.link_radius)?)
        };

        let mut result = Measurements {
            total_area: mesh.surface_area(),
            ..Measurements::default()
        };
        let mut thickness_sum = 0.0;
        let mut thickness_area = 0.0;

        for request in regions {
            let Some(detected) = self.detector.detect(mesh, request).await? else {
                warn!(region = %request.kind, "region not found");
                result.unresolved.push(request.kind.clone());
                continue;
            };

            if detected.boundary.len() < 3 {
                return Err(MeasureError::InvalidRegion {
                    region: request.kind.to_string(),
                    points: detected.boundary.len(),
                });
            }
            if detected.confidence < self.params.min_confidence {
                warn!(
                    region = %request.kind,
                    confidence = detected.confidence,
                    min_confidence = self.params.min_confidence,
                    "region confidence too low"
                );
                result.unresolved.push(request.kind.clone());
                continue;
            }

            let metrics = match &index {
                Some(index) => {
                    region_metrics(mesh, index, &detected, request, self.params.link_radius)?
                }
                None => RegionMetrics {
                    area: area(&detected.boundary)?,
                    perimeter: perimeter(&detected.boundary),
                    thickness: None,
                    curvature: 0.0,
                    vertex_count: 0,
                },
            };
            debug!(
                region = %request.kind,
                area = metrics.area,
                perimeter = metrics.perimeter,
                vertices = metrics.vertex_count,
                "region measured"
            );

            match &request.kind {
                RegionKind::Recipient => result.recipient_area += metrics.area,
                RegionKind::Donor => result.donor_area += metrics.area,
                RegionKind::Custom { name, unit } => {
                    result.custom_measurements.push(CustomMeasurement {
                        name: name.clone(),
                        value: metrics.area,
                        unit: unit.clone(),
                        notes: request.notes.clone(),
                    });
                }
            }
            if !matches!(request.kind, RegionKind::Custom { .. })
                && let Some(t) = metrics.thickness
            {
                thickness_sum += t * metrics.area;
                thickness_area += metrics.area;
            }

            result.regions.push(RegionMeasurement {
                kind: request.kind.clone(),
                confidence: detected.confidence,
                metrics,
            });
        }

        if thickness_area > 0.0 {
            result.scalp_thickness = thickness_sum / thickness_area;
        }

        info!(
            total_area = result.total_area,
            recipient_area = result.recipient_area,
            donor_area = result.donor_area,
            scalp_thickness = result.scalp_thickness,
            custom = result.custom_measurements.len(),
            unresolved = result.unresolved.len(),
            "measurements complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::StaticDetector;
    use crate::region::DetectedRegion;
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use nalgebra::Point3;
    use scan_types::ScanVertex;

    fn flat_grid(n: u32) -> ScanMesh {
        let mut mesh = ScanMesh::new();
        for j in 0..n {
            for i in 0..n {
                let x = f64::from(i);
                let thickness = if x < 5.0 { 0.5 } else { 0.8 };
                mesh.vertices.push(
                    ScanVertex::from_coords(x, f64::from(j), 0.0).with_thickness(thickness),
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

    fn rect(x0: f64, y0: f64, w: f64, h: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(x0, y0, 0.0),
            Point3::new(x0 + w, y0, 0.0),
            Point3::new(x0 + w, y0 + h, 0.0),
            Point3::new(x0, y0 + h, 0.0),
        ]
    }

    fn requests() -> Vec<MeasurementRegion> {
        vec![
            MeasurementRegion::new(RegionKind::Recipient, Point3::new(2.0, 2.0, 0.0), 1.5),
            MeasurementRegion::new(RegionKind::Donor, Point3::new(8.0, 1.0, 0.0), 1.5),
            MeasurementRegion::new(RegionKind::custom("crown", "cm²"), Point3::new(2.0, 8.0, 0.0), 1.0)
                .with_notes("vertex whorl"),
        ]
    }

    fn full_detector() -> StaticDetector {
        StaticDetector::new(vec![
            DetectedRegion::new(RegionKind::Recipient, rect(0.0, 0.0, 4.0, 4.0), 0.9),
            DetectedRegion::new(RegionKind::Donor, rect(6.0, 0.0, 3.0, 2.0), 0.9),
            DetectedRegion::new(RegionKind::custom("crown", "cm²"), rect(1.0, 7.0, 2.0, 2.0), 0.9),
        ])
    }

    struct FailingDetector;

    #[async_trait]
    impl RegionDetector for FailingDetector {
        async fn detect(
            &self,
            _mesh: &ScanMesh,
            _request: &MeasurementRegion,
        ) -> MeasureResult<Option<DetectedRegion>> {
            Err(MeasureError::segmentation("model unavailable"))
        }
    }

    fn engine<D: RegionDetector>(detector: D) -> MeasurementEngine<D> {
        MeasurementEngine::new(detector).with_params(MeasureParams::default().with_link_radius(1.05))
    }

    #[test]
    fn test_buckets_and_custom() {
        let mesh = flat_grid(11);
        let m = pollster::block_on(engine(full_detector()).measurements(&mesh, &requests())).unwrap();

        assert_relative_eq!(m.total_area, 100.0, epsilon = 1e-9);
        assert_relative_eq!(m.recipient_area, 16.0, epsilon = 1e-9);
        assert_relative_eq!(m.donor_area, 6.0, epsilon = 1e-9);

        let crown = m.custom("crown").unwrap();
        assert_relative_eq!(crown.value, 4.0, epsilon = 1e-9);
        assert_eq!(crown.unit, "cm²");
        assert_eq!(crown.notes.as_deref(), Some("vertex whorl"));

        assert_eq!(m.regions.len(), 3);
        assert!(m.is_complete());
    }

    #[test]
    fn test_thickness_area_weighted() {
        let mesh = flat_grid(11);
        let m = pollster::block_on(engine(full_detector()).measurements(&mesh, &requests())).unwrap();
        // Recipient vertices all sit at x < 5, donor vertices at x > 5
        let expected = (16.0 * 0.5 + 6.0 * 0.8) / 22.0;
        assert_relative_eq!(m.scalp_thickness, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_repeated_kinds_accumulate() {
        let detector = StaticDetector::new(vec![DetectedRegion::new(
            RegionKind::Recipient,
            rect(0.0, 0.0, 2.0, 2.0),
            1.0,
        )]);
        let request = MeasurementRegion::new(RegionKind::Recipient, Point3::new(1.0, 1.0, 0.0), 1.0);
        let m = pollster::block_on(
            engine(detector).measurements(&ScanMesh::new(), &[request.clone(), request]),
        )
        .unwrap();
        assert_relative_eq!(m.recipient_area, 8.0, epsilon = 1e-9);
        assert_relative_eq!(m.scalp_thickness, 0.0);
    }

    #[test]
    fn test_missing_region_unresolved() {
        let detector = StaticDetector::new(vec![DetectedRegion::new(
            RegionKind::Recipient,
            rect(0.0, 0.0, 4.0, 4.0),
            0.9,
        )]);
        let m = pollster::block_on(engine(detector).measurements(&flat_grid(11), &requests())).unwrap();
        assert_relative_eq!(m.donor_area, 0.0);
        assert!(m.custom_measurements.is_empty());
        assert_eq!(
            m.unresolved,
            vec![RegionKind::Donor, RegionKind::custom("crown", "cm²")]
        );
    }

    #[test]
    fn test_low_confidence_unresolved() {
        let detector = StaticDetector::new(vec![DetectedRegion::new(
            RegionKind::Donor,
            rect(6.0, 0.0, 3.0, 2.0),
            0.3,
        )]);
        let request = MeasurementRegion::new(RegionKind::Donor, Point3::new(8.0, 1.0, 0.0), 1.5);
        let m = pollster::block_on(engine(detector).measurements(&flat_grid(11), &[request])).unwrap();
        assert_relative_eq!(m.donor_area, 0.0);
        assert_eq!(m.unresolved, vec![RegionKind::Donor]);
    }

    #[test]
    fn test_short_boundary_invalid() {
        let detector = StaticDetector::new(vec![DetectedRegion::new(
            RegionKind::Donor,
            rect(0.0, 0.0, 1.0, 1.0)[..2].to_vec(),
            1.0,
        )]);
        let request = MeasurementRegion::new(RegionKind::Donor, Point3::origin(), 1.0);
        let result = pollster::block_on(engine(detector).measurements(&ScanMesh::new(), &[request]));
        assert!(matches!(
            result,
            Err(MeasureError::InvalidRegion { points: 2, .. })
        ));
    }

    #[test]
    fn test_detector_failure_propagates() {
        let request = MeasurementRegion::new(RegionKind::Donor, Point3::origin(), 1.0);
        let result = pollster::block_on(engine(FailingDetector).measurements(&flat_grid(3), &[request]));
        assert!(matches!(result, Err(MeasureError::SegmentationFailure(_))));
    }

    #[test]
    fn test_invalid_request_size() {
        let request = MeasurementRegion::new(RegionKind::Donor, Point3::origin(), 0.0);
        let result =
            pollster::block_on(engine(full_detector()).measurements(&ScanMesh::new(), &[request]));
        assert!(matches!(result, Err(MeasureError::InvalidParams(_))));
    }

    #[test]
    fn test_no_requests() {
        let m = pollster::block_on(engine(full_detector()).measurements(&flat_grid(3), &[])).unwrap();
        assert_relative_eq!(m.total_area, 4.0, epsilon = 1e-12);
        assert_relative_eq!(m.recipient_area, 0.0);
    }
}
