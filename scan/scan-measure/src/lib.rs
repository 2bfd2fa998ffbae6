//! Measurement of scalp scan regions.
//!
//! Callers describe the regions they care about as [`MeasurementRegion`]
//! requests. A [`RegionDetector`] resolves each request to a boundary, and
//! the [`MeasurementEngine`] turns the resolved boundaries into
//! [`Measurements`]:
//!
//! - **Areas**: recipient and donor buckets plus named custom measurements
//! - **Thickness**: confidence-weighted vertex samples, area-weighted across regions
//! - **Curvature and perimeter**: per region, in [`RegionMetrics`]
//!
//! Detectors are asynchronous because production detectors call out to
//! segmentation models. [`StaticDetector`] and [`MeshRegionDetector`] cover
//! pre-marked boundaries and purely geometric detection.
//!
//! # Example
//!
//! ```
//! use scan_measure::{MeasureParams, MeasurementEngine, MeasurementRegion, MeshRegionDetector, RegionKind};
//! use scan_types::{ScanMesh, ScanVertex};
//! use nalgebra::Point3;
//!
//! // 6 x 6 vertex grid with unit spacing
//! let mut mesh = ScanMesh::new();
//! for j in 0..6u32 {
//!     for i in 0..6u32 {
//!         mesh.vertices.push(ScanVertex::from_coords(f64::from(i), f64::from(j), 0.0));
//!     }
//! }
//! for j in 0..5u32 {
//!     for i in 0..5u32 {
//!         let a = j * 6 + i;
//!         mesh.faces.push([a, a + 1, a + 7]);
//!         mesh.faces.push([a, a + 7, a + 6]);
//!     }
//! }
//!
//! let engine = MeasurementEngine::new(MeshRegionDetector::new(1.05))
//!     .with_params(MeasureParams::default().with_link_radius(1.05));
//! let requests = [MeasurementRegion::new(RegionKind::Recipient, Point3::new(2.5, 2.5, 0.0), 5.0)];
//!
//! let m = pollster::block_on(engine.measurements(&mesh, &requests)).unwrap();
//! assert!((m.total_area - 25.0).abs() < 1e-9);
//! assert!((m.recipient_area - 25.0).abs() < 1e-6);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod detector;
mod engine;
mod error;
mod measurements;
mod metrics;
mod params;
mod region;

pub use detector::{MeshRegionDetector, RegionDetector, StaticDetector};
pub use engine::MeasurementEngine;
pub use error::{MeasureError, MeasureResult};
pub use measurements::{CustomMeasurement, Measurements, RegionMeasurement};
pub use metrics::{RegionMetrics, area, region_metrics, region_vertices};
pub use params::MeasureParams;
pub use region::{DetectedRegion, MeasurementRegion, RegionKind};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
