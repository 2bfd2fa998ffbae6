//! End-to-end scalp scan analysis.
//!
//! Ties the workspace crates together into the two pipelines a scan goes
//! through:
//!
//! - **Density**: points → clusters → regions → smoothed density map
//!   ([`analyze_density`], [`run_density_pipeline`])
//! - **Grafts**: mesh → resolved regions → measurements → graft allocation
//!   ([`run_graft_pipeline`])
//!
//! [`analyze_scan`] runs both concurrently for one scan. Settings come from a
//! [`PipelineConfig`], usually loaded from TOML with [`load_config`].
//!
//! # Cancellation
//!
//! The async entry points own an abort signal per invocation. Dropping the
//! future stops offloaded clustering and interpolation at their next
//! checkpoint; no partial result is returned.
//!
//! # Example
//!
//! ```
//! use graft_plan::FixedDensity;
//! use scalp_pipeline::{PipelineConfig, analyze_scan};
//! use scan_measure::{DetectedRegion, RegionKind, StaticDetector};
//! use scan_types::{DensityPoint, Point3, ScanMesh};
//!
//! let config = PipelineConfig::from_toml_str(
//!     r#"
//!     [density]
//!     resolution = 0.1
//!     backend = "parallel"
//!
//!     [[regions]]
//!     kind = "recipient"
//!     expected_location = [1.0, 1.0, 0.0]
//!     approximate_size = 2.0
//!
//!     [[regions]]
//!     kind = "donor"
//!     expected_location = [1.0, -4.0, 0.0]
//!     approximate_size = 2.0
//!     "#,
//! )
//! .unwrap();
//!
//! let square = |y: f64| {
//!     vec![
//!         Point3::new(0.0, y, 0.0),
//!         Point3::new(4.0, y, 0.0),
//!         Point3::new(4.0, y + 4.0, 0.0),
//!         Point3::new(0.0, y + 4.0, 0.0),
//!     ]
//! };
//! let detector = StaticDetector::new(vec![
//!     DetectedRegion::new(RegionKind::Recipient, square(0.0), 0.9),
//!     DetectedRegion::new(RegionKind::Donor, square(-6.0), 0.9),
//! ]);
//! let points = vec![
//!     DensityPoint::from_coords(0.3, 0.3, 0.0, 0.4),
//!     DensityPoint::from_coords(0.7, 0.6, 0.0, 0.7),
//! ];
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let analysis = runtime
//!     .block_on(analyze_scan(&ScanMesh::new(), points, &config, detector, FixedDensity(20.0)))
//!     .unwrap();
//!
//! assert_eq!(analysis.density.grid_size(), 10);
//! // floor(16 * (45 - 20))
//! assert_eq!(analysis.plan.calculation.total_grafts, 400);
//! assert!(analysis.plan.calculation.donor_sufficient());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod density;
mod error;
mod run;

pub use config::{PipelineConfig, load_config};
pub use density::analyze_density;
pub use error::{PipelineError, PipelineResult};
pub use run::{GraftPlan, ScanAnalysis, analyze_scan, run_density_pipeline, run_graft_pipeline};
