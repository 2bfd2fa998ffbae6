//! Region segmentation for density clusters.
//!
//! Turns each density cluster into a [`SegmentedRegion`]: a convex XY
//! boundary plus mean and population variance of the member densities.
//!
//! # Example
//!
//! ```
//! use density_segment::RegionSegmenter;
//! use scan_types::DensityPoint;
//!
//! let cluster = vec![
//!     DensityPoint::from_coords(0.0, 0.0, 0.0, 0.4),
//!     DensityPoint::from_coords(0.2, 0.0, 0.0, 0.6),
//!     DensityPoint::from_coords(0.2, 0.2, 0.0, 0.4),
//!     DensityPoint::from_coords(0.0, 0.2, 0.0, 0.6),
//! ];
//!
//! let segmenter = RegionSegmenter::new().with_target("region-0", 0.8);
//! let regions = segmenter.segment(&[cluster]).unwrap();
//!
//! assert_eq!(regions[0].name, "region-0");
//! assert!((regions[0].mean_density - 0.5).abs() < 1e-12);
//! assert!((regions[0].area().unwrap() - 0.04).abs() < 1e-12);
//! assert_eq!(regions[0].target_density, Some(0.8));
//! ```
//!
//! # Validation
//!
//! All clusters are checked before any region is built: a cluster with fewer
//! than three points, or whose points are collinear, fails the whole call.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod region;
mod segmenter;

pub use error::{SegmentError, SegmentResult};
pub use region::{DensityRegion, SegmentedRegion};
pub use segmenter::RegionSegmenter;

// Re-export nalgebra types for convenience
pub use nalgebra::Point3;
