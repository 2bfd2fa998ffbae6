//! Spatial indexing for scan point sets.
//!
//! This crate provides the uniform-grid hash index shared by clustering,
//! region selection and measurement:
//!
//! - [`SpatialIndex`] - Points bucketed into cubic cells keyed by a spatial hash
//! - [`CellCoord`] - Integer cell coordinates and their hash
//! - [`GrowParams`] - Limits for connected-region traversal
//!
//! # Why a uniform grid
//!
//! Scanned surfaces have near-uniform sample density, so a grid gives O(1)
//! average insert and query without the rebalancing cost of a tree. Cells are
//! stored sparsely in a hash map keyed by a large-prime multiply-xor hash of
//! the integer cell coordinate.
//!
//! # Example
//!
//! ```
//! use scan_spatial::SpatialIndex;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.05, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 1.0),
//! ];
//! let index = SpatialIndex::build(&points, 0.1).unwrap();
//!
//! let near = index.query_radius(&Point3::origin(), 0.1).unwrap();
//! assert_eq!(near, vec![0, 1]);
//!
//! assert_eq!(index.nearest(&Point3::new(0.9, 0.9, 0.9)), Some(2));
//! ```
//!
//! # Connected traversal
//!
//! ```
//! use scan_spatial::{GrowParams, SpatialIndex};
//! use nalgebra::Point3;
//!
//! // A chain of points 0.1 apart, and one far away
//! let mut points: Vec<_> = (0..5).map(|i| Point3::new(f64::from(i) * 0.1, 0.0, 0.0)).collect();
//! points.push(Point3::new(10.0, 0.0, 0.0));
//!
//! let index = SpatialIndex::build(&points, 0.15).unwrap();
//! let region = index.connected_region(0, &GrowParams::new(0.15)).unwrap();
//! assert_eq!(region, vec![0, 1, 2, 3, 4]);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cell;
mod error;
mod index;
mod traverse;

pub use cell::CellCoord;
pub use error::{SpatialError, SpatialResult};
pub use index::SpatialIndex;
pub use traverse::GrowParams;

// Re-export nalgebra types for convenience
pub use nalgebra::Point3;
