//! Polygon geometry for scan region boundaries.
//!
//! Pure, side-effect-free utilities shared by segmentation, interpolation,
//! measurement and allocation:
//!
//! - [`convex_hull`] - Graham scan over the XY projection of a point set
//! - [`polygon_area`] - Ear-clipping area of a simple polygon
//! - [`triangulate`] - The ear-clipping triangles themselves
//! - [`point_in_polygon`] - Even-odd ray casting
//! - [`surface_area`] / [`Projection`] - Area of a 3D boundary in its best-fit plane
//!
//! # Planes
//!
//! Density analysis works in the unit square, so the plain functions use the
//! XY projection of each [`Point3`]. Boundaries that follow the curved scalp
//! surface are measured with [`surface_area`], which projects onto the
//! principal plane of the boundary instead.
//!
//! # Example
//!
//! ```
//! use scan_polygon::{convex_hull, point_in_polygon, polygon_area};
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(2.0, 2.0, 0.0),
//!     Point3::new(0.0, 2.0, 0.0),
//! ];
//!
//! let hull = convex_hull(&points).unwrap();
//! assert_eq!(hull.len(), 4);
//! assert!((polygon_area(&hull).unwrap() - 4.0).abs() < 1e-12);
//! assert!(point_in_polygon(&Point3::new(1.0, 1.5, 0.0), &hull));
//! ```
//!
//! # Degenerate input
//!
//! Geometry preconditions are always reported, never silently tolerated:
//!
//! ```
//! use scan_polygon::{convex_hull, polygon_area, PolygonError};
//! use nalgebra::Point3;
//!
//! assert!(matches!(convex_hull(&[]), Err(PolygonError::InsufficientPoints { .. })));
//!
//! // A bow-tie is not a simple polygon
//! let bow_tie = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! assert!(matches!(polygon_area(&bow_tie), Err(PolygonError::SelfIntersecting { .. })));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod area;
mod contains;
mod error;
mod hull;
mod predicates;
mod projection;

pub use area::{
    perimeter, polygon_area, polygon_area_2d, signed_area_2d, surface_area, triangulate,
    triangulate_2d,
};
pub use contains::{point_in_polygon, point_in_polygon_2d};
pub use error::{PolygonError, PolygonResult};
pub use hull::{convex_hull, convex_hull_2d};
pub use projection::Projection;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3};
