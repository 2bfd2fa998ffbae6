//! Core data types for scalp scan analysis.
//!
//! This crate provides the value types shared by every stage of the
//! density and graft-planning pipeline:
//!
//! - [`ScanVertex`] - A scanned surface sample with normal, confidence and thickness
//! - [`ScanMesh`] - A triangle mesh of scan vertices
//! - [`DensityPoint`] - A density-annotated surface position
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`AbortSignal`] - Cancellation flag shared by one pipeline invocation
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero UI dependencies**. Capture, rendering and
//! feature detection live outside the workspace and only produce or consume
//! these types.
//!
//! # Units
//!
//! Coordinates are unit-agnostic `f64`. Density analysis assumes density point
//! positions are normalized to the unit square in X/Y; measurement works in
//! whatever units the scan was captured in (typically cm, giving areas in cm²).
//!
//! # Example
//!
//! ```
//! use scan_types::{DensityPoint, Point3, ScanMesh, ScanVertex};
//!
//! let mut mesh = ScanMesh::new();
//! mesh.vertices.push(ScanVertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(ScanVertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(ScanVertex::from_coords(0.0, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//! assert!((mesh.surface_area() - 0.5).abs() < 1e-12);
//!
//! let point = DensityPoint::new(Point3::new(0.5, 0.5, 0.0), 0.8, 0.9);
//! assert!((point.density - 0.8).abs() < f64::EPSILON);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod abort;
mod bounds;
mod density;
mod mesh;
mod vertex;

pub use abort::AbortSignal;
pub use bounds::Aabb;
pub use density::DensityPoint;
pub use mesh::ScanMesh;
pub use vertex::ScanVertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};
