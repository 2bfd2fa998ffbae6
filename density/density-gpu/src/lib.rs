//! GPU-accelerated density interpolation using WGPU compute shaders.
//!
//! Evaluates inverse-distance-weighted density over a square grid covering
//! the unit domain, one shader invocation per cell. This is the accelerated
//! backend behind `density-map`'s `gpu` feature.
//!
//! # Layer 0 Crate
//!
//! No engine or UI dependencies; usable from CLI tools and services with or
//! without a GPU present.
//!
//! # GPU Availability
//!
//! The device is probed once per process. Use [`GpuContext::is_available`]
//! to check, or [`try_compute_idw_gpu`], which returns `None` instead of an
//! error so callers can fall back to a CPU backend.
//!
//! # Example
//!
//! ```no_run
//! use density_gpu::{try_compute_idw_gpu, GpuIdwParams};
//! use scan_types::DensityPoint;
//!
//! let points = vec![
//!     DensityPoint::from_coords(0.2, 0.2, 0.0, 0.3),
//!     DensityPoint::from_coords(0.8, 0.8, 0.0, 0.9),
//! ];
//!
//! match try_compute_idw_gpu(&points, &GpuIdwParams::new(32)) {
//!     Some(result) => println!("{} cells in {:.2}ms", result.values.len(), result.compute_time_ms),
//!     None => println!("fall back to the CPU"),
//! }
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod buffers;
mod context;
mod error;
mod idw;

pub use buffers::{GpuDensityPoint, GpuGridParams, GridBuffers, PointBuffers};
pub use context::{GpuAdapterInfo, GpuContext};
pub use error::{GpuError, GpuResult};
pub use idw::{GpuIdwParams, GpuIdwResult, IdwPipeline, compute_idw_gpu, try_compute_idw_gpu};
