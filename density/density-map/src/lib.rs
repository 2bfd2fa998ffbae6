//! Dense density maps from scattered scan density points.
//!
//! A [`DensityInterpolator`] turns density points plus segmented regions
//! into a [`DensityMap`] over the unit square in four steps:
//!
//! 1. **Interpolate** - inverse-distance weighting on the XY projection,
//!    evaluated by an [`InterpolationBackend`] picked once per call
//! 2. **Blend** - cells inside region boundaries move halfway toward the
//!    region mean ([`blend_regions`])
//! 3. **Smooth** - fixed 3x3 Gaussian on interior cells ([`gaussian_smooth`])
//! 4. **Range** - min and max over strictly positive cells
//!
//! # Backends
//!
//! | Choice | Backend | Notes |
//! |--------|---------|-------|
//! | `Sequential` | [`SequentialBackend`] | Single thread |
//! | `Parallel` | [`ParallelBackend`] | Rows on the rayon pool |
//! | `Gpu` | `GpuBackend` | `gpu` feature; falls back to parallel |
//! | `Auto` | GPU if present, else parallel | Default |
//!
//! All backends agree to within `1e-4` per cell.
//!
//! # Example
//!
//! ```
//! use density_map::{BackendChoice, DensityInterpolator};
//! use scan_types::DensityPoint;
//!
//! let points: Vec<DensityPoint> = (0..10)
//!     .map(|i| {
//!         let t = f64::from(i) / 10.0;
//!         DensityPoint::from_coords(t, 1.0 - t, 0.0, t)
//!     })
//!     .collect();
//!
//! let map = DensityInterpolator::new()
//!     .with_backend(BackendChoice::Parallel)
//!     .interpolate(&points, 0.05, &[])
//!     .unwrap();
//!
//! assert_eq!(map.grid_size(), 20);
//! assert!(map.max_density <= 0.9);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod backend;
mod blend;
mod error;
mod grid;
mod interpolator;
mod map;
mod preferences;
mod smooth;

#[cfg(feature = "gpu")]
pub use backend::GpuBackend;
pub use backend::{
    BackendChoice, InterpolationBackend, NEAR_DISTANCE, ParallelBackend, SequentialBackend, idw_at,
};
pub use blend::blend_regions;
pub use error::{DensityMapError, DensityMapResult};
pub use grid::{DensityGrid, MAX_GRID_SIZE, grid_size_for};
pub use interpolator::DensityInterpolator;
pub use map::{DensityMap, positive_range};
pub use preferences::{DensityPreferences, MIN_REGION_POINTS};
pub use smooth::{GAUSSIAN_KERNEL, gaussian_smooth};

// Re-export region types for convenience
pub use density_segment::{DensityRegion, SegmentedRegion};
