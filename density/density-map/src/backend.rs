//! Interpolation backends.
//!
//! Every backend evaluates the same inverse-distance weighting over the XY
//! projection of the density points:
//!
//! ```text
//! value(c) = sum(d_i / |c - p_i|^2) / sum(1 / |c - p_i|^2)
//! ```
//!
//! with any point closer than [`NEAR_DISTANCE`] to the cell centre setting
//! the cell directly (first such point in input order). Backends differ only
//! in how cells are scheduled.

use rayon::prelude::*;
use scan_types::{AbortSignal, DensityPoint};
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DensityMapError, DensityMapResult};
use crate::grid::DensityGrid;

/// Points closer than this to a cell centre short-circuit the weighting.
pub const NEAR_DISTANCE: f64 = 1e-3;

/// Inverse-distance-weighted density at unit-domain point `(x, y)`.
///
/// Returns `None` for an empty point set.
///
/// # Example
///
/// ```
/// use density_map::idw_at;
/// use scan_types::DensityPoint;
///
/// let points = [
///     DensityPoint::from_coords(0.0, 0.5, 0.0, 0.2),
///     DensityPoint::from_coords(1.0, 0.5, 0.0, 0.6),
/// ];
/// // Equidistant from both samples
/// assert!((idw_at(&points, 0.5, 0.5).unwrap() - 0.4).abs() < 1e-12);
/// // On top of a sample
/// assert_eq!(idw_at(&points, 0.0, 0.5), Some(0.2));
/// ```
#[must_use]
pub fn idw_at(points: &[DensityPoint], x: f64, y: f64) -> Option<f64> {
    if points.is_empty() {
        return None;
    }

    let mut weighted = 0.0;
    let mut total = 0.0;
    for p in points {
        let dx = p.position.x - x;
        let dy = p.position.y - y;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq.sqrt() < NEAR_DISTANCE {
            return Some(p.density);
        }
        let w = 1.0 / dist_sq;
        weighted += w * p.density;
        total += w;
    }
    Some(weighted / total)
}

fn interpolate_row(points: &[DensityPoint], grid: &DensityGrid, row: usize) -> Vec<f64> {
    (0..grid.size())
        .map(|col| {
            let (x, y) = grid.cell_center(row, col);
            idw_at(points, x, y).unwrap_or(0.0)
        })
        .collect()
}

fn require_points(points: &[DensityPoint]) -> DensityMapResult<()> {
    if points.is_empty() {
        return Err(DensityMapError::interpolation("no density points"));
    }
    Ok(())
}

/// A strategy for filling a density grid from scattered points.
///
/// Implementations must agree with [`SequentialBackend`] to within `1e-4`
/// per cell.
pub trait InterpolationBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Interpolate `points` onto a `grid_size` x `grid_size` grid.
    ///
    /// # Errors
    ///
    /// - [`DensityMapError::InterpolationFailure`] for an empty point set
    /// - [`DensityMapError::Cancelled`] if `abort` is raised
    fn interpolate(
        &self,
        points: &[DensityPoint],
        grid_size: usize,
        abort: &AbortSignal,
    ) -> DensityMapResult<DensityGrid>;
}

/// Row-by-row evaluation on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialBackend;

impl InterpolationBackend for SequentialBackend {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn interpolate(
        &self,
        points: &[DensityPoint],
        grid_size: usize,
        abort: &AbortSignal,
    ) -> DensityMapResult<DensityGrid> {
        require_points(points)?;
        let mut grid = DensityGrid::zeros(grid_size);

        for row in 0..grid_size {
            if abort.is_aborted() {
                return Err(DensityMapError::Cancelled);
            }
            let values = interpolate_row(points, &grid, row);
            let start = row * grid_size;
            grid.cells_mut()[start..start + grid_size].copy_from_slice(&values);
        }
        Ok(grid)
    }
}

/// Rows distributed over the rayon thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelBackend;

impl InterpolationBackend for ParallelBackend {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn interpolate(
        &self,
        points: &[DensityPoint],
        grid_size: usize,
        abort: &AbortSignal,
    ) -> DensityMapResult<DensityGrid> {
        require_points(points)?;
        let template = DensityGrid::zeros(grid_size);

        let rows = (0..grid_size)
            .into_par_iter()
            .map(|row| {
                if abort.is_aborted() {
                    return Err(DensityMapError::Cancelled);
                }
                Ok(interpolate_row(points, &template, row))
            })
            .collect::<DensityMapResult<Vec<Vec<f64>>>>()?;

        DensityGrid::from_rows(rows)
            .ok_or_else(|| DensityMapError::interpolation("parallel rows did not form a square grid"))
    }
}

/// Compute-shader evaluation through `density-gpu`.
///
/// Falls back to [`ParallelBackend`] if the device fails mid-run.
#[cfg(feature = "gpu")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GpuBackend;

#[cfg(feature = "gpu")]
impl InterpolationBackend for GpuBackend {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn interpolate(
        &self,
        points: &[DensityPoint],
        grid_size: usize,
        abort: &AbortSignal,
    ) -> DensityMapResult<DensityGrid> {
        require_points(points)?;
        if abort.is_aborted() {
            return Err(DensityMapError::Cancelled);
        }

        let side = u32::try_from(grid_size)
            .map_err(|_| DensityMapError::interpolation("grid too large for GPU dispatch"))?;
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: the shader works in f32
        let params = density_gpu::GpuIdwParams::new(side).with_near_distance(NEAR_DISTANCE as f32);

        let Some(result) = density_gpu::try_compute_idw_gpu(points, &params) else {
            warn!("GPU interpolation unavailable, falling back to parallel CPU");
            return ParallelBackend.interpolate(points, grid_size, abort);
        };

        if abort.is_aborted() {
            return Err(DensityMapError::Cancelled);
        }
        let cells = result.values.iter().map(|&v| f64::from(v)).collect();
        DensityGrid::from_cells(grid_size, cells)
            .ok_or_else(|| DensityMapError::interpolation("GPU returned a grid of the wrong size"))
    }
}

/// Which backend to use for one interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BackendChoice {
    /// GPU when compiled in and a device is present, otherwise parallel CPU.
    #[default]
    Auto,
    /// Single-threaded CPU.
    Sequential,
    /// Multi-threaded CPU.
    Parallel,
    /// GPU, falling back to parallel CPU when unavailable.
    Gpu,
}

impl BackendChoice {
    /// Resolve the choice into a backend, checking GPU capability once.
    #[must_use]
    pub fn resolve(self) -> Box<dyn InterpolationBackend> {
        let backend: Box<dyn InterpolationBackend> = match self {
            Self::Sequential => Box::new(SequentialBackend),
            Self::Parallel => Box::new(ParallelBackend),
            Self::Auto | Self::Gpu => gpu_or_parallel(self),
        };
        debug!(choice = ?self, backend = backend.name(), "interpolation backend selected");
        backend
    }
}

#[cfg(feature = "gpu")]
fn gpu_or_parallel(choice: BackendChoice) -> Box<dyn InterpolationBackend> {
    if density_gpu::GpuContext::is_available() {
        Box::new(GpuBackend)
    } else {
        if choice == BackendChoice::Gpu {
            warn!("GPU backend requested but no device found, using parallel CPU");
        }
        Box::new(ParallelBackend)
    }
}

#[cfg(not(feature = "gpu"))]
fn gpu_or_parallel(choice: BackendChoice) -> Box<dyn InterpolationBackend> {
    if choice == BackendChoice::Gpu {
        warn!("GPU backend requested but support is not compiled in, using parallel CPU");
    }
    Box::new(ParallelBackend)
}
