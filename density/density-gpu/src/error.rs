//! GPU error types for density interpolation.

use thiserror::Error;

/// Errors that can occur during GPU operations.
///
/// # Example
///
/// ```
/// use density_gpu::{GpuError, GpuResult};
///
/// fn check_gpu() -> GpuResult<()> {
///     Err(GpuError::NotAvailable)
/// }
/// assert!(check_gpu().is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GpuError {
    /// GPU device is not available on this system.
    ///
    /// This can happen when:
    /// - No compatible GPU is present
    /// - GPU drivers are not installed
    /// - The system is running headless without a software adapter
    #[error("GPU not available: no compatible device found")]
    NotAvailable,

    /// Interpolation was requested with no sample points.
    #[error("no density points to interpolate")]
    NoPoints,

    /// GPU execution failed.
    #[error("GPU execution failed: {0}")]
    Execution(String),

    /// Buffer mapping failed while reading results back.
    #[error("buffer mapping failed: {0}")]
    BufferMapping(String),

    /// The grid does not fit in one storage buffer or one dispatch.
    #[error("grid too large for GPU: {cells} cells, max supported: {max}")]
    GridTooLarge {
        /// Requested number of cells.
        cells: usize,
        /// Maximum supported cells.
        max: usize,
    },

    /// Too many sample points for one storage buffer.
    #[error("too many density points for GPU: {points}, max supported: {max}")]
    TooManyPoints {
        /// Number of points supplied.
        points: usize,
        /// Maximum supported points.
        max: usize,
    },
}

/// Result type for GPU operations.
pub type GpuResult<T> = Result<T, GpuError>;
