//! Error types for density map construction.

use thiserror::Error;

/// Result type alias for density map operations.
pub type DensityMapResult<T> = Result<T, DensityMapError>;

/// Errors that can occur while building a density map.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DensityMapError {
    /// Resolution outside `(0, 1]`, or a grid too large to allocate.
    #[error("invalid resolution {0}: must lie in (0, 1] with at most {max} cells per side", max = crate::grid::MAX_GRID_SIZE)]
    InvalidResolution(f64),

    /// A map parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParams(String),

    /// Interpolation could not produce a grid.
    #[error("interpolation failed: {0}")]
    InterpolationFailure(String),

    /// The run was cancelled through its abort signal.
    #[error("interpolation cancelled")]
    Cancelled,
}

impl DensityMapError {
    /// Create an interpolation failure.
    #[must_use]
    pub fn interpolation(msg: impl Into<String>) -> Self {
        Self::InterpolationFailure(msg.into())
    }

    /// Create an invalid parameter error.
    #[must_use]
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DensityMapError::InvalidResolution(1.5);
        let msg = format!("{err}");
        assert!(msg.contains("1.5"));
        assert!(msg.contains("(0, 1]"));

        let err = DensityMapError::interpolation("no density points");
        assert!(format!("{err}").contains("no density points"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DensityMapError>();
    }
}
