//! Error types for spatial index operations.

use thiserror::Error;

/// Result type alias for spatial index operations.
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Errors that can occur while building or querying a [`SpatialIndex`](crate::SpatialIndex).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpatialError {
    /// The cell size must be positive and finite.
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f64),

    /// The query radius must be positive and finite.
    #[error("query radius must be positive, got {0}")]
    InvalidRadius(f64),

    /// A point with a NaN or infinite coordinate was supplied.
    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint {
        /// Index of the offending point.
        index: usize,
    },

    /// A point index is outside the indexed set.
    #[error("point index {index} out of bounds (index holds {len} points)")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of indexed points.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpatialError::InvalidCellSize(-1.0);
        assert!(format!("{err}").contains("-1"));

        let err = SpatialError::InvalidRadius(0.0);
        assert!(format!("{err}").contains("radius"));

        let err = SpatialError::IndexOutOfBounds { index: 7, len: 3 };
        let msg = format!("{err}");
        assert!(msg.contains('7'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpatialError>();
    }
}
