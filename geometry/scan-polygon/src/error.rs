//! Error types for polygon operations.

use thiserror::Error;

/// Result type alias for polygon operations.
pub type PolygonResult<T> = Result<T, PolygonError>;

/// Errors that can occur during polygon operations.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PolygonError {
    /// Too few points to form a polygon.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// All points are collinear or coincident.
    #[error("degenerate point set: all points are collinear")]
    Degenerate,

    /// Two non-adjacent boundary edges cross or touch.
    #[error("boundary self-intersects between edges {first_edge} and {second_edge}")]
    SelfIntersecting {
        /// Index of the first offending edge (edge `i` runs from vertex `i` to `i + 1`).
        first_edge: usize,
        /// Index of the second offending edge.
        second_edge: usize,
    },

    /// Ear clipping stopped before the polygon was fully triangulated.
    #[error("triangulation failed with {remaining} vertices left unclipped")]
    TriangulationFailed {
        /// Vertices that could not be clipped.
        remaining: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("point {index} has a non-finite coordinate")]
    NonFinite {
        /// Index of the offending point.
        index: usize,
    },
}

impl PolygonError {
    /// Create an insufficient-points error for a polygon needing three vertices.
    #[must_use]
    pub const fn need_three(actual: usize) -> Self {
        Self::InsufficientPoints {
            required: 3,
            actual,
        }
    }
}
