//! Error types for measurement operations.

use scan_polygon::PolygonError;
use scan_spatial::SpatialError;
use thiserror::Error;

/// Result type alias for measurement operations.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Errors that can occur during measurement operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeasureError {
    /// A resolved region boundary cannot enclose an area.
    #[error("region '{region}' boundary has {points} points, need at least 3")]
    InvalidRegion {
        /// Display name of the region kind.
        region: String,
        /// Boundary vertex count.
        points: usize,
    },

    /// The region detector failed.
    #[error("segmentation failed: {0}")]
    SegmentationFailure(String),

    /// Region metrics could not be computed.
    #[error("analysis failed: {0}")]
    AnalysisFailure(String),

    /// Invalid measurement parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Boundary geometry was rejected.
    #[error("boundary geometry: {0}")]
    Polygon(#[from] PolygonError),

    /// Vertex index construction or traversal failed.
    #[error("vertex index: {0}")]
    Spatial(#[from] SpatialError),
}

impl MeasureError {
    /// Create a segmentation failure.
    #[must_use]
    pub fn segmentation(details: impl Into<String>) -> Self {
        Self::SegmentationFailure(details.into())
    }

    /// Create an analysis failure.
    #[must_use]
    pub fn analysis(details: impl Into<String>) -> Self {
        Self::AnalysisFailure(details.into())
    }

    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}
