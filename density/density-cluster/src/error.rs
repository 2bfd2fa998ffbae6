//! Error types for density clustering.

use scan_spatial::SpatialError;
use thiserror::Error;

/// Result type alias for clustering operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors that can occur during clustering.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClusterError {
    /// Clustering parameters are out of range.
    #[error("invalid cluster parameters: {0}")]
    InvalidParams(String),

    /// The run was cancelled through its abort signal.
    #[error("clustering cancelled")]
    Cancelled,

    /// The neighbour index could not be built or queried.
    #[error("spatial index error: {0}")]
    Spatial(#[from] SpatialError),
}

impl ClusterError {
    /// Create an invalid parameters error.
    #[must_use]
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }
}
