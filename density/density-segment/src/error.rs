//! Error types for region segmentation.

use scan_polygon::PolygonError;
use thiserror::Error;

/// Result type alias for segmentation operations.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Errors that can occur during segmentation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SegmentError {
    /// A cluster has too few points to bound a region.
    #[error("cluster {cluster} has {actual} points, need at least 3")]
    InsufficientPoints {
        /// Index of the offending cluster.
        cluster: usize,
        /// Number of points in the cluster.
        actual: usize,
    },

    /// A cluster's boundary could not be built.
    #[error("cluster {cluster} boundary: {source}")]
    Boundary {
        /// Index of the offending cluster.
        cluster: usize,
        /// Underlying geometry failure.
        #[source]
        source: PolygonError,
    },

    /// Two regions were given the same name.
    #[error("duplicate region name: {0}")]
    DuplicateName(String),

    /// The number of names does not match the number of clusters.
    #[error("{names} names supplied for {clusters} clusters")]
    NameCountMismatch {
        /// Number of clusters.
        clusters: usize,
        /// Number of names.
        names: usize,
    },
}
