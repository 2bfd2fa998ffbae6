//! Error types for the analysis pipeline.

use std::path::PathBuf;

use density_cluster::ClusterError;
use density_map::DensityMapError;
use density_segment::SegmentError;
use graft_plan::GraftError;
use scan_measure::MeasureError;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors from any pipeline stage.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Clustering failed.
    #[error("clustering: {0}")]
    Cluster(#[from] ClusterError),

    /// Region segmentation failed.
    #[error("segmentation: {0}")]
    Segment(#[from] SegmentError),

    /// Density map construction failed.
    #[error("density map: {0}")]
    DensityMap(#[from] DensityMapError),

    /// Region measurement failed.
    #[error("measurement: {0}")]
    Measure(#[from] MeasureError),

    /// Graft allocation failed.
    #[error("graft planning: {0}")]
    Graft(#[from] GraftError),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(String),

    /// An offloaded stage panicked or was shut down.
    #[error("pipeline task failed: {0}")]
    TaskFailed(String),
}

impl PipelineError {
    /// True if a stage stopped because the invocation was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Cluster(ClusterError::Cancelled) | Self::DensityMap(DensityMapError::Cancelled)
        )
    }
}
