//! Density-tiered clustering of scan density points.
//!
//! Density points from feature analysis are grouped into spatial clusters
//! one density tier at a time:
//!
//! 1. Thresholds are visited from highest to lowest
//! 2. Points at or above the threshold that are still unclustered run
//!    through DBSCAN (neighbours within `epsilon`, the point itself counted)
//! 3. Clusters smaller than `min_cluster_size` are discarded
//! 4. Clustered points leave the pool, so lower tiers never re-claim them
//!
//! Neighbour queries are answered by a [`scan_spatial::SpatialIndex`] with
//! cell size `epsilon`, so each query touches at most 27 cells.
//!
//! # Example
//!
//! ```
//! use density_cluster::{ClusterParams, DensityClusterer};
//! use scan_types::DensityPoint;
//!
//! let mut points: Vec<DensityPoint> = (0..8)
//!     .map(|i| DensityPoint::from_coords(0.5 + f64::from(i) * 0.005, 0.5, 0.0, 0.9))
//!     .collect();
//! points.push(DensityPoint::from_coords(0.05, 0.95, 0.0, 0.9));
//!
//! let params = ClusterParams::default()
//!     .with_min_cluster_size(5)
//!     .with_epsilon(0.1);
//! let clusters = DensityClusterer::new(params).cluster(&points).unwrap();
//!
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].len(), 8);
//! ```
//!
//! # Cancellation
//!
//! Attach an [`AbortSignal`](scan_types::AbortSignal) with
//! [`DensityClusterer::with_abort`]; a raised signal stops the run with
//! [`ClusterError::Cancelled`] at the next expansion step.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod clusterer;
mod dbscan;
mod error;
mod params;

pub use clusterer::DensityClusterer;
pub use dbscan::dbscan;
pub use error::{ClusterError, ClusterResult};
pub use params::ClusterParams;

// Re-export core types for convenience
pub use scan_types::{AbortSignal, DensityPoint};
