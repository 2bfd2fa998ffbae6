//! DBSCAN over a spatial hash index.

use std::collections::VecDeque;

use nalgebra::Point3;
use scan_spatial::SpatialIndex;
use scan_types::AbortSignal;

use crate::error::{ClusterError, ClusterResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Unvisited,
    Noise,
    Member,
}

/// Density-based clustering of `positions`.
///
/// A point is a core point when at least `min_points` points, itself
/// included, lie within `epsilon` of it. Clusters grow from core points;
/// non-core points reached from a cluster join it as border points but do
/// not extend it. Points reachable from no core point are noise and appear
/// in no cluster.
///
/// Returns clusters as sorted index lists into `positions`, in discovery
/// order. Size filtering is left to the caller.
///
/// # Errors
///
/// - [`ClusterError::InvalidParams`] if `min_points` is zero
/// - [`ClusterError::Spatial`] if `epsilon` is not positive or a position is non-finite
/// - [`ClusterError::Cancelled`] if `abort` is raised during the run
///
/// # Example
///
/// ```
/// use density_cluster::{dbscan, AbortSignal};
/// use nalgebra::Point3;
///
/// let positions = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.1, 0.0, 0.0),
///     Point3::new(0.2, 0.0, 0.0),
///     Point3::new(5.0, 0.0, 0.0),
/// ];
/// let clusters = dbscan(&positions, 0.15, 2, &AbortSignal::new()).unwrap();
/// assert_eq!(clusters, vec![vec![0, 1, 2]]);
/// ```
pub fn dbscan(
    positions: &[Point3<f64>],
    epsilon: f64,
    min_points: usize,
    abort: &AbortSignal,
) -> ClusterResult<Vec<Vec<usize>>> {
    if min_points == 0 {
        return Err(ClusterError::invalid_params("min_points must be at least 1"));
    }
    let index = SpatialIndex::build(positions, epsilon)?;

    let mut labels = vec![Label::Unvisited; positions.len()];
    let mut clusters = Vec::new();

    for seed in 0..positions.len() {
        if labels[seed] != Label::Unvisited {
            continue;
        }
        if abort.is_aborted() {
            return Err(ClusterError::Cancelled);
        }

        let neighbors = index.neighbors_of(seed, epsilon)?;
        if neighbors.len() < min_points {
            labels[seed] = Label::Noise;
            continue;
        }

        labels[seed] = Label::Member;
        let mut members = vec![seed];
        let mut frontier: VecDeque<usize> = neighbors.into_iter().filter(|&j| j != seed).collect();

        while let Some(j) = frontier.pop_front() {
            match labels[j] {
                Label::Member => {}
                Label::Noise => {
                    // Already known to be non-core: border point
                    labels[j] = Label::Member;
                    members.push(j);
                }
                Label::Unvisited => {
                    if abort.is_aborted() {
                        return Err(ClusterError::Cancelled);
                    }
                    labels[j] = Label::Member;
                    members.push(j);

                    let reach = index.neighbors_of(j, epsilon)?;
                    if reach.len() >= min_points {
                        frontier.extend(
                            reach
                                .into_iter()
                                .filter(|&k| labels[k] != Label::Member),
                        );
                    }
                }
            }
        }

        members.sort_unstable();
        clusters.push(members);
    }

    Ok(clusters)
}
