//! Connected-region traversal over a spatial index.
//!
//! Expands a seed point into every point reachable through a chain of
//! neighbours no further than `link_radius` apart.

use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::error::{SpatialError, SpatialResult};
use crate::index::SpatialIndex;

/// Limits for [`SpatialIndex::connected_region`].
///
/// # Example
///
/// ```
/// use scan_spatial::GrowParams;
///
/// let params = GrowParams::new(0.2).with_max_extent(1.5).with_max_points(500);
/// assert!((params.link_radius - 0.2).abs() < f64::EPSILON);
/// assert_eq!(params.max_points, Some(500));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowParams {
    /// Maximum distance between two consecutive points of the chain.
    pub link_radius: f64,
    /// Points further than this from the seed are never absorbed.
    pub max_extent: Option<f64>,
    /// Stop once this many points have been absorbed.
    pub max_points: Option<usize>,
}

impl GrowParams {
    /// Unbounded traversal with the given link radius.
    #[must_use]
    pub const fn new(link_radius: f64) -> Self {
        Self {
            link_radius,
            max_extent: None,
            max_points: None,
        }
    }

    /// Only absorb points within `extent` of the seed.
    #[must_use]
    pub const fn with_max_extent(mut self, extent: f64) -> Self {
        self.max_extent = Some(extent);
        self
    }

    /// Stop after `count` points.
    #[must_use]
    pub const fn with_max_points(mut self, count: usize) -> Self {
        self.max_points = Some(count);
        self
    }
}

impl SpatialIndex {
    /// Breadth-first flood fill from `seed` through `link_radius` neighbourhoods.
    ///
    /// Every point is visited at most once, so the traversal terminates in
    /// time bounded by the number of indexed points. The result is sorted
    /// ascending and always contains `seed`.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::IndexOutOfBounds`] if `seed` is not in the index
    /// - [`SpatialError::InvalidRadius`] if `link_radius` is not positive and finite
    pub fn connected_region(&self, seed: usize, params: &GrowParams) -> SpatialResult<Vec<usize>> {
        let seed_point = *self.point(seed).ok_or(SpatialError::IndexOutOfBounds {
            index: seed,
            len: self.len(),
        })?;
        if !(params.link_radius.is_finite() && params.link_radius > 0.0) {
            return Err(SpatialError::InvalidRadius(params.link_radius));
        }

        let extent_sq = params.max_extent.map(|e| e * e);
        let limit = params.max_points.unwrap_or(usize::MAX).max(1);

        let mut visited: HashSet<usize> = HashSet::new();
        let mut region = vec![seed];
        let mut frontier = VecDeque::from([seed]);
        visited.insert(seed);

        'grow: while let Some(current) = frontier.pop_front() {
            for neighbor in self.neighbors_of(current, params.link_radius)? {
                if !visited.insert(neighbor) {
                    continue;
                }
                if let Some(limit_sq) = extent_sq
                    && (self.points()[neighbor] - seed_point).norm_squared() > limit_sq
                {
                    continue;
                }
                region.push(neighbor);
                if region.len() >= limit {
                    break 'grow;
                }
                frontier.push_back(neighbor);
            }
        }

        region.sort_unstable();
        Ok(region)
    }
}
