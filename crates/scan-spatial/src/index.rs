//! Uniform-grid spatial hash index.

use hashbrown::HashMap;
use nalgebra::Point3;

use crate::cell::CellCoord;
use crate::error::{SpatialError, SpatialResult};

/// Points that fall in one grid cell.
#[derive(Debug, Clone)]
struct Bucket {
    cell: CellCoord,
    members: Vec<usize>,
}

/// A sparse uniform-grid index over a fixed set of 3D points.
///
/// Space is partitioned into cubes of side `cell_size`. Every point is stored
/// by index in the bucket of its cell; buckets live in a hash map keyed by
/// [`CellCoord::spatial_hash`]. The index is built once per point set and
/// never mutated afterwards, so it can be shared by reference across the
/// stages of a single pipeline invocation.
///
/// # Example
///
/// ```
/// use scan_spatial::SpatialIndex;
/// use nalgebra::Point3;
///
/// let points: Vec<_> = (0..10).map(|i| Point3::new(f64::from(i), 0.0, 0.0)).collect();
/// let index = SpatialIndex::build(&points, 1.0).unwrap();
///
/// assert_eq!(index.len(), 10);
/// assert_eq!(index.query_radius(&Point3::new(4.0, 0.0, 0.0), 1.5).unwrap(), vec![3, 4, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    inv_cell_size: f64,
    points: Vec<Point3<f64>>,
    buckets: HashMap<u64, Vec<Bucket>>,
    cell_count: usize,
    cell_min: CellCoord,
    cell_max: CellCoord,
}

impl SpatialIndex {
    /// Build an index over `points` with the given cell size.
    ///
    /// An empty point set produces an empty index whose queries all return
    /// nothing.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::InvalidCellSize`] if `cell_size` is not positive and finite
    /// - [`SpatialError::NonFinitePoint`] if any point has a NaN or infinite coordinate
    pub fn build(points: &[Point3<f64>], cell_size: f64) -> SpatialResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(SpatialError::InvalidCellSize(cell_size));
        }
        let inv_cell_size = 1.0 / cell_size;

        let mut buckets: HashMap<u64, Vec<Bucket>> = HashMap::new();
        let mut cell_count = 0;
        let mut cell_min = CellCoord::new(i64::MAX, i64::MAX, i64::MAX);
        let mut cell_max = CellCoord::new(i64::MIN, i64::MIN, i64::MIN);

        for (index, point) in points.iter().enumerate() {
            if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
                return Err(SpatialError::NonFinitePoint { index });
            }
            let cell = CellCoord::from_point(point, inv_cell_size);
            cell_min = CellCoord::new(
                cell_min.x.min(cell.x),
                cell_min.y.min(cell.y),
                cell_min.z.min(cell.z),
            );
            cell_max = CellCoord::new(
                cell_max.x.max(cell.x),
                cell_max.y.max(cell.y),
                cell_max.z.max(cell.z),
            );

            let chain = buckets.entry(cell.spatial_hash()).or_default();
            if let Some(bucket) = chain.iter_mut().find(|b| b.cell == cell) {
                bucket.members.push(index);
            } else {
                chain.push(Bucket {
                    cell,
                    members: vec![index],
                });
                cell_count += 1;
            }
        }

        Ok(Self {
            cell_size,
            inv_cell_size,
            points: points.to_vec(),
            buckets,
            cell_count,
            cell_min,
            cell_max,
        })
    }

    /// Side length of a grid cell.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the index holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of occupied cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Position of an indexed point.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<&Point3<f64>> {
        self.points.get(index)
    }

    /// All indexed positions in index order.
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Cell containing a world-space point.
    #[must_use]
    pub fn cell_of(&self, point: &Point3<f64>) -> CellCoord {
        CellCoord::from_point(point, self.inv_cell_size)
    }

    /// Indices of the points stored in a cell.
    #[must_use]
    pub fn members_of(&self, cell: CellCoord) -> &[usize] {
        self.buckets
            .get(&cell.spatial_hash())
            .and_then(|chain| chain.iter().find(|b| b.cell == cell))
            .map_or(&[], |b| b.members.as_slice())
    }

    /// Indices of all points within `radius` of `center` (inclusive), sorted ascending.
    ///
    /// Visits every cell within `ceil(radius / cell_size)` on each axis and
    /// keeps the points whose true Euclidean distance is within `radius`.
    /// When that cube would hold more cells than the index has occupied, the
    /// occupied cells are scanned directly instead, so query cost never
    /// exceeds the size of the input.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidRadius`] if `radius` is not positive and finite.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: the reach is clamped by the occupied cell span before use
    pub fn query_radius(&self, center: &Point3<f64>, radius: f64) -> SpatialResult<Vec<usize>> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SpatialError::InvalidRadius(radius));
        }
        if self.is_empty() || !(center.x.is_finite() && center.y.is_finite() && center.z.is_finite())
        {
            return Ok(Vec::new());
        }

        let radius_sq = radius * radius;
        let reach = (radius * self.inv_cell_size).ceil() as i64;
        let center_cell = self.cell_of(center);
        let within = |i: &usize| (self.points[*i] - center).norm_squared() <= radius_sq;

        let mut found = Vec::new();
        let side = u128::from(reach.unsigned_abs()) * 2 + 1;
        if side.saturating_mul(side).saturating_mul(side) > self.cell_count as u128 {
            for bucket in self.buckets.values().flatten() {
                if bucket.cell.chebyshev_distance(center_cell) <= reach.unsigned_abs() {
                    found.extend(bucket.members.iter().copied().filter(within));
                }
            }
        } else {
            for cell in center_cell.neighborhood(reach) {
                found.extend(self.members_of(cell).iter().copied().filter(within));
            }
        }

        found.sort_unstable();
        Ok(found)
    }

    /// Indices of all points within `radius` of the indexed point `index`,
    /// including `index` itself.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::IndexOutOfBounds`] if `index` is not in the index
    /// - [`SpatialError::InvalidRadius`] if `radius` is not positive and finite
    pub fn neighbors_of(&self, index: usize, radius: f64) -> SpatialResult<Vec<usize>> {
        let center = self.point(index).ok_or(SpatialError::IndexOutOfBounds {
            index,
            len: self.len(),
        })?;
        self.query_radius(center, radius)
    }

    /// Index of the point nearest to `query`, or `None` for an empty index.
    ///
    /// Searches outward in cubic shells of cells and stops once the next
    /// shell cannot contain anything closer than the best candidate.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    // Precision loss: ring counts are small integers
    pub fn nearest(&self, query: &Point3<f64>) -> Option<usize> {
        if self.is_empty() || !(query.x.is_finite() && query.y.is_finite() && query.z.is_finite()) {
            return None;
        }

        let center = self.cell_of(query);
        let max_ring = [
            center.x.abs_diff(self.cell_min.x),
            center.x.abs_diff(self.cell_max.x),
            center.y.abs_diff(self.cell_min.y),
            center.y.abs_diff(self.cell_max.y),
            center.z.abs_diff(self.cell_min.z),
            center.z.abs_diff(self.cell_max.z),
        ]
        .into_iter()
        .max()
        .unwrap_or(0);

        // Far outside the occupied span a shell walk is wasteful
        if max_ring as u128 > self.cell_count as u128 {
            return self.nearest_linear(query);
        }

        let mut best: Option<(usize, f64)> = None;
        for ring in 0..=max_ring as i64 {
            if let Some((_, best_sq)) = best {
                let shell_min = (ring - 1).max(0) as f64 * self.cell_size;
                if shell_min * shell_min > best_sq {
                    break;
                }
            }
            for cell in center.shell(ring) {
                for &i in self.members_of(cell) {
                    let d = (self.points[i] - query).norm_squared();
                    if best.is_none_or(|(bi, bd)| d < bd || (d == bd && i < bi)) {
                        best = Some((i, d));
                    }
                }
            }
        }
        best.map(|(i, _)| i)
    }

    fn nearest_linear(&self, query: &Point3<f64>) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (p - query).norm_squared()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lattice(n: i32, spacing: f64) -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    points.push(Point3::new(
                        f64::from(x) * spacing,
                        f64::from(y) * spacing,
                        f64::from(z) * spacing,
                    ));
                }
            }
        }
        points
    }

    fn brute_force(points: &[Point3<f64>], center: &Point3<f64>, radius: f64) -> Vec<usize> {
        points
            .iter()
            .enumerate()
            .filter(|(_, p)| (*p - center).norm() <= radius)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_invalid_cell_size() {
        let points = vec![Point3::origin()];
        assert!(matches!(
            SpatialIndex::build(&points, 0.0),
            Err(SpatialError::InvalidCellSize(_))
        ));
        assert!(SpatialIndex::build(&points, f64::NAN).is_err());
        assert!(SpatialIndex::build(&points, -1.0).is_err());
    }

    #[test]
    fn test_non_finite_point_rejected() {
        let points = vec![Point3::origin(), Point3::new(f64::NAN, 0.0, 0.0)];
        assert!(matches!(
            SpatialIndex::build(&points, 1.0),
            Err(SpatialError::NonFinitePoint { index: 1 })
        ));
    }

    #[test]
    fn test_invalid_radius() {
        let index = SpatialIndex::build(&[Point3::origin()], 1.0).unwrap();
        assert!(matches!(
            index.query_radius(&Point3::origin(), 0.0),
            Err(SpatialError::InvalidRadius(_))
        ));
        assert!(index.query_radius(&Point3::origin(), -2.0).is_err());
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::build(&[], 1.0).unwrap();
        assert!(index.is_empty());
        assert!(index.query_radius(&Point3::origin(), 10.0).unwrap().is_empty());
        assert!(index.nearest(&Point3::origin()).is_none());
    }

    #[test]
    fn test_matches_brute_force() {
        let points = lattice(6, 0.3);
        let index = SpatialIndex::build(&points, 0.25).unwrap();
        for (center, radius) in [
            (Point3::new(0.7, 0.7, 0.7), 0.5),
            (Point3::new(0.0, 0.0, 0.0), 0.31),
            (Point3::new(-1.0, 0.5, 0.5), 1.2),
            (Point3::new(0.75, 0.75, 0.75), 10.0),
        ] {
            assert_eq!(
                index.query_radius(&center, radius).unwrap(),
                brute_force(&points, &center, radius),
                "center {center:?} radius {radius}"
            );
        }
    }

    #[test]
    fn test_cells_shared_by_points() {
        let points = vec![Point3::new(0.1, 0.1, 0.1), Point3::new(0.2, 0.2, 0.2)];
        let index = SpatialIndex::build(&points, 1.0).unwrap();
        assert_eq!(index.cell_count(), 1);
        assert_eq!(index.members_of(CellCoord::new(0, 0, 0)), &[0, 1]);
        assert!(index.members_of(CellCoord::new(1, 0, 0)).is_empty());
    }

    #[test]
    fn test_neighbors_of() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let index = SpatialIndex::build(&points, 0.5).unwrap();
        assert_eq!(index.neighbors_of(0, 0.6).unwrap(), vec![0, 1]);
        assert!(matches!(
            index.neighbors_of(5, 0.6),
            Err(SpatialError::IndexOutOfBounds { index: 5, len: 3 })
        ));
    }

    #[test]
    fn test_nearest_matches_linear() {
        let points = lattice(5, 0.2);
        let index = SpatialIndex::build(&points, 0.15).unwrap();
        for query in [
            Point3::new(0.41, 0.39, 0.05),
            Point3::new(-0.3, 0.9, 0.2),
            Point3::new(5.0, 5.0, 5.0),
        ] {
            let expected = index.nearest_linear(&query).unwrap();
            let found = index.nearest(&query).unwrap();
            let d_expected = (points[expected] - query).norm();
            let d_found = (points[found] - query).norm();
            assert_relative_eq!(d_expected, d_found, epsilon = 1e-12);
        }
    }
}
