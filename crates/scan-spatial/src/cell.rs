//! Integer cell coordinates and the spatial hash.

use nalgebra::Point3;

/// Primes from Teschner et al., "Optimized Spatial Hashing for Collision
/// Detection of Deformable Objects".
const HASH_PRIMES: [u64; 3] = [73_856_093, 19_349_663, 83_492_791];

/// A discrete cell coordinate in a uniform grid.
///
/// # Example
///
/// ```
/// use scan_spatial::CellCoord;
/// use nalgebra::Point3;
///
/// let cell = CellCoord::from_point(&Point3::new(0.25, -0.05, 1.0), 1.0 / 0.1);
/// assert_eq!(cell, CellCoord::new(2, -1, 10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    /// X cell index.
    pub x: i64,
    /// Y cell index.
    pub y: i64,
    /// Z cell index.
    pub z: i64,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Cell containing a point, given the inverse cell size.
    ///
    /// Uses `floor(coord / cell_size)` on each axis.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: float-to-int casts saturate, and callers reject non-finite points
    pub fn from_point(point: &Point3<f64>, inv_cell_size: f64) -> Self {
        Self {
            x: (point.x * inv_cell_size).floor() as i64,
            y: (point.y * inv_cell_size).floor() as i64,
            z: (point.z * inv_cell_size).floor() as i64,
        }
    }

    /// Large-prime multiply-xor hash of the coordinate.
    ///
    /// Different cells may collide; the index keeps the exact coordinate
    /// alongside each bucket so collisions never merge cells.
    ///
    /// # Example
    ///
    /// ```
    /// use scan_spatial::CellCoord;
    ///
    /// let a = CellCoord::new(1, 2, 3);
    /// assert_eq!(a.spatial_hash(), CellCoord::new(1, 2, 3).spatial_hash());
    /// assert_ne!(a.spatial_hash(), CellCoord::new(3, 2, 1).spatial_hash());
    /// ```
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    // Sign loss: the two's complement bit pattern is what gets hashed
    pub const fn spatial_hash(self) -> u64 {
        (self.x as u64).wrapping_mul(HASH_PRIMES[0])
            ^ (self.y as u64).wrapping_mul(HASH_PRIMES[1])
            ^ (self.z as u64).wrapping_mul(HASH_PRIMES[2])
    }

    /// Offset this coordinate by a delta on each axis.
    #[must_use]
    pub const fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.z.saturating_add(dz),
        )
    }

    /// Chebyshev (chessboard) distance between two cells.
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> u64 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        let m = if dx > dy { dx } else { dy };
        if m > dz { m } else { dz }
    }

    /// All cells within `reach` cells on every axis (a cube of side `2 * reach + 1`).
    ///
    /// # Example
    ///
    /// ```
    /// use scan_spatial::CellCoord;
    ///
    /// assert_eq!(CellCoord::new(0, 0, 0).neighborhood(1).count(), 27);
    /// ```
    pub fn neighborhood(self, reach: i64) -> impl Iterator<Item = Self> {
        let reach = reach.max(0);
        (-reach..=reach).flat_map(move |dz| {
            (-reach..=reach)
                .flat_map(move |dy| (-reach..=reach).map(move |dx| self.offset(dx, dy, dz)))
        })
    }

    /// Cells at exactly Chebyshev distance `ring` from this cell.
    ///
    /// Ring 0 is the cell itself.
    pub fn shell(self, ring: i64) -> impl Iterator<Item = Self> {
        self.neighborhood(ring)
            .filter(move |c| c.chebyshev_distance(self) == ring.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_point_floors_negative() {
        let cell = CellCoord::from_point(&Point3::new(-0.01, 0.0, 0.99), 1.0);
        assert_eq!(cell, CellCoord::new(-1, 0, 0));
    }

    #[test]
    fn test_neighborhood_sizes() {
        let c = CellCoord::new(5, 5, 5);
        assert_eq!(c.neighborhood(0).count(), 1);
        assert_eq!(c.neighborhood(2).count(), 125);
    }

    #[test]
    fn test_shell_sizes() {
        let c = CellCoord::default();
        assert_eq!(c.shell(0).count(), 1);
        assert_eq!(c.shell(1).count(), 26);
        assert_eq!(c.shell(2).count(), 125 - 27);
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = CellCoord::new(0, 0, 0);
        let b = CellCoord::new(-3, 2, 1);
        assert_eq!(a.chebyshev_distance(b), 3);
    }
}
