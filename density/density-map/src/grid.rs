//! Square density grid over the unit domain.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DensityMapError, DensityMapResult};

/// Largest supported cells per side.
pub const MAX_GRID_SIZE: usize = 4096;

/// Cells per side for a resolution: `round(1 / resolution)`.
///
/// # Errors
///
/// Returns [`DensityMapError::InvalidResolution`] unless `resolution` lies in
/// `(0, 1]` and yields at most [`MAX_GRID_SIZE`] cells per side.
///
/// # Example
///
/// ```
/// use density_map::grid_size_for;
///
/// assert_eq!(grid_size_for(0.1).unwrap(), 10);
/// assert_eq!(grid_size_for(0.3).unwrap(), 3);
/// assert!(grid_size_for(0.0).is_err());
/// ```
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
// Truncation: the value is range-checked against MAX_GRID_SIZE first
pub fn grid_size_for(resolution: f64) -> DensityMapResult<usize> {
    if !(resolution.is_finite() && resolution > 0.0 && resolution <= 1.0) {
        return Err(DensityMapError::InvalidResolution(resolution));
    }
    let cells = (1.0 / resolution).round();
    if cells > MAX_GRID_SIZE as f64 {
        return Err(DensityMapError::InvalidResolution(resolution));
    }
    Ok((cells as usize).max(1))
}

/// A square grid of density values, stored row-major.
///
/// Cell `(row, col)` covers the unit-square patch centred on
/// `((col + 0.5) / n, (row + 0.5) / n)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DensityGrid {
    size: usize,
    cells: Vec<f64>,
}

impl DensityGrid {
    /// A grid of zeros with `size` cells per side.
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0.0; size * size],
        }
    }

    /// Build a grid from row-major cells.
    ///
    /// Returns `None` if `cells.len() != size * size`.
    #[must_use]
    pub fn from_cells(size: usize, cells: Vec<f64>) -> Option<Self> {
        (cells.len() == size * size).then_some(Self { size, cells })
    }

    /// Build a grid from rows. Returns `None` unless the rows form a square.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Cells per side.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.size && col < self.size).then(|| self.cells[row * self.size + col])
    }

    /// Set the value at `(row, col)`. Out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col] = value;
        }
    }

    /// All cells, row-major.
    #[must_use]
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Mutable access to all cells, row-major.
    pub fn cells_mut(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Centre of cell `(row, col)` in unit-domain coordinates `(x, y)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    // Precision: grid sides are bounded by MAX_GRID_SIZE
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        let n = self.size as f64;
        ((col as f64 + 0.5) / n, (row as f64 + 0.5) / n)
    }

    /// Cell containing unit-domain point `(x, y)`, clamped to the grid.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    // Truncation: the index is clamped to the grid before the cast
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if self.size == 0 || !(x.is_finite() && y.is_finite()) {
            return None;
        }
        let n = self.size as f64;
        let max = n - 1.0;
        let col = (x * n).floor().clamp(0.0, max) as usize;
        let row = (y * n).floor().clamp(0.0, max) as usize;
        Some((row, col))
    }
}
