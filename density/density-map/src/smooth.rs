//! Fixed 3x3 Gaussian smoothing.

use crate::grid::DensityGrid;

/// Kernel weights, row-major; they sum to one.
pub const GAUSSIAN_KERNEL: [[f64; 3]; 3] = [
    [0.0625, 0.125, 0.0625],
    [0.125, 0.25, 0.125],
    [0.0625, 0.125, 0.0625],
];

/// Smooth interior cells with [`GAUSSIAN_KERNEL`]; border cells are copied.
///
/// `factor` in `[0, 1]` mixes the smoothed value with the original:
/// `factor * smoothed + (1 - factor) * original`. A factor of one applies the
/// full kernel, zero returns the input unchanged.
///
/// # Example
///
/// ```
/// use density_map::{gaussian_smooth, DensityGrid};
///
/// let mut grid = DensityGrid::zeros(3);
/// grid.set(1, 1, 1.0);
///
/// let smoothed = gaussian_smooth(&grid, 1.0);
/// assert_eq!(smoothed.get(1, 1), Some(0.25));
/// // Borders are copied, not smoothed
/// assert_eq!(smoothed.get(0, 1), Some(0.0));
/// ```
#[must_use]
pub fn gaussian_smooth(grid: &DensityGrid, factor: f64) -> DensityGrid {
    let n = grid.size();
    let mut out = grid.clone();
    if n < 3 || factor <= 0.0 {
        return out;
    }
    let factor = factor.min(1.0);
    let src = grid.cells();

    for row in 1..n - 1 {
        for col in 1..n - 1 {
            let mut acc = 0.0;
            for (kr, weights) in GAUSSIAN_KERNEL.iter().enumerate() {
                for (kc, w) in weights.iter().enumerate() {
                    acc += w * src[(row + kr - 1) * n + (col + kc - 1)];
                }
            }
            let original = src[row * n + col];
            out.set(row, col, factor * acc + (1.0 - factor) * original);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_sums_to_one() {
        let sum: f64 = GAUSSIAN_KERNEL.iter().flatten().sum();
        assert_relative_eq!(sum, 1.0);
    }

    #[test]
    fn test_constant_grid_unchanged() {
        let grid = DensityGrid::from_cells(5, vec![0.4; 25]).unwrap();
        let smoothed = gaussian_smooth(&grid, 1.0);
        for v in smoothed.cells() {
            assert_relative_eq!(*v, 0.4, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_impulse_spreads() {
        let mut grid = DensityGrid::zeros(5);
        grid.set(2, 2, 1.0);
        let smoothed = gaussian_smooth(&grid, 1.0);
        assert_relative_eq!(smoothed.get(2, 2).unwrap(), 0.25);
        assert_relative_eq!(smoothed.get(1, 2).unwrap(), 0.125);
        assert_relative_eq!(smoothed.get(1, 1).unwrap(), 0.0625);
        // Border untouched even though a neighbour is non-zero
        assert_relative_eq!(smoothed.get(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_partial_factor() {
        let mut grid = DensityGrid::zeros(3);
        grid.set(1, 1, 1.0);
        let smoothed = gaussian_smooth(&grid, 0.5);
        assert_relative_eq!(smoothed.get(1, 1).unwrap(), 0.625);
        assert_eq!(gaussian_smooth(&grid, 0.0), grid);
    }

    #[test]
    fn test_small_grids_copied() {
        let grid = DensityGrid::from_cells(2, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(gaussian_smooth(&grid, 1.0), grid);
    }
}
