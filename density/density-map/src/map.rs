//! The density map output.

use density_segment::DensityRegion;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::DensityGrid;

/// A dense density map over the unit domain, plus the regions blended into it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DensityMap {
    /// Cell size as a fraction of the unit domain.
    pub resolution: f64,
    /// Smoothed density grid, `round(1 / resolution)` cells per side.
    pub grid: DensityGrid,
    /// Smallest strictly positive cell value, or 0 if no cell is positive.
    pub min_density: f64,
    /// Largest strictly positive cell value, or 0 if no cell is positive.
    pub max_density: f64,
    /// Regions used for blending.
    pub regions: Vec<DensityRegion>,
}

impl DensityMap {
    /// Cells per side.
    #[must_use]
    pub const fn grid_size(&self) -> usize {
        self.grid.size()
    }

    /// Density of the cell containing unit-domain point `(x, y)`.
    ///
    /// Points outside the unit square read the nearest edge cell.
    #[must_use]
    pub fn density_at(&self, x: f64, y: f64) -> Option<f64> {
        let (row, col) = self.grid.cell_at(x, y)?;
        self.grid.get(row, col)
    }

    /// Region by name.
    #[must_use]
    pub fn region(&self, name: &str) -> Option<&DensityRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Fraction of cells with positive density.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    // Precision: cell counts are bounded by MAX_GRID_SIZE squared
    pub fn coverage(&self) -> f64 {
        let cells = self.grid.cells();
        if cells.is_empty() {
            return 0.0;
        }
        cells.iter().filter(|v| **v > 0.0).count() as f64 / cells.len() as f64
    }
}

/// Smallest and largest strictly positive values; `(0, 0)` if there are none.
#[must_use]
pub fn positive_range(cells: &[f64]) -> (f64, f64) {
    cells
        .iter()
        .copied()
        .filter(|v| *v > 0.0)
        .fold(None, |range: Option<(f64, f64)>, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}
