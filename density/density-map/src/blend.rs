//! Blending segmented regions into an interpolated grid.

use density_segment::DensityRegion;
use nalgebra::Point3;

use crate::grid::DensityGrid;

/// Pull cells inside regions toward the regions' mean density.
///
/// Each cell whose centre lies inside at least one region boundary becomes
/// `(cell + m) / 2`, where `m` is the average `mean_density` of every region
/// containing that centre. The result does not depend on region order.
///
/// Returns the number of cells changed.
pub fn blend_regions(grid: &mut DensityGrid, regions: &[DensityRegion]) -> usize {
    if regions.is_empty() {
        return 0;
    }

    let n = grid.size();
    let mut blended = 0;
    for row in 0..n {
        for col in 0..n {
            let (x, y) = grid.cell_center(row, col);
            let center = Point3::new(x, y, 0.0);

            let (sum, count) = regions
                .iter()
                .filter(|region| region.contains(&center))
                .fold((0.0, 0_u32), |(sum, count), region| {
                    (sum + region.mean_density, count + 1)
                });
            if count == 0 {
                continue;
            }

            let mean = sum / f64::from(count);
            if let Some(cell) = grid.get(row, col) {
                grid.set(row, col, (cell + mean) / 2.0);
                blended += 1;
            }
        }
    }
    blended
}
