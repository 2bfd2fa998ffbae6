//! Density map construction.

use density_segment::DensityRegion;
use scan_types::{AbortSignal, DensityPoint};
use tracing::{debug, info};

use crate::backend::BackendChoice;
use crate::blend::blend_regions;
use crate::error::{DensityMapError, DensityMapResult};
use crate::grid::grid_size_for;
use crate::map::{DensityMap, positive_range};
use crate::preferences::DensityPreferences;
use crate::smooth::gaussian_smooth;

/// Builds [`DensityMap`]s: interpolate, blend regions, smooth, measure range.
#[derive(Debug, Clone)]
pub struct DensityInterpolator {
    backend: BackendChoice,
    smoothing_factor: f64,
    abort: AbortSignal,
}

impl Default for DensityInterpolator {
    fn default() -> Self {
        Self {
            backend: BackendChoice::Auto,
            smoothing_factor: 1.0,
            abort: AbortSignal::new(),
        }
    }
}

impl DensityInterpolator {
    /// Interpolator with the automatic backend and full smoothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpolator configured from preferences.
    #[must_use]
    pub fn from_preferences(prefs: &DensityPreferences) -> Self {
        Self::new()
            .with_backend(prefs.backend)
            .with_smoothing_factor(prefs.smoothing_factor)
    }

    /// Sets the backend choice.
    #[must_use]
    pub const fn with_backend(mut self, backend: BackendChoice) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the smoothing factor.
    #[must_use]
    pub const fn with_smoothing_factor(mut self, factor: f64) -> Self {
        self.smoothing_factor = factor;
        self
    }

    /// Attach a cancellation signal.
    #[must_use]
    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.abort = abort;
        self
    }

    /// Build a density map.
    ///
    /// The backend is resolved once for the call. Cells inside `regions` are
    /// blended toward the regions' mean density before smoothing.
    ///
    /// # Errors
    ///
    /// - [`DensityMapError::InvalidResolution`] for a resolution outside `(0, 1]`
    /// - [`DensityMapError::InvalidParams`] for a smoothing factor outside `[0, 1]`
    /// - [`DensityMapError::InterpolationFailure`] for an empty point set
    /// - [`DensityMapError::Cancelled`] if the abort signal is raised
    ///
    /// # Example
    ///
    /// ```
    /// use density_map::{BackendChoice, DensityInterpolator};
    /// use scan_types::DensityPoint;
    ///
    /// let points = vec![
    ///     DensityPoint::from_coords(0.25, 0.25, 0.0, 0.2),
    ///     DensityPoint::from_coords(0.75, 0.75, 0.0, 0.8),
    /// ];
    /// let map = DensityInterpolator::new()
    ///     .with_backend(BackendChoice::Sequential)
    ///     .interpolate(&points, 0.1, &[])
    ///     .unwrap();
    ///
    /// assert_eq!(map.grid_size(), 10);
    /// assert!(map.min_density >= 0.2 && map.max_density <= 0.8);
    /// ```
    pub fn interpolate(
        &self,
        points: &[DensityPoint],
        resolution: f64,
        regions: &[DensityRegion],
    ) -> DensityMapResult<DensityMap> {
        let grid_size = grid_size_for(resolution)?;
        if !(0.0..=1.0).contains(&self.smoothing_factor) {
            return Err(DensityMapError::invalid_params(format!(
                "smoothing_factor must lie in [0, 1], got {}",
                self.smoothing_factor
            )));
        }
        if points.is_empty() {
            return Err(DensityMapError::interpolation("no density points"));
        }

        let backend = self.backend.resolve();
        let mut grid = backend.interpolate(points, grid_size, &self.abort)?;
        debug!(backend = backend.name(), grid_size, "raw grid interpolated");

        if self.abort.is_aborted() {
            return Err(DensityMapError::Cancelled);
        }
        let blended = blend_regions(&mut grid, regions);
        debug!(regions = regions.len(), cells = blended, "regions blended");

        if self.abort.is_aborted() {
            return Err(DensityMapError::Cancelled);
        }
        let grid = gaussian_smooth(&grid, self.smoothing_factor);
        let (min_density, max_density) = positive_range(grid.cells());

        info!(
            backend = backend.name(),
            grid_size,
            points = points.len(),
            regions = regions.len(),
            min_density,
            max_density,
            "density map complete"
        );

        Ok(DensityMap {
            resolution,
            grid,
            min_density,
            max_density,
            regions: regions.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use density_segment::RegionSegmenter;

    fn grid_points() -> Vec<DensityPoint> {
        let mut points = Vec::new();
        for i in 0..6 {
            for j in 0..6 {
                let x = 0.1 + f64::from(i) * 0.16;
                let y = 0.1 + f64::from(j) * 0.16;
                points.push(DensityPoint::from_coords(x, y, 0.0, 0.1 + 0.1 * f64::from(i)));
            }
        }
        points
    }

    #[test]
    fn test_grid_dimensions() {
        let map = DensityInterpolator::new()
            .with_backend(BackendChoice::Sequential)
            .interpolate(&grid_points(), 0.05, &[])
            .unwrap();
        assert_eq!(map.grid_size(), 20);
        assert_eq!(map.grid.cells().len(), 400);
        assert_relative_eq!(map.resolution, 0.05);
    }

    #[test]
    fn test_positive_cells_within_range() {
        let map = DensityInterpolator::new()
            .with_backend(BackendChoice::Parallel)
            .interpolate(&grid_points(), 0.04, &[])
            .unwrap();
        for v in map.grid.cells().iter().filter(|v| **v > 0.0) {
            assert!(*v >= map.min_density && *v <= map.max_density);
        }
        assert!(map.min_density > 0.0);
    }

    #[test]
    fn test_backends_agree_end_to_end() {
        let points = grid_points();
        let seq = DensityInterpolator::new()
            .with_backend(BackendChoice::Sequential)
            .interpolate(&points, 0.05, &[])
            .unwrap();
        for choice in [BackendChoice::Parallel, BackendChoice::Auto, BackendChoice::Gpu] {
            let other = DensityInterpolator::new()
                .with_backend(choice)
                .interpolate(&points, 0.05, &[])
                .unwrap();
            for (a, b) in seq.grid.cells().iter().zip(other.grid.cells()) {
                assert!((a - b).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_regions_raise_low_cells() {
        let points = vec![
            DensityPoint::from_coords(0.1, 0.1, 0.0, 0.1),
            DensityPoint::from_coords(0.9, 0.9, 0.0, 0.1),
        ];
        let cluster = vec![
            DensityPoint::from_coords(0.3, 0.3, 0.0, 0.9),
            DensityPoint::from_coords(0.7, 0.3, 0.0, 0.9),
            DensityPoint::from_coords(0.7, 0.7, 0.0, 0.9),
            DensityPoint::from_coords(0.3, 0.7, 0.0, 0.9),
        ];
        let regions = RegionSegmenter::new().segment(&[cluster]).unwrap();

        let interpolator = DensityInterpolator::new()
            .with_backend(BackendChoice::Sequential)
            .with_smoothing_factor(0.0);
        let plain = interpolator.interpolate(&points, 0.1, &[]).unwrap();
        let blended = interpolator.interpolate(&points, 0.1, &regions).unwrap();

        // Cell (5, 5) centre (0.55, 0.55) lies inside the region
        assert_relative_eq!(plain.density_at(0.55, 0.55).unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(blended.density_at(0.55, 0.55).unwrap(), 0.5, epsilon = 1e-12);
        // Outside the region nothing changes
        assert_relative_eq!(
            blended.density_at(0.05, 0.95).unwrap(),
            plain.density_at(0.05, 0.95).unwrap()
        );
        assert_eq!(blended.regions.len(), 1);
    }

    #[test]
    fn test_all_zero_density() {
        let points = vec![
            DensityPoint::from_coords(0.2, 0.2, 0.0, 0.0),
            DensityPoint::from_coords(0.8, 0.8, 0.0, 0.0),
        ];
        let map = DensityInterpolator::new()
            .with_backend(BackendChoice::Sequential)
            .interpolate(&points, 0.25, &[])
            .unwrap();
        assert_relative_eq!(map.min_density, 0.0);
        assert_relative_eq!(map.max_density, 0.0);
    }

    #[test]
    fn test_invalid_resolution() {
        let result = DensityInterpolator::new().interpolate(&grid_points(), 2.0, &[]);
        assert_eq!(result, Err(DensityMapError::InvalidResolution(2.0)));
    }

    #[test]
    fn test_empty_points() {
        let result = DensityInterpolator::new().interpolate(&[], 0.1, &[]);
        assert!(matches!(
            result,
            Err(DensityMapError::InterpolationFailure(_))
        ));
    }

    #[test]
    fn test_cancelled() {
        let abort = AbortSignal::new();
        abort.abort();
        let result = DensityInterpolator::new()
            .with_abort(abort)
            .interpolate(&grid_points(), 0.1, &[]);
        assert_eq!(result, Err(DensityMapError::Cancelled));
    }

    #[test]
    fn test_from_preferences() {
        let prefs = DensityPreferences::default()
            .with_backend(BackendChoice::Sequential)
            .with_smoothing_factor(0.0);
        let raw = DensityInterpolator::from_preferences(&prefs)
            .interpolate(&grid_points(), 0.1, &[])
            .unwrap();
        let smoothed = DensityInterpolator::new()
            .with_backend(BackendChoice::Sequential)
            .interpolate(&grid_points(), 0.1, &[])
            .unwrap();
        assert_ne!(raw.grid, smoothed.grid);
    }
}
