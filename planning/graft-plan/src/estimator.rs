//! Existing-density estimation.

use scan_measure::Measurements;

use crate::error::GraftResult;

/// Estimates the graft-equivalent density already present in the recipient area.
///
/// Any `Fn(&Measurements) -> GraftResult<f64>` closure is an estimator.
pub trait DensityEstimator: Send + Sync {
    /// Existing density in grafts per unit area.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures; the allocator passes them
    /// through unchanged.
    fn existing_density(&self, measurements: &Measurements) -> GraftResult<f64>;
}

impl<F> DensityEstimator for F
where
    F: Fn(&Measurements) -> GraftResult<f64> + Send + Sync,
{
    fn existing_density(&self, measurements: &Measurements) -> GraftResult<f64> {
        self(measurements)
    }
}

/// Estimator returning the same density for every scan.
///
/// # Example
///
/// ```
/// use graft_plan::{DensityEstimator, FixedDensity};
/// use scan_measure::Measurements;
///
/// let estimator = FixedDensity(12.5);
/// assert_eq!(estimator.existing_density(&Measurements::default()), Ok(12.5));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedDensity(pub f64);

impl DensityEstimator for FixedDensity {
    fn existing_density(&self, _measurements: &Measurements) -> GraftResult<f64> {
        Ok(self.0)
    }
}
