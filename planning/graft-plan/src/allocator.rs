//! Graft count estimation and zone allocation.

use scan_measure::Measurements;
use scan_polygon::surface_area;
use tracing::{debug, info, warn};

use crate::calculation::{GraftCalculation, GraftWarning, GraftZone};
use crate::error::{GraftError, GraftResult};
use crate::estimator::DensityEstimator;
use crate::graft_type::{GraftDistribution, GraftType};
use crate::preferences::GraftPreferences;

/// Rounding slack in ulps: a product this close below an integer counts as it.
const COUNT_ULPS: f64 = 8.0;

/// `floor(value)` as a count; negative and non-finite values count as zero.
///
/// Only rounding noise is absorbed: `0.29 * 100.0` counts 29, while
/// `28.9999999999` still counts 28.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Truncation: the value is floored and clamped to be non-negative first
fn floor_count(value: f64) -> u64 {
    if !(value.is_finite() && value > 0.0) {
        return 0;
    }
    let ceil = value.ceil();
    if ceil <= value * (1.0 + COUNT_ULPS * f64::EPSILON) {
        ceil as u64
    } else {
        value.floor() as u64
    }
}

#[allow(clippy::cast_precision_loss)]
// Precision: graft counts stay far below 2^52
const fn as_f64(count: u64) -> f64 {
    count as f64
}

/// Split `budget` across types in claim order.
///
/// Each type asks for `floor(budget * fraction)` and receives at most what
/// is left, so later types can come up short.
fn distribute(budget: u64, order: &[GraftType], prefs: &GraftPreferences) -> GraftDistribution {
    let mut remaining = budget;
    let mut dist = GraftDistribution::new();
    for &t in order {
        let Some(&fraction) = prefs.type_distribution.get(&t) else {
            continue;
        };
        let count = floor_count(as_f64(budget) * fraction).min(remaining);
        remaining -= count;
        dist.insert(t, count);
    }
    dist
}

/// Plans how many grafts a scan needs and where they go.
///
/// # Example
///
/// ```
/// use graft_plan::{FixedDensity, GraftAllocator, GraftPreferences};
/// use scan_measure::Measurements;
///
/// let measurements = Measurements::new(200.0, 50.0, 30.0);
/// let prefs = GraftPreferences::default()
///     .with_target_density(45.0)
///     .with_max_donor_density(35.0);
///
/// let calc = GraftAllocator::new(FixedDensity(10.0))
///     .allocate(&measurements, &prefs)
///     .unwrap();
///
/// assert_eq!(calc.total_grafts, 1750);
/// assert_eq!(calc.max_grafts, 1050);
/// assert!(!calc.donor_sufficient());
/// ```
#[derive(Debug, Clone)]
pub struct GraftAllocator<E> {
    estimator: E,
}

impl<E: DensityEstimator> GraftAllocator<E> {
    /// Allocator using `estimator` for existing density.
    #[must_use]
    pub const fn new(estimator: E) -> Self {
        Self { estimator }
    }

    /// The density estimator.
    #[must_use]
    pub const fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Compute graft totals and fill zones in priority order.
    ///
    /// 1. `total = floor(recipient_area * max(0, target - existing))`
    /// 2. `max_grafts = floor(donor_area * max_donor_density)`, split by type
    ///    in claim order
    /// 3. Zones sorted by ascending priority each take
    ///    `min(floor(area * zone target), remaining)` from a budget of
    ///    `min(total, max_grafts)`; zones after the budget runs out are
    ///    omitted
    ///
    /// A donor shortfall is reported in [`GraftCalculation::warnings`].
    ///
    /// # Errors
    ///
    /// - [`GraftError::InvalidArea`] for a non-positive recipient area or a
    ///   negative donor area
    /// - [`GraftError::InvalidDensity`] for a non-positive target or donor
    ///   density, or a negative existing density
    /// - [`GraftError::InvalidDistribution`] for out-of-range fractions
    /// - [`GraftError::OptimizationFailure`] if a zone boundary has no area
    /// - Any error from the estimator
    pub fn allocate(
        &self,
        measurements: &Measurements,
        prefs: &GraftPreferences,
    ) -> GraftResult<GraftCalculation> {
        prefs.validate()?;
        let recipient_area = measurements.recipient_area;
        if !(recipient_area.is_finite() && recipient_area > 0.0) {
            return Err(GraftError::InvalidArea {
                what: "recipient",
                value: recipient_area,
            });
        }
        let donor_area = measurements.donor_area;
        if !(donor_area.is_finite() && donor_area >= 0.0) {
            return Err(GraftError::InvalidArea {
                what: "donor",
                value: donor_area,
            });
        }

        // Zone areas are checked up front so nothing is allocated on failure
        let mut zones: Vec<_> = prefs.zones.iter().collect();
        zones.sort_by_key(|z| z.priority);
        let zone_areas = zones
            .iter()
            .map(|zone| match surface_area(&zone.boundary) {
                Ok(area) if area > 0.0 => Ok(area),
                Ok(_) => Err(GraftError::optimization(&zone.name, "boundary encloses no area")),
                Err(e) => Err(GraftError::optimization(&zone.name, e.to_string())),
            })
            .collect::<GraftResult<Vec<f64>>>()?;

        let existing = self.estimator.existing_density(measurements)?;
        if !(existing.is_finite() && existing >= 0.0) {
            return Err(GraftError::invalid_density("existing", existing));
        }

        let total_grafts = floor_count(recipient_area * (prefs.target_density - existing).max(0.0));
        let max_grafts = floor_count(donor_area * prefs.max_donor_density);
        let order = prefs.claim_order();
        let distribution = distribute(max_grafts, &order, prefs);
        debug!(
            existing,
            total_grafts,
            max_grafts,
            distributed = distribution.total(),
            "graft totals computed"
        );

        let mut warnings = Vec::new();
        if total_grafts > max_grafts {
            warn!(
                required = total_grafts,
                available = max_grafts,
                "donor area cannot supply the target density"
            );
            warnings.push(GraftWarning::InsufficientDonorArea {
                required: total_grafts,
                available: max_grafts,
            });
        }

        let mut remaining = total_grafts.min(max_grafts);
        let mut planned = Vec::with_capacity(zones.len());
        let mut next_id: u32 = 1;
        for (zone, area) in zones.into_iter().zip(zone_areas) {
            if remaining == 0 {
                break;
            }
            let density = zone.target_density.unwrap_or(prefs.target_density);
            let graft_count = floor_count(area * density).min(remaining);
            remaining -= graft_count;

            debug!(zone = %zone.name, priority = zone.priority, area, graft_count, remaining, "zone allocated");
            planned.push(GraftZone {
                id: next_id,
                name: zone.name.clone(),
                area,
                density,
                distribution: distribute(graft_count, &order, prefs),
                priority: zone.priority,
                boundary: zone.boundary.clone(),
                graft_count,
            });
            next_id += 1;
        }

        let calculation = GraftCalculation {
            total_grafts,
            density: as_f64(total_grafts) / recipient_area,
            max_grafts,
            distribution,
            zones: planned,
            warnings,
        };
        info!(
            total_grafts,
            max_grafts,
            zones = calculation.zones.len(),
            allocated = calculation.allocated(),
            "graft allocation complete"
        );
        Ok(calculation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::FixedDensity;
    use crate::preferences::ZonePreference;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn square(x0: f64, side: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(x0, 0.0, 0.0),
            Point3::new(x0 + side, 0.0, 0.0),
            Point3::new(x0 + side, side, 0.0),
            Point3::new(x0, side, 0.0),
        ]
    }

    fn scenario() -> (Measurements, GraftPreferences) {
        (
            Measurements::new(200.0, 50.0, 30.0),
            GraftPreferences::default()
                .with_target_density(45.0)
                .with_max_donor_density(35.0),
        )
    }

    #[test]
    fn test_floor_count() {
        assert_eq!(floor_count(0.29 * 100.0), 29);
        assert_eq!(floor_count(15.999_999_999_999_998 * 25.0), 400);
        assert_eq!(floor_count(28.999_999_999_9), 28);
        assert_eq!(floor_count(29.0), 29);
        assert_eq!(floor_count(52.5), 52);
        assert_eq!(floor_count(0.999), 0);
        assert_eq!(floor_count(-3.0), 0);
        assert_eq!(floor_count(f64::NAN), 0);
    }

    #[test]
    fn test_total_rounds_down_near_integer() {
        let m = Measurements::new(100.0, 28.999_999_999_9, 40.0);
        let prefs = GraftPreferences::default()
            .with_target_density(1.0)
            .with_max_donor_density(1.0);
        let calc = GraftAllocator::new(FixedDensity(0.0)).allocate(&m, &prefs).unwrap();
        assert_eq!(calc.total_grafts, 28);
        assert!(as_f64(calc.total_grafts) <= m.recipient_area * prefs.target_density);
    }

    #[test]
    fn test_scenario_totals() {
        let (m, prefs) = scenario();
        let calc = GraftAllocator::new(FixedDensity(10.0)).allocate(&m, &prefs).unwrap();
        assert_eq!(calc.total_grafts, 1750);
        assert_eq!(calc.max_grafts, 1050);
        assert_relative_eq!(calc.density, 35.0);
        assert_eq!(
            calc.warnings,
            vec![GraftWarning::InsufficientDonorArea {
                required: 1750,
                available: 1050
            }]
        );
    }

    #[test]
    fn test_distribution_from_donor_capacity() {
        let (m, prefs) = scenario();
        let calc = GraftAllocator::new(FixedDensity(10.0)).allocate(&m, &prefs).unwrap();
        // 1050 split 0.2 / 0.5 / 0.25 / 0.05
        assert_eq!(calc.distribution.get(GraftType::Single), 210);
        assert_eq!(calc.distribution.get(GraftType::Double), 525);
        assert_eq!(calc.distribution.get(GraftType::Triple), 262);
        assert_eq!(calc.distribution.get(GraftType::Quadruple), 52);
        assert!(calc.distribution.total() <= calc.max_grafts);
    }

    #[test]
    fn test_priority_first_come_first_served() {
        let prefs = GraftPreferences::default()
            .with_type_fraction(GraftType::Single, 0.6)
            .with_type_fraction(GraftType::Double, 0.4)
            .with_type_fraction(GraftType::Triple, 0.0)
            .with_type_fraction(GraftType::Quadruple, 0.0)
            .with_priorities([GraftType::Double]);
        let dist = distribute(7, &prefs.claim_order(), &prefs);
        // Double claims floor(2.8) = 2, Single then floor(4.2) = 4
        assert_eq!(dist.get(GraftType::Double), 2);
        assert_eq!(dist.get(GraftType::Single), 4);
        assert!(dist.total() <= 7);
    }

    #[test]
    fn test_total_bounded_by_target() {
        for (recipient, target, existing) in [(50.0, 45.0, 10.0), (12.3, 30.0, 0.0), (7.7, 20.0, 25.0)] {
            let m = Measurements::new(100.0, recipient, 40.0);
            let prefs = GraftPreferences::default().with_target_density(target);
            let calc = GraftAllocator::new(FixedDensity(existing)).allocate(&m, &prefs).unwrap();
            assert!(as_f64(calc.total_grafts) <= recipient * target);
        }
    }

    #[test]
    fn test_existing_above_target() {
        let m = Measurements::new(100.0, 20.0, 40.0);
        let calc = GraftAllocator::new(FixedDensity(60.0))
            .allocate(&m, &GraftPreferences::default())
            .unwrap();
        assert_eq!(calc.total_grafts, 0);
        assert!(calc.zones.is_empty());
        assert!(calc.donor_sufficient());
    }

    #[test]
    fn test_zones_in_priority_order() {
        let m = Measurements::new(100.0, 20.0, 40.0);
        let prefs = GraftPreferences::default()
            .with_target_density(10.0)
            .with_zone(ZonePreference::new("crown", 2, square(0.0, 2.0)))
            .with_zone(ZonePreference::new("hairline", 1, square(5.0, 2.0)));
        let calc = GraftAllocator::new(FixedDensity(0.0)).allocate(&m, &prefs).unwrap();

        assert_eq!(calc.total_grafts, 200);
        assert_eq!(calc.zones.len(), 2);
        assert_eq!(calc.zones[0].name, "hairline");
        assert_eq!(calc.zones[0].id, 1);
        assert_eq!(calc.zones[0].graft_count, 40);
        assert_eq!(calc.zones[1].name, "crown");
        assert_eq!(calc.zones[1].id, 2);
        assert!(calc.allocated() <= calc.total_grafts);
    }

    #[test]
    fn test_equal_zones_monotonic_in_priority() {
        // Budget 60 for two zones wanting 40 each
        let m = Measurements::new(100.0, 6.0, 40.0);
        let prefs = GraftPreferences::default()
            .with_target_density(10.0)
            .with_zone(ZonePreference::new("b", 5, square(10.0, 2.0)))
            .with_zone(ZonePreference::new("a", 1, square(0.0, 2.0)));
        let calc = GraftAllocator::new(FixedDensity(0.0)).allocate(&m, &prefs).unwrap();

        let a = calc.zone("a").unwrap();
        let b = calc.zone("b").unwrap();
        assert_eq!(a.graft_count, 40);
        assert_eq!(b.graft_count, 20);
        assert!(a.graft_count >= b.graft_count);
    }

    #[test]
    fn test_exhausted_zones_omitted() {
        let m = Measurements::new(100.0, 4.0, 40.0);
        let prefs = GraftPreferences::default()
            .with_target_density(10.0)
            .with_zone(ZonePreference::new("first", 1, square(0.0, 2.0)))
            .with_zone(ZonePreference::new("second", 2, square(5.0, 2.0)));
        let calc = GraftAllocator::new(FixedDensity(0.0)).allocate(&m, &prefs).unwrap();
        assert_eq!(calc.zones.len(), 1);
        assert_eq!(calc.zones[0].graft_count, 40);
        assert!(calc.zone("second").is_none());
    }

    #[test]
    fn test_zone_budget_capped_by_donor() {
        let m = Measurements::new(100.0, 10.0, 1.0);
        let prefs = GraftPreferences::default()
            .with_target_density(10.0)
            .with_max_donor_density(30.0)
            .with_zone(ZonePreference::new("a", 1, square(0.0, 3.0)));
        let calc = GraftAllocator::new(FixedDensity(0.0)).allocate(&m, &prefs).unwrap();
        assert_eq!(calc.total_grafts, 100);
        assert_eq!(calc.max_grafts, 30);
        assert_eq!(calc.allocated(), 30);
        assert!(calc.zones[0].distribution.total() <= calc.zones[0].graft_count);
    }

    #[test]
    fn test_zone_density_override() {
        let m = Measurements::new(100.0, 20.0, 40.0);
        let prefs = GraftPreferences::default()
            .with_target_density(10.0)
            .with_zone(ZonePreference::new("dense", 1, square(0.0, 2.0)).with_target_density(20.0));
        let calc = GraftAllocator::new(FixedDensity(0.0)).allocate(&m, &prefs).unwrap();
        assert_eq!(calc.zones[0].graft_count, 80);
        assert_relative_eq!(calc.zones[0].density, 20.0);
    }

    #[test]
    fn test_into_strict() {
        let (m, prefs) = scenario();
        let calc = GraftAllocator::new(FixedDensity(10.0)).allocate(&m, &prefs).unwrap();
        assert_eq!(
            calc.into_strict(),
            Err(GraftError::InsufficientDonorArea {
                required: 1750,
                available: 1050
            })
        );

        let m = Measurements::new(100.0, 10.0, 40.0);
        let calc = GraftAllocator::new(FixedDensity(0.0))
            .allocate(&m, &GraftPreferences::default())
            .unwrap();
        assert!(calc.into_strict().is_ok());
    }

    #[test]
    fn test_invalid_inputs() {
        let allocator = GraftAllocator::new(FixedDensity(0.0));
        let prefs = GraftPreferences::default();

        assert!(matches!(
            allocator.allocate(&Measurements::new(10.0, 0.0, 5.0), &prefs),
            Err(GraftError::InvalidArea { what: "recipient", .. })
        ));
        assert!(matches!(
            allocator.allocate(&Measurements::new(10.0, 5.0, -1.0), &prefs),
            Err(GraftError::InvalidArea { what: "donor", .. })
        ));
        assert!(matches!(
            GraftAllocator::new(FixedDensity(-1.0)).allocate(&Measurements::new(10.0, 5.0, 5.0), &prefs),
            Err(GraftError::InvalidDensity { .. })
        ));
    }

    #[test]
    fn test_degenerate_zone_fails() {
        let m = Measurements::new(100.0, 20.0, 40.0);
        let line = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let prefs = GraftPreferences::default().with_zone(ZonePreference::new("flat", 1, line));
        assert!(matches!(
            GraftAllocator::new(FixedDensity(0.0)).allocate(&m, &prefs),
            Err(GraftError::OptimizationFailure { .. })
        ));

        let prefs = GraftPreferences::default().with_zone(ZonePreference::new("short", 1, Vec::new()));
        assert!(matches!(
            GraftAllocator::new(FixedDensity(0.0)).allocate(&m, &prefs),
            Err(GraftError::OptimizationFailure { .. })
        ));
    }

    #[test]
    fn test_closure_estimator() {
        let estimator = |m: &Measurements| -> GraftResult<f64> { Ok(m.scalp_thickness * 10.0) };
        let m = Measurements::new(100.0, 10.0, 40.0).with_scalp_thickness(1.5);
        let calc = GraftAllocator::new(estimator)
            .allocate(&m, &GraftPreferences::default())
            .unwrap();
        // floor(10 * (45 - 15))
        assert_eq!(calc.total_grafts, 300);
    }
}
