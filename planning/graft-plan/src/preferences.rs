//! Graft planning preferences.

use std::collections::BTreeMap;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GraftError, GraftResult};
use crate::graft_type::GraftType;

/// Tolerance on the sum of type fractions.
const FRACTION_SUM_TOLERANCE: f64 = 1e-9;

/// A recipient zone to fill.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZonePreference {
    /// Zone name.
    pub name: String,
    /// Lower values are served first.
    pub priority: u32,
    /// Zone target density in grafts per unit area; the global target if `None`.
    pub target_density: Option<f64>,
    /// Closed zone boundary.
    pub boundary: Vec<Point3<f64>>,
}

impl ZonePreference {
    /// Zone using the global target density.
    #[must_use]
    pub fn new(name: impl Into<String>, priority: u32, boundary: Vec<Point3<f64>>) -> Self {
        Self {
            name: name.into(),
            priority,
            target_density: None,
            boundary,
        }
    }

    /// Override the target density.
    #[must_use]
    pub const fn with_target_density(mut self, density: f64) -> Self {
        self.target_density = Some(density);
        self
    }
}

/// Inputs to [`GraftAllocator::allocate`](crate::GraftAllocator::allocate).
///
/// Densities are grafts per unit area (typically per cm²).
///
/// # Example
///
/// ```
/// use graft_plan::{GraftPreferences, GraftType};
///
/// let prefs = GraftPreferences::default()
///     .with_target_density(50.0)
///     .with_type_fraction(GraftType::Quadruple, 0.0);
/// assert!(prefs.validate().is_ok());
///
/// let bad = GraftPreferences::default().with_type_fraction(GraftType::Single, 0.9);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraftPreferences {
    /// Desired recipient density. Default: 45.
    pub target_density: f64,
    /// Grafts the donor area can supply per unit area. Default: 35.
    pub max_donor_density: f64,
    /// Share of each type in `[0, 1]`, summing to at most 1.
    pub type_distribution: BTreeMap<GraftType, f64>,
    /// Order in which types claim the budget.
    pub priorities: Vec<GraftType>,
    /// Zones to fill.
    pub zones: Vec<ZonePreference>,
}

impl Default for GraftPreferences {
    fn default() -> Self {
        Self {
            target_density: 45.0,
            max_donor_density: 35.0,
            type_distribution: BTreeMap::from([
                (GraftType::Single, 0.2),
                (GraftType::Double, 0.5),
                (GraftType::Triple, 0.25),
                (GraftType::Quadruple, 0.05),
            ]),
            priorities: GraftType::ALL.to_vec(),
            zones: Vec::new(),
        }
    }
}

impl GraftPreferences {
    /// Hairline-heavy preset: mostly single and double grafts.
    #[must_use]
    pub fn hairline() -> Self {
        Self {
            type_distribution: BTreeMap::from([
                (GraftType::Single, 0.5),
                (GraftType::Double, 0.4),
                (GraftType::Triple, 0.1),
            ]),
            ..Self::default()
        }
    }

    /// Set the target density.
    #[must_use]
    pub const fn with_target_density(mut self, density: f64) -> Self {
        self.target_density = density;
        self
    }

    /// Set the donor capacity.
    #[must_use]
    pub const fn with_max_donor_density(mut self, density: f64) -> Self {
        self.max_donor_density = density;
        self
    }

    /// Set one type's fraction.
    #[must_use]
    pub fn with_type_fraction(mut self, graft_type: GraftType, fraction: f64) -> Self {
        self.type_distribution.insert(graft_type, fraction);
        self
    }

    /// Replace the type priority order.
    #[must_use]
    pub fn with_priorities(mut self, priorities: impl Into<Vec<GraftType>>) -> Self {
        self.priorities = priorities.into();
        self
    }

    /// Add a zone.
    #[must_use]
    pub fn with_zone(mut self, zone: ZonePreference) -> Self {
        self.zones.push(zone);
        self
    }

    /// Types in the order they claim a budget: the priority list without
    /// repeats, then remaining types with a fraction in canonical order.
    #[must_use]
    pub fn claim_order(&self) -> Vec<GraftType> {
        let mut order: Vec<GraftType> = Vec::with_capacity(GraftType::ALL.len());
        for t in self
            .priorities
            .iter()
            .copied()
            .chain(GraftType::ALL.into_iter().filter(|t| self.type_distribution.contains_key(t)))
        {
            if !order.contains(&t) {
                order.push(t);
            }
        }
        order
    }

    /// Check densities, fractions and zone overrides.
    ///
    /// # Errors
    ///
    /// - [`GraftError::InvalidDensity`] for a non-positive target, donor or
    ///   zone density
    /// - [`GraftError::InvalidDistribution`] for a fraction outside `[0, 1]`
    ///   or fractions summing above 1
    pub fn validate(&self) -> GraftResult<()> {
        if !(self.target_density.is_finite() && self.target_density > 0.0) {
            return Err(GraftError::invalid_density("target", self.target_density));
        }
        if !(self.max_donor_density.is_finite() && self.max_donor_density > 0.0) {
            return Err(GraftError::invalid_density("max donor", self.max_donor_density));
        }
        for (t, fraction) in &self.type_distribution {
            if !(0.0..=1.0).contains(fraction) {
                return Err(GraftError::invalid_distribution(format!(
                    "{t} fraction {fraction} outside [0, 1]"
                )));
            }
        }
        let sum: f64 = self.type_distribution.values().sum();
        if sum > 1.0 + FRACTION_SUM_TOLERANCE {
            return Err(GraftError::invalid_distribution(format!(
                "fractions sum to {sum}"
            )));
        }
        for zone in &self.zones {
            if let Some(d) = zone.target_density
                && !(d.is_finite() && d > 0.0)
            {
                return Err(GraftError::invalid_density(format!("zone '{}'", zone.name), d));
            }
        }
        Ok(())
    }
}
