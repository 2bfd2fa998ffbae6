//! Allocation results.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GraftError, GraftResult};
use crate::graft_type::GraftDistribution;

/// A recipient zone with its allocated grafts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraftZone {
    /// Sequential id in allocation order, starting at 1.
    pub id: u32,
    /// Zone name.
    pub name: String,
    /// Zone area.
    pub area: f64,
    /// Target density applied to the zone.
    pub density: f64,
    /// Allocated grafts by type.
    pub distribution: GraftDistribution,
    /// Priority from the zone preference.
    pub priority: u32,
    /// Zone boundary.
    pub boundary: Vec<Point3<f64>>,
    /// Grafts allocated to the zone.
    pub graft_count: u64,
}

/// A non-fatal problem found during allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum GraftWarning {
    /// The donor area supplies fewer grafts than the recipient needs.
    InsufficientDonorArea {
        /// Grafts needed to reach the target density.
        required: u64,
        /// Grafts the donor area can supply.
        available: u64,
    },
}

impl From<GraftWarning> for GraftError {
    fn from(warning: GraftWarning) -> Self {
        match warning {
            GraftWarning::InsufficientDonorArea { required, available } => {
                Self::InsufficientDonorArea { required, available }
            }
        }
    }
}

/// Result of [`GraftAllocator::allocate`](crate::GraftAllocator::allocate).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraftCalculation {
    /// Grafts needed to bring the recipient area to the target density.
    pub total_grafts: u64,
    /// `total_grafts` per unit of recipient area.
    pub density: f64,
    /// Donor capacity: `floor(donor_area * max_donor_density)`.
    pub max_grafts: u64,
    /// Donor capacity split by type.
    pub distribution: GraftDistribution,
    /// Zones that received grafts, in allocation order.
    pub zones: Vec<GraftZone>,
    /// Non-fatal problems.
    pub warnings: Vec<GraftWarning>,
}

impl GraftCalculation {
    /// Grafts allocated across all zones.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.zones.iter().map(|z| z.graft_count).sum()
    }

    /// Zone by name.
    #[must_use]
    pub fn zone(&self, name: &str) -> Option<&GraftZone> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// True if the donor area covers the full requirement.
    #[must_use]
    pub fn donor_sufficient(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| matches!(w, GraftWarning::InsufficientDonorArea { .. }))
    }

    /// Turn the first warning into an error.
    ///
    /// # Errors
    ///
    /// Returns [`GraftError::InsufficientDonorArea`] if the donor area was
    /// short.
    pub fn into_strict(self) -> GraftResult<Self> {
        match self.warnings.first() {
            Some(&warning) => Err(warning.into()),
            None => Ok(self),
        }
    }
}
