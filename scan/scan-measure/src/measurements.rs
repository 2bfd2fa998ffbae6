//! Measurement results.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::metrics::RegionMetrics;
use crate::region::RegionKind;

/// A named measurement outside the recipient and donor buckets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CustomMeasurement {
    /// Measurement name.
    pub name: String,
    /// Measured area.
    pub value: f64,
    /// Unit label from the request.
    pub unit: String,
    /// Notes from the request.
    pub notes: Option<String>,
}

/// Metrics of one resolved region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionMeasurement {
    /// Region kind.
    pub kind: RegionKind,
    /// Detector confidence.
    pub confidence: f64,
    /// Geometric metrics.
    pub metrics: RegionMetrics,
}

/// Areas and thickness of a scan's measured regions.
///
/// # Example
///
/// ```
/// use scan_measure::Measurements;
///
/// let m = Measurements::new(120.0, 50.0, 30.0);
/// assert!((m.recipient_area - 50.0).abs() < f64::EPSILON);
/// assert!(m.is_complete());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurements {
    /// Surface area of the whole scan mesh.
    pub total_area: f64,
    /// Summed area of recipient regions.
    pub recipient_area: f64,
    /// Summed area of donor regions.
    pub donor_area: f64,
    /// Area-weighted mean thickness over recipient and donor regions, or 0
    /// if no region had thickness samples.
    pub scalp_thickness: f64,
    /// Custom region areas, in request order.
    pub custom_measurements: Vec<CustomMeasurement>,
    /// Per-region metrics, in request order.
    pub regions: Vec<RegionMeasurement>,
    /// Requests the detector did not find or found with too little confidence.
    pub unresolved: Vec<RegionKind>,
}

impl Measurements {
    /// Measurements with the given areas and nothing else.
    #[must_use]
    pub fn new(total_area: f64, recipient_area: f64, donor_area: f64) -> Self {
        Self {
            total_area,
            recipient_area,
            donor_area,
            ..Self::default()
        }
    }

    /// Set the scalp thickness.
    #[must_use]
    pub const fn with_scalp_thickness(mut self, thickness: f64) -> Self {
        self.scalp_thickness = thickness;
        self
    }

    /// Custom measurement by name.
    #[must_use]
    pub fn custom(&self, name: &str) -> Option<&CustomMeasurement> {
        self.custom_measurements.iter().find(|m| m.name == name)
    }

    /// True if every requested region was resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}
