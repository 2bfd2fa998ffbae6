//! Measurement requests and detector results.

use std::fmt;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a measured region represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RegionKind {
    /// Area receiving grafts.
    Recipient,
    /// Area grafts are harvested from.
    Donor,
    /// Any other named measurement.
    Custom {
        /// Measurement name.
        name: String,
        /// Unit label reported with the value.
        unit: String,
    },
}

impl RegionKind {
    /// Custom region kind.
    #[must_use]
    pub fn custom(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::Custom {
            name: name.into(),
            unit: unit.into(),
        }
    }

    /// Display name: `recipient`, `donor`, or the custom name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Recipient => "recipient",
            Self::Donor => "donor",
            Self::Custom { name, .. } => name,
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A caller's request to locate and measure one region of the scan.
///
/// # Example
///
/// ```
/// use scan_measure::{MeasurementRegion, RegionKind};
/// use nalgebra::Point3;
///
/// let request = MeasurementRegion::new(RegionKind::Donor, Point3::new(0.0, -6.0, 2.0), 4.0)
///     .with_notes("occipital band");
/// assert_eq!(request.kind.name(), "donor");
/// assert_eq!(request.notes.as_deref(), Some("occipital band"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeasurementRegion {
    /// Region kind.
    pub kind: RegionKind,
    /// Where the region is expected to be, in scan coordinates.
    pub expected_location: Point3<f64>,
    /// Rough radius of the region, in scan units.
    pub approximate_size: f64,
    /// Free-form notes carried into custom measurements.
    pub notes: Option<String>,
}

impl MeasurementRegion {
    /// Request without notes.
    #[must_use]
    pub const fn new(kind: RegionKind, expected_location: Point3<f64>, approximate_size: f64) -> Self {
        Self {
            kind,
            expected_location,
            approximate_size,
            notes: None,
        }
    }

    /// Attach notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A region resolved by a [`RegionDetector`](crate::RegionDetector).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectedRegion {
    /// Kind of the request this answers.
    pub kind: RegionKind,
    /// Closed boundary polygon in scan coordinates.
    pub boundary: Vec<Point3<f64>>,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
}

impl DetectedRegion {
    /// Create a detected region; confidence is clamped into `[0, 1]`.
    #[must_use]
    pub fn new(kind: RegionKind, boundary: Vec<Point3<f64>>, confidence: f64) -> Self {
        Self {
            kind,
            boundary,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
