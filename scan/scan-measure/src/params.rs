//! Measurement parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeasureError, MeasureResult};

/// Parameters for [`MeasurementEngine`](crate::MeasurementEngine).
///
/// # Example
///
/// ```
/// use scan_measure::MeasureParams;
///
/// let params = MeasureParams::default().with_min_confidence(0.7).with_link_radius(0.25);
/// assert!(params.validate().is_ok());
///
/// let strict = MeasureParams::strict();
/// assert!(strict.min_confidence > MeasureParams::default().min_confidence);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeasureParams {
    /// Detected regions below this confidence are left unresolved. Default: 0.5.
    pub min_confidence: f64,
    /// Maximum vertex spacing when gathering a region's vertices. Default: 0.5.
    pub link_radius: f64,
}

impl Default for MeasureParams {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            link_radius: 0.5,
        }
    }
}

impl MeasureParams {
    /// Only accept detections with confidence of at least 0.8.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            min_confidence: 0.8,
            link_radius: 0.5,
        }
    }

    /// Set the minimum accepted confidence.
    #[must_use]
    pub const fn with_min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Set the vertex link radius.
    #[must_use]
    pub const fn with_link_radius(mut self, radius: f64) -> Self {
        self.link_radius = radius;
        self
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvalidParams`] if `min_confidence` is outside
    /// `[0, 1]` or `link_radius` is not positive and finite.
    pub fn validate(&self) -> MeasureResult<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(MeasureError::invalid_params(format!(
                "min_confidence must lie in [0, 1], got {}",
                self.min_confidence
            )));
        }
        if !(self.link_radius.is_finite() && self.link_radius > 0.0) {
            return Err(MeasureError::invalid_params(format!(
                "link_radius must be positive, got {}",
                self.link_radius
            )));
        }
        Ok(())
    }
}
