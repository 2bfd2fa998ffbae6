//! Error types for graft planning.

use thiserror::Error;

/// Result type alias for graft planning.
pub type GraftResult<T> = Result<T, GraftError>;

/// Errors that can occur while planning graft allocation.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GraftError {
    /// An area input is not positive.
    #[error("invalid {what} area: {value}")]
    InvalidArea {
        /// Which area was rejected.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A density input is out of range.
    #[error("invalid {what} density: {value}")]
    InvalidDensity {
        /// Which density was rejected.
        what: String,
        /// The rejected value.
        value: f64,
    },

    /// Type distribution fractions are out of range.
    #[error("invalid graft type distribution: {0}")]
    InvalidDistribution(String),

    /// The donor area cannot supply the grafts the recipient needs.
    #[error("insufficient donor area: {required} grafts required, {available} available")]
    InsufficientDonorArea {
        /// Grafts needed to reach the target density.
        required: u64,
        /// Grafts the donor area can supply.
        available: u64,
    },

    /// A zone could not be planned.
    #[error("optimization failed for zone '{zone}': {reason}")]
    OptimizationFailure {
        /// Zone name.
        zone: String,
        /// What went wrong.
        reason: String,
    },
}

impl GraftError {
    /// Create an invalid density error.
    #[must_use]
    pub fn invalid_density(what: impl Into<String>, value: f64) -> Self {
        Self::InvalidDensity {
            what: what.into(),
            value,
        }
    }

    /// Create an invalid distribution error.
    #[must_use]
    pub fn invalid_distribution(details: impl Into<String>) -> Self {
        Self::InvalidDistribution(details.into())
    }

    /// Create an optimization failure for a zone.
    #[must_use]
    pub fn optimization(zone: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OptimizationFailure {
            zone: zone.into(),
            reason: reason.into(),
        }
    }
}
