//! Graft planning from scan measurements.
//!
//! [`GraftAllocator`] turns [`Measurements`](scan_measure::Measurements) and
//! [`GraftPreferences`] into a [`GraftCalculation`]:
//!
//! - **Total** grafts needed to lift the recipient area from its existing
//!   density (from a [`DensityEstimator`]) to the target
//! - **Donor capacity** and its split across [`GraftType`]s, claimed
//!   first-come-first-served in priority order
//! - **Zones** filled in ascending priority until the budget runs out
//!
//! A donor area too small for the target is a warning, not an error; call
//! [`GraftCalculation::into_strict`] to treat it as one.
//!
//! # Example
//!
//! ```
//! use graft_plan::{FixedDensity, GraftAllocator, GraftPreferences, ZonePreference};
//! use scan_measure::Measurements;
//! use nalgebra::Point3;
//!
//! let hairline = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(8.0, 0.0, 0.0),
//!     Point3::new(8.0, 2.0, 0.0),
//!     Point3::new(0.0, 2.0, 0.0),
//! ];
//! let prefs = GraftPreferences::default()
//!     .with_target_density(40.0)
//!     .with_zone(ZonePreference::new("hairline", 1, hairline));
//!
//! let calc = GraftAllocator::new(FixedDensity(15.0))
//!     .allocate(&Measurements::new(300.0, 40.0, 60.0), &prefs)
//!     .unwrap();
//!
//! assert_eq!(calc.total_grafts, 1000);
//! assert_eq!(calc.zones[0].graft_count, 640);
//! assert!(calc.donor_sufficient());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod allocator;
mod calculation;
mod error;
mod estimator;
mod graft_type;
mod preferences;

pub use allocator::GraftAllocator;
pub use calculation::{GraftCalculation, GraftWarning, GraftZone};
pub use error::{GraftError, GraftResult};
pub use estimator::{DensityEstimator, FixedDensity};
pub use graft_type::{GraftDistribution, GraftType};
pub use preferences::{GraftPreferences, ZonePreference};

// Re-export nalgebra types for convenience
pub use nalgebra::Point3;
