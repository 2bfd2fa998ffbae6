//! Pipeline configuration loaded from TOML.

use std::fs;
use std::path::Path;

use density_map::DensityPreferences;
use graft_plan::GraftPreferences;
use scan_measure::{MeasureParams, MeasurementRegion};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Everything one scan analysis needs besides the scan and collaborators.
///
/// Every section is optional in TOML and falls back to its defaults.
///
/// # Example
///
/// ```
/// use scalp_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::from_toml_str(
///     r#"
///     [density]
///     resolution = 0.05
///
///     [graft]
///     target_density = 40.0
///     "#,
/// )
/// .unwrap();
///
/// assert!((config.density.resolution - 0.05).abs() < f64::EPSILON);
/// assert!((config.graft.max_donor_density - 35.0).abs() < f64::EPSILON);
/// assert!(config.regions.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Clustering, segmentation and interpolation settings.
    pub density: DensityPreferences,
    /// Region measurement settings.
    pub measure: MeasureParams,
    /// Graft allocation settings.
    pub graft: GraftPreferences,
    /// Regions to measure.
    pub regions: Vec<MeasurementRegion>,
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] for malformed TOML and the relevant
    /// stage error for out-of-range values.
    pub fn from_toml_str(source: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns the first stage error found.
    pub fn validate(&self) -> PipelineResult<()> {
        self.density.validate()?;
        self.measure.validate()?;
        self.graft.validate()?;
        Ok(())
    }
}

/// Load a [`PipelineConfig`] from a TOML file.
///
/// # Errors
///
/// - [`PipelineError::Io`] if the file cannot be read
/// - [`PipelineError::Config`] if it is not valid configuration TOML
/// - A stage error for out-of-range values
pub fn load_config(path: impl AsRef<Path>) -> PipelineResult<PipelineConfig> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = PipelineConfig::from_toml_str(&source)?;
    debug!(path = %path.display(), regions = config.regions.len(), "pipeline config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use density_map::BackendChoice;
    use graft_plan::GraftType;
    use scan_measure::RegionKind;

    const FULL: &str = r#"
        [density]
        resolution = 0.02
        smoothing_factor = 0.5
        backend = "sequential"
        min_region_size = 4
        thresholds = [0.8, 0.4]

        [density.region_targets]
        crown = 0.8

        [measure]
        min_confidence = 0.6

        [graft]
        target_density = 40.0
        max_donor_density = 30.0
        priorities = ["double", "single"]

        [[graft.zones]]
        name = "hairline"
        priority = 1
        target_density = 50.0
        boundary = [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 1.0, 0.0], [0.0, 1.0, 0.0]]

        [[regions]]
        kind = "recipient"
        expected_location = [0.0, 5.0, 10.0]
        approximate_size = 4.0

        [[regions]]
        expected_location = [0.0, -6.0, 2.0]
        approximate_size = 3.0
        notes = "occipital"

        [regions.kind.custom]
        name = "crown"
        unit = "cm2"
    "#;

    #[test]
    fn test_full_document() {
        let config = PipelineConfig::from_toml_str(FULL).unwrap();

        assert_eq!(config.density.backend, BackendChoice::Sequential);
        assert_eq!(config.density.min_region_size, 4);
        assert_eq!(config.density.thresholds, vec![0.8, 0.4]);
        assert_eq!(config.density.region_targets.get("crown"), Some(&0.8));
        assert!((config.measure.min_confidence - 0.6).abs() < f64::EPSILON);
        assert!((config.measure.link_radius - 0.5).abs() < f64::EPSILON);

        assert_eq!(config.graft.priorities, vec![GraftType::Double, GraftType::Single]);
        assert_eq!(config.graft.zones.len(), 1);
        assert_eq!(config.graft.zones[0].boundary.len(), 4);
        assert_eq!(config.graft.zones[0].target_density, Some(50.0));

        assert_eq!(config.regions.len(), 2);
        assert_eq!(config.regions[0].kind, RegionKind::Recipient);
        assert_eq!(config.regions[1].kind, RegionKind::custom("crown", "cm2"));
        assert_eq!(config.regions[1].notes.as_deref(), Some("occipital"));
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(PipelineConfig::from_toml_str("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            PipelineConfig::from_toml_str("[density\nresolution = 1"),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("[density]\nresolution = \"fine\""),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_out_of_range_values() {
        assert!(matches!(
            PipelineConfig::from_toml_str("[density]\nresolution = 3.0"),
            Err(PipelineError::DensityMap(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("[measure]\nmin_confidence = 2.0"),
            Err(PipelineError::Measure(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("[graft]\ntarget_density = -5.0"),
            Err(PipelineError::Graft(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config("/nonexistent/scalp-pipeline.toml"),
            Err(PipelineError::Io { .. })
        ));
    }
}
