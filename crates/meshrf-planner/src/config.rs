//! Planner configuration.

use crate::{CoverageStrategy, PlannerError, Result};
use meshrf_itm::LinkParameters;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Coverage planning settings. Every field has a default, so a YAML document
/// only needs the values it changes:
///
/// ```yaml
/// max_range_pixels: 150
/// strategy: direct_ray
/// max_sites: 5
/// link:
///   frequency_mhz: 868.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum ray length in cells.
    pub max_range_pixels: u32,
    /// Antenna height used for candidates given as bare grid positions (meters AGL).
    pub default_antenna_height_m: f64,
    pub strategy: CoverageStrategy,
    /// Evaluate candidates and gain scans on the rayon pool.
    pub parallel: bool,
    /// Upper bound on selected sites; `None` selects until coverage stops growing.
    pub max_sites: Option<usize>,
    /// Link parameters for path-loss queries.
    pub link: LinkParameters,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_range_pixels: 100,
            default_antenna_height_m: 10.0,
            strategy: CoverageStrategy::Auto,
            parallel: true,
            max_sites: None,
            link: LinkParameters::default(),
        }
    }
}

impl PlannerConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject settings no plan can be built from.
    pub fn validate(&self) -> Result<()> {
        if self.max_range_pixels == 0 {
            return Err(PlannerError::Config(
                "max_range_pixels must be at least 1".to_string(),
            ));
        }
        check_height("default_antenna_height_m", self.default_antenna_height_m)?;
        check_height("link.tx_height_m", self.link.tx_height_m)?;
        check_height("link.rx_height_m", self.link.rx_height_m)?;
        if !(self.link.frequency_mhz.is_finite() && self.link.frequency_mhz > 0.0) {
            return Err(PlannerError::Config(format!(
                "link.frequency_mhz must be positive, got {}",
                self.link.frequency_mhz
            )));
        }
        Ok(())
    }
}

fn check_height(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PlannerError::Config(format!(
            "{name} must be a non-negative height, got {value}"
        )))
    }
}
