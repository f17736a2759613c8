//! Error types for coverage planning.

use meshrf_dem::DemError;
use meshrf_viewshed::ViewshedError;
use thiserror::Error;

/// Errors that can occur while building or consuming coverage data.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A caller-supplied value is out of range or inconsistent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A flat coverage matrix does not hold `candidates × targets` cells.
    #[error("Coverage matrix has {actual} cells, expected {expected}")]
    MatrixShape { expected: usize, actual: usize },

    #[error("DEM error: {0}")]
    Dem(#[from] DemError),

    #[error("Viewshed error: {0}")]
    Viewshed(#[from] ViewshedError),

    /// Configuration failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
