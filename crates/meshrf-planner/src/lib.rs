//! # meshrf-planner
//!
//! Transmitter site selection for radio coverage over terrain.
//!
//! Each candidate [`Site`]'s viewshed is sampled at the target cells to build
//! a [`CoverageMatrix`]; [`GreedySiteSelector`] then repeatedly picks the
//! candidate that covers the most targets not yet covered.
//!
//! - [`CoverageMatrixBuilder`] evaluates candidates concurrently with either a
//!   full viewshed per candidate or direct per-target probes
//!   ([`CoverageStrategy`]); both give the same matrix.
//! - [`CoveragePlanner`] runs the whole pipeline from a [`PlannerConfig`],
//!   which can be loaded from YAML.
//! - [`site_radial_loss`] feeds terrain radials to a
//!   [`PropagationOracle`](meshrf_itm::PropagationOracle).
//! - [`boundary`] accepts plain row-major buffers.
//!
//! ## Examples
//!
//! ```
//! use meshrf_planner::{CoverageMatrix, GreedySiteSelector};
//!
//! let matrix = CoverageMatrix::from_flat(
//!     &[
//!         1.0, 1.0, 0.0, 0.0,
//!         0.0, 1.0, 1.0, 1.0,
//!         1.0, 0.0, 0.0, 0.0,
//!     ],
//!     3,
//!     4,
//! )?;
//!
//! let selection = GreedySiteSelector::new().select(&matrix);
//! assert_eq!(selection.selected, vec![1, 0]);
//! assert_eq!(selection.covered_targets, 4);
//! # Ok::<(), meshrf_planner::PlannerError>(())
//! ```
//!
//! ```
//! use meshrf_dem::{ElevationGrid, GridPoint};
//! use meshrf_planner::{CoveragePlanner, PlannerConfig};
//!
//! let grid = ElevationGrid::flat(64, 64, 30.0, 120.0)?;
//! let config = PlannerConfig::from_yaml_str("max_range_pixels: 10\nmax_sites: 2")?;
//! let planner = CoveragePlanner::new(&grid, config)?;
//!
//! let candidates = planner.sites_at(&[GridPoint::new(10, 10), GridPoint::new(50, 50)]);
//! let targets = [GridPoint::new(12, 12), GridPoint::new(48, 50)];
//! let plan = planner.plan(&candidates, &targets);
//! assert_eq!(plan.selected_indices(), &[0, 1]);
//! # Ok::<(), meshrf_planner::PlannerError>(())
//! ```

pub mod boundary;
mod config;
mod coverage;
mod error;
mod pipeline;
mod propagation;
mod selector;

pub use config::PlannerConfig;
pub use coverage::{build_coverage_matrix, CoverageMatrix, CoverageMatrixBuilder, CoverageStrategy};
pub use error::PlannerError;
pub use pipeline::{CoveragePlanner, PlanResult, SiteCoverage};
pub use propagation::site_radial_loss;
pub use selector::{GreedySiteSelector, SelectionResult};

pub use meshrf_viewshed::{Site, VisibilityMask};

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;
