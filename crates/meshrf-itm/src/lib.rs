//! # meshrf-itm
//!
//! The propagation-oracle seam of the planner.
//!
//! Point-to-point path loss is delegated to an external Irregular Terrain
//! Model (ITM) build. This crate does not model propagation itself; it
//! provides:
//!
//! - [`PropagationOracle`], the black-box trait the rest of the workspace
//!   depends on,
//! - [`Itm`], a binding that loads an ITM shared library at runtime,
//! - [`radial_loss`], a sweep that feeds correctly shaped prefix profiles to
//!   the oracle and records [`NO_DATA_LOSS_DB`] for failed queries.
//!
//! ```
//! use meshrf_itm::{radial_loss, ItmResult, LinkParameters, PathLoss, PropagationOracle, TerrainProfile};
//!
//! /// Toy oracle: 1 dB per meter of path.
//! struct Linear;
//!
//! impl PropagationOracle for Linear {
//!     fn estimate_path_loss(&self, pfl: &[f64], _link: &LinkParameters) -> ItmResult<PathLoss> {
//!         Ok(PathLoss::new(pfl[0] * pfl[1]))
//!     }
//! }
//!
//! let profile = TerrainProfile::from_elevations(10.0, &[100.0, 101.0, 99.0]);
//! let radial = radial_loss(&Linear, &profile, &LinkParameters::default());
//! assert_eq!(radial.losses_db, vec![0.0, 10.0, 20.0]);
//! ```

mod error;
mod itm;
mod oracle;
mod radial;
mod types;

pub use error::{ItmError, ItmResult, LinkInput};
pub use itm::{Itm, ITM_LIBRARY_ENV};
pub use oracle::PropagationOracle;
pub use radial::{radial_loss, RadialLoss, RadialSweepStats, NO_DATA_LOSS_DB};
pub use types::{
    validate_pfl, Climate, ItmWarnings, LinkParameters, LossStatus, ModeOfVariability, PathLoss,
    Polarization, TerrainProfile, VariabilityMode,
};
