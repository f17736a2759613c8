//! The propagation oracle seam.

use crate::{ItmResult, LinkParameters, PathLoss};

/// A point-to-point path-loss estimator treated as a black box.
///
/// The profile is passed in PFL layout (`[n - 1, step_m, z0 .. z(n-1)]`, see
/// [`TerrainProfile::to_pfl`](crate::TerrainProfile::to_pfl)) so callers can
/// reuse one owned buffer across many queries. A returned `Err` is the
/// failure status of that single query; callers decide whether to continue.
///
/// Implementations must be shareable across worker threads.
pub trait PropagationOracle: Send + Sync {
    /// Estimate the basic transmission loss along `pfl`.
    fn estimate_path_loss(&self, pfl: &[f64], link: &LinkParameters) -> ItmResult<PathLoss>;
}

impl<O: PropagationOracle + ?Sized> PropagationOracle for &O {
    fn estimate_path_loss(&self, pfl: &[f64], link: &LinkParameters) -> ItmResult<PathLoss> {
        (**self).estimate_path_loss(pfl, link)
    }
}

impl<O: PropagationOracle + ?Sized> PropagationOracle for Box<O> {
    fn estimate_path_loss(&self, pfl: &[f64], link: &LinkParameters) -> ItmResult<PathLoss> {
        (**self).estimate_path_loss(pfl, link)
    }
}
