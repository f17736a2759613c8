//! Path loss along a radial terrain profile.
//!
//! A radial sweep asks the oracle for the loss from the transmitter (sample 0)
//! to every later sample of the profile. One failed query must not abort the
//! sweep, so failures are recorded as [`NO_DATA_LOSS_DB`] and the sweep moves
//! on to the next sample.

use crate::{LinkParameters, PropagationOracle, TerrainProfile};
use tracing::{debug, trace};

/// Loss recorded for a sample whose oracle query failed.
pub const NO_DATA_LOSS_DB: f32 = 999.9;

/// Outcome counts of a radial sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadialSweepStats {
    /// Queries that returned a loss without warnings.
    pub succeeded: usize,
    /// Queries that returned a loss with warnings.
    pub warned: usize,
    /// Queries that failed and were recorded as no data.
    pub failed: usize,
}

/// Losses along a radial, one per profile sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialLoss {
    /// Loss in dB from the transmitter to each sample; index 0 is `0.0`.
    pub losses_db: Vec<f32>,
    /// Query outcome counts.
    pub stats: RadialSweepStats,
}

impl RadialLoss {
    /// Whether a sample holds a usable loss value.
    pub fn has_data(&self, index: usize) -> bool {
        self.losses_db
            .get(index)
            .is_some_and(|&loss| loss != NO_DATA_LOSS_DB)
    }
}

/// Compute the loss from the first sample to every later sample of `profile`.
///
/// Profiles with fewer than two samples produce all-zero losses without
/// calling the oracle.
pub fn radial_loss<O>(oracle: &O, profile: &TerrainProfile, link: &LinkParameters) -> RadialLoss
where
    O: PropagationOracle + ?Sized,
{
    let count = profile.len();
    let mut losses_db = vec![0.0f32; count];
    let mut stats = RadialSweepStats::default();

    if count < 2 {
        return RadialLoss { losses_db, stats };
    }

    // The sub-profile to sample `i` is a prefix of the full PFL array with the
    // interval count rewritten, so one owned buffer serves every query.
    let mut pfl = profile.to_pfl();

    for i in 1..count {
        pfl[0] = i as f64;
        let prefix = &pfl[..i + 3];

        match oracle.estimate_path_loss(prefix, link) {
            Ok(loss) => {
                losses_db[i] = loss.loss_db as f32;
                if loss.warnings.has_warnings() {
                    stats.warned += 1;
                } else {
                    stats.succeeded += 1;
                }
            }
            Err(e) => {
                trace!(sample = i, error = %e, "Oracle query failed; recording no data");
                losses_db[i] = NO_DATA_LOSS_DB;
                stats.failed += 1;
            }
        }
    }

    debug!(
        samples = count,
        succeeded = stats.succeeded,
        warned = stats.warned,
        failed = stats.failed,
        "Radial sweep complete"
    );

    RadialLoss { losses_db, stats }
}
