//! Candidate × target coverage matrices.

use crate::{PlannerError, Result};
use meshrf_dem::{ElevationGrid, GridPoint};
use meshrf_viewshed::{Site, Viewshed};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dense boolean table; row `i` is candidate `i`, column `t` is target `t`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMatrix {
    num_candidates: usize,
    num_targets: usize,
    cells: Vec<bool>,
}

impl CoverageMatrix {
    /// Build a matrix from row-major cells.
    pub fn from_cells(num_candidates: usize, num_targets: usize, cells: Vec<bool>) -> Result<Self> {
        let expected = checked_len(num_candidates, num_targets)?;
        if cells.len() != expected {
            return Err(PlannerError::MatrixShape {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            num_candidates,
            num_targets,
            cells,
        })
    }

    /// Build a matrix from a row-major `0.0` / `1.0` float table.
    ///
    /// Values greater than `0.5` count as covered.
    pub fn from_flat(values: &[f32], num_candidates: usize, num_targets: usize) -> Result<Self> {
        let expected = checked_len(num_candidates, num_targets)?;
        if values.len() != expected {
            return Err(PlannerError::MatrixShape {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            num_candidates,
            num_targets,
            cells: values.iter().map(|&v| v > 0.5).collect(),
        })
    }

    /// Number of rows.
    pub fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    /// Number of columns.
    pub fn num_targets(&self) -> usize {
        self.num_targets
    }

    /// Coverage row of one candidate.
    ///
    /// # Panics
    ///
    /// Panics if `candidate >= num_candidates()`.
    pub fn row(&self, candidate: usize) -> &[bool] {
        let start = candidate * self.num_targets;
        &self.cells[start..start + self.num_targets]
    }

    /// Whether `candidate` covers `target`; `false` for out-of-range indices.
    pub fn covers(&self, candidate: usize, target: usize) -> bool {
        candidate < self.num_candidates
            && target < self.num_targets
            && self.cells[candidate * self.num_targets + target]
    }

    /// Number of targets a candidate covers on its own.
    pub fn row_count(&self, candidate: usize) -> usize {
        if candidate >= self.num_candidates {
            return 0;
        }
        self.row(candidate).iter().filter(|&&c| c).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.cells
    }

    /// Row-major `0.0` / `1.0` floats, the inverse of [`from_flat`](Self::from_flat).
    pub fn to_flat(&self) -> Vec<f32> {
        self.cells.iter().map(|&c| if c { 1.0 } else { 0.0 }).collect()
    }
}

fn checked_len(num_candidates: usize, num_targets: usize) -> Result<usize> {
    num_candidates.checked_mul(num_targets).ok_or_else(|| {
        PlannerError::InvalidArgument(format!(
            "{num_candidates} candidates x {num_targets} targets overflows"
        ))
    })
}

/// How each candidate's row is evaluated. All strategies give the same matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStrategy {
    /// Pick per candidate: direct probes when the targets are few compared
    /// to the raster cells inside the candidate's range.
    #[default]
    Auto,
    /// Compute the full visibility mask and sample it at every target.
    FullMask,
    /// Probe each target cell with only the rays that can reach it.
    DirectRay,
}

/// Evaluates candidate sites against a target set.
#[derive(Debug, Clone)]
pub struct CoverageMatrixBuilder<'a> {
    grid: &'a ElevationGrid,
    max_range_pixels: u32,
    gsd_meters: f64,
    strategy: CoverageStrategy,
    parallel: bool,
}

impl<'a> CoverageMatrixBuilder<'a> {
    /// Builder with the `Auto` strategy and parallel evaluation.
    pub fn new(grid: &'a ElevationGrid, max_range_pixels: u32, gsd_meters: f64) -> Self {
        Self {
            grid,
            max_range_pixels,
            gsd_meters,
            strategy: CoverageStrategy::Auto,
            parallel: true,
        }
    }

    /// Force a strategy instead of choosing one per candidate.
    pub fn with_strategy(mut self, strategy: CoverageStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Evaluate candidates on the rayon pool (`true`) or on the calling thread.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Concrete strategy used for one candidate.
    pub fn resolve_strategy(&self, candidate: &Site, num_targets: usize) -> CoverageStrategy {
        match self.strategy {
            CoverageStrategy::Auto => {
                let probe_cost = num_targets as u64 * u64::from(self.max_range_pixels);
                if probe_cost < self.range_box_cells(candidate.position) {
                    CoverageStrategy::DirectRay
                } else {
                    CoverageStrategy::FullMask
                }
            }
            fixed => fixed,
        }
    }

    /// Raster cells inside the square of half-width `max_range_pixels`
    /// around `origin`, clipped to the grid.
    fn range_box_cells(&self, origin: GridPoint) -> u64 {
        let r = i64::from(self.max_range_pixels);
        let span = |center: i32, size: usize| -> u64 {
            let lo = (i64::from(center) - r).max(0);
            let hi = (i64::from(center) + r).min(size as i64 - 1);
            if hi < lo {
                0
            } else {
                (hi - lo + 1) as u64
            }
        };
        span(origin.x, self.grid.width()) * span(origin.y, self.grid.height())
    }

    /// Build the matrix; row order follows `candidates`.
    pub fn build(&self, candidates: &[Site], targets: &[GridPoint]) -> CoverageMatrix {
        let rows: Vec<Vec<bool>> = if self.parallel {
            candidates
                .par_iter()
                .map(|candidate| self.evaluate_row(candidate, targets))
                .collect()
        } else {
            candidates
                .iter()
                .map(|candidate| self.evaluate_row(candidate, targets))
                .collect()
        };

        let cells: Vec<bool> = rows.into_iter().flatten().collect();
        let matrix = CoverageMatrix {
            num_candidates: candidates.len(),
            num_targets: targets.len(),
            cells,
        };

        debug!(
            candidates = matrix.num_candidates,
            targets = matrix.num_targets,
            covered = matrix.cells.iter().filter(|&&c| c).count(),
            parallel = self.parallel,
            "Coverage matrix built"
        );
        matrix
    }

    /// Coverage row of a single candidate.
    pub fn evaluate_row(&self, candidate: &Site, targets: &[GridPoint]) -> Vec<bool> {
        let viewshed = Viewshed::new(
            self.grid,
            candidate.position,
            candidate.antenna_height_m,
            self.max_range_pixels,
            self.gsd_meters,
        );

        match self.resolve_strategy(candidate, targets.len()) {
            CoverageStrategy::DirectRay => targets
                .iter()
                .map(|&target| viewshed.is_visible(target))
                .collect(),
            _ => {
                let mask = viewshed.compute();
                targets
                    .iter()
                    .map(|target| mask.is_visible(target.x, target.y))
                    .collect()
            }
        }
    }
}

/// Build a coverage matrix with the default builder settings.
pub fn build_coverage_matrix(
    grid: &ElevationGrid,
    candidates: &[Site],
    targets: &[GridPoint],
    max_range_pixels: u32,
    gsd_meters: f64,
) -> CoverageMatrix {
    CoverageMatrixBuilder::new(grid, max_range_pixels, gsd_meters).build(candidates, targets)
}
