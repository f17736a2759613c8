//! End-to-end planning: visibility, coverage matrix, greedy selection.

use crate::{
    CoverageMatrix, CoverageMatrixBuilder, GreedySiteSelector, PlannerConfig, Result,
    SelectionResult,
};
use meshrf_dem::{ElevationGrid, GridPoint};
use meshrf_viewshed::{Site, Viewshed, VisibilityMask};
use rayon::prelude::*;
use tracing::info;

/// Footprint of one selected site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteCoverage {
    /// Index of the site in the candidate list.
    pub candidate: usize,
    pub site: Site,
    /// Ground elevation under the antenna (meters).
    pub ground_elevation_m: f32,
    /// Targets this site newly covered when it was selected.
    pub gain: usize,
    /// Raster cells in the site's own viewshed.
    pub visible_cells: usize,
    /// Ground area of the viewshed in km².
    pub coverage_area_km2: f64,
}

/// Result of [`CoveragePlanner::plan`].
#[derive(Debug, Clone)]
pub struct PlanResult {
    pub matrix: CoverageMatrix,
    pub selection: SelectionResult,
    /// Selected sites in selection order.
    pub sites: Vec<SiteCoverage>,
}

impl PlanResult {
    /// Selected candidate indices in selection order.
    pub fn selected_indices(&self) -> &[usize] {
        &self.selection.selected
    }

    /// Fraction of targets covered by the selection, `0.0` without targets.
    pub fn coverage_fraction(&self) -> f64 {
        match self.matrix.num_targets() {
            0 => 0.0,
            n => self.selection.covered_targets as f64 / n as f64,
        }
    }
}

/// Runs the planning pipeline over one elevation grid.
#[derive(Debug, Clone)]
pub struct CoveragePlanner<'a> {
    grid: &'a ElevationGrid,
    config: PlannerConfig,
}

impl<'a> CoveragePlanner<'a> {
    /// Create a planner; the configuration is validated first.
    pub fn new(grid: &'a ElevationGrid, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { grid, config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn grid(&self) -> &ElevationGrid {
        self.grid
    }

    /// Candidate sites at the given positions with the default antenna height.
    pub fn sites_at(&self, positions: &[GridPoint]) -> Vec<Site> {
        positions
            .iter()
            .map(|&position| Site {
                position,
                antenna_height_m: self.config.default_antenna_height_m,
            })
            .collect()
    }

    fn viewshed(&self, site: &Site) -> Viewshed<'a> {
        Viewshed::for_site(self.grid, site, self.config.max_range_pixels)
    }

    /// Coverage of every candidate against every target.
    pub fn coverage_matrix(&self, candidates: &[Site], targets: &[GridPoint]) -> CoverageMatrix {
        CoverageMatrixBuilder::new(
            self.grid,
            self.config.max_range_pixels,
            self.grid.gsd_meters(),
        )
        .with_strategy(self.config.strategy)
        .with_parallel(self.config.parallel)
        .build(candidates, targets)
    }

    /// Build the coverage matrix, select sites and summarize each pick.
    pub fn plan(&self, candidates: &[Site], targets: &[GridPoint]) -> PlanResult {
        let matrix = self.coverage_matrix(candidates, targets);
        let selection = GreedySiteSelector::new()
            .with_max_sites(self.config.max_sites)
            .with_parallel(self.config.parallel)
            .select(&matrix);

        let gsd = self.grid.gsd_meters();
        let sites: Vec<SiteCoverage> = selection
            .selected
            .iter()
            .zip(&selection.gains)
            .map(|(&candidate, &gain)| {
                let site = candidates[candidate];
                let mask = self.viewshed(&site).compute();
                SiteCoverage {
                    candidate,
                    site,
                    ground_elevation_m: self.grid.get(site.position.x, site.position.y),
                    gain,
                    visible_cells: mask.visible_count(),
                    coverage_area_km2: mask.coverage_area_km2(gsd),
                }
            })
            .collect();

        let result = PlanResult {
            matrix,
            selection,
            sites,
        };

        info!(
            candidates = candidates.len(),
            targets = targets.len(),
            selected = result.selection.len(),
            covered = result.selection.covered_targets,
            "Coverage plan complete"
        );
        result
    }

    /// Union of the viewsheds of `sites`: cells seen by at least one site.
    pub fn composite_visibility(&self, sites: &[Site]) -> Result<VisibilityMask> {
        let masks: Vec<VisibilityMask> = if self.config.parallel {
            sites
                .par_iter()
                .map(|site| self.viewshed(site).compute())
                .collect()
        } else {
            sites
                .iter()
                .map(|site| self.viewshed(site).compute())
                .collect()
        };

        let mut composite = VisibilityMask::new(self.grid.width(), self.grid.height());
        for mask in &masks {
            composite.union_with(mask)?;
        }
        Ok(composite)
    }
}
