//! Flat-buffer entry points for hosts that hold rasters and matrices as plain
//! arrays.
//!
//! Inputs are checked against the declared dimensions before anything is
//! computed; a mismatch is an [`InvalidArgument`](PlannerError::InvalidArgument)
//! or [`MatrixShape`](PlannerError::MatrixShape) error.

use crate::{CoverageMatrix, GreedySiteSelector, PlannerError, Result};
use meshrf_dem::{DemError, ElevationGrid};

/// Visibility mask of one transmitter over a row-major elevation buffer.
///
/// Returns `width * height` row-major flags.
#[allow(clippy::too_many_arguments)]
pub fn compute_visibility(
    elevation: &[f32],
    width: usize,
    height: usize,
    tx_x: i32,
    tx_y: i32,
    tx_height_agl_m: f64,
    max_range_pixels: u32,
    gsd_meters: f64,
) -> Result<Vec<bool>> {
    let grid = ElevationGrid::try_new(width, height, gsd_meters, elevation.to_vec())
        .map_err(invalid_raster)?;
    let mask = meshrf_viewshed::compute_visibility(
        &grid,
        tx_x,
        tx_y,
        tx_height_agl_m,
        max_range_pixels,
        gsd_meters,
    );
    Ok(mask.into_vec())
}

/// Greedy site selection over a row-major `0.0` / `1.0` coverage matrix.
///
/// Returns candidate indices in selection order.
pub fn select_sites(
    coverage_matrix: &[f32],
    num_candidates: usize,
    num_targets: usize,
) -> Result<Vec<usize>> {
    let matrix = CoverageMatrix::from_flat(coverage_matrix, num_candidates, num_targets)?;
    Ok(GreedySiteSelector::new().select(&matrix).selected)
}

fn invalid_raster(e: DemError) -> PlannerError {
    PlannerError::InvalidArgument(e.to_string())
}
