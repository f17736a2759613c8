//! Angular-sweep viewshed with horizon tracking.
//!
//! Rays are cast from the transmitter to endpoints on a circle of radius
//! `max_range_pixels`, one every `1 / max_range_pixels` radians so adjacent
//! endpoints are at most one cell apart. Along each ray the steepest
//! line-of-sight slope seen so far is the horizon; a cell is visible only if
//! its slope, after subtracting the curvature drop `d² / 2·R_eff`, strictly
//! exceeds that horizon.

use crate::{GridLine, Site, ViewshedError, VisibilityMask};
use meshrf_dem::{ElevationGrid, GridPoint, EFFECTIVE_EARTH_RADIUS_M};
use rayon::prelude::*;
use std::f64::consts::TAU;
use std::ops::ControlFlow;
use tracing::trace;

/// Cells closer than this to the transmitter (meters) are skipped and leave
/// the horizon untouched.
pub const MIN_DISTANCE_M: f64 = 1.0;

/// Longest endpoint offset (cells) along either axis. Larger ranges keep
/// their angular step but place endpoints at this distance along the same
/// direction, well past any grid edge.
const MAX_ENDPOINT_OFFSET: f64 = (1u32 << 30) as f64;

/// Compute the visibility mask of one transmitter.
///
/// A transmitter outside the grid yields an all-false mask. With
/// `max_range_pixels == 0` only the transmitter cell is visible. The
/// transmitter cell is otherwise always visible.
///
/// # Example
///
/// ```
/// use meshrf_dem::ElevationGrid;
/// use meshrf_viewshed::compute_visibility;
///
/// let grid = ElevationGrid::flat(21, 21, 30.0, 100.0)?;
/// let mask = compute_visibility(&grid, 10, 10, 10.0, 5, 30.0);
/// assert!(mask.is_visible(10, 10));
/// assert!(mask.is_visible(15, 10));
/// assert!(!mask.is_visible(20, 10));
/// # Ok::<(), meshrf_dem::DemError>(())
/// ```
pub fn compute_visibility(
    grid: &ElevationGrid,
    tx_x: i32,
    tx_y: i32,
    tx_height_agl: f64,
    max_range_pixels: u32,
    gsd_meters: f64,
) -> VisibilityMask {
    Viewshed::new(
        grid,
        GridPoint::new(tx_x, tx_y),
        tx_height_agl,
        max_range_pixels,
        gsd_meters,
    )
    .compute()
}

/// One transmitter's viewshed problem.
///
/// Besides the canonical [`compute`](Self::compute), the pieces of the sweep
/// are exposed so rays can be cast in any order or distributed across
/// workers, and single cells can be probed without building a full mask.
#[derive(Debug, Clone, Copy)]
pub struct Viewshed<'a> {
    grid: &'a ElevationGrid,
    origin: GridPoint,
    origin_index: Option<usize>,
    tx_elevation_m: f64,
    max_range_pixels: u32,
    gsd_meters: f64,
}

impl<'a> Viewshed<'a> {
    /// Set up a viewshed for a transmitter at `origin`.
    pub fn new(
        grid: &'a ElevationGrid,
        origin: GridPoint,
        antenna_height_m: f64,
        max_range_pixels: u32,
        gsd_meters: f64,
    ) -> Self {
        Self {
            grid,
            origin,
            origin_index: grid.index_of(origin.x, origin.y),
            tx_elevation_m: grid.get(origin.x, origin.y) as f64 + antenna_height_m,
            max_range_pixels,
            gsd_meters,
        }
    }

    /// Set up a viewshed for a site using the grid's own ground-sample distance.
    pub fn for_site(grid: &'a ElevationGrid, site: &Site, max_range_pixels: u32) -> Self {
        Self::new(
            grid,
            site.position,
            site.antenna_height_m,
            max_range_pixels,
            grid.gsd_meters(),
        )
    }

    /// Transmitter cell.
    pub fn origin(&self) -> GridPoint {
        self.origin
    }

    /// Absolute transmitter elevation: ground plus antenna height (meters).
    pub fn transmitter_elevation_m(&self) -> f64 {
        self.tx_elevation_m
    }

    /// Maximum ray length in cells.
    pub fn max_range_pixels(&self) -> u32 {
        self.max_range_pixels
    }

    /// Ray endpoints in canonical sweep order (increasing angle from +x).
    ///
    /// Empty when the range is zero.
    pub fn ray_endpoints(&self) -> Vec<GridPoint> {
        self.endpoints().collect()
    }

    fn endpoints(&self) -> impl Iterator<Item = GridPoint> + '_ {
        let radius = self.max_range_pixels as f64;
        let count = if self.max_range_pixels == 0 {
            0
        } else {
            (TAU * radius).ceil() as usize
        };
        let reach = radius.min(MAX_ENDPOINT_OFFSET);
        (0..count)
            .map(move |i| i as f64 / radius)
            .take_while(|&angle| angle < TAU)
            .map(move |angle| {
                GridPoint::new(
                    offset_coordinate(self.origin.x, angle.cos() * reach),
                    offset_coordinate(self.origin.y, angle.sin() * reach),
                )
            })
    }

    /// Mask with only the transmitter cell marked (all-false if the
    /// transmitter is off the grid).
    pub fn empty_mask(&self) -> VisibilityMask {
        let mut mask = VisibilityMask::new(self.grid.width(), self.grid.height());
        if let Some(index) = self.origin_index {
            mask.mark(index);
        }
        mask
    }

    /// March one ray and mark every cell that clears the horizon.
    ///
    /// Only ever sets cells, so rays can be cast in any order. Fails if
    /// `mask` does not have the grid's dimensions.
    pub fn cast_ray(
        &self,
        mask: &mut VisibilityMask,
        endpoint: GridPoint,
    ) -> Result<(), ViewshedError> {
        if mask.width() != self.grid.width() || mask.height() != self.grid.height() {
            return Err(ViewshedError::DimensionMismatch {
                left_width: mask.width(),
                left_height: mask.height(),
                right_width: self.grid.width(),
                right_height: self.grid.height(),
            });
        }
        self.mark_ray(mask, endpoint);
        Ok(())
    }

    fn mark_ray(&self, mask: &mut VisibilityMask, endpoint: GridPoint) {
        if self.origin_index.is_none() {
            return;
        }
        self.march(endpoint, |_, index, visible| {
            if visible {
                mask.mark(index);
            }
            ControlFlow::<()>::Continue(())
        });
    }

    /// Run the full sweep.
    pub fn compute(&self) -> VisibilityMask {
        self.compute_with_endpoints(self.endpoints())
    }

    /// Run the sweep over caller-supplied ray endpoints, in the order given.
    pub fn compute_with_endpoints<I>(&self, endpoints: I) -> VisibilityMask
    where
        I: IntoIterator<Item = GridPoint>,
    {
        let mut mask = self.empty_mask();
        if self.origin_index.is_none() {
            return mask;
        }

        let mut rays = 0usize;
        for endpoint in endpoints {
            self.mark_ray(&mut mask, endpoint);
            rays += 1;
        }

        trace!(
            x = self.origin.x,
            y = self.origin.y,
            range = self.max_range_pixels,
            rays,
            visible = mask.visible_count(),
            "Viewshed computed"
        );
        mask
    }

    /// Run the full sweep with rays distributed over the rayon pool.
    ///
    /// Each ray keeps its own horizon and reports the cells it saw; the
    /// results are merged with set-only writes, so the mask equals
    /// [`compute`](Self::compute).
    pub fn compute_parallel(&self) -> VisibilityMask {
        let mut mask = self.empty_mask();
        if self.origin_index.is_none() {
            return mask;
        }

        let endpoints = self.ray_endpoints();
        let seen: Vec<Vec<usize>> = endpoints
            .par_iter()
            .map(|&endpoint| {
                let mut cells = Vec::new();
                self.march(endpoint, |_, index, visible| {
                    if visible {
                        cells.push(index);
                    }
                    ControlFlow::<()>::Continue(())
                });
                cells
            })
            .collect();

        for index in seen.into_iter().flatten() {
            mask.mark(index);
        }
        mask
    }

    /// Whether a single cell is visible, without building a full mask.
    ///
    /// Only rays whose ideal segment passes within one cell of `target` can
    /// step onto it, and a ray's verdict for a cell depends only on the cells
    /// before it, so only those rays are marched and each stops at the
    /// target. The answer equals reading `target` from [`compute`](Self::compute).
    pub fn is_visible(&self, target: GridPoint) -> bool {
        if self.origin_index.is_none() || !self.grid.contains(target.x, target.y) {
            return false;
        }
        if target == self.origin {
            return true;
        }
        if self.max_range_pixels == 0 {
            return false;
        }

        let ox = (target.x - self.origin.x) as f64;
        let oy = (target.y - self.origin.y) as f64;
        if ox.hypot(oy) * self.gsd_meters < MIN_DISTANCE_M {
            return false;
        }

        for endpoint in self.endpoints() {
            let lx = (endpoint.x - self.origin.x) as f64;
            let ly = (endpoint.y - self.origin.y) as f64;
            let length = lx.hypot(ly);
            if length == 0.0 {
                continue;
            }

            let along = (ox * lx + oy * ly) / length;
            let across = (ox * ly - oy * lx).abs() / length;
            if along <= 0.0 || along > length + 1.0 || across > 1.0 {
                continue;
            }

            let verdict = self.march(endpoint, |cell, _, visible| {
                if cell == target {
                    ControlFlow::Break(visible)
                } else {
                    ControlFlow::Continue(())
                }
            });
            if verdict == Some(true) {
                return true;
            }
        }

        false
    }

    /// Walk one ray, tracking its horizon, and report each evaluated cell.
    ///
    /// The walk stops at the first cell outside the grid or when `visit`
    /// breaks.
    fn march<B>(
        &self,
        endpoint: GridPoint,
        mut visit: impl FnMut(GridPoint, usize, bool) -> ControlFlow<B>,
    ) -> Option<B> {
        let two_r_eff = 2.0 * EFFECTIVE_EARTH_RADIUS_M;
        let mut max_slope = f64::NEG_INFINITY;

        for cell in GridLine::new(self.origin, endpoint) {
            let Some(index) = self.grid.index_of(cell.x, cell.y) else {
                break;
            };

            let dx = (cell.x - self.origin.x) as f64;
            let dy = (cell.y - self.origin.y) as f64;
            let distance_m = dx.hypot(dy) * self.gsd_meters;
            if distance_m < MIN_DISTANCE_M {
                continue;
            }

            let curvature_drop = distance_m * distance_m / two_r_eff;
            let effective_elevation = self.grid.get(cell.x, cell.y) as f64 - curvature_drop;
            let slope = (effective_elevation - self.tx_elevation_m) / distance_m;

            // Ties are obstructed
            let visible = slope > max_slope;
            if visible {
                max_slope = slope;
            }

            if let ControlFlow::Break(b) = visit(cell, index, visible) {
                return Some(b);
            }
        }

        None
    }
}

/// `origin + offset` rounded to the nearest cell, saturating at the `i32`
/// coordinate limits.
fn offset_coordinate(origin: i32, offset: f64) -> i32 {
    let coordinate = origin as i64 + offset.round() as i64;
    coordinate.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_count_covers_full_turn() {
        let grid = ElevationGrid::flat(10, 10, 30.0, 0.0).unwrap();
        let viewshed = Viewshed::new(&grid, GridPoint::new(5, 5), 2.0, 10, 30.0);
        let endpoints = viewshed.ray_endpoints();
        // ceil(2π · 10) = 63 angles in [0, 2π)
        assert_eq!(endpoints.len(), 63);
        assert_eq!(endpoints[0], GridPoint::new(15, 5));
        for endpoint in &endpoints {
            let r = ((endpoint.x - 5) as f64).hypot((endpoint.y - 5) as f64);
            assert!((r - 10.0).abs() <= 0.75, "endpoint {endpoint:?} at radius {r}");
        }
    }

    #[test]
    fn test_zero_range_has_no_rays() {
        let grid = ElevationGrid::flat(10, 10, 30.0, 0.0).unwrap();
        let viewshed = Viewshed::new(&grid, GridPoint::new(5, 5), 2.0, 0, 30.0);
        assert!(viewshed.ray_endpoints().is_empty());
        let mask = viewshed.compute();
        assert_eq!(mask.visible_count(), 1);
        assert!(mask.is_visible(5, 5));
    }

    #[test]
    fn test_transmitter_elevation_includes_antenna() {
        let grid = ElevationGrid::flat(4, 4, 30.0, 120.0).unwrap();
        let viewshed = Viewshed::new(&grid, GridPoint::new(1, 1), 15.0, 3, 30.0);
        assert_eq!(viewshed.transmitter_elevation_m(), 135.0);
    }

    #[test]
    fn test_sub_meter_cells_do_not_set_horizon() {
        // With 0.5 m cells the first ring is skipped; a wall there must not
        // block the cells behind it.
        let mut data = vec![0.0f32; 9 * 9];
        data[4 * 9 + 5] = 50.0;
        let grid = ElevationGrid::try_new(9, 9, 0.5, data).unwrap();
        let mask = compute_visibility(&grid, 4, 4, 2.0, 4, 0.5);

        assert!(!mask.is_visible(5, 4));
        assert!(mask.is_visible(6, 4));
        assert!(mask.is_visible(4, 4));
    }

    #[test]
    fn test_probe_matches_mask() {
        let data: Vec<f32> = (0..15 * 12)
            .map(|i| ((i * 37) % 23) as f32 * 3.0)
            .collect();
        let grid = ElevationGrid::try_new(15, 12, 30.0, data).unwrap();
        let viewshed = Viewshed::new(&grid, GridPoint::new(6, 5), 4.0, 8, 30.0);
        let mask = viewshed.compute();

        for y in -1..13 {
            for x in -1..16 {
                assert_eq!(
                    viewshed.is_visible(GridPoint::new(x, y)),
                    mask.is_visible(x, y),
                    "cell ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let data: Vec<f32> = (0..40 * 30)
            .map(|i| ((i * 7919) % 101) as f32)
            .collect();
        let grid = ElevationGrid::try_new(40, 30, 10.0, data).unwrap();
        let viewshed = Viewshed::new(&grid, GridPoint::new(20, 12), 6.0, 18, 10.0);
        assert_eq!(viewshed.compute_parallel(), viewshed.compute());
    }

    #[test]
    fn test_equal_slope_is_obstructed() {
        // Elevations high enough that the curvature drop rounds away, so
        // cells 1 and 2 sit on exactly the same sight line.
        let base = 4_294_967_296.0f32;
        let data = vec![base, base + 512.0, base + 1024.0, base + 2048.0];
        let grid = ElevationGrid::try_new(4, 1, 1.0, data).unwrap();

        let tx = base as f64;
        let slope = |x: i32| {
            let d = x as f64;
            (grid.get(x, 0) as f64 - d * d / (2.0 * EFFECTIVE_EARTH_RADIUS_M) - tx) / d
        };
        assert_eq!(slope(1).to_bits(), slope(2).to_bits());
        assert!(slope(3) > slope(2));

        let mask = compute_visibility(&grid, 0, 0, 0.0, 3, 1.0);
        assert!(mask.is_visible(1, 0));
        assert!(!mask.is_visible(2, 0));
        assert!(mask.is_visible(3, 0));

        let viewshed = Viewshed::new(&grid, GridPoint::new(0, 0), 0.0, 3, 1.0);
        assert!(!viewshed.is_visible(GridPoint::new(2, 0)));
    }

    #[test]
    fn test_cast_ray_rejects_foreign_mask() {
        let grid = ElevationGrid::flat(10, 10, 30.0, 0.0).unwrap();
        let viewshed = Viewshed::new(&grid, GridPoint::new(5, 5), 2.0, 4, 30.0);
        let mut small = VisibilityMask::new(4, 4);

        let result = viewshed.cast_ray(&mut small, GridPoint::new(9, 5));
        assert_eq!(
            result,
            Err(ViewshedError::DimensionMismatch {
                left_width: 4,
                left_height: 4,
                right_width: 10,
                right_height: 10,
            })
        );
        assert_eq!(small.visible_count(), 0);

        let mut mask = viewshed.empty_mask();
        viewshed.cast_ray(&mut mask, GridPoint::new(9, 5)).unwrap();
        assert!(mask.is_visible(9, 5));
    }

    #[test]
    fn test_huge_range_endpoints_stay_in_coordinate_range() {
        let grid = ElevationGrid::flat(10, 10, 30.0, 0.0).unwrap();
        let origin = GridPoint::new(5, 5);
        let viewshed = Viewshed::new(&grid, origin, 2.0, u32::MAX, 30.0);

        let endpoints: Vec<GridPoint> = viewshed.endpoints().take(3).collect();
        assert_eq!(endpoints[0], GridPoint::new(5 + (1 << 30), 5));
        for endpoint in &endpoints {
            assert!(endpoint.x > origin.x);
            assert!(endpoint.y >= origin.y);
        }

        let mut mask = viewshed.empty_mask();
        viewshed.cast_ray(&mut mask, endpoints[0]).unwrap();
        assert!((6..10).all(|x| mask.is_visible(x, 5)));
    }

    #[test]
    fn test_offset_coordinate_saturates() {
        assert_eq!(offset_coordinate(3, 2.4), 5);
        assert_eq!(offset_coordinate(3, -2.6), 0);
        assert_eq!(offset_coordinate(i32::MAX - 1, 10.0), i32::MAX);
        assert_eq!(offset_coordinate(i32::MIN + 1, -10.0), i32::MIN);
    }
}
