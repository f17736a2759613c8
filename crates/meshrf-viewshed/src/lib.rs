//! # meshrf-viewshed
//!
//! Line-of-sight visibility from a transmitter over an [`ElevationGrid`],
//! with Earth-curvature correction under standard atmospheric refraction.
//!
//! The main entry point is [`compute_visibility`], which returns a
//! [`VisibilityMask`] for one transmitter. [`Viewshed`] exposes the same
//! sweep piece by piece: ray endpoints, single-ray casting, a rayon-parallel
//! variant and a single-cell probe that avoids building a mask.
//!
//! ## Examples
//!
//! ```
//! use meshrf_dem::{ElevationGrid, GridPoint};
//! use meshrf_viewshed::{Site, Viewshed};
//!
//! let mut data = vec![100.0f32; 50 * 50];
//! data[25 * 50 + 30] = 400.0; // ridge cell east of the site
//! let grid = ElevationGrid::try_new(50, 50, 30.0, data)?;
//!
//! let site = Site::new(25, 25, 10.0);
//! let viewshed = Viewshed::for_site(&grid, &site, 20);
//! let mask = viewshed.compute();
//!
//! assert!(mask.is_visible(30, 25));
//! assert!(!mask.is_visible(40, 25));
//! assert!(!viewshed.is_visible(GridPoint::new(40, 25)));
//! # Ok::<(), meshrf_dem::DemError>(())
//! ```

mod error;
mod line;
mod mask;
mod site;
mod viewshed;

pub use error::ViewshedError;
pub use line::GridLine;
pub use mask::VisibilityMask;
pub use site::Site;
pub use viewshed::{compute_visibility, Viewshed, MIN_DISTANCE_M};

pub use meshrf_dem::{ElevationGrid, GridPoint};

/// Whether `target` is visible from `site`, using the grid's ground-sample
/// distance.
///
/// Equivalent to `compute_visibility(..).is_visible(target.x, target.y)`
/// but only marches the rays that can reach `target`.
pub fn is_point_visible(
    grid: &ElevationGrid,
    site: &Site,
    max_range_pixels: u32,
    target: GridPoint,
) -> bool {
    Viewshed::for_site(grid, site, max_range_pixels).is_visible(target)
}
