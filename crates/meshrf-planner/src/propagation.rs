//! Path-loss sweeps along radials extracted from the elevation grid.

use crate::{PlannerError, Result};
use meshrf_dem::{ElevationGrid, GridPoint};
use meshrf_itm::{radial_loss, LinkParameters, PropagationOracle, RadialLoss, TerrainProfile};
use meshrf_viewshed::Site;
use tracing::debug;

/// Loss from `site` to every cell step along one bearing.
///
/// The radial runs `range_pixels` cells from the site towards `bearing_rad`
/// (radians, counter-clockwise from +x, the same convention as the viewshed
/// sweep) and is sampled once per cell. The site's antenna height replaces
/// `link.tx_height_m`. The radial endpoint must lie inside the grid.
pub fn site_radial_loss<O>(
    oracle: &O,
    grid: &ElevationGrid,
    site: &Site,
    bearing_rad: f64,
    range_pixels: u32,
    link: &LinkParameters,
) -> Result<RadialLoss>
where
    O: PropagationOracle + ?Sized,
{
    if range_pixels == 0 {
        return Err(PlannerError::InvalidArgument(
            "radial range must be at least one cell".to_string(),
        ));
    }
    if !bearing_rad.is_finite() {
        return Err(PlannerError::InvalidArgument(format!(
            "bearing must be finite, got {bearing_rad}"
        )));
    }

    let range = f64::from(range_pixels);
    let end = GridPoint::new(
        site.position.x + (bearing_rad.cos() * range).round() as i32,
        site.position.y + (bearing_rad.sin() * range).round() as i32,
    );
    let samples = grid.sample_line(site.position, end, range_pixels as usize + 1)?;

    let dx = f64::from(end.x - site.position.x);
    let dy = f64::from(end.y - site.position.y);
    let step_m = dx.hypot(dy) * grid.gsd_meters() / range;
    let elevations: Vec<f64> = samples.iter().map(|&(_, z)| f64::from(z)).collect();
    let profile = TerrainProfile::from_elevations(step_m, &elevations);

    let link = LinkParameters {
        tx_height_m: site.antenna_height_m,
        ..link.clone()
    };

    debug!(
        x = site.position.x,
        y = site.position.y,
        bearing_rad,
        samples = profile.len(),
        step_m,
        "Radial profile extracted"
    );

    Ok(radial_loss(oracle, &profile, &link))
}
