//! Candidate transmitter sites.

use meshrf_dem::GridPoint;

/// A transmitter location on the grid with its antenna height above ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    /// Grid cell of the antenna mast.
    pub position: GridPoint,
    /// Antenna height above ground level in meters.
    pub antenna_height_m: f64,
}

impl Site {
    /// Create a site at grid cell `(x, y)`.
    pub fn new(x: i32, y: i32, antenna_height_m: f64) -> Self {
        Self {
            position: GridPoint::new(x, y),
            antenna_height_m,
        }
    }
}
