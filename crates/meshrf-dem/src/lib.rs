//! # meshrf-dem
//!
//! In-memory elevation raster used by the viewshed and coverage planner.
//!
//! An [`ElevationGrid`] is a rectangular, row-major raster of ground
//! elevations in meters with a fixed ground-sample distance (GSD, the
//! real-world size of one cell edge). Grids are immutable once built and can
//! be shared freely between threads.
//!
//! ## Examples
//!
//! ```
//! use meshrf_dem::{ElevationGrid, GridPoint};
//!
//! // 3x2 raster with 30 m cells
//! let grid = ElevationGrid::try_new(3, 2, 30.0, vec![10.0, 11.0, 12.0, 20.0, 21.0, 22.0])?;
//!
//! assert_eq!(grid.get(2, 1), 22.0);
//! // Out-of-bounds lookups return the 0.0 sentinel instead of failing
//! assert_eq!(grid.get(-1, 0), 0.0);
//!
//! // Evenly spaced samples along a straight segment
//! let samples = grid.sample_line(GridPoint::new(0, 0), GridPoint::new(2, 0), 3)?;
//! assert_eq!(samples.len(), 3);
//! # Ok::<(), meshrf_dem::DemError>(())
//! ```
//!
//! ### Loading a raster from disk
//!
//! ```no_run
//! use meshrf_dem::ElevationGrid;
//!
//! let grid = ElevationGrid::from_geotiff("terrain.tif", 30.0)?;
//! println!("{} x {} cells", grid.width(), grid.height());
//! # Ok::<(), meshrf_dem::DemError>(())
//! ```

mod error;
mod geotiff;
mod grid;

pub use error::DemError;
pub use grid::{
    ElevationGrid, GridPoint, EARTH_RADIUS_M, EFFECTIVE_EARTH_RADIUS_M, OUT_OF_BOUNDS_ELEVATION,
    REFRACTION_K,
};

/// Result type for DEM operations.
pub type Result<T> = std::result::Result<T, DemError>;
