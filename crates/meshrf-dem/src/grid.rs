//! Elevation raster and grid coordinates.

use crate::{DemError, Result};

/// Mean radius of the Earth in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Standard atmospheric refraction factor (the "4/3 Earth" k-factor).
pub const REFRACTION_K: f64 = 1.33;

/// Effective Earth radius used for curvature correction (≈ 8473.43 km).
pub const EFFECTIVE_EARTH_RADIUS_M: f64 = EARTH_RADIUS_M * REFRACTION_K;

/// Elevation reported for coordinates outside the raster.
pub const OUT_OF_BOUNDS_ELEVATION: f32 = 0.0;

/// Integer grid coordinate (column `x`, row `y`).
///
/// Coordinates are signed so that callers can describe points that fall
/// outside the raster; every lookup is bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPoint {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl GridPoint {
    /// Create a grid point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for GridPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A rectangular elevation raster.
///
/// Samples are stored row-major (`index = y * width + x`), one `f32` per cell
/// in meters. The grid is immutable after construction.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    /// Elevation samples in row-major order.
    data: Vec<f32>,
    /// Width of the raster in cells.
    width: usize,
    /// Height of the raster in cells.
    height: usize,
    /// Ground-sample distance: meters per cell edge.
    gsd_meters: f64,
}

impl ElevationGrid {
    /// Build a grid from row-major elevation samples.
    ///
    /// Fails if either dimension is zero, if `data.len() != width * height`,
    /// or if the ground-sample distance is not a positive finite number.
    pub fn try_new(width: usize, height: usize, gsd_meters: f64, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DemError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .ok_or(DemError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(DemError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        if !gsd_meters.is_finite() || gsd_meters <= 0.0 {
            return Err(DemError::InvalidGroundSampleDistance(gsd_meters));
        }

        Ok(Self {
            data,
            width,
            height,
            gsd_meters,
        })
    }

    /// Build a grid of uniform elevation.
    pub fn flat(width: usize, height: usize, gsd_meters: f64, elevation: f32) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(DemError::InvalidDimensions { width, height })?;
        Self::try_new(width, height, gsd_meters, vec![elevation; len])
    }

    /// Width of the raster in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the raster in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of cells in the raster.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Ground-sample distance in meters per cell edge.
    pub fn gsd_meters(&self) -> f64 {
        self.gsd_meters
    }

    /// Effective Earth radius used for curvature correction.
    pub fn effective_earth_radius_m(&self) -> f64 {
        EFFECTIVE_EARTH_RADIUS_M
    }

    /// Raw row-major samples.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Check whether a coordinate lies inside the raster.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Row-major index of a coordinate, or `None` outside the raster.
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Elevation of a cell.
    ///
    /// Returns [`OUT_OF_BOUNDS_ELEVATION`] for coordinates outside the raster;
    /// ray marches may probe one cell past the edge before stopping.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> f32 {
        match self.index_of(x, y) {
            Some(idx) => self.data[idx],
            None => OUT_OF_BOUNDS_ELEVATION,
        }
    }

    /// Elevation at a fractional cell coordinate.
    ///
    /// Uses bilinear interpolation between the four nearest cells, clamped at
    /// the raster edge. Returns `None` outside `[0, width-1] x [0, height-1]`.
    pub fn elevation_at(&self, x: f64, y: f64) -> Option<f32> {
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        if !(0.0..=max_x).contains(&x) || !(0.0..=max_y).contains(&y) {
            return None;
        }

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x - x0 as f64;
        let fy = y - y0 as f64;

        let v00 = self.data[y0 * self.width + x0] as f64;
        let v10 = self.data[y0 * self.width + x1] as f64;
        let v01 = self.data[y1 * self.width + x0] as f64;
        let v11 = self.data[y1 * self.width + x1] as f64;

        let elevation = v00 * (1.0 - fx) * (1.0 - fy)
            + v10 * fx * (1.0 - fy)
            + v01 * (1.0 - fx) * fy
            + v11 * fx * fy;

        Some(elevation as f32)
    }

    /// Sample elevations along a straight segment.
    ///
    /// Returns `num_samples` evenly spaced `(distance_m, elevation)` pairs from
    /// `from` to `to` inclusive. Both endpoints must lie inside the raster.
    pub fn sample_line(
        &self,
        from: GridPoint,
        to: GridPoint,
        num_samples: usize,
    ) -> Result<Vec<(f64, f32)>> {
        if num_samples < 2 {
            return Err(DemError::TooFewSamples(num_samples));
        }
        for p in [from, to] {
            if !self.contains(p.x, p.y) {
                return Err(DemError::OutOfBounds {
                    x: p.x as i64,
                    y: p.y as i64,
                    width: self.width,
                    height: self.height,
                });
            }
        }

        let dx = (to.x - from.x) as f64;
        let dy = (to.y - from.y) as f64;
        let total_distance = dx.hypot(dy) * self.gsd_meters;

        let mut samples = Vec::with_capacity(num_samples);
        for i in 0..num_samples {
            let t = i as f64 / (num_samples - 1) as f64;
            let x = from.x as f64 + t * dx;
            let y = from.y as f64 + t * dy;
            // Both endpoints are inside, so every point on the segment is too
            let elevation = self
                .elevation_at(x, y)
                .unwrap_or(OUT_OF_BOUNDS_ELEVATION);
            samples.push((t * total_distance, elevation));
        }

        Ok(samples)
    }
}
