//! Error types for the DEM crate.

use thiserror::Error;

/// Errors that can occur when building or loading an elevation raster.
#[derive(Debug, Error)]
pub enum DemError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// Width or height is zero.
    #[error("Invalid raster dimensions {width}x{height} (both must be positive)")]
    InvalidDimensions {
        /// Requested width in cells.
        width: usize,
        /// Requested height in cells.
        height: usize,
    },

    /// Elevation buffer length does not match `width * height`.
    #[error("Elevation buffer has {actual} samples, expected {expected}")]
    DataLength {
        /// Expected number of samples.
        expected: usize,
        /// Number of samples supplied.
        actual: usize,
    },

    /// Ground-sample distance is zero, negative or not finite.
    #[error("Invalid ground-sample distance {0} m (must be positive and finite)")]
    InvalidGroundSampleDistance(f64),

    /// Coordinate is outside the raster.
    #[error("Grid coordinate ({x}, {y}) is outside the {width}x{height} raster")]
    OutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Raster width.
        width: usize,
        /// Raster height.
        height: usize,
    },

    /// A profile needs at least two samples.
    #[error("Need at least 2 samples along a line, got {0}")]
    TooFewSamples(usize),
}
