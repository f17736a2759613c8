//! Error types for viewshed operations.

use thiserror::Error;

/// Errors raised when combining visibility masks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewshedError {
    /// Two masks with different dimensions were combined.
    #[error("Mask dimensions differ: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        /// Width of the receiving mask.
        left_width: usize,
        /// Height of the receiving mask.
        left_height: usize,
        /// Width of the other mask.
        right_width: usize,
        /// Height of the other mask.
        right_height: usize,
    },
}
