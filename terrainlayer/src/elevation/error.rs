//! Error types for elevation raster decoding.

use thiserror::Error;

/// Errors that can occur while reading an elevation raster.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Raster dimensions cannot form a height grid.
    #[error("Invalid raster dimensions {width}×{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Raster has fewer than the three channels the encoding needs.
    #[error("Unsupported channel count: {0} (need at least 3)")]
    UnsupportedChannels(u8),

    /// Sample buffer length does not match the declared dimensions.
    #[error("Sample buffer has {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    /// The encoded image could not be read.
    #[error("Image decode failed: {0}")]
    Image(#[from] image::ImageError),
}
