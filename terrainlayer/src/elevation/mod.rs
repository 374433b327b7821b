//! Elevation decoding module
//!
//! Converts RGB-encoded elevation rasters into padded height grids.
//!
//! # Encoding
//!
//! Each sample packs a 24-bit value `R·2¹⁶ + G·2⁸ + B` in units of 0.01 m.
//! Values with the top bit set (`R ≥ 128`) are two's-complement negatives,
//! and the triplet `(128, 0, 0)` marks missing data, decoded as sea level.

mod error;
mod grid;
mod raster;

pub use error::DecodeError;
pub use grid::HeightGrid;
pub use raster::RasterTile;

/// RGB triplet marking a sample without data.
pub const NO_DATA: [u8; 3] = [128, 0, 0];

/// Offset subtracted from encoded values with the sign bit set (2²⁴ · 0.01).
const NEGATIVE_OFFSET: f64 = 167_772.16;

/// Decodes a single RGB sample to meters.
#[inline]
pub fn decode_sample(rgb: [u8; 3]) -> f64 {
    if rgb == NO_DATA {
        return 0.0;
    }
    let [r, g, b] = rgb.map(f64::from);
    let value = r * 655.36 + g * 2.56 + b * 0.01;
    if rgb[0] >= 128 {
        value - NEGATIVE_OFFSET
    } else {
        value
    }
}

/// Decodes a raster into a height grid one sample wider and taller.
///
/// The extra last row and column duplicate the row and column before them.
pub fn decode(raster: &RasterTile) -> HeightGrid {
    let tile_size = raster.side() as usize;
    let side = tile_size + 1;
    let mut heights = vec![0.0_f32; side * side];

    for y in 0..tile_size {
        for x in 0..tile_size {
            heights[y * side + x] = decode_sample(raster.rgb(x as u32, y as u32)) as f32;
        }
    }

    // Backfill the bottom row, then the right column (which fills the corner)
    let (body, last_row) = heights.split_at_mut(side * (side - 1));
    last_row[..side - 1].copy_from_slice(&body[side * (side - 2)..side * (side - 2) + side - 1]);
    for y in 0..side {
        heights[y * side + side - 1] = heights[y * side + side - 2];
    }

    HeightGrid::from_parts(side, heights)
}
