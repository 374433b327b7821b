//! Square height grids consumed by the mesh service and the quantizer.

use super::DecodeError;

/// A square grid of elevations in meters, stored row-major.
///
/// The side is one more than the raster it came from so that mesh vertices on
/// the tile's far (south/east) edges have a defined height.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    side: usize,
    heights: Vec<f32>,
}

impl HeightGrid {
    /// Wraps row-major heights as a grid.
    pub fn from_heights(side: usize, heights: Vec<f32>) -> Result<Self, DecodeError> {
        if side < 2 {
            return Err(DecodeError::InvalidDimensions {
                width: side as u32,
                height: side as u32,
                reason: "height grid needs at least 2 samples per side".to_string(),
            });
        }
        if heights.len() != side * side {
            return Err(DecodeError::BufferLength {
                expected: side * side,
                actual: heights.len(),
            });
        }
        Ok(Self { side, heights })
    }

    /// Builds a grid whose dimensions the caller already guarantees.
    pub(crate) fn from_parts(side: usize, heights: Vec<f32>) -> Self {
        debug_assert_eq!(heights.len(), side * side);
        Self { side, heights }
    }

    /// Samples per side (raster side + 1).
    pub fn side(&self) -> usize {
        self.side
    }

    /// Side of the raster tile the grid pads (`side - 1`).
    pub fn tile_size(&self) -> usize {
        self.side - 1
    }

    /// Height at column `x`, row `y`. Panics if out of range.
    #[inline]
    pub fn height(&self, x: usize, y: usize) -> f32 {
        self.heights[y * self.side + x]
    }

    /// One row of the grid.
    pub fn row(&self, y: usize) -> &[f32] {
        &self.heights[y * self.side..(y + 1) * self.side]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }
}
