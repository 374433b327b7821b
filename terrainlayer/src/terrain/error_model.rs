//! Geometric error per zoom level.

use std::f64::consts::PI;

use crate::geometry::Ellipsoid;

/// Quality factor of the standard heightmap error estimate.
///
/// Lower values demand more detail before a tile is refined.
pub const HEIGHTMAP_TERRAIN_QUALITY: f64 = 0.25;

/// Maximum geometric error tolerated at each zoom level, in meters.
///
/// The level-zero error is the ground distance covered by one heightmap
/// sample at level zero (scaled by [`HEIGHTMAP_TERRAIN_QUALITY`]); each level
/// halves it. The same value is the simplification tolerance handed to the
/// mesh service and the basis for skirt heights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricErrorModel {
    level_zero_error: f64,
}

impl GeometricErrorModel {
    /// Builds the model for heightmaps `image_width` samples wide over
    /// `root_tiles_x` tiles at level zero.
    pub fn new(ellipsoid: &Ellipsoid, image_width: u32, root_tiles_x: u32) -> Self {
        let level_zero_error = ellipsoid.maximum_radius() * 2.0 * PI * HEIGHTMAP_TERRAIN_QUALITY
            / (f64::from(image_width.max(1)) * f64::from(root_tiles_x.max(1)));
        Self { level_zero_error }
    }

    /// Error at level zero.
    pub fn level_zero_error(&self) -> f64 {
        self.level_zero_error
    }

    /// Error at `level`: the level-zero error halved once per level.
    pub fn max_error(&self, level: u8) -> f64 {
        self.level_zero_error / 2.0_f64.powi(i32::from(level))
    }
}
