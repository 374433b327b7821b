//! Coordinate and tiling scheme module
//!
//! Provides the single-root Web Mercator tiling scheme that addresses terrain
//! tiles, plus the conversions between tile coordinates and geodetic
//! rectangles needed by the quantizer.
//!
//! # Coordinate System
//!
//! One tile covers the whole Web Mercator extent at level 0. Each level
//! splits every tile into four children:
//! - X: Column (0 to 2^z - 1, west to east)
//! - Y: Row (0 to 2^z - 1, north to south)

mod types;

pub use types::{negative_pi_to_pi, Cartographic, CoordError, Rectangle, TileCoord, TWO_PI};

use std::f64::consts::{FRAC_PI_2, PI};

use crate::geometry::Ellipsoid;

/// Highest zoom level the scheme can address (tile counts must fit in `u32`).
pub const MAX_ZOOM: u8 = 31;

/// Converts a Mercator angle (northing / radius) to geodetic latitude.
#[inline]
pub fn mercator_angle_to_geodetic_latitude(mercator_angle: f64) -> f64 {
    FRAC_PI_2 - 2.0 * (-mercator_angle).exp().atan()
}

/// Web Mercator tiling scheme with a single tile at level zero.
///
/// The projected extent is the square `[-π·a, π·a]²` meters, where `a` is the
/// ellipsoid's maximum radius. Tiles are addressed from the north-west corner.
#[derive(Debug, Clone, PartialEq)]
pub struct WebMercatorTilingScheme {
    ellipsoid: Ellipsoid,
    semimajor_axis: f64,
    rectangle: Rectangle,
}

impl Default for WebMercatorTilingScheme {
    fn default() -> Self {
        Self::new(Ellipsoid::WGS84)
    }
}

impl WebMercatorTilingScheme {
    /// Number of tiles along X at level zero.
    pub const ROOT_TILES_X: u32 = 1;

    /// Number of tiles along Y at level zero.
    pub const ROOT_TILES_Y: u32 = 1;

    /// Create the scheme over the given ellipsoid.
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        let semimajor_axis = ellipsoid.maximum_radius();
        let max_latitude = mercator_angle_to_geodetic_latitude(PI);
        Self {
            ellipsoid,
            semimajor_axis,
            rectangle: Rectangle::new(-PI, -max_latitude, PI, max_latitude),
        }
    }

    /// The ellipsoid the scheme projects onto.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Geodetic extent covered by the root tile.
    pub fn rectangle(&self) -> Rectangle {
        self.rectangle
    }

    /// Number of tile columns at a level.
    pub fn number_of_x_tiles_at_level(&self, level: u8) -> u32 {
        Self::ROOT_TILES_X << level.min(MAX_ZOOM)
    }

    /// Number of tile rows at a level.
    pub fn number_of_y_tiles_at_level(&self, level: u8) -> u32 {
        Self::ROOT_TILES_Y << level.min(MAX_ZOOM)
    }

    /// Checks that a coordinate addresses an existing tile.
    pub fn validate(&self, coord: TileCoord) -> Result<(), CoordError> {
        if coord.z > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(coord.z));
        }
        let tiles_x = self.number_of_x_tiles_at_level(coord.z);
        let tiles_y = self.number_of_y_tiles_at_level(coord.z);
        if coord.x >= tiles_x || coord.y >= tiles_y {
            return Err(CoordError::OutOfRange {
                x: coord.x,
                y: coord.y,
                z: coord.z,
                tiles_x,
                tiles_y,
            });
        }
        Ok(())
    }

    /// Projected (meters) extent of a tile as `(west, south, east, north)`.
    pub fn tile_xy_to_native_rectangle(&self, coord: TileCoord) -> (f64, f64, f64, f64) {
        let extent = PI * self.semimajor_axis;
        let tiles_x = self.number_of_x_tiles_at_level(coord.z) as f64;
        let tiles_y = self.number_of_y_tiles_at_level(coord.z) as f64;

        let tile_width = 2.0 * extent / tiles_x;
        let tile_height = 2.0 * extent / tiles_y;

        let west = -extent + coord.x as f64 * tile_width;
        let east = -extent + (coord.x as f64 + 1.0) * tile_width;
        let north = extent - coord.y as f64 * tile_height;
        let south = extent - (coord.y as f64 + 1.0) * tile_height;

        (west, south, east, north)
    }

    /// Geodetic extent of a tile in radians.
    pub fn tile_xy_to_rectangle(&self, coord: TileCoord) -> Rectangle {
        let (west, south, east, north) = self.tile_xy_to_native_rectangle(coord);
        let a = self.semimajor_axis;
        Rectangle::new(
            west / a,
            mercator_angle_to_geodetic_latitude(south / a),
            east / a,
            mercator_angle_to_geodetic_latitude(north / a),
        )
    }
}
