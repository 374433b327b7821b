//! Coordinate types shared by the tiling scheme and the terrain pipeline.

use std::f64::consts::PI;
use std::fmt;

use thiserror::Error;

/// Full turn in radians.
pub const TWO_PI: f64 = 2.0 * PI;

/// Errors that can occur when addressing tiles.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Zoom level is beyond what the tiling scheme can address.
    #[error("Invalid zoom level: {0}")]
    InvalidZoom(u8),

    /// Tile X/Y lies outside the tile range of its level.
    #[error("Tile {x}/{y} is outside the {tiles_x}x{tiles_y} grid at level {z}")]
    OutOfRange {
        x: u32,
        y: u32,
        z: u8,
        tiles_x: u32,
        tiles_y: u32,
    },
}

/// Tile address in the single-root Web Mercator tiling scheme.
///
/// - X: column (0 to 2^z - 1, west to east)
/// - Y: row (0 to 2^z - 1, north to south)
/// - Z: zoom level
///
/// Used as the correlation key for every pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Tile column
    pub x: u32,
    /// Tile row
    pub y: u32,
    /// Zoom level
    pub z: u8,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// A geodetic position in radians, with height in meters above the ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cartographic {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl Cartographic {
    /// Create a position from radians and a height in meters.
    pub fn from_radians(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }
}

/// A geodetic rectangle with edges expressed in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Rectangle {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Angular width in radians, accounting for rectangles that cross the
    /// antimeridian.
    pub fn width(&self) -> f64 {
        let mut east = self.east;
        if east < self.west {
            east += TWO_PI;
        }
        east - self.west
    }

    /// Angular height in radians.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Center of the rectangle at height zero.
    pub fn center(&self) -> Cartographic {
        let mut east = self.east;
        if east < self.west {
            east += TWO_PI;
        }
        let longitude = negative_pi_to_pi((self.west + east) * 0.5);
        let latitude = (self.south + self.north) * 0.5;
        Cartographic::from_radians(longitude, latitude, 0.0)
    }
}

/// Wraps an angle into `[-π, π]`.
pub fn negative_pi_to_pi(angle: f64) -> f64 {
    if (-PI..=PI).contains(&angle) {
        return angle;
    }
    (angle + PI).rem_euclid(TWO_PI) - PI
}
