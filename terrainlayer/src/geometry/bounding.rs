//! Bounding volumes for terrain tiles.
//!
//! The oriented box is fitted to a geodetic rectangle in the east-north-up
//! tangent plane at the rectangle's center, then the sphere is derived from
//! the box so both volumes enclose the same region.

use std::f64::consts::PI;

use glam::{DMat3, DVec3};

use super::{Ellipsoid, TangentPlane};
use crate::coord::{Cartographic, Rectangle};

/// A sphere enclosing a tile, in earth-centred cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: DVec3,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Smallest sphere centred on the box that contains all of its corners.
    pub fn from_oriented_bounding_box(obb: &OrientedBoundingBox) -> Self {
        let corner = obb.half_axes.x_axis + obb.half_axes.y_axis + obb.half_axes.z_axis;
        Self {
            center: obb.center,
            radius: corner.length(),
        }
    }
}

/// A box given by its center and three half-axis vectors (matrix columns).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBoundingBox {
    pub center: DVec3,
    pub half_axes: DMat3,
}

impl OrientedBoundingBox {
    /// Fits a box around a rectangle between two heights.
    ///
    /// Only rectangles no wider than π are supported; wider ones return `None`.
    pub fn from_rectangle(
        rectangle: &Rectangle,
        minimum_height: f64,
        maximum_height: f64,
        ellipsoid: &Ellipsoid,
    ) -> Option<Self> {
        let width = rectangle.width();
        if !(0.0..=PI).contains(&width) || !(0.0..=PI).contains(&rectangle.height()) {
            return None;
        }

        let tangent_cartographic = rectangle.center();
        let tangent_point = ellipsoid.cartographic_to_cartesian(&tangent_cartographic);
        let plane = TangentPlane::new(tangent_point, ellipsoid);

        // A rectangle straddling the equator bulges furthest there
        let lon_center = tangent_cartographic.longitude;
        let lat_center = if rectangle.south < 0.0 && rectangle.north > 0.0 {
            0.0
        } else {
            tangent_cartographic.latitude
        };

        let at = |longitude: f64, latitude: f64, height: f64| {
            ellipsoid.cartographic_to_cartesian(&Cartographic::from_radians(
                longitude, latitude, height,
            ))
        };

        // XY extents come from the rectangle raised to the maximum height
        let nc = plane.project_point(at(lon_center, rectangle.north, maximum_height));
        let nw = plane.project_point(at(rectangle.west, rectangle.north, maximum_height));
        let cw = plane.project_point(at(rectangle.west, lat_center, maximum_height));
        let sw = plane.project_point(at(rectangle.west, rectangle.south, maximum_height));
        let sc = plane.project_point(at(lon_center, rectangle.south, maximum_height));

        let min_x = nw.x.min(cw.x).min(sw.x);
        let max_x = -min_x;
        let max_y = nw.y.max(nc.y);
        let min_y = sw.y.min(sc.y);

        // The corners at minimum height sink deepest below the plane
        let min_z = plane
            .distance_to(at(rectangle.west, rectangle.north, minimum_height))
            .min(plane.distance_to(at(rectangle.west, rectangle.south, minimum_height)));
        let max_z = maximum_height;

        Some(Self::from_plane_extents(
            &plane, min_x, max_x, min_y, max_y, min_z, max_z,
        ))
    }

    fn from_plane_extents(
        plane: &TangentPlane,
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        min_z: f64,
        max_z: f64,
    ) -> Self {
        let center = plane.origin
            + plane.x_axis * (0.5 * (min_x + max_x))
            + plane.y_axis * (0.5 * (min_y + max_y))
            + plane.z_axis * (0.5 * (min_z + max_z));

        let half_axes = DMat3::from_cols(
            plane.x_axis * (0.5 * (max_x - min_x)),
            plane.y_axis * (0.5 * (max_y - min_y)),
            plane.z_axis * (0.5 * (max_z - min_z)),
        );

        Self { center, half_axes }
    }

    /// Whether a point lies inside the box (with an absolute tolerance in meters).
    pub fn contains(&self, point: DVec3, tolerance: f64) -> bool {
        let offset = point - self.center;
        [
            self.half_axes.x_axis,
            self.half_axes.y_axis,
            self.half_axes.z_axis,
        ]
        .iter()
        .all(|axis| {
            let half_length = axis.length();
            if half_length == 0.0 {
                return offset.dot(*axis).abs() <= tolerance;
            }
            offset.dot(*axis / half_length).abs() <= half_length + tolerance
        })
    }
}
