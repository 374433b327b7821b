//! East-north-up tangent plane on the ellipsoid surface.

use glam::{DVec2, DVec3};

use super::Ellipsoid;

/// Tolerance for treating a point as lying on the polar axis.
const POLE_EPSILON: f64 = 1e-14;

/// A plane tangent to the ellipsoid at `origin`, with local east (`x_axis`),
/// north (`y_axis`) and up (`z_axis`) unit vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentPlane {
    pub origin: DVec3,
    pub x_axis: DVec3,
    pub y_axis: DVec3,
    pub z_axis: DVec3,
}

impl TangentPlane {
    /// Builds the plane at a point on the ellipsoid surface.
    pub fn new(origin: DVec3, ellipsoid: &Ellipsoid) -> Self {
        let up = ellipsoid.geodetic_surface_normal(origin);
        let east = if origin.x.abs() < POLE_EPSILON && origin.y.abs() < POLE_EPSILON {
            DVec3::Y
        } else {
            DVec3::new(-origin.y, origin.x, 0.0).normalize()
        };
        let north = up.cross(east);

        Self {
            origin,
            x_axis: east,
            y_axis: north,
            z_axis: up,
        }
    }

    /// Orthogonal projection of a point onto the plane, in plane coordinates.
    pub fn project_point(&self, point: DVec3) -> DVec2 {
        let offset = point - self.origin;
        DVec2::new(self.x_axis.dot(offset), self.y_axis.dot(offset))
    }

    /// Signed distance from the plane along the up axis.
    pub fn distance_to(&self, point: DVec3) -> f64 {
        self.z_axis.dot(point - self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Cartographic;

    #[test]
    fn test_axes_are_orthonormal() {
        let ellipsoid = Ellipsoid::WGS84;
        let origin =
            ellipsoid.cartographic_to_cartesian(&Cartographic::from_radians(2.4, 0.62, 0.0));
        let plane = TangentPlane::new(origin, &ellipsoid);

        for axis in [plane.x_axis, plane.y_axis, plane.z_axis] {
            assert!((axis.length() - 1.0).abs() < 1e-12);
        }
        assert!(plane.x_axis.dot(plane.y_axis).abs() < 1e-12);
        assert!(plane.x_axis.dot(plane.z_axis).abs() < 1e-12);
        assert!(plane.y_axis.dot(plane.z_axis).abs() < 1e-12);
    }

    #[test]
    fn test_north_axis_points_north() {
        let ellipsoid = Ellipsoid::WGS84;
        let origin =
            ellipsoid.cartographic_to_cartesian(&Cartographic::from_radians(0.0, 0.0, 0.0));
        let plane = TangentPlane::new(origin, &ellipsoid);
        assert!((plane.y_axis - DVec3::Z).length() < 1e-12);
        assert!((plane.x_axis - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_point_above_origin_projects_to_zero() {
        let ellipsoid = Ellipsoid::WGS84;
        let c = Cartographic::from_radians(-0.3, 0.9, 0.0);
        let origin = ellipsoid.cartographic_to_cartesian(&c);
        let plane = TangentPlane::new(origin, &ellipsoid);

        let above = ellipsoid.cartographic_to_cartesian(&Cartographic { height: 250.0, ..c });
        let projected = plane.project_point(above);
        assert!(projected.length() < 1e-6);
        assert!((plane.distance_to(above) - 250.0).abs() < 1e-6);
    }
}
