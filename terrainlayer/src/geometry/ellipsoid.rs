//! Reference ellipsoid and geodetic conversions.

use glam::DVec3;

use crate::coord::Cartographic;

/// A triaxial ellipsoid centred at the origin, radii in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    radii: DVec3,
}

impl Ellipsoid {
    /// WGS84 reference ellipsoid.
    pub const WGS84: Ellipsoid = Ellipsoid::from_radii(6_378_137.0, 6_378_137.0, 6_356_752.314_245_179);

    /// Create an ellipsoid from its three radii.
    pub const fn from_radii(x: f64, y: f64, z: f64) -> Self {
        Self {
            radii: DVec3::new(x, y, z),
        }
    }

    /// Largest of the three radii.
    pub fn maximum_radius(&self) -> f64 {
        self.radii.max_element()
    }

    /// Unit normal to the ellipsoid surface at a geodetic position.
    pub fn geodetic_surface_normal_cartographic(&self, position: &Cartographic) -> DVec3 {
        let cos_latitude = position.latitude.cos();
        DVec3::new(
            cos_latitude * position.longitude.cos(),
            cos_latitude * position.longitude.sin(),
            position.latitude.sin(),
        )
        .normalize()
    }

    /// Unit normal to the ellipsoid surface passing through a cartesian point.
    pub fn geodetic_surface_normal(&self, position: DVec3) -> DVec3 {
        (position / (self.radii * self.radii)).normalize()
    }

    /// Converts a geodetic position to earth-centred cartesian coordinates.
    pub fn cartographic_to_cartesian(&self, position: &Cartographic) -> DVec3 {
        let n = self.geodetic_surface_normal_cartographic(position);
        let k = self.radii * self.radii * n;
        let gamma = n.dot(k).sqrt();
        k / gamma + n * position.height
    }

    /// Scales a cartesian point so the ellipsoid becomes the unit sphere.
    pub fn transform_position_to_scaled_space(&self, position: DVec3) -> DVec3 {
        position / self.radii
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_wgs84_maximum_radius() {
        assert_eq!(Ellipsoid::WGS84.maximum_radius(), 6_378_137.0);
    }

    #[test]
    fn test_equator_prime_meridian_to_cartesian() {
        let p = Ellipsoid::WGS84.cartographic_to_cartesian(&Cartographic::from_radians(0.0, 0.0, 0.0));
        assert!((p.x - 6_378_137.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }

    #[test]
    fn test_north_pole_to_cartesian() {
        let p = Ellipsoid::WGS84
            .cartographic_to_cartesian(&Cartographic::from_radians(0.0, FRAC_PI_2, 100.0));
        assert!(p.x.abs() < 1e-6);
        assert!((p.z - (6_356_752.314_245_179 + 100.0)).abs() < 1e-6);
    }

    #[test]
    fn test_height_moves_along_normal() {
        let ellipsoid = Ellipsoid::WGS84;
        let ground = Cartographic::from_radians(0.4, 0.6, 0.0);
        let raised = Cartographic::from_radians(0.4, 0.6, 1000.0);
        let delta = ellipsoid.cartographic_to_cartesian(&raised)
            - ellipsoid.cartographic_to_cartesian(&ground);
        assert!((delta.length() - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_scaled_space_surface_point_is_unit_length() {
        let ellipsoid = Ellipsoid::WGS84;
        let p = ellipsoid.cartographic_to_cartesian(&Cartographic::from_radians(1.0, 0.3, 0.0));
        let scaled = ellipsoid.transform_position_to_scaled_space(p);
        assert!((scaled.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_surface_normals_agree() {
        let ellipsoid = Ellipsoid::WGS84;
        let c = Cartographic::from_radians(-1.2, 0.7, 0.0);
        let p = ellipsoid.cartographic_to_cartesian(&c);
        let a = ellipsoid.geodetic_surface_normal_cartographic(&c);
        let b = ellipsoid.geodetic_surface_normal(p);
        assert!((a - b).length() < 1e-9);
    }
}
