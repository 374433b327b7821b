//! Ellipsoid geometry and bounding volumes.
//!
//! All cartesian values are earth-centred, earth-fixed coordinates in meters
//! using `glam` double-precision vectors.

mod bounding;
mod ellipsoid;
mod tangent_plane;

pub use bounding::{BoundingSphere, OrientedBoundingBox};
pub use ellipsoid::Ellipsoid;
pub use tangent_plane::TangentPlane;
