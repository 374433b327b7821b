//! Mesh simplification service abstraction.
//!
//! The pipeline does not care how a height grid becomes triangles; it only
//! needs a [`MeshService`] that returns grid-space vertices and triangle
//! indices for a given error tolerance. [`RtinMeshService`] is the default
//! implementation.
//!
//! # Example
//!
//! ```ignore
//! use terrainlayer::mesh::{MeshService, RtinMeshService};
//!
//! let service = RtinMeshService::new(257)?;
//! let mesh = service.generate_mesh(&grid, 9.4)?;
//! println!("{} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());
//! ```

mod rtin;

pub use rtin::RtinMeshService;

use std::sync::Arc;

use thiserror::Error;

use crate::elevation::HeightGrid;

/// Errors produced by a mesh service or found in its output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The service cannot be built for this grid size.
    #[error("Invalid grid size {0}: grid side minus one must be a power of two of at least 2")]
    InvalidGridSize(usize),

    /// The grid handed to the service does not match what it was built for.
    #[error("Grid side {actual} does not match expected {expected}")]
    GridSizeMismatch { expected: usize, actual: usize },

    /// The returned mesh cannot be quantized.
    #[error("Malformed mesh: {0}")]
    Malformed(String),

    /// Service-specific failure.
    #[error("Mesh service failed: {0}")]
    Service(String),
}

/// A simplified triangle mesh in grid coordinates.
///
/// Vertex coordinates lie in `[0, tile_size]`; triangles index into `vertices`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimplifiedMesh {
    pub vertices: Vec<[u16; 2]>,
    pub triangles: Vec<[u32; 3]>,
}

impl SimplifiedMesh {
    pub fn new(vertices: Vec<[u16; 2]>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Checks the mesh can be read against a grid padding `tile_size`.
    ///
    /// # Errors
    ///
    /// Returns `MeshError::Malformed` if the mesh has no vertices, a vertex
    /// lies outside `[0, tile_size]`, or a triangle references a missing vertex.
    pub fn validate(&self, tile_size: usize) -> Result<(), MeshError> {
        if self.vertices.is_empty() {
            return Err(MeshError::Malformed("mesh has no vertices".to_string()));
        }
        if let Some((i, [x, y])) = self
            .vertices
            .iter()
            .enumerate()
            .find(|(_, [x, y])| *x as usize > tile_size || *y as usize > tile_size)
        {
            return Err(MeshError::Malformed(format!(
                "vertex {} at ({}, {}) lies outside 0..={}",
                i, x, y, tile_size
            )));
        }
        let count = self.vertices.len();
        if let Some((i, triangle)) = self
            .triangles
            .iter()
            .enumerate()
            .find(|(_, t)| t.iter().any(|&index| index as usize >= count))
        {
            return Err(MeshError::Malformed(format!(
                "triangle {} {:?} references a vertex beyond {}",
                i, triangle, count
            )));
        }
        Ok(())
    }
}

/// Trait for mesh simplification strategies.
///
/// Implementations must be thread-safe (`Send + Sync`): one instance is shared
/// by every concurrent tile request, so any scratch state has to live inside
/// a single `generate_mesh` call.
pub trait MeshService: Send + Sync {
    /// Simplify a height grid so no skipped sample deviates from the surface
    /// by more than `max_error` meters.
    fn generate_mesh(&self, grid: &HeightGrid, max_error: f64)
        -> Result<SimplifiedMesh, MeshError>;
}

impl<T: MeshService + ?Sized> MeshService for Arc<T> {
    fn generate_mesh(
        &self,
        grid: &HeightGrid,
        max_error: f64,
    ) -> Result<SimplifiedMesh, MeshError> {
        (**self).generate_mesh(grid, max_error)
    }
}
