//! Tile payloads handed to the rendering host.

use glam::DVec3;

use crate::geometry::{BoundingSphere, OrientedBoundingBox};

/// Largest value of a quantized vertex component.
pub const QUANTIZED_MAX: u16 = 32767;

/// The result of a tile request: exactly one of a mesh or a flat heightmap.
#[derive(Debug, Clone, PartialEq)]
pub enum TilePayload {
    /// Quantized, bounding-volume annotated terrain mesh.
    Mesh(QuantizedMeshData),
    /// Constant-zero heightmap for skipped or failed tiles.
    Flat(FlatHeightmap),
}

impl TilePayload {
    pub fn is_mesh(&self) -> bool {
        matches!(self, TilePayload::Mesh(_))
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, TilePayload::Flat(_))
    }

    pub fn as_mesh(&self) -> Option<&QuantizedMeshData> {
        match self {
            TilePayload::Mesh(mesh) => Some(mesh),
            TilePayload::Flat(_) => None,
        }
    }

    pub fn as_flat(&self) -> Option<&FlatHeightmap> {
        match self {
            TilePayload::Flat(flat) => Some(flat),
            TilePayload::Mesh(_) => None,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TilePayload::Mesh(_) => "mesh",
            TilePayload::Flat(_) => "flat",
        }
    }
}

/// A square heightmap whose samples are all zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatHeightmap {
    side: u32,
    samples: Vec<u8>,
}

impl FlatHeightmap {
    pub fn new(side: u32) -> Self {
        Self {
            side,
            samples: vec![0; side as usize * side as usize],
        }
    }

    /// Samples per side (width == height).
    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }
}

/// Per-vertex quantized coordinates, each in `[0, 32767]`.
///
/// `u` runs west to east, `v` south to north and `height` from the tile's
/// minimum to maximum height.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantizedVertices {
    pub u: Vec<u16>,
    pub v: Vec<u16>,
    pub height: Vec<u16>,
}

impl QuantizedVertices {
    pub fn len(&self) -> usize {
        self.u.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }

    /// All `u` values, then all `v`, then all heights: the buffer layout
    /// renderers expect for quantized-mesh vertex data.
    pub fn to_buffer(&self) -> Vec<u16> {
        let mut buffer = Vec::with_capacity(self.len() * 3);
        buffer.extend_from_slice(&self.u);
        buffer.extend_from_slice(&self.v);
        buffer.extend_from_slice(&self.height);
        buffer
    }
}

/// Border vertex indices, used to attach skirts and stitch neighbours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeIndices {
    pub west: Vec<u32>,
    pub south: Vec<u32>,
    pub east: Vec<u32>,
    pub north: Vec<u32>,
}

/// Skirt heights in meters for each border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkirtHeights {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl SkirtHeights {
    /// The same height on all four borders.
    pub fn uniform(height: f64) -> Self {
        Self {
            west: height,
            south: height,
            east: height,
            north: height,
        }
    }
}

/// A quantized terrain mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedMeshData {
    pub minimum_height: f64,
    pub maximum_height: f64,
    pub quantized_vertices: QuantizedVertices,
    /// Triangle vertex indices, three per triangle.
    pub indices: Vec<u32>,
    pub bounding_sphere: BoundingSphere,
    /// Present only for tiles narrower than 90°.
    pub oriented_bounding_box: Option<OrientedBoundingBox>,
    /// Ellipsoid-scaled point for horizon culling.
    pub horizon_occlusion_point: DVec3,
    pub edges: EdgeIndices,
    pub skirt_heights: SkirtHeights,
    /// Bit per child quadrant (SW = 1, SE = 2, NW = 4, NE = 8).
    pub child_tile_mask: u8,
}

impl QuantizedMeshData {
    pub fn vertex_count(&self) -> usize {
        self.quantized_vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
