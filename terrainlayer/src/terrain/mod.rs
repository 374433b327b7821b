//! Terrain tile payloads and the mesh quantizer.
//!
//! - [`GeometricErrorModel`] gives the tolerated error per zoom level
//! - [`MeshQuantizer`] turns a simplified mesh into a [`QuantizedMeshData`]
//! - [`TilePayload`] is what the rendering host receives

mod error_model;
mod payload;
mod quantizer;

pub use error_model::{GeometricErrorModel, HEIGHTMAP_TERRAIN_QUALITY};
pub use payload::{
    EdgeIndices, FlatHeightmap, QuantizedMeshData, QuantizedVertices, SkirtHeights, TilePayload,
    QUANTIZED_MAX,
};
pub use quantizer::MeshQuantizer;
