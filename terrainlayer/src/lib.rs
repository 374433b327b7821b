//! TerrainLayer - Quantized-mesh terrain tiles for 3D globe renderers
//!
//! This library turns RGB-encoded elevation rasters into quantized-mesh
//! terrain tiles on demand. A tile request flows through a fixed pipeline:
//!
//! ```text
//! TileCoord ──► RasterSource ──► elevation::decode ──► MeshService ──► MeshQuantizer ──► TilePayload
//!               (HTTP fetch)     (HeightGrid)          (SimplifiedMesh)  (QuantizedMeshData)
//! ```
//!
//! Any failure along the way yields a flat heightmap so the renderer always
//! receives a tile.
//!
//! # Example
//!
//! ```ignore
//! use terrainlayer::config::TerrainConfig;
//! use terrainlayer::coord::TileCoord;
//! use terrainlayer::pipeline::TerrainProvider;
//!
//! let provider = TerrainProvider::from_config(&TerrainConfig::default())?;
//! let payload = provider.request_tile(TileCoord::new(14552, 6451, 14)).await;
//! ```

pub mod config;
pub mod coord;
pub mod elevation;
pub mod geometry;
pub mod logging;
pub mod mesh;
pub mod pipeline;
pub mod provider;
pub mod terrain;
