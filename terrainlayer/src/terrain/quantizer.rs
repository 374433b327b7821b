//! Quantization of simplified meshes into quantized-mesh payloads.
//!
//! # Quantization
//!
//! ```text
//! grid (x, y)  ──►  u = x · 32768/size          (west → east)
//!                   v = (size − y) · 32768/size (south → north, grid row 0 is north)
//! height h     ──►  (h − min) · 32767/(max − min), or 0 when max − min < 1
//! ```
//!
//! All three components are clamped into `[0, 32767]`, so vertices on the far
//! east and north borders land exactly on 32767 in every tile and adjacent
//! tiles meet without cracks.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;
use tracing::debug;

use super::payload::{
    EdgeIndices, FlatHeightmap, QuantizedMeshData, QuantizedVertices, SkirtHeights, TilePayload,
    QUANTIZED_MAX,
};
use super::GeometricErrorModel;
use crate::config::TerrainConfig;
use crate::coord::{TileCoord, WebMercatorTilingScheme};
use crate::elevation::HeightGrid;
use crate::geometry::{BoundingSphere, OrientedBoundingBox};
use crate::mesh::{MeshError, SimplifiedMesh};

/// Tolerance added to π/2 when deciding whether a tile gets an oriented box.
const BOUNDING_BOX_WIDTH_EPSILON: f64 = 1e-5;

/// Height ranges narrower than this (meters) quantize to a flat tile.
const MIN_HEIGHT_RANGE: f64 = 1.0;

/// Converts simplified meshes into quantized-mesh payloads.
///
/// Immutable after construction and safe to share across threads.
#[derive(Debug, Clone)]
pub struct MeshQuantizer {
    tiling_scheme: WebMercatorTilingScheme,
    error_model: GeometricErrorModel,
    tile_size: u32,
    skip_width_threshold: f64,
    skip_heightmap_side: u32,
    global_bounding_radius: f64,
    skirt_multiplier: f64,
    child_tile_mask: u8,
}

impl MeshQuantizer {
    pub fn new(
        config: &TerrainConfig,
        tiling_scheme: WebMercatorTilingScheme,
        error_model: GeometricErrorModel,
    ) -> Self {
        Self {
            tiling_scheme,
            error_model,
            tile_size: config.tile_size,
            skip_width_threshold: config.skip_width_threshold,
            skip_heightmap_side: config.skip_heightmap_side,
            global_bounding_radius: config.global_bounding_radius,
            skirt_multiplier: config.skirt_multiplier,
            child_tile_mask: config.child_tile_mask,
        }
    }

    /// Raster tile side this quantizer expects.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Whether a tile is too wide to mesh faithfully and is delivered flat.
    pub fn should_skip(&self, coord: TileCoord) -> bool {
        self.tiling_scheme.tile_xy_to_rectangle(coord).width() > self.skip_width_threshold
    }

    /// Skirt height used on every border at `level`.
    pub fn skirt_height(&self, level: u8) -> f64 {
        self.error_model.max_error(level) * self.skirt_multiplier
    }

    /// Quantizes a mesh for a tile.
    ///
    /// Tiles wider than the skip threshold short-circuit to a flat heightmap
    /// before the mesh is inspected.
    ///
    /// # Errors
    ///
    /// Returns `MeshError` if the grid does not match the configured tile size
    /// or the mesh is empty or references samples outside the grid.
    pub fn quantize(
        &self,
        coord: TileCoord,
        grid: &HeightGrid,
        mesh: &SimplifiedMesh,
    ) -> Result<TilePayload, MeshError> {
        let rectangle = self.tiling_scheme.tile_xy_to_rectangle(coord);
        let width = rectangle.width();

        if width > self.skip_width_threshold {
            debug!(
                tile = %coord,
                width,
                threshold = self.skip_width_threshold,
                "Tile too coarse to mesh, delivering flat heightmap"
            );
            return Ok(TilePayload::Flat(FlatHeightmap::new(
                self.skip_heightmap_side,
            )));
        }

        let size = self.tile_size as usize;
        if grid.tile_size() != size {
            return Err(MeshError::GridSizeMismatch {
                expected: size + 1,
                actual: grid.side(),
            });
        }
        mesh.validate(size)?;

        let vertex_count = mesh.vertex_count();
        let scale = 32768.0 / f64::from(self.tile_size);

        let mut heights = Vec::with_capacity(vertex_count);
        let mut vertices = QuantizedVertices {
            u: Vec::with_capacity(vertex_count),
            v: Vec::with_capacity(vertex_count),
            height: Vec::with_capacity(vertex_count),
        };
        let mut edges = EdgeIndices::default();

        for (index, &[x, y]) in mesh.vertices.iter().enumerate() {
            let index = index as u32;
            let (gx, gy) = (usize::from(x), usize::from(y));
            heights.push(f64::from(grid.height(gx, gy)));

            if gy == 0 {
                edges.north.push(index);
            }
            if gy == size {
                edges.south.push(index);
            }
            if gx == 0 {
                edges.west.push(index);
            }
            if gx == size {
                edges.east.push(index);
            }

            vertices.u.push(quantize_component(f64::from(x) * scale));
            vertices.v.push(quantize_component((size - gy) as f64 * scale));
        }

        let (minimum_height, maximum_height) = heights
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            });

        let range = maximum_height - minimum_height;
        vertices.height = if range < MIN_HEIGHT_RANGE {
            vec![0; vertex_count]
        } else {
            let factor = f64::from(QUANTIZED_MAX) / range;
            heights
                .iter()
                .map(|h| quantize_component((h - minimum_height) * factor))
                .collect()
        };

        let ellipsoid = self.tiling_scheme.ellipsoid();

        let (bounding_sphere, oriented_bounding_box) =
            if width < FRAC_PI_2 + BOUNDING_BOX_WIDTH_EPSILON {
                match OrientedBoundingBox::from_rectangle(
                    &rectangle,
                    minimum_height,
                    maximum_height,
                    ellipsoid,
                ) {
                    Some(obb) => (BoundingSphere::from_oriented_bounding_box(&obb), Some(obb)),
                    None => (self.global_bounding_sphere(), None),
                }
            } else {
                (self.global_bounding_sphere(), None)
            };

        // Scaled-space center with its z replaced by a height that grows with
        // both the tile's relief and its angular width
        let center = ellipsoid.cartographic_to_cartesian(&rectangle.center());
        let scaled_center = ellipsoid.transform_position_to_scaled_space(center);
        let occlusion_height =
            (1.0 + maximum_height / ellipsoid.maximum_radius()) / (width / 2.0).cos();
        let horizon_occlusion_point = DVec3::new(scaled_center.x, scaled_center.y, occlusion_height);

        let indices = mesh.triangles.iter().flatten().copied().collect();

        debug!(
            tile = %coord,
            vertices = vertex_count,
            triangles = mesh.triangle_count(),
            minimum_height,
            maximum_height,
            "Quantized tile mesh"
        );

        Ok(TilePayload::Mesh(QuantizedMeshData {
            minimum_height,
            maximum_height,
            quantized_vertices: vertices,
            indices,
            bounding_sphere,
            oriented_bounding_box,
            horizon_occlusion_point,
            edges,
            skirt_heights: SkirtHeights::uniform(self.skirt_height(coord.z)),
            child_tile_mask: self.child_tile_mask,
        }))
    }

    fn global_bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(DVec3::ZERO, self.global_bounding_radius)
    }
}

/// Truncates a scaled value into the quantized range.
#[inline]
fn quantize_component(value: f64) -> u16 {
    value.clamp(0.0, f64::from(QUANTIZED_MAX)) as u16
}
