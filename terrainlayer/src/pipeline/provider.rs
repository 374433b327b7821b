//! Terrain provider: the tile request state machine.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::{SetupError, TileError, TileStage};
use crate::config::TerrainConfig;
use crate::coord::{TileCoord, WebMercatorTilingScheme};
use crate::elevation::{self, RasterTile};
use crate::mesh::{MeshService, RtinMeshService, SimplifiedMesh};
use crate::provider::{AsyncHttpClient, AsyncReqwestClient, RasterSource};
use crate::terrain::{FlatHeightmap, GeometricErrorModel, MeshQuantizer, TilePayload};

/// Answers tile requests from a rendering host.
///
/// Built once and shared; every field is immutable after construction, so
/// concurrent requests only contend on the HTTP client and the blocking
/// thread pool.
pub struct TerrainProvider<C: AsyncHttpClient, M: MeshService + 'static> {
    source: RasterSource<C>,
    mesh_service: Arc<M>,
    quantizer: Arc<MeshQuantizer>,
    error_model: GeometricErrorModel,
    tiling_scheme: WebMercatorTilingScheme,
    config: TerrainConfig,
}

impl TerrainProvider<AsyncReqwestClient, RtinMeshService> {
    /// Builds a provider with the reqwest client and the RTIN simplifier.
    ///
    /// # Errors
    ///
    /// Returns `SetupError` if the configuration is invalid or the HTTP
    /// client cannot be created.
    pub fn from_config(config: &TerrainConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let client = AsyncReqwestClient::with_timeout(config.request_timeout_secs)?;
        let mesh_service = RtinMeshService::new(config.tile_size as usize + 1)?;
        Self::new(
            config,
            WebMercatorTilingScheme::default(),
            client,
            mesh_service,
        )
    }
}

impl<C: AsyncHttpClient, M: MeshService + 'static> TerrainProvider<C, M> {
    /// Builds a provider from its collaborators.
    ///
    /// # Errors
    ///
    /// Returns `SetupError` if the configuration is invalid.
    pub fn new(
        config: &TerrainConfig,
        tiling_scheme: WebMercatorTilingScheme,
        http_client: C,
        mesh_service: M,
    ) -> Result<Self, SetupError> {
        config.validate()?;

        let source = RasterSource::new(http_client, config.url_template.clone())?;
        let error_model = GeometricErrorModel::new(
            tiling_scheme.ellipsoid(),
            config.error_reference_width,
            WebMercatorTilingScheme::ROOT_TILES_X,
        );
        let quantizer = MeshQuantizer::new(config, tiling_scheme.clone(), error_model);

        debug!(
            url_template = source.url_template(),
            tile_size = config.tile_size,
            max_level = config.max_level,
            level_zero_error = error_model.level_zero_error(),
            "Terrain provider ready"
        );

        Ok(Self {
            source,
            mesh_service: Arc::new(mesh_service),
            quantizer: Arc::new(quantizer),
            error_model,
            tiling_scheme,
            config: config.clone(),
        })
    }

    /// Produces the payload for a tile.
    ///
    /// Always returns a payload: any failure is logged and replaced by a
    /// flat heightmap whose side shrinks with the zoom level.
    pub async fn request_tile(&self, coord: TileCoord) -> TilePayload {
        let result = match self.fetch(coord).await {
            Ok(bytes) => self.build(coord, bytes).await,
            Err(e) => Err(e),
        };
        self.finish(coord, result)
    }

    /// Like [`request_tile`](Self::request_tile), but gives up when
    /// `cancellation` fires before the CPU work starts.
    ///
    /// Returns `None` if the request was cancelled.
    pub async fn request_tile_cancellable(
        &self,
        coord: TileCoord,
        cancellation: &CancellationToken,
    ) -> Option<TilePayload> {
        if cancellation.is_cancelled() {
            debug!(tile = %coord, "Request cancelled before fetch");
            return None;
        }

        let fetched = tokio::select! {
            biased;

            _ = cancellation.cancelled() => {
                debug!(tile = %coord, "Request cancelled during fetch");
                return None;
            }

            result = self.fetch(coord) => result,
        };

        if cancellation.is_cancelled() {
            debug!(tile = %coord, "Request cancelled after fetch");
            return None;
        }

        let result = match fetched {
            Ok(bytes) => self.build(coord, bytes).await,
            Err(e) => Err(e),
        };
        Some(self.finish(coord, result))
    }

    /// Whether the host may request this tile.
    pub fn is_tile_available(&self, coord: TileCoord) -> bool {
        coord.z <= self.config.max_level && self.tiling_scheme.validate(coord).is_ok()
    }

    /// Highest level tiles are offered for.
    pub fn max_level(&self) -> u8 {
        self.config.max_level
    }

    /// Geometric error tolerated at `level`, in meters.
    pub fn level_maximum_geometric_error(&self, level: u8) -> f64 {
        self.error_model.max_error(level)
    }

    /// Attribution the host must display for the served tiles.
    pub fn credit(&self) -> &str {
        &self.config.credit
    }

    /// Payloads never carry a water mask.
    pub fn has_water_mask(&self) -> bool {
        false
    }

    /// Payloads never carry per-vertex normals.
    pub fn has_vertex_normals(&self) -> bool {
        false
    }

    pub fn tiling_scheme(&self) -> &WebMercatorTilingScheme {
        &self.tiling_scheme
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    async fn fetch(&self, coord: TileCoord) -> Result<Vec<u8>, TileError> {
        trace!(tile = %coord, stage = %TileStage::Requested, "Tile requested");
        self.tiling_scheme.validate(coord)?;

        let bytes = self.source.fetch(coord).await?;
        trace!(
            tile = %coord,
            stage = %TileStage::RasterFetched,
            bytes = bytes.len(),
            "Raster fetched"
        );
        Ok(bytes)
    }

    /// Runs decode, mesh and quantize on the blocking pool.
    async fn build(&self, coord: TileCoord, bytes: Vec<u8>) -> Result<TilePayload, TileError> {
        let mesh_service = Arc::clone(&self.mesh_service);
        let quantizer = Arc::clone(&self.quantizer);
        let max_error = self.error_model.max_error(coord.z);

        tokio::task::spawn_blocking(move || {
            build_payload(coord, &bytes, mesh_service.as_ref(), &quantizer, max_error)
        })
        .await?
    }

    fn finish(&self, coord: TileCoord, result: Result<TilePayload, TileError>) -> TilePayload {
        match result {
            Ok(payload) => {
                debug!(
                    tile = %coord,
                    stage = %TileStage::Delivered,
                    kind = payload.kind(),
                    "Tile delivered"
                );
                payload
            }
            Err(e) => {
                warn!(tile = %coord, stage = %TileStage::Failed, error = %e, "Tile request failed");
                let side = self.config.fallback_side(coord.z);
                debug!(
                    tile = %coord,
                    stage = %TileStage::FallbackDelivered,
                    side,
                    "Delivering flat fallback"
                );
                TilePayload::Flat(FlatHeightmap::new(side))
            }
        }
    }
}

fn build_payload<M: MeshService + ?Sized>(
    coord: TileCoord,
    bytes: &[u8],
    mesh_service: &M,
    quantizer: &MeshQuantizer,
    max_error: f64,
) -> Result<TilePayload, TileError> {
    let raster = RasterTile::from_encoded(bytes)?;
    let grid = elevation::decode(&raster);
    trace!(tile = %coord, stage = %TileStage::Decoded, side = grid.side(), "Raster decoded");

    // Coarse tiles are delivered flat, so there is nothing to simplify
    let mesh = if quantizer.should_skip(coord) {
        SimplifiedMesh::default()
    } else {
        mesh_service.generate_mesh(&grid, max_error)?
    };
    trace!(
        tile = %coord,
        stage = %TileStage::Meshed,
        max_error,
        triangles = mesh.triangle_count(),
        "Mesh generated"
    );

    let payload = quantizer.quantize(coord, &grid, &mesh)?;
    trace!(tile = %coord, stage = %TileStage::Quantized, kind = payload.kind(), "Mesh quantized");
    Ok(payload)
}
