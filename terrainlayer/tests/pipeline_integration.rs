//! Integration tests for the terrain tile pipeline.
//!
//! These tests drive the full request flow with the RTIN simplifier and
//! real PNG rasters served from an in-memory tile server:
//! - raster fetch → decode → mesh → quantize
//! - flat fallbacks for failed fetches and coarse tiles
//! - shared borders between neighbouring tiles
//! - concurrent requests against one provider
//!
//! Run with: `cargo test --test pipeline_integration`

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, Rgb, RgbImage};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use terrainlayer::config::TerrainConfig;
use terrainlayer::coord::{TileCoord, WebMercatorTilingScheme};
use terrainlayer::mesh::RtinMeshService;
use terrainlayer::pipeline::TerrainProvider;
use terrainlayer::provider::{AsyncHttpClient, ProviderError};
use terrainlayer::terrain::{FlatHeightmap, QuantizedMeshData, TilePayload, QUANTIZED_MAX};

// ============================================================================
// Helper Functions
// ============================================================================

const URL_TEMPLATE: &str = "http://tiles.test/{z}/{x}/{y}.png";

/// Neighbouring z14 tiles over Tokyo.
const WEST_TILE: TileCoord = TileCoord {
    x: 14552,
    y: 6451,
    z: 14,
};
const EAST_TILE: TileCoord = TileCoord {
    x: 14553,
    y: 6451,
    z: 14,
};

/// In-memory tile server; unknown URLs answer 404.
#[derive(Default)]
struct TileServer {
    tiles: HashMap<String, Vec<u8>>,
}

impl TileServer {
    fn with_tile(mut self, coord: TileCoord, png: Vec<u8>) -> Self {
        let url = URL_TEMPLATE
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());
        self.tiles.insert(url, png);
        self
    }
}

impl AsyncHttpClient for TileServer {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.tiles
            .get(url)
            .cloned()
            .ok_or_else(|| ProviderError::HttpError(format!("HTTP 404 Not Found from {}", url)))
    }
}

/// Encode a 256×256 elevation raster from a per-sample function (meters).
fn elevation_png(f: impl Fn(u32, u32) -> f64) -> Vec<u8> {
    let image = RgbImage::from_fn(256, 256, |x, y| {
        let centimeters = (f(x, y) * 100.0).round() as u32;
        Rgb([
            (centimeters >> 16) as u8,
            (centimeters >> 8) as u8,
            centimeters as u8,
        ])
    });
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

fn provider(server: TileServer) -> TerrainProvider<TileServer, RtinMeshService> {
    let config = TerrainConfig::default().with_url_template(URL_TEMPLATE);
    TerrainProvider::new(
        &config,
        WebMercatorTilingScheme::default(),
        server,
        RtinMeshService::new(257).unwrap(),
    )
    .unwrap()
}

fn expect_mesh(payload: TilePayload) -> QuantizedMeshData {
    match payload {
        TilePayload::Mesh(mesh) => mesh,
        TilePayload::Flat(flat) => panic!("Expected a mesh, got flat heightmap {}", flat.side()),
    }
}

fn hills(x: u32, y: u32) -> f64 {
    let (x, y) = (f64::from(x), f64::from(y));
    250.0 + 120.0 * (x / 23.0).sin() * (y / 31.0).cos() + 0.4 * x
}

// ============================================================================
// Integration Tests
// ============================================================================

/// A raster that is 100 m everywhere becomes a flat two-triangle mesh.
#[tokio::test]
async fn test_flat_raster_end_to_end() {
    let provider = provider(TileServer::default().with_tile(WEST_TILE, elevation_png(|_, _| 100.0)));

    let mesh = expect_mesh(provider.request_tile(WEST_TILE).await);

    assert_eq!(mesh.minimum_height, 100.0);
    assert_eq!(mesh.maximum_height, 100.0);
    assert!(mesh.quantized_vertices.height.iter().all(|&h| h == 0));
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.child_tile_mask, 0b1111);
    assert!(mesh.oriented_bounding_box.is_some());
}

/// Rough terrain is simplified but keeps every invariant of the format.
#[tokio::test]
async fn test_rough_raster_end_to_end() {
    let provider = provider(TileServer::default().with_tile(WEST_TILE, elevation_png(hills)));

    let mesh = expect_mesh(provider.request_tile(WEST_TILE).await);

    assert!(mesh.triangle_count() > 2, "Hills should need refinement");
    assert!(mesh.maximum_height - mesh.minimum_height > 100.0);
    let vertices = &mesh.quantized_vertices;
    for component in [&vertices.u, &vertices.v, &vertices.height] {
        assert!(component.iter().all(|&c| c <= QUANTIZED_MAX));
    }
    assert!(mesh
        .indices
        .iter()
        .all(|&i| (i as usize) < mesh.vertex_count()));

    let expected_skirt = provider.level_maximum_geometric_error(WEST_TILE.z) * 5.0;
    assert_eq!(mesh.skirt_heights.west, expected_skirt);
    assert_eq!(mesh.skirt_heights.north, expected_skirt);
}

/// Missing rasters fall back to flat tiles sized by level.
#[tokio::test]
async fn test_missing_raster_falls_back() {
    let provider = provider(TileServer::default());

    let root = provider.request_tile(TileCoord::new(0, 0, 0)).await;
    assert_eq!(root.as_flat().map(FlatHeightmap::side), Some(32));

    let z10 = provider.request_tile(TileCoord::new(909, 403, 10)).await;
    assert_eq!(z10.as_flat().map(FlatHeightmap::side), Some(4));

    let z14 = provider.request_tile(WEST_TILE).await;
    assert_eq!(z14.as_flat().map(FlatHeightmap::side), Some(4));
}

/// Tiles wider than the skip threshold are flat even when the raster exists.
#[tokio::test]
async fn test_coarse_tile_is_flat() {
    let coarse = TileCoord::new(113, 50, 7);
    let provider = provider(TileServer::default().with_tile(coarse, elevation_png(hills)));

    let payload = provider.request_tile(coarse).await;
    assert_eq!(payload.as_flat().map(FlatHeightmap::side), Some(64));
}

/// Neighbouring tiles meet on a common border in quantized space.
#[tokio::test]
async fn test_adjacent_tiles_share_border() {
    let server = TileServer::default()
        .with_tile(WEST_TILE, elevation_png(hills))
        .with_tile(EAST_TILE, elevation_png(|x, y| hills(x + 256, y)));
    let provider = provider(server);

    let west = expect_mesh(provider.request_tile(WEST_TILE).await);
    let east = expect_mesh(provider.request_tile(EAST_TILE).await);

    let west_seam: Vec<u16> = west
        .edges
        .east
        .iter()
        .map(|&i| west.quantized_vertices.u[i as usize])
        .collect();
    let east_seam: Vec<u16> = east
        .edges
        .west
        .iter()
        .map(|&i| east.quantized_vertices.u[i as usize])
        .collect();

    assert!(west_seam.iter().all(|&u| u == QUANTIZED_MAX));
    assert!(east_seam.iter().all(|&u| u == 0));

    // Both seams reach the shared corners
    for (tile, seam) in [(&west, &west.edges.east), (&east, &east.edges.west)] {
        let v: Vec<u16> = seam
            .iter()
            .map(|&i| tile.quantized_vertices.v[i as usize])
            .collect();
        assert!(v.contains(&0));
        assert!(v.contains(&QUANTIZED_MAX));
    }
}

/// One provider serves many requests concurrently.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests() {
    let mut server = TileServer::default();
    for dx in 0..4 {
        let coord = TileCoord::new(WEST_TILE.x + dx, WEST_TILE.y, 14);
        server = server.with_tile(coord, elevation_png(move |x, y| hills(x + 256 * dx, y)));
    }
    let provider = Arc::new(provider(server));

    let mut requests = JoinSet::new();
    for dx in 0..6 {
        let provider = Arc::clone(&provider);
        let coord = TileCoord::new(WEST_TILE.x + dx, WEST_TILE.y, 14);
        requests.spawn(async move { (dx, provider.request_tile(coord).await) });
    }

    let mut meshes = 0;
    let mut fallbacks = 0;
    while let Some(result) = requests.join_next().await {
        let (dx, payload) = result.unwrap();
        if dx < 4 {
            assert!(payload.is_mesh(), "Tile {} should have a raster", dx);
            meshes += 1;
        } else {
            assert_eq!(payload.as_flat().map(FlatHeightmap::side), Some(4));
            fallbacks += 1;
        }
    }
    assert_eq!((meshes, fallbacks), (4, 2));
}

/// A cancelled token stops the request before any work happens.
#[tokio::test]
async fn test_cancelled_request_returns_nothing() {
    let provider = provider(TileServer::default().with_tile(WEST_TILE, elevation_png(hills)));
    let cancellation = CancellationToken::new();
    cancellation.cancel();

    assert!(provider
        .request_tile_cancellable(WEST_TILE, &cancellation)
        .await
        .is_none());
}

/// The host sees the configured availability, error model and capabilities.
#[test]
fn test_host_queries() {
    let provider = provider(TileServer::default());

    assert_eq!(provider.max_level(), 14);
    assert!(provider.is_tile_available(WEST_TILE));
    assert!(!provider.is_tile_available(TileCoord::new(0, 0, 15)));

    assert_eq!(provider.credit(), "地理院タイル");
    assert!(!provider.has_water_mask());
    assert!(!provider.has_vertex_normals());

    let errors: Vec<f64> = (0..=14)
        .map(|z| provider.level_maximum_geometric_error(z))
        .collect();
    assert!(errors.windows(2).all(|w| w[1] < w[0]));
}
