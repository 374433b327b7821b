//! Pipeline error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::coord::CoordError;
use crate::elevation::DecodeError;
use crate::mesh::MeshError;
use crate::provider::ProviderError;

/// Failure while producing a single tile.
///
/// Never reaches the rendering host: the provider logs it and delivers a
/// flat fallback heightmap instead.
#[derive(Debug, Error)]
pub enum TileError {
    /// The requested coordinates are outside the tiling scheme.
    #[error("Invalid tile: {0}")]
    InvalidTile(#[from] CoordError),

    /// The raster could not be downloaded.
    #[error("Raster fetch failed: {0}")]
    Fetch(#[from] ProviderError),

    /// The raster could not be decoded into a height grid.
    #[error("Raster decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// Mesh generation or quantization failed.
    #[error("Mesh generation failed: {0}")]
    Mesh(#[from] MeshError),

    /// The blocking worker panicked or was cancelled.
    #[error("Tile worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Failure while building a provider.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Mesh service setup failed: {0}")]
    Mesh(#[from] MeshError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_error_from_provider_error() {
        let err: TileError = ProviderError::HttpError("HTTP 503".to_string()).into();
        assert!(matches!(err, TileError::Fetch(_)));
        assert_eq!(err.to_string(), "Raster fetch failed: HTTP error: HTTP 503");
    }

    #[test]
    fn test_tile_error_from_mesh_error() {
        let err: TileError = MeshError::Malformed("mesh has no vertices".to_string()).into();
        assert!(err.to_string().contains("mesh has no vertices"));
    }

    #[test]
    fn test_setup_error_is_transparent_for_config() {
        let config_err = ConfigError::Invalid {
            field: "tile_size",
            reason: "not a power of two".to_string(),
        };
        let expected = config_err.to_string();
        let err: SetupError = config_err.into();
        assert_eq!(err.to_string(), expected);
    }
}
