//! Configuration for the terrain tile pipeline.
//!
//! Every tunable used by the pipeline lives in [`TerrainConfig`]. Defaults
//! reproduce the GSI elevation tile setup; hosts may override individual
//! values with the `with_*` builders or load the whole struct from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::MAX_ZOOM;

// ==================== Raster Source Defaults ====================

/// Default tile URL template (GSI `dem_png` elevation tiles).
pub const DEFAULT_URL_TEMPLATE: &str = "https://cyberjapandata.gsi.go.jp/xyz/dem_png/{z}/{x}/{y}.png";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default attribution shown by the host for the raster source.
pub const DEFAULT_CREDIT: &str = "地理院タイル";

/// Default raster tile side in samples.
pub const DEFAULT_TILE_SIZE: u32 = 256;

// ==================== Availability Defaults ====================

/// Highest zoom level tiles are offered for.
pub const DEFAULT_MAX_LEVEL: u8 = 14;

// ==================== Quantizer Defaults ====================

/// Tiles wider than this (radians, ≈1.15°) are delivered flat instead of meshed.
///
/// Empirical; calibrate against the rendering host.
pub const DEFAULT_SKIP_WIDTH_THRESHOLD: f64 = 0.02;

/// Side of the flat heightmap delivered for tiles above the skip threshold.
pub const DEFAULT_SKIP_HEIGHTMAP_SIDE: u32 = 64;

/// Radius of the bounding sphere used for tiles spanning 90° or more.
///
/// Empirical; approximates the maximum radius of Earth's terrain.
pub const DEFAULT_GLOBAL_BOUNDING_RADIUS: f64 = 6_379_792.481_506_292;

/// Skirt height as a multiple of the level's geometric error.
pub const DEFAULT_SKIRT_MULTIPLIER: f64 = 5.0;

/// Child tile mask marking all four children as available.
pub const DEFAULT_CHILD_TILE_MASK: u8 = 0b1111;

/// Heightmap width used to estimate the level-zero geometric error.
pub const DEFAULT_ERROR_REFERENCE_WIDTH: u32 = 65;

// ==================== Fallback Defaults ====================

/// Flat fallback side at level zero.
pub const DEFAULT_FALLBACK_BASE_SIDE: u32 = 32;

/// Samples removed from the fallback side per zoom level.
pub const DEFAULT_FALLBACK_STEP: u32 = 4;

/// Smallest fallback side.
pub const DEFAULT_FALLBACK_MIN_SIDE: u32 = 4;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds an unusable value.
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Terrain pipeline configuration.
///
/// Immutable once the pipeline is built; shared by all tile requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    // ==================== Raster Source ====================
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Raster tile side in samples. Must be a power of two.
    pub tile_size: u32,

    /// Attribution the host displays for the raster source.
    pub credit: String,

    // ==================== Availability ====================
    /// Highest zoom level tiles are offered for.
    pub max_level: u8,

    // ==================== Quantizer ====================
    /// Tile width (radians) above which tiles are delivered flat.
    pub skip_width_threshold: f64,

    /// Side of the flat heightmap for skipped tiles.
    pub skip_heightmap_side: u32,

    /// Bounding sphere radius for tiles spanning 90° or more.
    pub global_bounding_radius: f64,

    /// Skirt height as a multiple of the level's geometric error.
    pub skirt_multiplier: f64,

    /// Child availability bits reported with every mesh.
    pub child_tile_mask: u8,

    /// Heightmap width used for the level-zero error estimate.
    pub error_reference_width: u32,

    // ==================== Fallback ====================
    /// Flat fallback side at level zero.
    pub fallback_base_side: u32,

    /// Samples removed from the fallback side per level.
    pub fallback_step: u32,

    /// Smallest fallback side.
    pub fallback_min_side: u32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            tile_size: DEFAULT_TILE_SIZE,
            credit: DEFAULT_CREDIT.to_string(),
            max_level: DEFAULT_MAX_LEVEL,
            skip_width_threshold: DEFAULT_SKIP_WIDTH_THRESHOLD,
            skip_heightmap_side: DEFAULT_SKIP_HEIGHTMAP_SIDE,
            global_bounding_radius: DEFAULT_GLOBAL_BOUNDING_RADIUS,
            skirt_multiplier: DEFAULT_SKIRT_MULTIPLIER,
            child_tile_mask: DEFAULT_CHILD_TILE_MASK,
            error_reference_width: DEFAULT_ERROR_REFERENCE_WIDTH,
            fallback_base_side: DEFAULT_FALLBACK_BASE_SIDE,
            fallback_step: DEFAULT_FALLBACK_STEP,
            fallback_min_side: DEFAULT_FALLBACK_MIN_SIDE,
        }
    }
}

impl TerrainConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the URL template.
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the raster tile size.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the attribution text.
    pub fn with_credit(mut self, credit: impl Into<String>) -> Self {
        self.credit = credit.into();
        self
    }

    /// Set the maximum available level.
    pub fn with_max_level(mut self, max_level: u8) -> Self {
        self.max_level = max_level;
        self
    }

    /// Set the skip width threshold in radians.
    pub fn with_skip_width_threshold(mut self, radians: f64) -> Self {
        self.skip_width_threshold = radians;
        self
    }

    /// Flat fallback side for a failed request at `level`:
    /// `max(base - step·level, min)`.
    pub fn fallback_side(&self, level: u8) -> u32 {
        let shrink = u64::from(self.fallback_step) * u64::from(level);
        let side = u64::from(self.fallback_base_side).saturating_sub(shrink);
        side.max(u64::from(self.fallback_min_side)) as u32
    }

    /// Checks every field for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url_template.contains(placeholder) {
                return Err(ConfigError::invalid(
                    "url_template",
                    format!("missing {} placeholder", placeholder),
                ));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("request_timeout_secs", "must be > 0"));
        }
        if self.max_level > MAX_ZOOM {
            return Err(ConfigError::invalid(
                "max_level",
                format!("{} exceeds the deepest addressable level {}", self.max_level, MAX_ZOOM),
            ));
        }
        if self.tile_size < 2 || !self.tile_size.is_power_of_two() {
            return Err(ConfigError::invalid(
                "tile_size",
                format!("{} is not a power of two >= 2", self.tile_size),
            ));
        }
        if self.skip_width_threshold.is_nan() || self.skip_width_threshold <= 0.0 {
            return Err(ConfigError::invalid("skip_width_threshold", "must be > 0"));
        }
        if self.global_bounding_radius.is_nan() || self.global_bounding_radius <= 0.0 {
            return Err(ConfigError::invalid("global_bounding_radius", "must be > 0"));
        }
        if self.skirt_multiplier.is_nan() || self.skirt_multiplier < 0.0 {
            return Err(ConfigError::invalid("skirt_multiplier", "must be >= 0"));
        }
        if self.child_tile_mask > 0b1111 {
            return Err(ConfigError::invalid("child_tile_mask", "only 4 bits are defined"));
        }
        if self.error_reference_width == 0 {
            return Err(ConfigError::invalid("error_reference_width", "must be > 0"));
        }
        if self.skip_heightmap_side == 0 || self.fallback_min_side == 0 {
            return Err(ConfigError::invalid(
                "fallback_min_side",
                "flat heightmaps need at least one sample",
            ));
        }
        Ok(())
    }
}
