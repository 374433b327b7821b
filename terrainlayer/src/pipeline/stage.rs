//! Tile request lifecycle.

use std::fmt;

/// Stage a tile request has reached.
///
/// ```text
/// Requested → RasterFetched → Decoded → Meshed → Quantized → Delivered
///     └────────────┴─────────────┴─────────┴──► Failed → FallbackDelivered
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileStage {
    Requested,
    RasterFetched,
    Decoded,
    Meshed,
    Quantized,
    Delivered,
    Failed,
    FallbackDelivered,
}

impl fmt::Display for TileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileStage::Requested => "requested",
            TileStage::RasterFetched => "raster_fetched",
            TileStage::Decoded => "decoded",
            TileStage::Meshed => "meshed",
            TileStage::Quantized => "quantized",
            TileStage::Delivered => "delivered",
            TileStage::Failed => "failed",
            TileStage::FallbackDelivered => "fallback_delivered",
        };
        write!(f, "{}", name)
    }
}
