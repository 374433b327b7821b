//! Tile pipeline
//!
//! [`TerrainProvider`] drives each tile request through fetch, decode, mesh
//! and quantize, and converts any failure into a flat fallback heightmap.
//! The fetch is the only await point; CPU work runs on the blocking pool.
//!
//! ```text
//! Requested ─► RasterFetched ─► Decoded ─► Meshed ─► Quantized ─► Delivered
//!     │              │             │          │
//!     └──────────────┴─────────────┴──────────┴─► Failed ─► FallbackDelivered
//! ```

mod error;
mod provider;
mod stage;

pub use error::{SetupError, TileError};
pub use provider::TerrainProvider;
pub use stage::TileStage;
