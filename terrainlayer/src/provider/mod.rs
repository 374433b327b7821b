//! Elevation raster provider abstraction
//!
//! This module provides the HTTP client trait and the raster source that
//! downloads encoded elevation tiles for the pipeline.
//!
//! ```ignore
//! use terrainlayer::provider::{AsyncReqwestClient, RasterSource};
//!
//! let client = AsyncReqwestClient::with_timeout(30)?;
//! let source = RasterSource::new(client, "https://example.com/dem/{z}/{x}/{y}.png")?;
//! let png = source.fetch(TileCoord::new(14552, 6451, 14)).await?;
//! ```

mod http;
mod raster;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use raster::RasterSource;
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
