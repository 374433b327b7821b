//! Elevation raster tile source.
//!
//! # URL Pattern
//!
//! Tiles are fetched from a template such as
//! `https://cyberjapandata.gsi.go.jp/xyz/dem_png/{z}/{x}/{y}.png`, using the
//! standard XYZ scheme (x = column west to east, y = row north to south).

use tracing::trace;

use super::{AsyncHttpClient, ProviderError};
use crate::coord::TileCoord;

/// Fetches encoded elevation rasters for tile coordinates.
pub struct RasterSource<C: AsyncHttpClient> {
    http_client: C,
    url_template: String,
}

impl<C: AsyncHttpClient> RasterSource<C> {
    /// Creates a source over an HTTP client and a `{z}/{x}/{y}` URL template.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidTemplate` if a placeholder is missing.
    pub fn new(http_client: C, url_template: impl Into<String>) -> Result<Self, ProviderError> {
        let url_template = url_template.into();
        if let Some(missing) = ["{z}", "{x}", "{y}"]
            .into_iter()
            .find(|p| !url_template.contains(p))
        {
            return Err(ProviderError::InvalidTemplate(format!(
                "{} has no {} placeholder",
                url_template, missing
            )));
        }
        Ok(Self {
            http_client,
            url_template,
        })
    }

    pub fn http_client(&self) -> &C {
        &self.http_client
    }

    /// The URL template tiles are fetched from.
    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Builds the tile URL for the given coordinates.
    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }

    /// Downloads the encoded raster for a tile.
    pub async fn fetch(&self, coord: TileCoord) -> Result<Vec<u8>, ProviderError> {
        let url = self.tile_url(coord);
        trace!(tile = %coord, url = %url, "Fetching elevation raster");
        self.http_client.get(&url).await
    }
}
