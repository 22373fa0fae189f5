//! Provider types and traits

use std::fmt;

use crate::coord::TileCoord;

/// Errors that can occur while talking to a tile server.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed (connection, timeout, non-2xx status)
    HttpError(String),
    /// Zoom level not served by this source
    UnsupportedZoom(u8),
    /// URL template is malformed
    InvalidTemplate(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::UnsupportedZoom(zoom) => {
                write!(f, "Zoom level {} not supported by tile source", zoom)
            }
            ProviderError::InvalidTemplate(msg) => write!(f, "Invalid URL template: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// A slippy-map tile server.
///
/// Implementors only map tile coordinates to URLs; downloading goes through an
/// [`HttpClient`](super::HttpClient) owned by the tile cache.
pub trait TileSource: Send + Sync {
    /// URL of the raster tile at `tile`.
    fn tile_url(&self, tile: &TileCoord) -> String;

    /// Human readable name for logging.
    fn name(&self) -> &str;

    /// Stable identifier, used as the cache namespace.
    ///
    /// Must be a valid single path component.
    fn id(&self) -> &str;

    /// File extension of cached tiles.
    fn extension(&self) -> &str {
        "png"
    }

    /// Returns the minimum supported zoom level.
    fn min_zoom(&self) -> u8 {
        0
    }

    /// Returns the maximum supported zoom level.
    fn max_zoom(&self) -> u8;

    /// Checks if this source serves the given zoom level.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }
}

impl<T: TileSource + ?Sized> TileSource for &T {
    fn tile_url(&self, tile: &TileCoord) -> String {
        (**self).tile_url(tile)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn id(&self) -> &str {
        (**self).id()
    }

    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn min_zoom(&self) -> u8 {
        (**self).min_zoom()
    }

    fn max_zoom(&self) -> u8 {
        (**self).max_zoom()
    }
}

impl<T: TileSource + ?Sized> TileSource for Box<T> {
    fn tile_url(&self, tile: &TileCoord) -> String {
        (**self).tile_url(tile)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn id(&self) -> &str {
        (**self).id()
    }

    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn min_zoom(&self) -> u8 {
        (**self).min_zoom()
    }

    fn max_zoom(&self) -> u8 {
        (**self).max_zoom()
    }
}
