//! Render pipeline errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::cache::TileCacheError;
use crate::compositor::CompositorError;
use crate::coord::{CoordError, TileCoord};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Terminal error of a render. Nothing is retried or skipped; the first
/// failure ends the render and no output file is written.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Track is empty or has a point Web Mercator cannot project
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    /// A background tile could not be used
    #[error("Failed to fetch tile {tile}: {source}")]
    TileFetch {
        tile: TileCoord,
        #[source]
        source: BoxError,
    },

    /// Output extension is not .png, .jpg or .jpeg
    #[error("Unsupported output format '{0}' (expected .png, .jpg or .jpeg)")]
    UnsupportedFormat(String),

    /// Tile cache directory or file could not be written
    #[error("Failed to write cache file {}: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Image could not be encoded
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// Watermark image could not be loaded
    #[error("Failed to load watermark {}: {source}", path.display())]
    Watermark {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Canvas or overlay dimensions are out of range
    #[error("Canvas of {width}x{height} px cannot be allocated")]
    CanvasTooLarge { width: u64, height: u64 },

    /// Fetch workers could not be started
    #[error("{0}")]
    Workers(String),
}

impl From<CoordError> for RenderError {
    fn from(err: CoordError) -> Self {
        RenderError::InvalidTrack(err.to_string())
    }
}

impl From<TileCacheError> for RenderError {
    fn from(err: TileCacheError) -> Self {
        match err {
            TileCacheError::Fetch { tile, source } => RenderError::TileFetch {
                tile,
                source: Box::new(source),
            },
            TileCacheError::InvalidImage { tile, source } => RenderError::TileFetch {
                tile,
                source: Box::new(source),
            },
            TileCacheError::Write { path, source } => RenderError::CacheWrite { path, source },
        }
    }
}

impl From<CompositorError> for RenderError {
    fn from(err: CompositorError) -> Self {
        match err {
            CompositorError::Tile(e) => e.into(),
            CompositorError::TileSize { tile, .. } => RenderError::TileFetch {
                tile,
                source: Box::new(err),
            },
            CompositorError::CanvasTooLarge { columns, rows } => RenderError::CanvasTooLarge {
                width: columns as u64,
                height: rows as u64,
            },
            CompositorError::ThreadPool(_) => RenderError::Workers(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;

    #[test]
    fn test_fetch_error_maps_to_tile_fetch() {
        let tile = TileCoord::new(3, 1, 2);
        let err: RenderError = TileCacheError::Fetch {
            tile,
            source: ProviderError::HttpError("HTTP 404".to_string()),
        }
        .into();

        match err {
            RenderError::TileFetch { tile: t, source } => {
                assert_eq!(t, tile);
                assert!(source.to_string().contains("404"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_write_error_maps_to_cache_write() {
        let err: RenderError = CompositorError::Tile(TileCacheError::Write {
            path: PathBuf::from("/tmp/x"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        })
        .into();
        assert!(matches!(err, RenderError::CacheWrite { .. }));
    }

    #[test]
    fn test_tile_size_maps_to_tile_fetch() {
        let tile = TileCoord::new(1, 0, 0);
        let err: RenderError = CompositorError::TileSize {
            tile,
            expected: 256,
            actual_width: 512,
            actual_height: 512,
        }
        .into();
        assert!(err.to_string().contains("512x512"));
        assert!(matches!(err, RenderError::TileFetch { .. }));
    }

    #[test]
    fn test_coord_error_is_invalid_track() {
        let err: RenderError = CoordError::InvalidLatitude(89.0).into();
        assert!(matches!(err, RenderError::InvalidTrack(_)));
    }
}
