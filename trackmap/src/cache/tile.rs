//! Read-through disk cache for map tiles.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use image::{ImageReader, RgbaImage};
use thiserror::Error;
use tracing::{debug, warn};

use crate::coord::TileCoord;
use crate::provider::{HttpClient, ProviderError, TileSource};

use super::path::cache_path;

/// Distinguishes temp files of concurrent writers within one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errors from [`TileCache::get_tile`].
#[derive(Debug, Error)]
pub enum TileCacheError {
    /// Download failed (network, timeout, non-2xx, unsupported zoom)
    #[error("Failed to fetch tile {tile}: {source}")]
    Fetch {
        tile: TileCoord,
        #[source]
        source: ProviderError,
    },

    /// Downloaded payload is not a decodable image
    #[error("Tile {tile} is not a valid image: {source}")]
    InvalidImage {
        tile: TileCoord,
        #[source]
        source: image::ImageError,
    },

    /// Cache directory or file could not be written
    #[error("Failed to write cache file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TileCacheError {
    /// The tile the error refers to, when there is one.
    pub fn tile(&self) -> Option<TileCoord> {
        match self {
            TileCacheError::Fetch { tile, .. } | TileCacheError::InvalidImage { tile, .. } => {
                Some(*tile)
            }
            TileCacheError::Write { .. } => None,
        }
    }
}

/// Disk cache of decoded tiles, filled on demand through an [`HttpClient`].
///
/// Entries are never evicted here. Writers go through a unique temp file and
/// an atomic rename, so concurrent requests for the same tile are safe and a
/// reader never sees a partial file.
pub struct TileCache<C: HttpClient> {
    root: PathBuf,
    client: C,
}

impl<C: HttpClient> TileCache<C> {
    pub fn new(root: impl Into<PathBuf>, client: C) -> Self {
        Self {
            root: root.into(),
            client,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the tile image, downloading and persisting it on a miss.
    pub fn get_tile<S>(&self, tile: &TileCoord, source: &S) -> Result<RgbaImage, TileCacheError>
    where
        S: TileSource + ?Sized,
    {
        let path = cache_path(&self.root, source.id(), tile, source.extension());

        if path.is_file() {
            match decode_file(&path) {
                Ok(image) => {
                    debug!(tile = %tile, path = %path.display(), "Tile cache hit");
                    return Ok(image);
                }
                Err(e) => {
                    warn!(
                        tile = %tile,
                        path = %path.display(),
                        error = %e,
                        "Cached tile is unreadable, refetching"
                    );
                }
            }
        }

        if !source.supports_zoom(tile.zoom) {
            return Err(TileCacheError::Fetch {
                tile: *tile,
                source: ProviderError::UnsupportedZoom(tile.zoom),
            });
        }

        let url = source.tile_url(tile);
        debug!(tile = %tile, url = %url, "Tile cache miss, fetching");

        let bytes = self
            .client
            .get(&url)
            .map_err(|source| TileCacheError::Fetch {
                tile: *tile,
                source,
            })?;

        let image = image::load_from_memory(&bytes)
            .map_err(|source| TileCacheError::InvalidImage {
                tile: *tile,
                source,
            })?
            .to_rgba8();

        write_atomic(&path, &bytes).map_err(|source| TileCacheError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(tile = %tile, bytes = bytes.len(), "Tile stored in cache");

        Ok(image)
    }
}

fn decode_file(path: &Path) -> Result<RgbaImage, image::ImageError> {
    Ok(ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?
        .to_rgba8())
}

/// Writes `bytes` to `path` through a temp file in the same directory,
/// creating parent directories as needed.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    let result = fs::File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&temp_path, path));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.{}.tmp", std::process::id(), n));
    path.with_file_name(name)
}
