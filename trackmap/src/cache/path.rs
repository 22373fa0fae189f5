//! On-disk layout of cached tiles.
//!
//! ```text
//! {root}/{source_id}/{zoom}/{x}_{y}.{ext}
//! ```
//!
//! Each tile source gets its own namespace so switching servers never serves
//! stale imagery from another style.

use std::path::{Path, PathBuf};

use crate::coord::TileCoord;

/// Path of a cached tile.
pub fn cache_path(root: &Path, source_id: &str, tile: &TileCoord, extension: &str) -> PathBuf {
    root.join(source_id)
        .join(tile.zoom.to_string())
        .join(format!("{}_{}.{}", tile.x, tile.y, extension))
}
