//! On-disk tile cache
//!
//! Tiles are cached as the raw bytes the server sent, one file per tile under
//! a per-source namespace. The render path only ever adds files; cleanup is
//! left to [`clear_disk_cache`].

mod disk;
mod path;
mod tile;

pub use disk::{clear_disk_cache, disk_cache_stats, ClearResult};
pub use path::cache_path;
pub use tile::{TileCache, TileCacheError};

pub(crate) use tile::write_atomic;
