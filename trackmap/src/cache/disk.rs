//! Maintenance helpers for the tile cache directory.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

/// Outcome of [`clear_disk_cache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearResult {
    pub files_deleted: u64,
    pub bytes_freed: u64,
}

/// Counts files and bytes below the cache root.
///
/// A missing root is an empty cache.
pub fn disk_cache_stats(root: &Path) -> io::Result<(u64, u64)> {
    if !root.exists() {
        return Ok((0, 0));
    }

    let mut files = 0;
    let mut bytes = 0;
    walk(root, &mut |_, len| {
        files += 1;
        bytes += len;
        Ok(())
    })?;
    Ok((files, bytes))
}

/// Deletes every cached tile and the directories that held them.
///
/// The root itself is kept.
pub fn clear_disk_cache(root: &Path) -> io::Result<ClearResult> {
    let mut result = ClearResult::default();
    if !root.exists() {
        return Ok(result);
    }

    walk(root, &mut |path, len| {
        fs::remove_file(path)?;
        result.files_deleted += 1;
        result.bytes_freed += len;
        Ok(())
    })?;

    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
            debug!(dir = %path.display(), "Removed cache directory");
        }
    }

    info!(
        files = result.files_deleted,
        bytes = result.bytes_freed,
        "Disk cache cleared"
    );
    Ok(result)
}

fn walk(dir: &Path, visit: &mut dyn FnMut(&Path, u64) -> io::Result<()>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            walk(&path, visit)?;
        } else if file_type.is_file() {
            let len = entry.metadata()?.len();
            visit(&path, len)?;
        }
    }
    Ok(())
}
