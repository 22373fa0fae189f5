//! Cache management CLI commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use trackmap::cache::{clear_disk_cache, disk_cache_stats};
use trackmap::config::{format_size, ConfigFile};

use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Delete every cached tile
    Clear {
        /// Cache directory (default from config)
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,
    },
    /// Show how many tiles are cached and their total size
    Stats {
        /// Cache directory (default from config)
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,
    },
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, config: &ConfigFile) -> Result<(), CliError> {
    match action {
        CacheAction::Clear { cache_dir } => {
            let dir = cache_dir.unwrap_or_else(|| config.cache.directory().to_path_buf());
            println!("{}", clear(&dir)?);
        }
        CacheAction::Stats { cache_dir } => {
            let dir = cache_dir.unwrap_or_else(|| config.cache.directory().to_path_buf());
            println!("{}", stats(&dir)?);
        }
    }
    Ok(())
}

fn clear(dir: &Path) -> Result<String, CliError> {
    let result = clear_disk_cache(dir).map_err(CliError::CacheClear)?;
    Ok(format!(
        "Cleared {}: deleted {} files, freed {}",
        dir.display(),
        result.files_deleted,
        format_size(result.bytes_freed)
    ))
}

fn stats(dir: &Path) -> Result<String, CliError> {
    let (files, bytes) = disk_cache_stats(dir).map_err(CliError::CacheStats)?;
    Ok(format!(
        "Disk cache: {}\n  Files: {}\n  Size:  {}",
        dir.display(),
        files,
        format_size(bytes)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn populate(root: &Path) {
        let tiles = root.join("mapnik").join("4");
        fs::create_dir_all(&tiles).unwrap();
        fs::write(tiles.join("8_5.png"), vec![0u8; 1024]).unwrap();
        fs::write(tiles.join("8_6.png"), vec![0u8; 512]).unwrap();
    }

    #[test]
    fn test_stats_report() {
        let dir = TempDir::new().unwrap();
        populate(dir.path());

        let report = stats(dir.path()).unwrap();
        assert!(report.contains("Files: 2"));
        assert!(report.contains("Size:  1.5 KB"));
    }

    #[test]
    fn test_stats_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let report = stats(&dir.path().join("none")).unwrap();
        assert!(report.contains("Files: 0"));
    }

    #[test]
    fn test_clear_removes_tiles() {
        let dir = TempDir::new().unwrap();
        populate(dir.path());

        let report = clear(dir.path()).unwrap();
        assert!(report.contains("deleted 2 files"));
        assert!(dir.path().exists());
        assert!(!dir.path().join("mapnik").exists());
    }
}
