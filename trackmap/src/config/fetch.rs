//! Tile fetching and cache location settings.

use std::path::{Path, PathBuf};

use super::defaults::{
    default_cache_dir, DEFAULT_MAX_CONCURRENT_FETCHES, DEFAULT_TIMEOUT_SECS,
    MAX_CONCURRENT_FETCHES,
};

/// Configuration for downloading tiles.
///
/// # Example
///
/// ```
/// use trackmap::config::FetchConfig;
///
/// let config = FetchConfig::new()
///     .with_timeout_secs(10)
///     .with_max_concurrent_fetches(2);
/// assert_eq!(config.timeout_secs(), 10);
/// assert_eq!(config.max_concurrent_fetches(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    /// Per-request timeout (in seconds)
    timeout_secs: u64,
    /// Worker threads used to fetch one grid
    max_concurrent_fetches: usize,
}

impl FetchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    /// Clamped to `1..=MAX_CONCURRENT_FETCHES`.
    pub fn with_max_concurrent_fetches(mut self, workers: usize) -> Self {
        self.max_concurrent_fetches = workers.clamp(1, MAX_CONCURRENT_FETCHES);
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

/// Where cached tiles live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    directory: PathBuf,
}

impl CacheConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(default_cache_dir())
    }
}
