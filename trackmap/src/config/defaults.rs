//! Default values for all configuration settings.

use std::path::PathBuf;

// =============================================================================
// Rendering
// =============================================================================

/// Edge length of one map tile in pixels.
pub const DEFAULT_TILE_SIZE_PX: u32 = 256;

/// Tile budget: the unpadded grid holds fewer tiles than this, and the output
/// is trimmed towards √budget tiles per side.
pub const DEFAULT_TILE_COUNT_BUDGET: u32 = 4;

/// Stroke width at output resolution.
pub const DEFAULT_LINE_WIDTH_PX: f32 = 3.0;

/// Supersampling factor used when antialiasing.
pub const DEFAULT_SUPERSAMPLE_FACTOR: u32 = 4;

/// Quality of JPEG output (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

// =============================================================================
// Tile fetching
// =============================================================================

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = crate::provider::DEFAULT_TIMEOUT_SECS;

/// Worker threads fetching tiles concurrently.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Upper bound for fetch workers. Public tile servers ban aggressive clients.
pub const MAX_CONCURRENT_FETCHES: usize = 16;

// =============================================================================
// Track
// =============================================================================

/// Distance percentile above which points count as outliers.
pub const DEFAULT_OUTLIER_PERCENTILE: f64 = 99.0;

// =============================================================================
// Paths
// =============================================================================

/// Default tile cache directory (`$XDG_CACHE_HOME/trackmap` on Linux).
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| config_directory().join("cache"))
        .join("trackmap")
}

/// Get the path to the config directory (~/.trackmap).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trackmap")
}

/// Get the path to the config file (~/.trackmap/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
