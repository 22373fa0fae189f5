//! Configuration file handling for ~/.trackmap/config.ini.
//!
//! ```ini
//! [render]
//! tile_budget = 9
//! color = e00000
//! line_width = 2.5
//! antialias = true
//! notice = small
//! background = true
//! zoom = 12
//!
//! [tiles]
//! provider = opentopomap
//! timeout = 20
//! jobs = 4
//!
//! [cache]
//! directory = ~/.cache/trackmap
//!
//! [track]
//! filter_outliers = true
//! percentile = 99.0
//! ```
//!
//! Every key is optional; missing keys keep their built-in defaults.

use std::path::Path;

use ini::Ini;
use thiserror::Error;

use super::defaults::{config_file_path, DEFAULT_OUTLIER_PERCENTILE};
use super::fetch::{CacheConfig, FetchConfig};
use super::render::RenderOptions;
use crate::provider::ProviderConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Track preprocessing settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSettings {
    /// Drop points far away from the rest of the track
    pub filter_outliers: bool,
    /// Distance percentile kept by the outlier filter
    pub outlier_percentile: f64,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            filter_outliers: false,
            outlier_percentile: DEFAULT_OUTLIER_PERCENTILE,
        }
    }
}

/// User configuration, defaults overlaid with the INI file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub render: RenderOptions,
    pub provider: ProviderConfig,
    pub fetch: FetchConfig,
    pub cache: CacheConfig,
    pub track: TrackSettings,
}

impl ConfigFile {
    /// Load configuration from the default path (~/.trackmap/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }
}
