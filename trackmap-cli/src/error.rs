//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use trackmap::config::ConfigFileError;
use trackmap::provider::ProviderError;
use trackmap::track::TrackError;
use trackmap::RenderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(io::Error),
    /// Invalid flag value or flag combination
    Config(String),
    /// Config file could not be read or holds a bad value
    ConfigFile(ConfigFileError),
    /// Tile server setup failed
    Provider(ProviderError),
    /// Track file could not be loaded
    Track(TrackError),
    /// Rendering one track failed
    Render { path: PathBuf, error: RenderError },
    /// Failed to clear the tile cache
    CacheClear(io::Error),
    /// Failed to read cache statistics
    CacheStats(io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Render {
                error: RenderError::TileFetch { .. },
                ..
            } => {
                eprintln!();
                eprintln!("Background tiles could not be downloaded. Common issues:");
                eprintln!("  1. No network connection, or the tile server is down");
                eprintln!("  2. The server refuses bulk requests: try another --provider");
                eprintln!("  3. Slow server: raise --timeout");
                eprintln!("Use --no-background to draw the track on white instead.");
            }
            CliError::Render {
                error: RenderError::UnsupportedFormat(_),
                ..
            } => {
                eprintln!();
                eprintln!("The output file name must end in .png, .jpg or .jpeg");
            }
            CliError::Provider(_) => {
                eprintln!();
                eprintln!(
                    "Known providers: mapnik, humanitarian, opentopomap, carto-light, carto-dark"
                );
                eprintln!("Custom servers take a URL template such as:");
                eprintln!("  https://tiles.example.com/{{z}}/{{x}}/{{y}}.png");
            }
            CliError::ConfigFile(_) => {
                eprintln!();
                eprintln!("Fix the value in the config file or pass --config with another file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Provider(e) => write!(f, "Tile provider error: {}", e),
            CliError::Track(e) => write!(f, "{}", e),
            CliError::Render { path, error } => {
                write!(f, "Failed to render '{}': {}", path.display(), error)
            }
            CliError::CacheClear(e) => write!(f, "Failed to clear cache: {}", e),
            CliError::CacheStats(e) => write!(f, "Failed to read cache statistics: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::ConfigFile(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Track(e) => Some(e),
            CliError::Render { error, .. } => Some(error),
            CliError::CacheClear(e) | CliError::CacheStats(e) => Some(e),
            CliError::Config(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<TrackError> for CliError {
    fn from(e: TrackError) -> Self {
        CliError::Track(e)
    }
}
