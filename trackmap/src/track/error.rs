//! Track loading errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading a track file.
#[derive(Debug, Error)]
pub enum TrackError {
    /// File could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Extension is not .gpx, .kml or .kmz
    #[error("Unsupported track format '{0}' (expected .gpx, .kml or .kmz)")]
    UnsupportedFormat(String),

    /// Document is not well-formed XML
    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// GPX document could not be read
    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    /// A point's coordinates could not be read
    #[error("Invalid track point: {0}")]
    InvalidPoint(String),

    /// KMZ archive is damaged or holds no KML document
    #[error("Invalid KMZ archive: {0}")]
    Archive(String),
}

impl TrackError {
    pub(crate) fn xml(position: u64, err: impl std::fmt::Display) -> Self {
        TrackError::Xml {
            position,
            message: err.to_string(),
        }
    }
}
