//! Track file loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::error::TrackError;
use super::gpx::parse_gpx;
use super::kml::parse_kml;
use super::kmz::parse_kmz;
use super::types::Track;

/// Anything that can produce a track.
pub trait TrackSource {
    fn load(&self) -> Result<Track, TrackError>;
}

/// A track file on disk, tagged by format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackFile {
    Gpx(PathBuf),
    Kml(PathBuf),
    Kmz(PathBuf),
}

impl TrackFile {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, TrackError> {
        let path = path.into();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "gpx" => Ok(TrackFile::Gpx(path)),
            "kml" => Ok(TrackFile::Kml(path)),
            "kmz" => Ok(TrackFile::Kmz(path)),
            _ => Err(TrackError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TrackFile::Gpx(p) | TrackFile::Kml(p) | TrackFile::Kmz(p) => p,
        }
    }

    fn read_text(&self) -> Result<String, TrackError> {
        fs::read_to_string(self.path()).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> TrackError {
        TrackError::Io {
            path: self.path().to_path_buf(),
            source,
        }
    }
}

impl TrackSource for TrackFile {
    fn load(&self) -> Result<Track, TrackError> {
        let track = match self {
            TrackFile::Gpx(_) => parse_gpx(&self.read_text()?)?,
            TrackFile::Kml(_) => parse_kml(&self.read_text()?)?,
            TrackFile::Kmz(path) => {
                parse_kmz(&fs::read(path).map_err(|source| self.io_error(source))?)?
            }
        };

        info!(
            path = %self.path().display(),
            points = track.len(),
            "Loaded track"
        );

        // Unnamed tracks are named after the file
        if track.name().is_some() {
            return Ok(track);
        }
        Ok(match self.path().file_stem().and_then(|s| s.to_str()) {
            Some(stem) => track.with_name(stem),
            None => track,
        })
    }
}
