//! GPS tracks
//!
//! Loading tracks from GPX, KML and KMZ files, plus the statistics and
//! outlier filtering applied before rendering.

mod error;
pub mod filter;
mod gpx;
mod kml;
mod kmz;
mod source;
mod types;

pub use error::TrackError;
pub use filter::remove_outliers;
pub use self::gpx::parse_gpx;
pub use kml::parse_kml;
pub use kmz::parse_kmz;
pub use source::{TrackFile, TrackSource};
pub use types::{haversine_meters, Track, TrackPoint, EARTH_RADIUS_M};
