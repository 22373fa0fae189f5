//! GPX 1.0/1.1 reader.
//!
//! Reads track points from every track segment in document order. Files
//! without track points fall back to route points. Waypoints are ignored.

use chrono::{DateTime, Utc};
use gpx::{Time, Waypoint};
use tracing::debug;

use super::error::TrackError;
use super::types::{parse_time, Track, TrackPoint};

/// Parses a GPX document.
pub fn parse_gpx(xml: &str) -> Result<Track, TrackError> {
    let gpx = gpx::read(xml.as_bytes())?;

    let name = gpx.tracks.iter().find_map(|track| track.name.clone());

    let mut points: Vec<TrackPoint> = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points)
        .map(track_point)
        .collect();

    if points.is_empty() {
        points = gpx
            .routes
            .iter()
            .flat_map(|route| &route.points)
            .map(track_point)
            .collect();
        if !points.is_empty() {
            debug!(count = points.len(), "No track points, using route points");
        }
    }

    debug!(count = points.len(), "Parsed GPX");
    let track = Track::new(points);
    Ok(match name {
        Some(name) => track.with_name(name),
        None => track,
    })
}

fn track_point(waypoint: &Waypoint) -> TrackPoint {
    let position = waypoint.point();
    let mut point = TrackPoint::new(position.y(), position.x());
    point.time = waypoint.time.as_ref().and_then(utc_time);
    point
}

fn utc_time(time: &Time) -> Option<DateTime<Utc>> {
    time.format().ok().and_then(|iso| parse_time(&iso))
}
