//! Track data types.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::coord::{BoundingBox, GeoPoint};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_009.0;

/// One recorded position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub position: GeoPoint,
    pub time: Option<DateTime<Utc>>,
}

impl TrackPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            position: GeoPoint::new(lat, lon),
            time: None,
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }
}

/// Ordered sequence of points; order is traversal order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    name: Option<String>,
    points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { name: None, points }
    }

    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        Self::new(
            positions
                .into_iter()
                .map(|position| TrackPoint {
                    position,
                    time: None,
                })
                .collect(),
        )
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Positions in traversal order.
    pub fn positions(&self) -> Vec<GeoPoint> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.points.iter().map(|p| &p.position))
    }

    /// Great-circle length of the path in meters.
    pub fn length_meters(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| haversine_meters(&w[0].position, &w[1].position))
            .sum()
    }

    /// Earliest and latest timestamp, if any point carries one.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut times = self.points.iter().filter_map(|p| p.time);
        let first = times.next()?;
        Some(times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }

    /// Duration between earliest and latest timestamp.
    pub fn time_span(&self) -> Option<Duration> {
        self.time_range().map(|(start, end)| end - start)
    }
}

/// Great-circle distance between two points.
pub fn haversine_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Parses an ISO 8601 timestamp. Unreadable timestamps are dropped.
pub(crate) fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(text.trim()) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            warn!(time = text, error = %e, "Ignoring unreadable timestamp");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_haversine_london_paris() {
        let london = GeoPoint::new(51.5074, -0.1278);
        let paris = GeoPoint::new(48.8566, 2.3522);
        let d = haversine_meters(&london, &paris);
        assert!((d - 343_500.0).abs() < 1_500.0, "distance was {}", d);
    }

    #[test]
    fn test_haversine_zero_and_symmetric() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(-5.0, 33.0);
        assert_eq!(haversine_meters(&a, &a), 0.0);
        assert!((haversine_meters(&a, &b) - haversine_meters(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn test_length_sums_segments() {
        let track = Track::from_positions([
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 2.0),
        ]);
        let one_degree = haversine_meters(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 1.0));
        assert!((track.length_meters() - 2.0 * one_degree).abs() < 1e-6);
    }

    #[test]
    fn test_length_of_short_tracks() {
        assert_eq!(Track::default().length_meters(), 0.0);
        assert_eq!(
            Track::from_positions([GeoPoint::new(1.0, 1.0)]).length_meters(),
            0.0
        );
    }

    #[test]
    fn test_time_span() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let track = Track::new(vec![
            TrackPoint::new(1.0, 1.0).with_time(t0),
            TrackPoint::new(1.1, 1.0),
            TrackPoint::new(1.2, 1.0).with_time(t1),
        ]);

        assert_eq!(track.time_range(), Some((t0, t1)));
        assert_eq!(track.time_span(), Some(Duration::minutes(90)));
    }

    #[test]
    fn test_time_span_without_timestamps() {
        let track = Track::from_positions([GeoPoint::new(1.0, 1.0)]);
        assert_eq!(track.time_span(), None);
    }

    #[test]
    fn test_bounding_box() {
        let track = Track::from_positions([GeoPoint::new(1.0, 5.0), GeoPoint::new(-2.0, 7.0)]);
        let bbox = track.bounding_box().unwrap();
        assert_eq!((bbox.north, bbox.south, bbox.east, bbox.west), (1.0, -2.0, 7.0, 5.0));
        assert!(Track::default().bounding_box().is_none());
    }
}
