//! Statistical outlier removal.
//!
//! GPS receivers occasionally report a fix hundreds of kilometres off the real
//! path. Such points blow up the bounding box and with it the zoom level. The
//! filter measures every point's great-circle distance from the median
//! position and keeps the points at or below the given percentile of those
//! distances.

use tracing::debug;

use super::types::{haversine_meters, Track};
use crate::coord::GeoPoint;

/// Tracks shorter than this are returned unchanged.
const MIN_POINTS: usize = 3;

/// Removes points farther from the median position than `percentile` percent
/// of all points.
///
/// `percentile` is clamped to `0.0..=100.0`; 100 keeps every point.
pub fn remove_outliers(track: &Track, percentile: f64) -> Track {
    if track.len() < MIN_POINTS {
        return track.clone();
    }

    let positions = track.positions();
    let center = GeoPoint::new(
        median(positions.iter().map(|p| p.lat).collect()),
        median(positions.iter().map(|p| p.lon).collect()),
    );

    let distances: Vec<f64> = positions
        .iter()
        .map(|p| haversine_meters(&center, p))
        .collect();

    let mut sorted = distances.clone();
    sorted.sort_by(f64::total_cmp);
    let threshold = percentile_of_sorted(&sorted, percentile.clamp(0.0, 100.0));

    let points: Vec<_> = track
        .points()
        .iter()
        .zip(&distances)
        .filter(|(_, d)| **d <= threshold)
        .map(|(p, _)| *p)
        .collect();

    debug!(
        kept = points.len(),
        removed = track.len() - points.len(),
        threshold_m = threshold,
        "Outlier filter applied"
    );

    let filtered = Track::new(points);
    match track.name() {
        Some(name) => filtered.with_name(name),
        None => filtered,
    }
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Linear interpolation between closest ranks.
fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    let rank = percentile / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_with_spike() -> Track {
        let mut positions: Vec<GeoPoint> = (0..20)
            .map(|i| GeoPoint::new(51.0 + i as f64 * 0.001, -0.1))
            .collect();
        positions.insert(10, GeoPoint::new(10.0, 40.0));
        Track::from_positions(positions).with_name("spiky")
    }

    #[test]
    fn test_removes_far_point() {
        let filtered = remove_outliers(&line_with_spike(), 95.0);

        assert_eq!(filtered.len(), 20);
        assert!(filtered.positions().iter().all(|p| p.lat > 50.0));
        assert_eq!(filtered.name(), Some("spiky"));
    }

    #[test]
    fn test_keeps_order() {
        let filtered = remove_outliers(&line_with_spike(), 95.0);
        let lats: Vec<f64> = filtered.positions().iter().map(|p| p.lat).collect();
        assert!(lats.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_full_percentile_keeps_everything() {
        let track = line_with_spike();
        assert_eq!(remove_outliers(&track, 100.0), track);
        assert_eq!(remove_outliers(&track, 250.0), track);
    }

    #[test]
    fn test_short_tracks_pass_through() {
        let track = Track::from_positions([GeoPoint::new(0.0, 0.0), GeoPoint::new(60.0, 60.0)]);
        assert_eq!(remove_outliers(&track, 1.0), track);
        assert!(remove_outliers(&Track::default(), 50.0).is_empty());
    }

    #[test]
    fn test_identical_points_all_kept() {
        let track = Track::from_positions(vec![GeoPoint::new(5.0, 5.0); 4]);
        assert_eq!(remove_outliers(&track, 0.0).len(), 4);
    }

    #[test]
    fn test_median_and_percentile() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), 2.5);

        let sorted = [0.0, 10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile_of_sorted(&sorted, 0.0), 0.0);
        assert_eq!(percentile_of_sorted(&sorted, 50.0), 20.0);
        assert_eq!(percentile_of_sorted(&sorted, 62.5), 25.0);
        assert_eq!(percentile_of_sorted(&sorted, 100.0), 40.0);
    }
}
