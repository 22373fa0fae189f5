//! Zoom level selection for a track's bounding box.
//!
//! The selector walks down from [`DEFAULT_START_ZOOM`] until the tile grid that
//! covers the bounding box fits the tile budget. Every step recomputes the grid
//! from the bounding box itself; deriving the count by halving the previous
//! width/height drifts by a tile whenever an edge sits on an odd index.

use tracing::debug;

use super::{fractional_tile_coords, BoundingBox, TileCoord, TileGrid, MAX_ZOOM};

/// Zoom level the search starts from.
pub const DEFAULT_START_ZOOM: u8 = 16;

/// Tiles of margin added on every side of the selected grid.
pub const GRID_PADDING: u32 = 1;

/// Tile grid covering `bbox` at `zoom`, without padding.
///
/// The bounding box is assumed valid for Web Mercator (see
/// [`GeoPoint::validate`](super::GeoPoint::validate)).
pub fn grid_for_zoom(bbox: &BoundingBox, zoom: u8) -> TileGrid {
    let zoom = zoom.min(MAX_ZOOM);
    let last = (1u32 << zoom) - 1;
    let tile_at = |lat: f64, lon: f64| {
        let (fx, fy) = fractional_tile_coords(&super::GeoPoint::new(lat, lon), zoom);
        TileCoord::new(
            zoom,
            (fx.floor().max(0.0) as u32).min(last),
            (fy.floor().max(0.0) as u32).min(last),
        )
    };

    TileGrid::from_corners(
        tile_at(bbox.north, bbox.west),
        tile_at(bbox.south, bbox.east),
    )
}

/// Picks the most detailed zoom level whose grid holds fewer than
/// `tile_count_budget` tiles, and returns that grid padded by one tile.
///
/// The search stops at zoom 0 even when the budget still is not met (a budget of
/// 1 can never be met). A degenerate bounding box skips the search and uses the
/// start zoom.
pub fn select_zoom(bbox: &BoundingBox, tile_count_budget: u32) -> TileGrid {
    select_zoom_from(bbox, tile_count_budget, DEFAULT_START_ZOOM)
}

/// [`select_zoom`] with an explicit starting zoom level.
pub fn select_zoom_from(bbox: &BoundingBox, tile_count_budget: u32, start_zoom: u8) -> TileGrid {
    let start_zoom = start_zoom.min(MAX_ZOOM);

    if bbox.is_degenerate() {
        debug!(zoom = start_zoom, "Degenerate bounding box, using start zoom");
        return grid_for_zoom(bbox, start_zoom).padded(GRID_PADDING);
    }

    let budget = tile_count_budget as u64;
    let mut zoom = start_zoom;
    let mut grid = grid_for_zoom(bbox, zoom);

    while grid.tile_count() >= budget && zoom > 0 {
        zoom -= 1;
        grid = grid_for_zoom(bbox, zoom);
    }

    debug!(
        zoom,
        width = grid.width(),
        height = grid.height(),
        budget = tile_count_budget,
        "Selected zoom level"
    );

    grid.padded(GRID_PADDING)
}
