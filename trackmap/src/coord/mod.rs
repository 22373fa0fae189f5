//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! Web Mercator slippy-map tile indices, and pixel positions on a canvas
//! assembled from a [`TileGrid`].

mod types;
pub mod zoom;

pub use types::{
    BoundingBox, CoordError, GeoPoint, TileCoord, TileGrid, TileGridIter, MAX_LAT, MAX_LON,
    MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM,
};
pub use zoom::{grid_for_zoom, select_zoom, select_zoom_from, DEFAULT_START_ZOOM, GRID_PADDING};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees, strictly between -85.0511 and 85.0511
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 19)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
/// Callers must clamp or reject latitudes outside the Web Mercator range.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }
    let point = GeoPoint::new(lat, lon);
    point.validate()?;

    let (fx, fy) = fractional_tile_coords(&point, zoom);
    let last = (1u32 << zoom) - 1;

    // lon = 180.0 lands exactly on the far edge of the world
    let x = (fx.floor() as u32).min(last);
    let y = (fy.floor() as u32).min(last);

    Ok(TileCoord { zoom, x, y })
}

/// Position of a point in tile units at `zoom`.
///
/// The integer part is the tile index, the fraction is the position inside
/// that tile. No range checks are made.
#[inline]
pub fn fractional_tile_coords(point: &GeoPoint, zoom: u8) -> (f64, f64) {
    let n = 2.0_f64.powi(zoom as i32);

    let x = (point.lon + 180.0) / 360.0 * n;

    // ln(tan φ + sec φ) == asinh(tan φ)
    let lat_rad = point.lat.to_radians();
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n;

    (x, y)
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's north-west corner. Indices equal
/// to `2^zoom` are accepted and give the east/south edge of the world.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> GeoPoint {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;

    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();

    GeoPoint::new(lat_rad.to_degrees(), lon)
}

/// Geographic extent covered by every tile of `grid`.
pub fn grid_bounds(grid: &TileGrid) -> BoundingBox {
    let nw = tile_to_lat_lon(&TileCoord::new(grid.zoom, grid.x_min, grid.y_min));
    let se = tile_to_lat_lon(&TileCoord::new(grid.zoom, grid.x_max + 1, grid.y_max + 1));
    BoundingBox {
        north: nw.lat,
        south: se.lat,
        east: se.lon,
        west: nw.lon,
    }
}

/// Projects a point onto a canvas that shows `grid` at `canvas_size` pixels.
///
/// Interpolation is linear in projected (Web Mercator) space, so tile seams sit
/// exactly at multiples of `canvas_width / grid.width()`. Points outside the
/// grid give coordinates outside the canvas.
#[inline]
pub fn pixel_for_point(point: &GeoPoint, grid: &TileGrid, canvas_size: (u32, u32)) -> (f64, f64) {
    let (fx, fy) = fractional_tile_coords(point, grid.zoom);
    let px = (fx - grid.x_min as f64) / grid.width() as f64 * canvas_size.0 as f64;
    let py = (fy - grid.y_min as f64) / grid.height() as f64 * canvas_size.1 as f64;
    (px, py)
}
