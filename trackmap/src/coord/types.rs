//! Coordinate type definitions

use std::fmt;

/// Web Mercator latitude limit. Valid latitudes satisfy `|lat| < MAX_LAT`.
pub const MAX_LAT: f64 = 85.0511;
pub const MIN_LAT: f64 = -MAX_LAT;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels served by common slippy-map tile servers
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 19;

/// A geographic position in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Checks that the point can be projected with Web Mercator.
    pub fn validate(&self) -> Result<(), CoordError> {
        if !(self.lat.is_finite() && self.lat.abs() < MAX_LAT) {
            return Err(CoordError::InvalidLatitude(self.lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&self.lon) {
            return Err(CoordError::InvalidLongitude(self.lon));
        }
        Ok(())
    }
}

/// Axis-aligned geographic extent of a set of points.
///
/// Tracks crossing the antimeridian are not supported; `west` is always the
/// smallest longitude seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Computes the bounding box of a point sequence.
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox {
            north: first.lat,
            south: first.lat,
            east: first.lon,
            west: first.lon,
        };
        for p in iter {
            bbox.north = bbox.north.max(p.lat);
            bbox.south = bbox.south.min(p.lat);
            bbox.east = bbox.east.max(p.lon);
            bbox.west = bbox.west.min(p.lon);
        }
        Some(bbox)
    }

    /// True when the box has no extent on either axis (one distinct point).
    pub fn is_degenerate(&self) -> bool {
        self.north == self.south && self.east == self.west
    }
}

/// Tile coordinates in the slippy-map scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level
    pub zoom: u8,
    /// Column, 0 at the antimeridian, growing eastwards
    pub x: u32,
    /// Row, 0 at the north edge, growing southwards
    pub y: u32,
}

impl TileCoord {
    #[inline]
    pub const fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Rectangle of tiles at one zoom level, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileGrid {
    pub zoom: u8,
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl TileGrid {
    /// Builds a grid from two corner tiles of the same zoom level.
    ///
    /// The corners may be given in any order.
    pub fn from_corners(a: TileCoord, b: TileCoord) -> Self {
        debug_assert_eq!(a.zoom, b.zoom);
        Self {
            zoom: a.zoom,
            x_min: a.x.min(b.x),
            x_max: a.x.max(b.x),
            y_min: a.y.min(b.y),
            y_max: a.y.max(b.y),
        }
    }

    /// Number of tile columns.
    #[inline]
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    /// Number of tile rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.y_max - self.y_min + 1
    }

    #[inline]
    pub fn tile_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Canvas size in pixels when every tile is `tile_size` pixels square.
    pub fn canvas_size(&self, tile_size: u32) -> (u32, u32) {
        (self.width() * tile_size, self.height() * tile_size)
    }

    /// Grows the grid by `tiles` on every side, clamped to the world.
    pub fn padded(&self, tiles: u32) -> Self {
        let last = (1u32 << self.zoom) - 1;
        Self {
            zoom: self.zoom,
            x_min: self.x_min.saturating_sub(tiles),
            x_max: self.x_max.saturating_add(tiles).min(last),
            y_min: self.y_min.saturating_sub(tiles),
            y_max: self.y_max.saturating_add(tiles).min(last),
        }
    }

    /// Iterates over every tile of the grid in row-major order.
    pub fn tiles(&self) -> TileGridIter {
        TileGridIter {
            grid: *self,
            x: self.x_min,
            y: self.y_min,
        }
    }
}

/// Row-major iterator over the tiles of a [`TileGrid`].
#[derive(Debug, Clone)]
pub struct TileGridIter {
    grid: TileGrid,
    x: u32,
    y: u32,
}

impl Iterator for TileGridIter {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.y > self.grid.y_max {
            return None;
        }

        let tile = TileCoord::new(self.grid.zoom, self.x, self.y);

        if self.x == self.grid.x_max {
            self.x = self.grid.x_min;
            self.y += 1;
        } else {
            self.x += 1;
        }

        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.y > self.grid.y_max {
            0
        } else {
            let full_rows = (self.grid.y_max - self.y) as usize * self.grid.width() as usize;
            full_rows + (self.grid.x_max - self.x + 1) as usize
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileGridIter {}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is non-finite or outside the Web Mercator range
    InvalidLatitude(f64),
    /// Longitude is outside -180.0 to 180.0
    InvalidLongitude(f64),
    /// Zoom level is above MAX_ZOOM
    InvalidZoom(u8),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be strictly between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
