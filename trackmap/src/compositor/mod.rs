//! Background assembly
//!
//! Fetches every tile of a [`TileGrid`] through the [`TileCache`] and pastes
//! them into one canvas. Fetches run in parallel on a dedicated rayon pool;
//! pasting happens on the calling thread once every fetch has finished.

use image::{imageops, Rgba, RgbaImage};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::{TileCache, TileCacheError};
use crate::config::{FetchConfig, RenderOptions};
use crate::coord::{TileCoord, TileGrid};
use crate::provider::{HttpClient, TileSource};

/// Canvas color where no tile is drawn.
pub const BACKGROUND_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Errors that can occur while building the background.
#[derive(Debug, Error)]
pub enum CompositorError {
    /// A tile could not be fetched, decoded or cached
    #[error(transparent)]
    Tile(#[from] TileCacheError),

    /// A tile does not have the configured size
    #[error("Tile {tile} is {actual_width}x{actual_height} px, expected {expected}x{expected}")]
    TileSize {
        tile: TileCoord,
        expected: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// Canvas dimensions overflow
    #[error("A {columns}x{rows} tile grid is too large to render")]
    CanvasTooLarge { columns: u32, rows: u32 },

    /// Worker pool could not be started
    #[error("Failed to start fetch workers: {0}")]
    ThreadPool(String),
}

/// Builds background canvases from cached or downloaded tiles.
pub struct Compositor<'a, C: HttpClient, S: TileSource + ?Sized> {
    cache: &'a TileCache<C>,
    source: &'a S,
    tile_size_px: u32,
    show_background: bool,
    max_concurrent_fetches: usize,
}

impl<'a, C, S> Compositor<'a, C, S>
where
    C: HttpClient,
    S: TileSource + ?Sized,
{
    pub fn new(
        cache: &'a TileCache<C>,
        source: &'a S,
        options: &RenderOptions,
        fetch: &FetchConfig,
    ) -> Self {
        Self {
            cache,
            source,
            tile_size_px: options.tile_size_px(),
            show_background: options.show_background(),
            max_concurrent_fetches: fetch.max_concurrent_fetches(),
        }
    }

    /// Returns a canvas of `grid.width() × grid.height()` tiles.
    ///
    /// Without background the canvas is plain white and nothing is fetched.
    /// The first tile that fails aborts the whole build.
    pub fn build_background(&self, grid: &TileGrid) -> Result<RgbaImage, CompositorError> {
        let (width, height) = canvas_size(grid, self.tile_size_px)?;
        let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND_COLOR);

        if !self.show_background {
            debug!(width, height, "Background disabled, using blank canvas");
            return Ok(canvas);
        }

        let tiles: Vec<TileCoord> = grid.tiles().collect();
        info!(
            tiles = tiles.len(),
            zoom = grid.zoom,
            source = self.source.name(),
            "Fetching background tiles"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_concurrent_fetches)
            .thread_name(|i| format!("tile-fetch-{}", i))
            .build()
            .map_err(|e| CompositorError::ThreadPool(e.to_string()))?;

        let fetched: Vec<(TileCoord, RgbaImage)> = pool.install(|| {
            tiles
                .par_iter()
                .map(|tile| {
                    let image = self.cache.get_tile(tile, self.source)?;
                    Ok((*tile, image))
                })
                .collect::<Result<_, CompositorError>>()
        })?;

        for (tile, image) in &fetched {
            if image.dimensions() != (self.tile_size_px, self.tile_size_px) {
                return Err(CompositorError::TileSize {
                    tile: *tile,
                    expected: self.tile_size_px,
                    actual_width: image.width(),
                    actual_height: image.height(),
                });
            }
            let x = (tile.x - grid.x_min) as i64 * self.tile_size_px as i64;
            let y = (tile.y - grid.y_min) as i64 * self.tile_size_px as i64;
            imageops::replace(&mut canvas, image, x, y);
        }

        debug!(width, height, "Background assembled");
        Ok(canvas)
    }
}

fn canvas_size(grid: &TileGrid, tile_size_px: u32) -> Result<(u32, u32), CompositorError> {
    let too_large = || CompositorError::CanvasTooLarge {
        columns: grid.width(),
        rows: grid.height(),
    };
    let width = grid.width().checked_mul(tile_size_px).ok_or_else(too_large)?;
    let height = grid.height().checked_mul(tile_size_px).ok_or_else(too_large)?;
    // Keep the RGBA buffer length addressable
    (width as u64 * height as u64)
        .checked_mul(4)
        .filter(|&len| len <= isize::MAX as u64)
        .ok_or_else(too_large)?;
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockHttpClient, ProviderError, RecordingHttpClient, UrlTemplateSource};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn serving(bytes: Vec<u8>) -> MockHttpClient {
        MockHttpClient {
            response: Ok(bytes),
        }
    }

    fn source() -> UrlTemplateSource {
        UrlTemplateSource::new("Test", "test", "http://tiles.test/{z}/{x}/{y}.png").unwrap()
    }

    fn options(tile: u32) -> RenderOptions {
        RenderOptions::new().with_tile_size_px(tile)
    }

    #[test]
    fn test_canvas_matches_grid() {
        let dir = TempDir::new().unwrap();
        let client = RecordingHttpClient::new(Ok(png(8, 8, [0, 0, 255, 255])));
        let cache = TileCache::new(dir.path(), client);
        let src = source();
        let compositor = Compositor::new(&cache, &src, &options(8), &FetchConfig::default());

        let grid = TileGrid::from_corners(TileCoord::new(5, 3, 7), TileCoord::new(5, 5, 8));
        let canvas = compositor.build_background(&grid).unwrap();

        assert_eq!(canvas.dimensions(), (24, 16));
        assert_eq!(cache_client_calls(&cache), 6);
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(canvas.get_pixel(23, 15), &Rgba([0, 0, 255, 255]));
    }

    fn cache_client_calls(cache: &TileCache<RecordingHttpClient>) -> usize {
        cache.client().call_count()
    }

    #[test]
    fn test_tiles_pasted_at_offsets() {
        let dir = TempDir::new().unwrap();
        let src = source();
        let cache = TileCache::new(dir.path(), serving(png(4, 4, [255, 0, 0, 255])));

        // Pre-seed one tile so it differs from the downloaded ones
        let seeded = crate::cache::cache_path(dir.path(), "test", &TileCoord::new(3, 2, 1), "png");
        std::fs::create_dir_all(seeded.parent().unwrap()).unwrap();
        std::fs::write(&seeded, png(4, 4, [0, 255, 0, 255])).unwrap();

        let compositor = Compositor::new(&cache, &src, &options(4), &FetchConfig::default());
        let grid = TileGrid::from_corners(TileCoord::new(3, 1, 1), TileCoord::new(3, 2, 2));
        let canvas = compositor.build_background(&grid).unwrap();

        // Tile (2,1) is the top-right quadrant
        assert_eq!(canvas.get_pixel(4, 0), &Rgba([0, 255, 0, 255]));
        assert_eq!(canvas.get_pixel(7, 3), &Rgba([0, 255, 0, 255]));
        assert_eq!(canvas.get_pixel(3, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(4, 4), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_no_background_skips_fetching() {
        let dir = TempDir::new().unwrap();
        let cache = TileCache::new(dir.path(), RecordingHttpClient::new(Ok(png(4, 4, [0; 4]))));
        let src = source();
        let opts = options(4).with_show_background(false);
        let compositor = Compositor::new(&cache, &src, &opts, &FetchConfig::default());

        let grid = TileGrid::from_corners(TileCoord::new(2, 0, 0), TileCoord::new(2, 1, 2));
        let canvas = compositor.build_background(&grid).unwrap();

        assert_eq!(canvas.dimensions(), (8, 12));
        assert!(canvas.pixels().all(|p| *p == BACKGROUND_COLOR));
        assert_eq!(cache_client_calls(&cache), 0);
    }

    #[test]
    fn test_fetch_failure_aborts() {
        let dir = TempDir::new().unwrap();
        let client = MockHttpClient {
            response: Err(ProviderError::HttpError("HTTP 503".to_string())),
        };
        let cache = TileCache::new(dir.path(), client);
        let src = source();
        let compositor = Compositor::new(&cache, &src, &options(4), &FetchConfig::default());

        let grid = TileGrid::from_corners(TileCoord::new(2, 0, 0), TileCoord::new(2, 1, 1));
        let err = compositor.build_background(&grid).unwrap_err();
        assert!(matches!(
            err,
            CompositorError::Tile(TileCacheError::Fetch { .. })
        ));
    }

    #[test]
    fn test_wrong_tile_size_is_error() {
        let dir = TempDir::new().unwrap();
        let cache = TileCache::new(dir.path(), serving(png(5, 4, [0, 0, 0, 255])));
        let src = source();
        let compositor = Compositor::new(&cache, &src, &options(4), &FetchConfig::default());

        let grid = TileGrid::from_corners(TileCoord::new(1, 0, 0), TileCoord::new(1, 0, 0));
        match compositor.build_background(&grid) {
            Err(CompositorError::TileSize {
                expected,
                actual_width,
                ..
            }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual_width, 5);
            }
            other => panic!("expected TileSize error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_single_worker() {
        let dir = TempDir::new().unwrap();
        let cache = TileCache::new(dir.path(), serving(png(2, 2, [9, 9, 9, 255])));
        let src = source();
        let fetch = FetchConfig::default().with_max_concurrent_fetches(1);
        let compositor = Compositor::new(&cache, &src, &options(2), &fetch);

        let grid = TileGrid::from_corners(TileCoord::new(4, 0, 0), TileCoord::new(4, 3, 3));
        let canvas = compositor.build_background(&grid).unwrap();
        assert!(canvas.pixels().all(|p| *p == Rgba([9, 9, 9, 255])));
    }

    #[test]
    fn test_canvas_size_overflow() {
        let grid = TileGrid::from_corners(TileCoord::new(19, 0, 0), TileCoord::new(19, 100_000, 0));
        assert!(matches!(
            canvas_size(&grid, 256),
            Err(CompositorError::CanvasTooLarge { .. })
        ));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn grid_strategy() -> impl Strategy<Value = TileGrid> {
            (4u8..=10, 0u32..8, 0u32..8, 1u32..=8, 1u32..=8).prop_map(|(zoom, x, y, w, h)| {
                TileGrid::from_corners(
                    TileCoord::new(zoom, x, y),
                    TileCoord::new(zoom, x + w - 1, y + h - 1),
                )
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn prop_blank_canvas_matches_grid(grid in grid_strategy(), tile in 1u32..=48) {
                let dir = TempDir::new().unwrap();
                let cache = TileCache::new(dir.path(), RecordingHttpClient::new(Ok(Vec::new())));
                let src = source();
                let opts = options(tile).with_show_background(false);
                let compositor = Compositor::new(&cache, &src, &opts, &FetchConfig::default());

                let canvas = compositor.build_background(&grid).unwrap();
                prop_assert_eq!(canvas.dimensions(), (grid.width() * tile, grid.height() * tile));
                prop_assert_eq!(cache_client_calls(&cache), 0);
            }

            #[test]
            fn prop_fetched_canvas_matches_grid(grid in grid_strategy(), tile in 1u32..=8) {
                let dir = TempDir::new().unwrap();
                let client = RecordingHttpClient::new(Ok(png(tile, tile, [10, 20, 30, 255])));
                let cache = TileCache::new(dir.path(), client);
                let src = source();
                let compositor = Compositor::new(&cache, &src, &options(tile), &FetchConfig::default());

                let canvas = compositor.build_background(&grid).unwrap();
                prop_assert_eq!(canvas.dimensions(), (grid.width() * tile, grid.height() * tile));
                prop_assert_eq!(cache_client_calls(&cache) as u64, grid.tile_count());
                prop_assert!(canvas.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
            }
        }
    }
}
