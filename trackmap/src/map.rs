//! End-to-end map rendering.
//!
//! [`MapPipeline`] ties the components together for one track:
//!
//! 1. check the output format
//! 2. validate the points
//! 3. choose the zoom level and tile grid
//! 4. assemble the background
//! 5. draw, crop and watermark
//! 6. encode and write the file atomically
//!
//! Steps 1 and 2 run before any network or disk activity. No output file is
//! left behind when a step fails.

use std::path::Path;

use tracing::info;

use crate::cache::TileCache;
use crate::compositor::Compositor;
use crate::config::{FetchConfig, RenderOptions};
use crate::coord::{grid_for_zoom, select_zoom, BoundingBox, GeoPoint, TileGrid, GRID_PADDING};
use crate::provider::{HttpClient, TileSource};
use crate::render::{save_image, OutputFormat, RenderError, RenderedMap, TrackRenderer, Watermark};

/// Renders tracks with one tile source, cache and set of options.
pub struct MapPipeline<'a, C: HttpClient, S: TileSource + ?Sized> {
    cache: &'a TileCache<C>,
    source: &'a S,
    fetch: FetchConfig,
    renderer: TrackRenderer,
}

impl<'a, C, S> MapPipeline<'a, C, S>
where
    C: HttpClient,
    S: TileSource + ?Sized,
{
    pub fn new(
        cache: &'a TileCache<C>,
        source: &'a S,
        options: RenderOptions,
        fetch: FetchConfig,
    ) -> Self {
        Self {
            cache,
            source,
            fetch,
            renderer: TrackRenderer::new(options),
        }
    }

    /// Uses custom attribution images instead of the built-in ones.
    pub fn with_watermark(mut self, watermark: Watermark) -> Self {
        self.renderer = self.renderer.with_watermark(Some(watermark));
        self
    }

    pub fn options(&self) -> &RenderOptions {
        self.renderer.options()
    }

    /// Renders `points` and writes the image to `output`.
    pub fn render_to_file(
        &self,
        points: &[GeoPoint],
        output: &Path,
    ) -> Result<RenderedMap, RenderError> {
        OutputFormat::from_path(output)?;
        let map = self.render(points)?;
        save_image(&map.image, output)?;
        Ok(map)
    }

    /// Renders `points` in memory.
    pub fn render(&self, points: &[GeoPoint]) -> Result<RenderedMap, RenderError> {
        let bbox = validate_points(points)?;
        let options = self.renderer.options();

        let grid = self.grid_for(&bbox);
        info!(
            points = points.len(),
            zoom = grid.zoom,
            columns = grid.width(),
            rows = grid.height(),
            "Rendering track"
        );

        let compositor = Compositor::new(self.cache, self.source, options, &self.fetch);
        let canvas = compositor.build_background(&grid)?;
        self.renderer.render(points, canvas, &grid)
    }

    fn grid_for(&self, bbox: &BoundingBox) -> TileGrid {
        match self.renderer.options().zoom() {
            Some(zoom) => grid_for_zoom(bbox, zoom).padded(GRID_PADDING),
            None => select_zoom(bbox, self.renderer.options().tile_count_budget()),
        }
    }
}

/// Rejects empty tracks and points Web Mercator cannot project.
pub fn validate_points(points: &[GeoPoint]) -> Result<BoundingBox, RenderError> {
    for point in points {
        point.validate()?;
    }
    BoundingBox::from_points(points)
        .ok_or_else(|| RenderError::InvalidTrack("track has no points".to_string()))
}
