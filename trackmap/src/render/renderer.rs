//! Track rendering onto a background canvas.

use image::{imageops, RgbaImage};
use tracing::debug;

use super::crop::{crop_window, CropWindow, PixelExtent};
use super::error::RenderError;
use super::stroke::{stroke_polyline, LineStyle};
use super::watermark::Watermark;
use crate::config::RenderOptions;
use crate::coord::{fractional_tile_coords, pixel_for_point, GeoPoint, TileGrid};

/// A rendered map and the geometry needed to place points on it.
#[derive(Debug, Clone)]
pub struct RenderedMap {
    pub image: RgbaImage,
    pub grid: TileGrid,
    /// Top-left of the output within the uncropped canvas
    pub crop_origin: (u32, u32),
    /// Pixels per tile
    pub scale: u32,
}

impl RenderedMap {
    /// Output pixel position of `point`. May lie outside the image.
    pub fn pixel_for(&self, point: &GeoPoint) -> (f64, f64) {
        let (fx, fy) = fractional_tile_coords(point, self.grid.zoom);
        let scale = self.scale as f64;
        (
            (fx - self.grid.x_min as f64) * scale - self.crop_origin.0 as f64,
            (fy - self.grid.y_min as f64) * scale - self.crop_origin.1 as f64,
        )
    }

    pub fn crop_window(&self) -> CropWindow {
        CropWindow {
            x: self.crop_origin.0,
            y: self.crop_origin.1,
            width: self.image.width(),
            height: self.image.height(),
        }
    }
}

/// Draws tracks, crops and watermarks the result.
#[derive(Debug, Clone)]
pub struct TrackRenderer {
    options: RenderOptions,
    watermark: Option<Watermark>,
}

impl TrackRenderer {
    /// Renderer with the built-in attribution images.
    pub fn new(options: RenderOptions) -> Self {
        let watermark = Watermark::builtin(options.attribution_style());
        Self {
            options,
            watermark: Some(watermark),
        }
    }

    /// Replaces the attribution images; `None` disables attribution.
    pub fn with_watermark(mut self, watermark: Option<Watermark>) -> Self {
        self.watermark = watermark;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Draws `points` onto `canvas`, which must show `grid`.
    pub fn render(
        &self,
        points: &[GeoPoint],
        mut canvas: RgbaImage,
        grid: &TileGrid,
    ) -> Result<RenderedMap, RenderError> {
        let size = canvas.dimensions();
        let pixels: Vec<(f64, f64)> = points
            .iter()
            .map(|p| pixel_for_point(p, grid, size))
            .collect();

        let style = LineStyle {
            color: self.options.track_color(),
            width_px: self.options.line_width_px(),
            antialias: self.options.antialias(),
            scale: self.options.effective_scale(),
        };
        stroke_polyline(&mut canvas, &pixels, &style)?;

        let extent = PixelExtent::around(&pixels, style.width_px as f64 / 2.0);
        let window = crop_window(
            size,
            self.options.tile_size_px(),
            self.options.tiles_per_side(),
            extent.as_ref(),
        );
        debug!(
            x = window.x,
            y = window.y,
            width = window.width,
            height = window.height,
            "Crop window"
        );

        let mut image = if window == CropWindow::full(size) {
            canvas
        } else {
            imageops::crop_imm(&canvas, window.x, window.y, window.width, window.height).to_image()
        };

        if self.options.show_background() {
            if let Some(watermark) = &self.watermark {
                watermark.apply(&mut image);
            }
        }

        Ok(RenderedMap {
            image,
            grid: *grid,
            crop_origin: (window.x, window.y),
            scale: self.options.tile_size_px(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackColor;
    use crate::coord::{select_zoom, BoundingBox};
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn options() -> RenderOptions {
        RenderOptions::new()
            .with_tile_count_budget(4)
            .with_track_color(TrackColor::RED)
            .with_show_background(false)
    }

    fn london_paris() -> Vec<GeoPoint> {
        vec![GeoPoint::new(51.5074, -0.1278), GeoPoint::new(48.8566, 2.3522)]
    }

    fn blank(grid: &TileGrid, tile: u32) -> RgbaImage {
        let (w, h) = grid.canvas_size(tile);
        RgbaImage::from_pixel(w, h, WHITE)
    }

    #[test]
    fn test_london_paris_line() {
        let points = london_paris();
        let grid = select_zoom(&BoundingBox::from_points(&points).unwrap(), 4);
        let renderer = TrackRenderer::new(options());

        let map = renderer.render(&points, blank(&grid, 256), &grid).unwrap();

        // 4×3 padded grid trimmed by one tile per axis
        assert_eq!(map.image.dimensions(), (768, 512));

        let a = map.pixel_for(&points[0]);
        let b = map.pixel_for(&points[1]);
        let mid = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        assert_eq!(
            map.image.get_pixel(mid.0 as u32, mid.1 as u32),
            &Rgba([255, 0, 0, 255])
        );

        for (x, y) in [(0, 0), (767, 0), (0, 511), (767, 511)] {
            assert_eq!(map.image.get_pixel(x, y), &WHITE);
        }
    }

    #[test]
    fn test_endpoints_inside_output() {
        let points = london_paris();
        let grid = select_zoom(&BoundingBox::from_points(&points).unwrap(), 4);
        let map = TrackRenderer::new(options())
            .render(&points, blank(&grid, 256), &grid)
            .unwrap();

        for p in &points {
            let (x, y) = map.pixel_for(p);
            assert!(x >= 0.0 && x < map.image.width() as f64);
            assert!(y >= 0.0 && y < map.image.height() as f64);
        }
    }

    #[test]
    fn test_single_point_draws_nothing() {
        let points = vec![GeoPoint::new(45.0, 7.0)];
        let grid = select_zoom(&BoundingBox::from_points(&points).unwrap(), 4);
        let map = TrackRenderer::new(options())
            .render(&points, blank(&grid, 256), &grid)
            .unwrap();

        assert!(map.image.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_stationary_track_draws_nothing() {
        let points = vec![GeoPoint::new(45.0, 7.0); 3];
        let grid = select_zoom(&BoundingBox::from_points(&points).unwrap(), 4);
        let map = TrackRenderer::new(options())
            .render(&points, blank(&grid, 256), &grid)
            .unwrap();

        assert!(map.image.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_watermark_only_with_background() {
        let points = london_paris();
        let grid = select_zoom(&BoundingBox::from_points(&points).unwrap(), 4);

        let plain = TrackRenderer::new(options())
            .render(&points, blank(&grid, 256), &grid)
            .unwrap();
        let (w, h) = plain.image.dimensions();
        assert_eq!(plain.image.get_pixel(w - 50, h - 20), &WHITE);

        // Blank canvas standing in for a fetched background
        let marked = TrackRenderer::new(options().with_show_background(true))
            .render(&points, blank(&grid, 256), &grid)
            .unwrap();
        assert_ne!(marked.image.get_pixel(w - 50, h - 20), &WHITE);
    }

    #[test]
    fn test_watermark_can_be_disabled() {
        let points = london_paris();
        let grid = select_zoom(&BoundingBox::from_points(&points).unwrap(), 4);
        let map = TrackRenderer::new(options().with_show_background(true))
            .with_watermark(None)
            .render(&points, blank(&grid, 256), &grid)
            .unwrap();
        let (w, h) = map.image.dimensions();
        assert_eq!(map.image.get_pixel(w - 50, h - 20), &WHITE);
    }

    #[test]
    fn test_small_tiles() {
        let points = london_paris();
        let opts = options().with_tile_size_px(16);
        let grid = select_zoom(&BoundingBox::from_points(&points).unwrap(), 4);
        let map = TrackRenderer::new(opts)
            .render(&points, blank(&grid, 16), &grid)
            .unwrap();
        assert_eq!(map.scale, 16);
        assert_eq!(map.image.dimensions(), (48, 32));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn track_strategy() -> impl Strategy<Value = Vec<GeoPoint>> {
            (-70.0..70.0_f64, -170.0..170.0_f64, 0.0..8.0_f64).prop_flat_map(
                |(lat, lon, spread)| {
                    prop::collection::vec(
                        (0.0..=1.0_f64, 0.0..=1.0_f64).prop_map(move |(a, b)| {
                            GeoPoint::new(lat + a * spread, lon + b * spread)
                        }),
                        1..8,
                    )
                },
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn prop_rendered_track_stays_inside_image(
                points in track_strategy(),
                budget in 1u32..=20,
                tile in prop::sample::select(vec![8u32, 16, 32]),
                line_width in 1.0f32..6.0,
            ) {
                let opts = options()
                    .with_tile_count_budget(budget)
                    .with_tile_size_px(tile)
                    .with_line_width_px(line_width);
                let grid = select_zoom(&BoundingBox::from_points(&points).unwrap(), budget);
                let map = TrackRenderer::new(opts)
                    .render(&points, blank(&grid, tile), &grid)
                    .unwrap();

                let (w, h) = map.image.dimensions();
                for p in &points {
                    let (x, y) = map.pixel_for(p);
                    prop_assert!(x >= 0.0 && x < w as f64, "x {} outside 0..{}", x, w);
                    prop_assert!(y >= 0.0 && y < h as f64, "y {} outside 0..{}", y, h);
                }
            }
        }
    }
}
