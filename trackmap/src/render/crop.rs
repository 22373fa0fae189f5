//! Crop window selection.
//!
//! The padded tile grid leaves a margin around the track. On each axis where
//! the canvas is wider than the target footprint, one tile's worth of margin
//! is removed, as long as the track still fits.

/// Pixel rectangle inside a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropWindow {
    pub fn full(canvas: (u32, u32)) -> Self {
        Self {
            x: 0,
            y: 0,
            width: canvas.0,
            height: canvas.1,
        }
    }
}

/// Extent of the drawn track in canvas pixels, `min` inclusive and `max`
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelExtent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PixelExtent {
    /// Bounding box of `points`, grown by `margin` on every side.
    pub fn around(points: &[(f64, f64)], margin: f64) -> Option<Self> {
        let (&(x0, y0), rest) = points.split_first()?;
        let mut extent = PixelExtent {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for &(x, y) in rest {
            extent.min_x = extent.min_x.min(x);
            extent.min_y = extent.min_y.min(y);
            extent.max_x = extent.max_x.max(x);
            extent.max_y = extent.max_y.max(y);
        }
        let margin = margin.max(0.0);
        extent.min_x -= margin;
        extent.min_y -= margin;
        extent.max_x += margin;
        extent.max_y += margin;
        Some(extent)
    }
}

/// Chooses the output window within a canvas.
///
/// `tiles_per_side` is the footprint the output aims for. An axis longer than
/// that is trimmed by exactly one tile when the track extent fits in what is
/// left; the window is then centered on the track. Every pixel the track
/// touches stays inside the window.
pub fn crop_window(
    canvas: (u32, u32),
    tile_size_px: u32,
    tiles_per_side: u32,
    extent: Option<&PixelExtent>,
) -> CropWindow {
    let Some(extent) = extent else {
        return CropWindow::full(canvas);
    };

    let footprint = tiles_per_side as u64 * tile_size_px as u64;
    let (x, width) = crop_axis(canvas.0, tile_size_px, footprint, extent.min_x, extent.max_x);
    let (y, height) = crop_axis(canvas.1, tile_size_px, footprint, extent.min_y, extent.max_y);

    CropWindow {
        x,
        y,
        width,
        height,
    }
}

fn crop_axis(len: u32, tile: u32, footprint: u64, min: f64, max: f64) -> (u32, u32) {
    if len as u64 <= footprint || len <= tile {
        return (0, len);
    }
    let kept = len - tile;

    // Pixels touched by the track, clamped to the canvas
    let lo = min.floor().clamp(0.0, len as f64) as u32;
    let hi = max.ceil().clamp(0.0, len as f64) as u32;
    if hi.saturating_sub(lo) > kept {
        return (0, len);
    }

    let center = (lo as f64 + hi as f64) / 2.0;
    let ideal = (center - kept as f64 / 2.0).round().max(0.0) as u32;
    let earliest = hi.saturating_sub(kept);
    let latest = lo.min(len - kept);
    (ideal.clamp(earliest, latest), kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> PixelExtent {
        PixelExtent {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[test]
    fn test_trims_one_tile_per_axis() {
        // 4×3 tiles of 256, footprint 2 tiles, track in the middle
        let e = extent(400.0, 300.0, 600.0, 450.0);
        let w = crop_window((1024, 768), 256, 2, Some(&e));

        assert_eq!((w.width, w.height), (768, 512));
        // Centered: track center 500, half window 384
        assert_eq!(w.x, 116);
        assert_eq!(w.y, 119);
    }

    #[test]
    fn test_wide_track_keeps_axis() {
        // Track spans 900 px; 1024 - 256 = 768 cannot hold it
        let e = extent(50.0, 300.0, 950.0, 400.0);
        let w = crop_window((1024, 768), 256, 2, Some(&e));
        assert_eq!((w.x, w.width), (0, 1024));
        assert_eq!(w.height, 512);
    }

    #[test]
    fn test_small_canvas_untouched() {
        let e = extent(10.0, 10.0, 20.0, 20.0);
        let w = crop_window((512, 512), 256, 2, Some(&e));
        assert_eq!(w, CropWindow::full((512, 512)));
    }

    #[test]
    fn test_window_clamped_to_canvas() {
        // Track hugging the left edge
        let e = extent(0.0, 0.0, 100.0, 100.0);
        let w = crop_window((1024, 1024), 256, 2, Some(&e));
        assert_eq!((w.x, w.y), (0, 0));
        assert_eq!((w.width, w.height), (768, 768));

        // ...and the right edge
        let e = extent(950.0, 950.0, 1024.0, 1024.0);
        let w = crop_window((1024, 1024), 256, 2, Some(&e));
        assert_eq!((w.x, w.y), (256, 256));
    }

    #[test]
    fn test_no_extent_is_full_canvas() {
        assert_eq!(
            crop_window((768, 768), 256, 1, None),
            CropWindow::full((768, 768))
        );
    }

    #[test]
    fn test_extent_around_points() {
        let e = PixelExtent::around(&[(10.0, 20.0), (5.0, 30.0)], 1.5).unwrap();
        assert_eq!(e, extent(3.5, 18.5, 11.5, 31.5));
        assert!(PixelExtent::around(&[], 1.0).is_none());
    }
}
