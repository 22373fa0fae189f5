//! Polyline drawing.
//!
//! The track is stroked onto a transparent tiny-skia overlay which is then
//! composited over the canvas. With anti-aliasing the overlay is drawn at a
//! multiple of the canvas size and box-filtered back down.

use image::{Rgba, RgbaImage};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::error::RenderError;
use crate::config::TrackColor;

/// How the track line is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: TrackColor,
    pub width_px: f32,
    pub antialias: bool,
    /// Size of the drawing overlay relative to the canvas
    pub scale: u32,
}

/// Strokes `points` (canvas pixel coordinates) as one open polyline.
///
/// Fewer than two distinct points, or a zero width, draw nothing.
pub fn stroke_polyline(
    canvas: &mut RgbaImage,
    points: &[(f64, f64)],
    style: &LineStyle,
) -> Result<(), RenderError> {
    if style.width_px <= 0.0 || points.iter().all(|p| *p == points[0]) {
        return Ok(());
    }

    let scale = style.scale.max(1);
    let (width, height) = canvas.dimensions();
    let too_large = || RenderError::CanvasTooLarge {
        width: width as u64 * scale as u64,
        height: height as u64 * scale as u64,
    };
    let mut overlay = Pixmap::new(
        width.checked_mul(scale).ok_or_else(too_large)?,
        height.checked_mul(scale).ok_or_else(too_large)?,
    )
    .ok_or_else(too_large)?;

    let mut pb = PathBuilder::new();
    let s = scale as f64;
    pb.move_to((points[0].0 * s) as f32, (points[0].1 * s) as f32);
    for &(x, y) in &points[1..] {
        pb.line_to((x * s) as f32, (y * s) as f32);
    }
    let Some(path) = pb.finish() else {
        return Ok(());
    };

    let mut paint = Paint::default();
    let c = style.color;
    paint.set_color_rgba8(c.r, c.g, c.b, c.a);
    paint.anti_alias = style.antialias;

    let stroke = Stroke {
        width: style.width_px * scale as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    overlay.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    composite_downsampled(canvas, &overlay, scale);
    Ok(())
}

/// Averages each `scale`×`scale` block of the premultiplied overlay and
/// blends the result source-over onto the canvas.
fn composite_downsampled(canvas: &mut RgbaImage, overlay: &Pixmap, scale: u32) {
    let data = overlay.data();
    let stride = overlay.width() as usize * 4;
    let samples = scale * scale;
    let scale = scale as usize;

    for (x, y, dst) in canvas.enumerate_pixels_mut() {
        let mut sum = [0u32; 4];
        for sy in 0..scale {
            let row = (y as usize * scale + sy) * stride;
            for sx in 0..scale {
                let i = row + (x as usize * scale + sx) * 4;
                for (acc, v) in sum.iter_mut().zip(&data[i..i + 4]) {
                    *acc += *v as u32;
                }
            }
        }
        if sum[3] == 0 {
            continue;
        }
        let src = sum.map(|v| (v + samples / 2) / samples);
        blend_premultiplied(dst, src);
    }
}

/// Source-over of a premultiplied source onto a straight-alpha pixel.
fn blend_premultiplied(dst: &mut Rgba<u8>, src: [u32; 4]) {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    for c in 0..3 {
        let premul = src[c] as f32 / 255.0 + dst[c] as f32 / 255.0 * da * (1.0 - sa);
        dst[c] = (premul / out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
