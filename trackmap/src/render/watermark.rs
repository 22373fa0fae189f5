//! Attribution overlay.
//!
//! Maps drawn over third-party tiles carry a licence badge and a logo in the
//! bottom-right corner. The built-in images are drawn with tiny-skia; custom
//! PNGs can replace them.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::error::RenderError;
use crate::config::AttributionStyle;

/// Pixel geometry of one attribution style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeLayout {
    pub badge_width: u32,
    pub badge_height: u32,
    /// Badge offset from the right edge
    pub right: u32,
    /// Badge offset from the bottom edge
    pub bottom: u32,
    pub logo_size: u32,
}

/// Horizontal gap between logo and badge.
const LOGO_GAP: i64 = 5;

impl BadgeLayout {
    pub fn for_style(style: AttributionStyle) -> Self {
        match style {
            AttributionStyle::Small => BadgeLayout {
                badge_width: 80,
                badge_height: 15,
                right: 85,
                bottom: 20,
                logo_size: 16,
            },
            AttributionStyle::Normal => BadgeLayout {
                badge_width: 88,
                badge_height: 31,
                right: 93,
                bottom: 36,
                logo_size: 32,
            },
        }
    }

    /// Top-left corner of the badge on an image of the given size. May be
    /// negative on tiny images; drawing clips.
    pub fn badge_origin(&self, image: (u32, u32)) -> (i64, i64) {
        (
            image.0 as i64 - self.right as i64,
            image.1 as i64 - self.bottom as i64,
        )
    }

    /// Top-left corner of the logo, left of the badge and top-aligned with it.
    pub fn logo_origin(&self, image: (u32, u32)) -> (i64, i64) {
        let (bx, by) = self.badge_origin(image);
        (bx - self.logo_size as i64 - LOGO_GAP, by)
    }
}

/// Badge and logo images for one style.
#[derive(Debug, Clone)]
pub struct Watermark {
    layout: BadgeLayout,
    badge: RgbaImage,
    logo: RgbaImage,
}

impl Watermark {
    /// Built-in images.
    pub fn builtin(style: AttributionStyle) -> Self {
        let layout = BadgeLayout::for_style(style);
        Self {
            badge: draw_badge(layout.badge_width, layout.badge_height),
            logo: draw_logo(layout.logo_size),
            layout,
        }
    }

    /// Loads custom badge and logo PNGs, scaled to the style's geometry.
    pub fn load(style: AttributionStyle, badge: &Path, logo: &Path) -> Result<Self, RenderError> {
        let layout = BadgeLayout::for_style(style);
        let badge_img = open_rgba(badge)?;
        let logo_img = open_rgba(logo)?;
        Ok(Self {
            badge: fit(badge_img, layout.badge_width, layout.badge_height),
            logo: fit(logo_img, layout.logo_size, layout.logo_size),
            layout,
        })
    }

    pub fn layout(&self) -> BadgeLayout {
        self.layout
    }

    /// Draws badge and logo onto the bottom-right corner of `image`.
    pub fn apply(&self, image: &mut RgbaImage) {
        let size = image.dimensions();
        let (bx, by) = self.layout.badge_origin(size);
        let (lx, ly) = self.layout.logo_origin(size);
        imageops::overlay(image, &self.badge, bx, by);
        imageops::overlay(image, &self.logo, lx, ly);
    }
}

fn open_rgba(path: &Path) -> Result<RgbaImage, RenderError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| RenderError::Watermark {
            path: path.to_path_buf(),
            source,
        })
}

fn fit(image: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        image
    } else {
        imageops::resize(&image, width, height, FilterType::Triangle)
    }
}

/// Rounded dark badge with a light frame and two text-like bars.
fn draw_badge(width: u32, height: u32) -> RgbaImage {
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return RgbaImage::new(width, height);
    };
    let (w, h) = (width as f32, height as f32);
    let radius = h / 4.0;

    let mut fill = Paint::default();
    fill.set_color_rgba8(40, 40, 40, 220);
    fill.anti_alias = true;
    if let Some(path) = rounded_rect(0.5, 0.5, w - 1.0, h - 1.0, radius) {
        pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);

        let mut frame = Paint::default();
        frame.set_color_rgba8(235, 235, 235, 255);
        frame.anti_alias = true;
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &frame, &stroke, Transform::identity(), None);
    }

    let mut text = Paint::default();
    text.set_color(Color::from_rgba8(245, 245, 245, 255));
    let bar = (h / 5.0).max(1.0);
    let inset = h / 3.0;
    for (i, fraction) in [0.72f32, 0.48].iter().enumerate() {
        let top = h * (0.3 + 0.28 * i as f32);
        if let Some(rect) = Rect::from_xywh(inset, top, (w - 2.0 * inset) * fraction, bar) {
            pixmap.fill_rect(rect, &text, Transform::identity(), None);
        }
    }

    pixmap_to_image(&pixmap)
}

/// Circular logo with a zig-zag route.
fn draw_logo(size: u32) -> RgbaImage {
    let Some(mut pixmap) = Pixmap::new(size, size) else {
        return RgbaImage::new(size, size);
    };
    let s = size as f32;

    let mut disc = Paint::default();
    disc.set_color_rgba8(126, 188, 111, 255);
    disc.anti_alias = true;
    if let Some(circle) = PathBuilder::from_circle(s / 2.0, s / 2.0, s / 2.0 - 0.5) {
        pixmap.fill_path(&circle, &disc, FillRule::Winding, Transform::identity(), None);
    }

    let mut route = Paint::default();
    route.set_color_rgba8(255, 255, 255, 255);
    route.anti_alias = true;
    let mut pb = PathBuilder::new();
    pb.move_to(s * 0.22, s * 0.70);
    pb.line_to(s * 0.42, s * 0.38);
    pb.line_to(s * 0.58, s * 0.60);
    pb.line_to(s * 0.78, s * 0.28);
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width: (s / 10.0).max(1.0),
            line_cap: tiny_skia::LineCap::Round,
            line_join: tiny_skia::LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &route, &stroke, Transform::identity(), None);
    }

    pixmap_to_image(&pixmap)
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Converts tiny-skia's premultiplied pixels to straight alpha.
fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    image
}
