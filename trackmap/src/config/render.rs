//! Rendering options.

use std::fmt;
use std::str::FromStr;

use super::color::TrackColor;
use super::defaults::{
    DEFAULT_LINE_WIDTH_PX, DEFAULT_SUPERSAMPLE_FACTOR, DEFAULT_TILE_COUNT_BUDGET,
    DEFAULT_TILE_SIZE_PX,
};
use crate::coord::MAX_ZOOM;

/// Size of the attribution watermark in the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttributionStyle {
    /// 80×15 badge with a 16 px logo
    Small,
    /// 88×31 badge with a 32 px logo
    #[default]
    Normal,
}

impl fmt::Display for AttributionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributionStyle::Small => write!(f, "small"),
            AttributionStyle::Normal => write!(f, "normal"),
        }
    }
}

impl FromStr for AttributionStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(AttributionStyle::Small),
            "normal" => Ok(AttributionStyle::Normal),
            other => Err(format!(
                "unknown attribution style '{}' (expected 'small' or 'normal')",
                other
            )),
        }
    }
}

/// Everything that shapes one rendered map.
///
/// Built once per render and passed by reference to every stage; nothing
/// downstream mutates it.
///
/// # Example
///
/// ```
/// use trackmap::config::{RenderOptions, TrackColor};
///
/// let options = RenderOptions::new()
///     .with_track_color(TrackColor::RED)
///     .with_line_width_px(2.0)
///     .with_show_background(false);
///
/// assert_eq!(options.tile_count_budget(), 4);
/// assert!(!options.show_background());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    tile_size_px: u32,
    tile_count_budget: u32,
    track_color: TrackColor,
    line_width_px: f32,
    antialias: bool,
    attribution_style: AttributionStyle,
    show_background: bool,
    zoom: Option<u8>,
    supersample_factor: u32,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tile edge length in pixels. Must match what the tile server
    /// delivers. Values below 1 are raised to 1.
    pub fn with_tile_size_px(mut self, px: u32) -> Self {
        self.tile_size_px = px.max(1);
        self
    }

    pub fn with_tile_count_budget(mut self, budget: u32) -> Self {
        self.tile_count_budget = budget;
        self
    }

    pub fn with_track_color(mut self, color: TrackColor) -> Self {
        self.track_color = color;
        self
    }

    /// Negative and non-finite widths are treated as 0 (nothing drawn).
    pub fn with_line_width_px(mut self, width: f32) -> Self {
        self.line_width_px = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    pub fn with_attribution_style(mut self, style: AttributionStyle) -> Self {
        self.attribution_style = style;
        self
    }

    pub fn with_show_background(mut self, show: bool) -> Self {
        self.show_background = show;
        self
    }

    /// Fix the zoom level instead of searching for one. Clamped to the
    /// supported range.
    pub fn with_zoom(mut self, zoom: Option<u8>) -> Self {
        self.zoom = zoom.map(|z| z.min(MAX_ZOOM));
        self
    }

    /// Values below 1 are raised to 1.
    pub fn with_supersample_factor(mut self, factor: u32) -> Self {
        self.supersample_factor = factor.max(1);
        self
    }

    pub fn tile_size_px(&self) -> u32 {
        self.tile_size_px
    }

    pub fn tile_count_budget(&self) -> u32 {
        self.tile_count_budget
    }

    pub fn track_color(&self) -> TrackColor {
        self.track_color
    }

    pub fn line_width_px(&self) -> f32 {
        self.line_width_px
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn attribution_style(&self) -> AttributionStyle {
        self.attribution_style
    }

    pub fn show_background(&self) -> bool {
        self.show_background
    }

    pub fn zoom(&self) -> Option<u8> {
        self.zoom
    }

    pub fn supersample_factor(&self) -> u32 {
        self.supersample_factor
    }

    /// Factor the overlay is drawn at: the supersample factor with
    /// antialiasing, 1 without.
    pub fn effective_scale(&self) -> u32 {
        if self.antialias {
            self.supersample_factor
        } else {
            1
        }
    }

    /// Output footprint in tiles per side, `max(1, floor(√budget))`.
    pub fn tiles_per_side(&self) -> u32 {
        let budget = self.tile_count_budget as u64;
        let mut n = (budget as f64).sqrt() as u64;
        // Guard against float error around perfect squares
        while (n + 1) * (n + 1) <= budget {
            n += 1;
        }
        while n > 0 && n * n > budget {
            n -= 1;
        }
        n.max(1) as u32
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tile_size_px: DEFAULT_TILE_SIZE_PX,
            tile_count_budget: DEFAULT_TILE_COUNT_BUDGET,
            track_color: TrackColor::default(),
            line_width_px: DEFAULT_LINE_WIDTH_PX,
            antialias: true,
            attribution_style: AttributionStyle::default(),
            show_background: true,
            zoom: None,
            supersample_factor: DEFAULT_SUPERSAMPLE_FACTOR,
        }
    }
}
