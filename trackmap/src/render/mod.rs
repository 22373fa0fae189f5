//! Track rendering
//!
//! Draws a track over an assembled background, crops the result to the
//! track, adds attribution and writes the image file.
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use trackmap::config::RenderOptions;
//! use trackmap::coord::{select_zoom, BoundingBox, GeoPoint};
//! use trackmap::render::TrackRenderer;
//!
//! let points = [GeoPoint::new(51.5074, -0.1278), GeoPoint::new(48.8566, 2.3522)];
//! let grid = select_zoom(&BoundingBox::from_points(&points).unwrap(), 4);
//! let (w, h) = grid.canvas_size(256);
//! let canvas = RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]));
//!
//! let renderer = TrackRenderer::new(RenderOptions::new().with_show_background(false));
//! let map = renderer.render(&points, canvas, &grid).unwrap();
//! assert_eq!(map.image.dimensions(), (768, 512));
//! ```

mod crop;
mod error;
mod output;
mod renderer;
mod stroke;
mod watermark;

pub use crop::{crop_window, CropWindow, PixelExtent};
pub use error::RenderError;
pub use output::{save_image, OutputFormat};
pub use renderer::{RenderedMap, TrackRenderer};
pub use stroke::{stroke_polyline, LineStyle};
pub use watermark::{BadgeLayout, Watermark};
