//! trackmap - static map images from GPS tracks
//!
//! Renders a recorded track (GPX, KML or KMZ) as a line over slippy-map
//! tiles and writes the result as a PNG or JPEG file.
//!
//! The pieces, leaves first:
//!
//! - [`coord`]: Web Mercator projection and zoom selection
//! - [`provider`]: tile URL templates and the HTTP client
//! - [`cache`]: on-disk tile cache
//! - [`compositor`]: background assembly from tiles
//! - [`render`]: line drawing, cropping, attribution and output
//! - [`map`]: the whole pipeline for one track
//! - [`track`]: track file parsing and filtering
//! - [`config`]: options and the INI config file

pub mod cache;
pub mod compositor;
pub mod config;
pub mod coord;
pub mod logging;
pub mod map;
pub mod provider;
pub mod render;
pub mod track;

pub use map::MapPipeline;
pub use render::{RenderError, RenderedMap};
