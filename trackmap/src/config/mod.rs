//! Configuration types for trackmap components.
//!
//! Each struct covers one concern and is built with `with_*` methods on top of
//! its defaults. [`ConfigFile`] overlays the user's `~/.trackmap/config.ini`
//! on those defaults; command-line flags are applied on top of that by the
//! caller.
//!
//! # Example
//!
//! ```
//! use trackmap::config::{FetchConfig, RenderOptions, AttributionStyle};
//!
//! let render = RenderOptions::new()
//!     .with_tile_count_budget(9)
//!     .with_attribution_style(AttributionStyle::Small);
//!
//! let fetch = FetchConfig::default();
//! assert_eq!(fetch.max_concurrent_fetches(), 4);
//! ```

mod color;
mod defaults;
mod fetch;
mod file;
mod parser;
mod render;
mod size;

pub use color::{ColorParseError, TrackColor};
pub use defaults::*;
pub use fetch::{CacheConfig, FetchConfig};
pub use file::{ConfigFile, ConfigFileError, TrackSettings};
pub use parser::expand_tilde;
pub use render::{AttributionStyle, RenderOptions};
pub use size::format_size;
