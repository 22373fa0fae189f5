//! Slippy-map tile server abstraction
//!
//! A [`TileSource`] maps tile coordinates to URLs; an [`HttpClient`] downloads
//! them. Keeping the two apart lets the tile cache own the network side and
//! lets tests swap in clients that never touch the network.
//!
//! ```ignore
//! use trackmap::provider::{ProviderConfig, ReqwestClient};
//!
//! let source = ProviderConfig::Mapnik.create()?;
//! let client = ReqwestClient::with_timeout(30)?;
//! ```

mod config;
mod http;
mod template;
mod types;

pub use config::ProviderConfig;
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS, USER_AGENT};
pub use template::{UrlTemplateSource, DEFAULT_SUBDOMAINS};
pub use types::{ProviderError, TileSource};

#[cfg(test)]
pub use http::tests::{MockHttpClient, RecordingHttpClient};
