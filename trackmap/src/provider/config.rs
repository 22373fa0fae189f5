//! Tile server presets.
//!
//! # Example
//!
//! ```
//! use trackmap::provider::{ProviderConfig, TileSource};
//!
//! let source = ProviderConfig::Mapnik.create().unwrap();
//! assert_eq!(source.id(), "mapnik");
//!
//! let custom = ProviderConfig::custom("https://tiles.test/{z}/{x}/{y}.png");
//! assert!(custom.create().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use super::template::UrlTemplateSource;
use super::types::ProviderError;

const MAPNIK_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const HUMANITARIAN_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
const OPENTOPOMAP_URL: &str = "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png";
const CARTO_LIGHT_URL: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png";
const CARTO_DARK_URL: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png";

/// Which tile server to draw the background from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProviderConfig {
    /// OpenStreetMap standard style.
    #[default]
    Mapnik,

    /// Humanitarian OpenStreetMap Team style.
    Humanitarian,

    /// OpenTopoMap topographic style. Served up to zoom 17.
    OpenTopoMap,

    /// CARTO Positron (light) basemap.
    CartoLight,

    /// CARTO Dark Matter basemap.
    CartoDark,

    /// Any XYZ server given as a URL template.
    Custom {
        /// Template with `{z}`, `{x}`, `{y}` and optional `{s}`
        template: String,
    },
}

impl ProviderConfig {
    /// Names accepted by [`FromStr`].
    pub const PRESET_NAMES: [&'static str; 5] = [
        "mapnik",
        "humanitarian",
        "opentopomap",
        "carto-light",
        "carto-dark",
    ];

    pub fn custom(template: impl Into<String>) -> Self {
        Self::Custom {
            template: template.into(),
        }
    }

    /// Returns the provider name for this configuration.
    pub fn name(&self) -> &str {
        match self {
            Self::Mapnik => "OpenStreetMap",
            Self::Humanitarian => "OpenStreetMap HOT",
            Self::OpenTopoMap => "OpenTopoMap",
            Self::CartoLight => "CARTO Light",
            Self::CartoDark => "CARTO Dark",
            Self::Custom { .. } => "Custom",
        }
    }

    /// Builds the tile source for this configuration.
    ///
    /// Only custom templates can fail.
    pub fn create(&self) -> Result<UrlTemplateSource, ProviderError> {
        match self {
            Self::Mapnik => UrlTemplateSource::new(self.name(), "mapnik", MAPNIK_URL),
            Self::Humanitarian => {
                UrlTemplateSource::new(self.name(), "humanitarian", HUMANITARIAN_URL)
                    .map(|s| s.with_subdomains(["a", "b"]))
            }
            Self::OpenTopoMap => {
                UrlTemplateSource::new(self.name(), "opentopomap", OPENTOPOMAP_URL)
                    .map(|s| s.with_max_zoom(17))
            }
            Self::CartoLight => {
                UrlTemplateSource::new(self.name(), "carto-light", CARTO_LIGHT_URL)
                    .map(|s| s.with_subdomains(["a", "b", "c", "d"]))
            }
            Self::CartoDark => UrlTemplateSource::new(self.name(), "carto-dark", CARTO_DARK_URL)
                .map(|s| s.with_subdomains(["a", "b", "c", "d"])),
            Self::Custom { template } => UrlTemplateSource::from_template(template.clone()),
        }
    }
}

impl fmt::Display for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapnik => write!(f, "mapnik"),
            Self::Humanitarian => write!(f, "humanitarian"),
            Self::OpenTopoMap => write!(f, "opentopomap"),
            Self::CartoLight => write!(f, "carto-light"),
            Self::CartoDark => write!(f, "carto-dark"),
            Self::Custom { template } => write!(f, "{}", template),
        }
    }
}

impl FromStr for ProviderConfig {
    type Err = ProviderError;

    /// Parses a preset name, or treats anything containing `{z}` as a custom
    /// template.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "mapnik" | "osm" => Ok(Self::Mapnik),
            "humanitarian" | "hot" => Ok(Self::Humanitarian),
            "opentopomap" | "topo" => Ok(Self::OpenTopoMap),
            "carto-light" | "positron" => Ok(Self::CartoLight),
            "carto-dark" | "darkmatter" => Ok(Self::CartoDark),
            _ if trimmed.contains("{z}") => Ok(Self::custom(trimmed)),
            _ => Err(ProviderError::InvalidTemplate(format!(
                "unknown tile provider '{}' (expected one of {} or a URL template)",
                trimmed,
                Self::PRESET_NAMES.join(", ")
            ))),
        }
    }
}
