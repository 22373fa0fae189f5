//! URL-template tile source.
//!
//! Covers every XYZ raster server: the template carries `{z}`, `{x}` and `{y}`
//! placeholders and optionally `{s}` for a rotating subdomain, e.g.
//! `https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png`.

use crate::coord::{TileCoord, MAX_ZOOM};

use super::types::{ProviderError, TileSource};

/// Subdomains used for `{s}` when none are given.
pub const DEFAULT_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// Tile source built from a URL template.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlTemplateSource {
    name: String,
    id: String,
    template: String,
    subdomains: Vec<String>,
    extension: String,
    max_zoom: u8,
}

impl UrlTemplateSource {
    /// Creates a source from a template.
    ///
    /// The template must contain `{z}`, `{x}` and `{y}`. The cache extension
    /// is taken from the template's path (`png` when it has none).
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let template = template.into();
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !template.contains(placeholder) {
                return Err(ProviderError::InvalidTemplate(format!(
                    "'{}' is missing {}",
                    template, placeholder
                )));
            }
        }

        let id = id.into();
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(ProviderError::InvalidTemplate(format!(
                "'{}' is not a usable source id",
                id
            )));
        }

        Ok(Self {
            name: name.into(),
            id,
            extension: extension_of(&template).to_string(),
            template,
            subdomains: DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            max_zoom: MAX_ZOOM,
        })
    }

    /// Creates a source from a bare template, deriving name and id from the
    /// template's host.
    pub fn from_template(template: impl Into<String>) -> Result<Self, ProviderError> {
        let template = template.into();
        let id = format!("custom-{}", sanitize(host_of(&template)));
        let name = host_of(&template).to_string();
        Self::new(name, id, template)
    }

    /// Replaces the subdomains rotated through `{s}`.
    pub fn with_subdomains<I, S>(mut self, subdomains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let subdomains: Vec<String> = subdomains.into_iter().map(Into::into).collect();
        if !subdomains.is_empty() {
            self.subdomains = subdomains;
        }
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom.min(MAX_ZOOM);
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Subdomain for a tile. Deterministic so the same tile always maps to
    /// the same URL.
    fn subdomain_for(&self, tile: &TileCoord) -> &str {
        let index = (tile.x as usize + tile.y as usize) % self.subdomains.len();
        &self.subdomains[index]
    }
}

impl TileSource for UrlTemplateSource {
    fn tile_url(&self, tile: &TileCoord) -> String {
        self.template
            .replace("{s}", self.subdomain_for(tile))
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}

fn host_of(template: &str) -> &str {
    let rest = template
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(template);
    rest.split('/').next().unwrap_or(rest)
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

fn extension_of(template: &str) -> &'static str {
    let path = template.split(['?', '#']).next().unwrap_or(template);
    let last = path.rsplit('/').next().unwrap_or(path).to_ascii_lowercase();
    if last.ends_with(".jpg") || last.ends_with(".jpeg") {
        "jpg"
    } else if last.ends_with(".webp") {
        "webp"
    } else {
        "png"
    }
}
