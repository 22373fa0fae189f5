//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to settings.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::{ConfigFile, ConfigFileError};
use super::fetch::CacheConfig;
use crate::coord::MAX_ZOOM;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        let s = Section::new("render", section);
        let mut render = config.render.clone();

        if let Some(v) = s.parsed::<u32>("tile_budget", "must be a positive integer")? {
            if v == 0 {
                return Err(s.invalid("tile_budget", "0", "must be at least 1"));
            }
            render = render.with_tile_count_budget(v);
        }
        if let Some(v) = s.parsed("color", "expected a color name or hex value like e00000")? {
            render = render.with_track_color(v);
        }
        if let Some(v) = s.parsed::<f32>("line_width", "must be a non-negative number")? {
            if !(v.is_finite() && v >= 0.0) {
                return Err(s.invalid(
                    "line_width",
                    &v.to_string(),
                    "must be a non-negative number",
                ));
            }
            render = render.with_line_width_px(v);
        }
        if let Some(v) = s.flag("antialias")? {
            render = render.with_antialias(v);
        }
        if let Some(v) = s.parsed("notice", "must be 'small' or 'normal'")? {
            render = render.with_attribution_style(v);
        }
        if let Some(v) = s.flag("background")? {
            render = render.with_show_background(v);
        }
        if let Some(raw) = s.get("zoom") {
            if !raw.eq_ignore_ascii_case("auto") {
                let zoom: u8 = raw
                    .parse()
                    .ok()
                    .filter(|z| *z <= MAX_ZOOM)
                    .ok_or_else(|| {
                        s.invalid(
                            "zoom",
                            raw,
                            &format!("must be 'auto' or an integer from 0 to {}", MAX_ZOOM),
                        )
                    })?;
                render = render.with_zoom(Some(zoom));
            }
        }

        config.render = render;
    }

    // [tiles] section
    if let Some(section) = ini.section(Some("tiles")) {
        let s = Section::new("tiles", section);

        if let Some(v) = s.parsed(
            "provider",
            "must be mapnik, humanitarian, opentopomap, carto-light, carto-dark or a URL template",
        )? {
            config.provider = v;
        }
        if let Some(v) = s.parsed::<u64>("timeout", "must be a positive integer (seconds)")? {
            config.fetch = config.fetch.with_timeout_secs(v);
        }
        if let Some(v) = s.parsed::<usize>("jobs", "must be a positive integer")? {
            config.fetch = config.fetch.with_max_concurrent_fetches(v);
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache = CacheConfig::new(expand_tilde(v));
            }
        }
    }

    // [track] section
    if let Some(section) = ini.section(Some("track")) {
        let s = Section::new("track", section);

        if let Some(v) = s.flag("filter_outliers")? {
            config.track.filter_outliers = v;
        }
        if let Some(v) = s.parsed::<f64>("percentile", "must be a number between 0 and 100")? {
            if !(v > 0.0 && v <= 100.0) {
                return Err(s.invalid(
                    "percentile",
                    &v.to_string(),
                    "must be a number between 0 and 100",
                ));
            }
            config.track.outlier_percentile = v;
        }
    }

    Ok(config)
}

/// One INI section plus its name, for error reporting.
struct Section<'a> {
    name: &'static str,
    props: &'a Properties,
}

impl<'a> Section<'a> {
    fn new(name: &'static str, props: &'a Properties) -> Self {
        Self { name, props }
    }

    /// Trimmed, non-empty value of `key`.
    fn get(&self, key: &str) -> Option<&'a str> {
        self.props
            .get(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn parsed<T: FromStr>(&self, key: &str, reason: &str) -> Result<Option<T>, ConfigFileError> {
        match self.get(key) {
            Some(v) => v
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(key, v, reason)),
            None => Ok(None),
        }
    }

    fn flag(&self, key: &str) -> Result<Option<bool>, ConfigFileError> {
        match self.get(key) {
            Some(v) => parse_bool(v)
                .map(Some)
                .ok_or_else(|| self.invalid(key, v, "must be true or false")),
            None => Ok(None),
        }
    }

    fn invalid(&self, key: &str, value: &str, reason: &str) -> ConfigFileError {
        ConfigFileError::InvalidValue {
            section: self.name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Parse a boolean value from config.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
