//! The `render` command.
//!
//! Settings are resolved once for all inputs: command-line flags win over the
//! config file, which wins over built-in defaults. Each track is then loaded,
//! optionally filtered and rendered into its own image.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;
use trackmap::cache::TileCache;
use trackmap::config::{AttributionStyle, ConfigFile, FetchConfig, RenderOptions, TrackColor};
use trackmap::provider::{ProviderConfig, ReqwestClient};
use trackmap::render::Watermark;
use trackmap::track::{remove_outliers, Track, TrackFile, TrackSource};
use trackmap::MapPipeline;

use crate::error::CliError;

/// Extension used when no `--output` is given.
const DEFAULT_OUTPUT_EXTENSION: &str = "png";

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Track files (.gpx, .kml or .kmz)
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Output image (.png, .jpg or .jpeg). Defaults to <track>.png next to the track
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Draw the track on white instead of map tiles
    #[arg(long)]
    pub no_background: bool,

    /// Line color: a name (red, blue, ...) or hex RRGGBB[AA]
    #[arg(long, value_name = "COLOR")]
    pub color: Option<String>,

    /// Line width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<f32>,

    /// Fixed zoom level instead of picking one from the budget
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=19))]
    pub zoom: Option<u8>,

    /// Tile budget; the image is about sqrt(budget) tiles on a side
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub budget: Option<u32>,

    /// Tile server preset or a URL template with {z}, {x} and {y}
    #[arg(long, value_name = "NAME|URL")]
    pub provider: Option<String>,

    /// Tile cache directory
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Attribution badge size: small or normal
    #[arg(long, value_name = "STYLE")]
    pub notice: Option<String>,

    /// Draw the line without antialiasing
    #[arg(long)]
    pub no_antialias: bool,

    /// Drop points far away from the rest of the track
    #[arg(long)]
    pub filter_outliers: bool,

    /// Distance percentile kept by the outlier filter (implies --filter-outliers)
    #[arg(long, value_name = "P")]
    pub percentile: Option<f64>,

    /// HTTP timeout per tile in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Parallel tile downloads
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Custom attribution badge image (needs --logo)
    #[arg(long, requires = "logo", value_name = "IMAGE")]
    pub badge: Option<PathBuf>,

    /// Custom attribution logo image (needs --badge)
    #[arg(long, requires = "badge", value_name = "IMAGE")]
    pub logo: Option<PathBuf>,
}

/// Settings after merging flags, config file and defaults.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    options: RenderOptions,
    fetch: FetchConfig,
    provider: ProviderConfig,
    cache_dir: PathBuf,
    /// Percentile for the outlier filter, if enabled
    outlier_percentile: Option<f64>,
}

/// Run the render command.
pub fn run(args: RenderArgs, config: &ConfigFile) -> Result<(), CliError> {
    let jobs = output_paths(&args.files, args.output.as_deref())?;
    let settings = resolve(&args, config)?;

    let source = settings.provider.create()?;
    let client = ReqwestClient::with_timeout(settings.fetch.timeout_secs())?;
    let cache = TileCache::new(&settings.cache_dir, client);
    info!(
        provider = %settings.provider,
        cache = %settings.cache_dir.display(),
        "Tile source ready"
    );

    let mut pipeline = MapPipeline::new(&cache, &source, settings.options.clone(), settings.fetch);
    if let (Some(badge), Some(logo)) = (&args.badge, &args.logo) {
        let watermark = Watermark::load(settings.options.attribution_style(), badge, logo)
            .map_err(|error| CliError::Render {
                path: badge.clone(),
                error,
            })?;
        pipeline = pipeline.with_watermark(watermark);
    }

    for (track_path, output) in jobs {
        let track = load_track(&track_path, settings.outlier_percentile)?;
        let map = pipeline
            .render_to_file(&track.positions(), &output)
            .map_err(|error| CliError::Render {
                path: track_path.clone(),
                error,
            })?;
        println!(
            "{} -> {} ({}x{}, zoom {})",
            track_path.display(),
            output.display(),
            map.image.width(),
            map.image.height(),
            map.grid.zoom
        );
    }

    Ok(())
}

/// Pairs every input with its output file.
fn output_paths(
    files: &[PathBuf],
    output: Option<&Path>,
) -> Result<Vec<(PathBuf, PathBuf)>, CliError> {
    match output {
        Some(out) if files.len() > 1 => Err(CliError::Config(format!(
            "--output {} can only be used with a single track file ({} given)",
            out.display(),
            files.len()
        ))),
        Some(out) => Ok(files
            .iter()
            .map(|f| (f.clone(), out.to_path_buf()))
            .collect()),
        None => Ok(files
            .iter()
            .map(|f| (f.clone(), f.with_extension(DEFAULT_OUTPUT_EXTENSION)))
            .collect()),
    }
}

fn resolve(args: &RenderArgs, config: &ConfigFile) -> Result<Settings, CliError> {
    let file = &config.render;
    let mut options = file
        .clone()
        .with_show_background(file.show_background() && !args.no_background)
        .with_antialias(file.antialias() && !args.no_antialias);

    if let Some(color) = &args.color {
        let color: TrackColor = color
            .parse()
            .map_err(|e| CliError::Config(format!("--color: {}", e)))?;
        options = options.with_track_color(color);
    }
    if let Some(width) = args.width {
        if !(width.is_finite() && width > 0.0) {
            return Err(CliError::Config(format!(
                "--width must be a positive number, got {}",
                width
            )));
        }
        options = options.with_line_width_px(width);
    }
    if let Some(zoom) = args.zoom {
        options = options.with_zoom(Some(zoom));
    }
    if let Some(budget) = args.budget {
        options = options.with_tile_count_budget(budget);
    }
    if let Some(notice) = &args.notice {
        let style: AttributionStyle = notice
            .parse()
            .map_err(|e| CliError::Config(format!("--notice: {}", e)))?;
        options = options.with_attribution_style(style);
    }

    let mut fetch = config.fetch;
    if let Some(timeout) = args.timeout {
        fetch = fetch.with_timeout_secs(timeout);
    }
    if let Some(jobs) = args.jobs {
        fetch = fetch.with_max_concurrent_fetches(jobs);
    }

    let provider = match &args.provider {
        Some(name) => name.parse::<ProviderConfig>()?,
        None => config.provider.clone(),
    };

    let cache_dir = args
        .cache_dir
        .clone()
        .unwrap_or_else(|| config.cache.directory().to_path_buf());

    let filter = args.filter_outliers || args.percentile.is_some() || config.track.filter_outliers;
    let outlier_percentile = if filter {
        let p = args.percentile.unwrap_or(config.track.outlier_percentile);
        if !(0.0..=100.0).contains(&p) {
            return Err(CliError::Config(format!(
                "--percentile must be between 0 and 100, got {}",
                p
            )));
        }
        Some(p)
    } else {
        None
    };

    Ok(Settings {
        options,
        fetch,
        provider,
        cache_dir,
        outlier_percentile,
    })
}

fn load_track(path: &Path, outlier_percentile: Option<f64>) -> Result<Track, CliError> {
    let mut track = TrackFile::from_path(path)?.load()?;

    if let Some(p) = outlier_percentile {
        let before = track.len();
        track = remove_outliers(&track, p);
        info!(
            removed = before - track.len(),
            percentile = p,
            "Outlier filter applied"
        );
    }

    info!(
        name = track.name().unwrap_or(""),
        points = track.len(),
        length_km = %format!("{:.2}", track.length_meters() / 1000.0),
        duration = %track
            .time_span()
            .map(|d| format_duration(d.num_seconds()))
            .unwrap_or_else(|| "-".to_string()),
        "Track loaded"
    );
    Ok(track)
}

/// Formats seconds as `H:MM:SS`.
fn format_duration(seconds: i64) -> String {
    let s = seconds.max(0);
    format!("{}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}
