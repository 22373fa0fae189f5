//! trackmap CLI - render GPS tracks as map images
//!
//! ```text
//! trackmap render ride.gpx                 # writes ride.png next to the track
//! trackmap render -o map.jpg --budget 9 ride.kmz
//! trackmap cache stats
//! ```

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trackmap::config::ConfigFile;
use trackmap::logging;

use commands::cache::CacheAction;
use commands::render::RenderArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "trackmap")]
#[command(version, about = "Render GPS tracks as static map images", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to read instead of ~/.trackmap/config.ini
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write log output to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one map image per track file
    Render(RenderArgs),

    /// Manage the tile cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

fn main() {
    let cli = Cli::parse();

    let _guard = match logging::init_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e).exit(),
    };

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    match cli.command {
        Commands::Render(args) => commands::render::run(args, &config),
        Commands::Cache { action } => commands::cache::run(action, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "trackmap", "render", "-v", "--budget", "9", "-o", "out.png", "ride.gpx",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.files, vec![PathBuf::from("ride.gpx")]);
                assert_eq!(args.output, Some(PathBuf::from("out.png")));
                assert_eq!(args.budget, Some(9));
            }
            Commands::Cache { .. } => panic!("expected render"),
        }
    }

    #[test]
    fn test_render_requires_a_file() {
        assert!(Cli::try_parse_from(["trackmap", "render"]).is_err());
    }

    #[test]
    fn test_parse_cache_stats() {
        let cli = Cli::try_parse_from(["trackmap", "cache", "stats"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cache {
                action: CacheAction::Stats { .. }
            }
        ));
    }
}
