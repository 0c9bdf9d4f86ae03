//! Tilestitch CLI - command-line interface
//!
//! This binary provides a command-line interface to the tilestitch library:
//! crop captures into tiles, composite maps, publish tile pyramids, and
//! calibrate the inter-tile overlap.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use commands::preview::PreviewDirection;
use error::CliError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tilestitch")]
#[command(version = tilestitch::VERSION)]
#[command(about = "Assemble map tiles from editor screenshot captures", long_about = None)]
struct Cli {
    /// Config file path (defaults to ./tilestitch.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured tile crop size in pixels
    #[arg(long, global = true)]
    crop_size: Option<u32>,

    /// Override the configured inter-tile overlap in pixels
    #[arg(long, global = true, allow_hyphen_values = true)]
    overlap: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crop raw screenshots into tile files
    Tiles {
        /// Directory of capture sessions
        input_dir: PathBuf,
    },

    /// Composite (a region of) the grid into one map image
    Map {
        /// Directory of capture sessions
        input_dir: PathBuf,

        /// Output image path (.png or .jpg)
        #[arg(long, default_value = "map.png")]
        output: PathBuf,

        /// Only include tiles at or east of this world x
        #[arg(long, allow_hyphen_values = true)]
        min_x: Option<i32>,

        /// Only include tiles at or north of this world z
        #[arg(long, allow_hyphen_values = true)]
        min_z: Option<i32>,

        /// Bound the grid to this many tile columns
        #[arg(long)]
        max_x_tiles: Option<i32>,

        /// Bound the grid to this many tile rows
        #[arg(long)]
        max_z_tiles: Option<i32>,

        /// Infer the grid step from the minimum pairwise coordinate delta
        #[arg(long)]
        robust_step: bool,
    },

    /// Publish tiles into the map viewer's pyramid directory tree
    Pyramid {
        /// Directory of capture sessions
        input_dir: PathBuf,

        /// Root of the pyramid output tree
        output_dir: PathBuf,

        /// Level-of-detail directory to publish into
        #[arg(long)]
        lod: Option<u32>,

        /// Infer the grid step from the minimum pairwise coordinate delta
        #[arg(long)]
        robust_step: bool,
    },

    /// Estimate the inter-tile overlap from adjacent raw captures
    Align {
        /// Directory of capture sessions
        input_dir: PathBuf,

        /// Source tile coordinate as <x>,<z> (default: most detailed capture)
        #[arg(long)]
        at: Option<String>,

        /// Write per-row NCC scores to a CSV file
        #[arg(long)]
        dump_scores: Option<PathBuf>,

        /// Write a side-by-side match visualization image
        #[arg(long)]
        visualize: Option<PathBuf>,

        /// Persist the derived tile overlap to the config file
        #[arg(long)]
        commit: bool,

        /// Infer the grid step from the minimum pairwise coordinate delta
        #[arg(long)]
        robust_step: bool,
    },

    /// Render an overlap preview for one tile pair
    Preview {
        /// Directory of capture sessions
        input_dir: PathBuf,

        /// Tile coordinate as <x>,<z>
        #[arg(long)]
        at: String,

        /// Which neighbour to pair with
        #[arg(long, value_enum, default_value = "horizontal")]
        direction: PreviewDirection,

        /// Output image path
        #[arg(long, default_value = "preview.png")]
        output: PathBuf,

        /// Infer the grid step from the minimum pairwise coordinate delta
        #[arg(long)]
        robust_step: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let (settings, config_path) =
        commands::common::load_settings(cli.config.as_deref(), cli.crop_size, cli.overlap)?;

    let _guard =
        tilestitch::logging::init_logging(&settings.logging.directory, &settings.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    tracing::info!(version = tilestitch::VERSION, "tilestitch starting");

    match cli.command {
        Command::Tiles { input_dir } => {
            commands::tiles::run(commands::tiles::TilesArgs { input_dir }, &settings)
        }
        Command::Map {
            input_dir,
            output,
            min_x,
            min_z,
            max_x_tiles,
            max_z_tiles,
            robust_step,
        } => commands::map::run(
            commands::map::MapArgs {
                input_dir,
                output,
                min_x,
                min_z,
                max_x_tiles,
                max_z_tiles,
                robust_step,
            },
            &settings,
        ),
        Command::Pyramid {
            input_dir,
            output_dir,
            lod,
            robust_step,
        } => commands::pyramid::run(
            commands::pyramid::PyramidArgs {
                input_dir,
                output_dir,
                lod,
                robust_step,
            },
            &settings,
        ),
        Command::Align {
            input_dir,
            at,
            dump_scores,
            visualize,
            commit,
            robust_step,
        } => commands::align::run(
            commands::align::AlignArgs {
                input_dir,
                at,
                dump_scores,
                visualize,
                commit,
                robust_step,
            },
            &settings,
            &config_path,
        ),
        Command::Preview {
            input_dir,
            at,
            direction,
            output,
            robust_step,
        } => commands::preview::run(
            commands::preview::PreviewArgs {
                input_dir,
                at,
                direction,
                output,
                robust_step,
            },
            &settings,
        ),
    }
}
