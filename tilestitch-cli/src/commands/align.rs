//! Align command - estimate the inter-tile overlap from raw captures.
//!
//! Picks an alignment source (the most detailed capture, or `--at`), finds
//! its vertical neighbour, and cross-correlates the facing edge row against
//! every neighbour row. Reports the raw-pixel overlap and the equivalent
//! tile overlap for the configured crop size; `--commit` persists the
//! latter to the config file.

use super::common::{parse_at, resolve_step, scan_registry};
use crate::error::CliError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tilestitch::align::{estimate, find_highest_detail, visualize_match, VerticalDirection};
use tilestitch::config::ConfigFile;
use tilestitch::coord::WorldCoord;
use tilestitch::registry::TileRegistry;

/// Arguments for the align command.
pub struct AlignArgs {
    pub input_dir: PathBuf,
    pub at: Option<String>,
    pub dump_scores: Option<PathBuf>,
    pub visualize: Option<PathBuf>,
    pub commit: bool,
    pub robust_step: bool,
}

/// Run the align command.
pub fn run(args: AlignArgs, settings: &ConfigFile, config_path: &Path) -> Result<(), CliError> {
    let registry = scan_registry(&args.input_dir, settings)?;
    let step = resolve_step(&registry, args.robust_step || settings.composite.robust_step)?;

    let source = match &args.at {
        Some(value) => parse_at(value)?,
        None => {
            let (coord, detail) = find_highest_detail(&registry)?;
            println!("Using most detailed capture {} (detail {:.2})", coord, detail);
            coord
        }
    };

    let result = estimate(&registry, source, step)?;
    let suggested = result.suggested_tile_overlap(settings.tiles.crop_size);

    let direction = match result.direction {
        VerticalDirection::Above => "above",
        VerticalDirection::Below => "below",
    };
    println!("Source tile:      {} (row {})", result.source, result.source_row);
    println!("Neighbour:        {} ({})", result.neighbour, direction);
    println!(
        "Best match:       row {} (NCC score {:.4})",
        result.row_match.best_row, result.row_match.best_score
    );
    println!("Raw overlap:      {} px of {} px captures", result.raw_overlap, result.screenshot_height);
    println!(
        "Tile overlap:     {} px at crop size {}",
        suggested, settings.tiles.crop_size
    );

    if result.row_match.best_score < 0.8 {
        println!();
        println!("Warning: weak correlation - pick a more detailed area with --at");
    }

    if let Some(path) = &args.dump_scores {
        dump_scores(path, &result.row_match.scores)?;
        println!("Wrote per-row scores to {}", path.display());
    }

    if let Some(path) = &args.visualize {
        write_visualization(&registry, &result.source, &result.neighbour, &result, path)?;
        println!("Wrote match visualization to {}", path.display());
    }

    if args.commit {
        let overlap = i32::try_from(suggested).map_err(|_| {
            CliError::InvalidArgument(format!("derived overlap {} is out of range", suggested))
        })?;
        let mut updated = settings.clone();
        updated.tiles.overlap = overlap;
        updated.validate()?;
        updated.save_to(config_path)?;
        println!("Committed overlap {} to {}", overlap, config_path.display());
    } else {
        println!();
        println!("Re-run with --commit to persist the tile overlap.");
    }

    Ok(())
}

/// Writes the per-row NCC scores as CSV for plotting.
fn dump_scores(path: &Path, scores: &[f64]) -> Result<(), CliError> {
    let mut file = std::fs::File::create(path).map_err(|error| CliError::FileWrite {
        path: path.display().to_string(),
        error,
    })?;
    writeln!(file, "row,score").map_err(|error| CliError::FileWrite {
        path: path.display().to_string(),
        error,
    })?;
    for (row, score) in scores.iter().enumerate() {
        writeln!(file, "{},{}", row, score).map_err(|error| CliError::FileWrite {
            path: path.display().to_string(),
            error,
        })?;
    }
    Ok(())
}

fn write_visualization(
    registry: &TileRegistry,
    source: &WorldCoord,
    neighbour: &WorldCoord,
    result: &tilestitch::align::AlignmentEstimate,
    path: &Path,
) -> Result<(), CliError> {
    let load = |coord: &WorldCoord| -> Result<image::DynamicImage, CliError> {
        registry
            .get(coord)
            .ok_or_else(|| CliError::InvalidArgument(format!("tile {} not found", coord)))?
            .load_screenshot()
            .map_err(|source| CliError::Tile {
                coord: *coord,
                source,
            })
    };

    let source_img = load(source)?;
    let neighbour_img = load(neighbour)?;
    let vis = visualize_match(
        &source_img,
        result.source_row,
        &neighbour_img,
        result.row_match.best_row,
    );
    super::common::save_image(&vis, path)
}
