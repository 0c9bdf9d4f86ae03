//! Preview command - render one overlap preview pair.
//!
//! The file-writing form of the interactive alignment tool: pick a tile and
//! a direction, render the pair at a candidate overlap, inspect the seam,
//! adjust, repeat. Settings are only persisted via `align --commit`.

use super::common::{parse_at, resolve_step, save_image, scan_registry};
use crate::error::CliError;
use clap::ValueEnum;
use std::path::PathBuf;
use tilestitch::align::{preview_pair, AlignError, Direction};
use tilestitch::config::ConfigFile;
use tilestitch::coord::WorldCoord;

/// Which neighbour to pair the tile with.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PreviewDirection {
    /// The tile to the east, shown to the right
    Horizontal,
    /// The tile to the south, shown below
    Vertical,
}

/// Arguments for the preview command.
pub struct PreviewArgs {
    pub input_dir: PathBuf,
    pub at: String,
    pub direction: PreviewDirection,
    pub output: PathBuf,
    pub robust_step: bool,
}

/// Run the preview command.
pub fn run(args: PreviewArgs, settings: &ConfigFile) -> Result<(), CliError> {
    let mut registry = scan_registry(&args.input_dir, settings)?;
    let step = resolve_step(&registry, args.robust_step || settings.composite.robust_step)?;

    let coord = parse_at(&args.at)?;
    let (dx, dz, direction) = match args.direction {
        PreviewDirection::Horizontal => (step, 0, Direction::Horizontal),
        PreviewDirection::Vertical => (0, -step, Direction::Vertical),
    };

    let neighbour_coord = registry
        .find_neighbour(coord, dx, dz)
        .map(|t| t.coord())
        .ok_or(CliError::Align(AlignError::NoNeighbour(coord)))?;

    let crop_size = settings.tiles.crop_size;
    let current = tile_pixels(&mut registry, coord, crop_size)?;
    let neighbour = tile_pixels(&mut registry, neighbour_coord, crop_size)?;

    let preview = preview_pair(&current, &neighbour, direction, settings.tiles.overlap)?;
    save_image(&preview, &args.output)?;

    println!(
        "Previewing {} next to {} at overlap {} px",
        coord, neighbour_coord, settings.tiles.overlap
    );
    println!("Saved {}", args.output.display());
    Ok(())
}

fn tile_pixels(
    registry: &mut tilestitch::registry::TileRegistry,
    coord: WorldCoord,
    crop_size: u32,
) -> Result<image::RgbaImage, CliError> {
    let tile = registry
        .get_mut(&coord)
        .ok_or_else(|| CliError::InvalidArgument(format!("tile {} not found", coord)))?;
    let pixels = tile
        .composite_pixels(crop_size)
        .map_err(|source| CliError::Tile { coord, source })?;
    tile.unload();
    Ok(pixels)
}
