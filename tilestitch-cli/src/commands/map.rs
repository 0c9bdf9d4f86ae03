//! Map command - composite (a region of) the grid into one image.

use super::common::{resolve_step, save_image, scan_registry};
use crate::error::CliError;
use std::path::PathBuf;
use tilestitch::composite::{composite, CompositeParams, RegionFilter};
use tilestitch::config::ConfigFile;

/// Arguments for the map command.
pub struct MapArgs {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub min_x: Option<i32>,
    pub min_z: Option<i32>,
    pub max_x_tiles: Option<i32>,
    pub max_z_tiles: Option<i32>,
    pub robust_step: bool,
}

/// Run the map command.
pub fn run(args: MapArgs, settings: &ConfigFile) -> Result<(), CliError> {
    let mut registry = scan_registry(&args.input_dir, settings)?;
    let step = resolve_step(&registry, args.robust_step || settings.composite.robust_step)?;

    let filter = RegionFilter {
        min_x: args.min_x,
        min_z: args.min_z,
        max_x_tiles: args.max_x_tiles,
        max_z_tiles: args.max_z_tiles,
    };
    let selection = tilestitch::composite::select_region(&registry, &filter, step)?;

    println!(
        "Compositing {} of {} tiles (step {}, crop {} px, overlap {} px)",
        selection.len(),
        registry.len(),
        step,
        settings.tiles.crop_size,
        settings.tiles.overlap
    );

    let start = std::time::Instant::now();
    let params = CompositeParams::new(settings.tiles.crop_size, settings.tiles.overlap, step);
    let map = composite(&mut registry, &selection, &params)?;
    let elapsed = start.elapsed();

    println!(
        "Composited {}x{} px in {:.2}s",
        map.width(),
        map.height(),
        elapsed.as_secs_f64()
    );

    save_image(&map, &args.output)?;
    println!("Saved {}", args.output.display());
    Ok(())
}
