//! Pyramid command - publish tiles into the map viewer's directory tree.

use super::common::{resolve_step, scan_registry};
use crate::error::CliError;
use std::path::PathBuf;
use tilestitch::config::ConfigFile;
use tilestitch::pyramid::{write_initial_tiles, PyramidParams};

/// Arguments for the pyramid command.
pub struct PyramidArgs {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub lod: Option<u32>,
    pub robust_step: bool,
}

/// Run the pyramid command.
pub fn run(args: PyramidArgs, settings: &ConfigFile) -> Result<(), CliError> {
    let mut registry = scan_registry(&args.input_dir, settings)?;
    let step = resolve_step(&registry, args.robust_step || settings.composite.robust_step)?;

    let params = PyramidParams {
        lod: args.lod.unwrap_or(settings.pyramid.lod),
        tile_name: settings.pyramid.tile_name.clone(),
        format: settings.pyramid.format.clone(),
    };

    println!(
        "Publishing {} tiles to {} (LOD {}, {} px per tile)",
        registry.len(),
        args.output_dir.display(),
        params.lod,
        settings.tiles.crop_size as i64 - settings.tiles.overlap as i64
    );

    let summary = write_initial_tiles(
        &mut registry,
        &args.output_dir,
        &params,
        settings.tiles.crop_size,
        settings.tiles.overlap,
        step,
    )?;

    println!(
        "Done: {} tiles written, {} already present",
        summary.written, summary.skipped
    );
    Ok(())
}
