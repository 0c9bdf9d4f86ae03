//! Tiles command - batch-crop raw screenshots into tile files.

use super::common::scan_registry;
use crate::error::CliError;
use std::path::PathBuf;
use tilestitch::config::ConfigFile;

/// Arguments for the tiles command.
pub struct TilesArgs {
    pub input_dir: PathBuf,
}

/// Run the tiles command.
pub fn run(args: TilesArgs, settings: &ConfigFile) -> Result<(), CliError> {
    let mut registry = scan_registry(&args.input_dir, settings)?;
    println!("Found {} captures in {}", registry.len(), args.input_dir.display());

    let mut created = 0usize;
    let mut skipped = 0usize;

    for coord in registry.coords() {
        let Some(tile) = registry.get_mut(&coord) else {
            continue;
        };
        if tile.screenshot_path().is_none() {
            continue;
        }

        if settings.tiles.skip_existing && tile.tile_exists(&settings.tiles.suffix) {
            skipped += 1;
            continue;
        }

        let path = tile
            .create_tile(settings.tiles.crop_size, &settings.tiles.suffix)
            .map_err(|source| CliError::Tile { coord, source })?;
        tile.unload();
        println!("Created {}", path.display());
        created += 1;

        if settings.tiles.delete_originals {
            if let Some(screenshot) = tile.screenshot_path().map(PathBuf::from) {
                std::fs::remove_file(&screenshot).map_err(|error| CliError::FileRemove {
                    path: screenshot.display().to_string(),
                    error,
                })?;
            }
        }
    }

    println!();
    println!(
        "Done: {} tiles created, {} skipped (crop size {} px)",
        created, skipped, settings.tiles.crop_size
    );
    Ok(())
}
