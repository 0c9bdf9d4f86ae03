//! Helpers shared by the CLI commands.

use crate::error::CliError;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbaImage};
use std::path::{Path, PathBuf};
use tilestitch::config::{ConfigFile, CONFIG_FILE_NAME};
use tilestitch::coord::WorldCoord;
use tilestitch::registry::TileRegistry;
use tilestitch::scan::scan_directory;

/// JPEG quality for saved composites.
const JPEG_QUALITY: u8 = 95;

/// Loads the config file and applies command-line overrides.
///
/// Returns the effective settings and the path they came from (used by
/// `align --commit` to persist a calibrated overlap back to the same file).
pub fn load_settings(
    config_path: Option<&Path>,
    crop_size: Option<u32>,
    overlap: Option<i32>,
) -> Result<(ConfigFile, PathBuf), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    let mut config = ConfigFile::load_from(&path)?;
    if let Some(crop_size) = crop_size {
        config.tiles.crop_size = crop_size;
    }
    if let Some(overlap) = overlap {
        config.tiles.overlap = overlap;
    }
    config.validate()?;
    Ok((config, path))
}

/// Scans the input directory into a registry.
pub fn scan_registry(input_dir: &Path, settings: &ConfigFile) -> Result<TileRegistry, CliError> {
    Ok(scan_directory(input_dir, &settings.tiles.suffix)?)
}

/// Resolves the grid step size from the registry.
///
/// The default matches the capture tool: the first two tiles in sort
/// order. `robust` switches to the minimum pairwise coordinate delta,
/// which survives gaps in the capture grid.
pub fn resolve_step(registry: &TileRegistry, robust: bool) -> Result<i32, CliError> {
    let step = if robust {
        registry.min_pairwise_step()?
    } else {
        registry.step_size()?
    };
    Ok(step)
}

/// Parses an `<x>,<z>` coordinate argument.
pub fn parse_at(value: &str) -> Result<WorldCoord, CliError> {
    let err = || {
        CliError::InvalidArgument(format!(
            "expected a coordinate like 5700,3800 - got '{}'",
            value
        ))
    };

    let (x_str, z_str) = value.split_once(',').ok_or_else(err)?;
    let x = x_str.trim().parse::<i32>().map_err(|_| err())?;
    let z = z_str.trim().parse::<i32>().map_err(|_| err())?;
    Ok(WorldCoord::new(x, z))
}

/// Saves an image, JPEG at fixed quality or by file extension.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<(), CliError> {
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false);

    if is_jpeg {
        // Convert RGBA to RGB for JPEG
        let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
        let file = std::fs::File::create(path).map_err(|error| CliError::FileWrite {
            path: path.display().to_string(),
            error,
        })?;
        let mut encoder = JpegEncoder::new_with_quality(file, JPEG_QUALITY);
        encoder
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| CliError::FileWrite {
                path: path.display().to_string(),
                error: std::io::Error::other(e.to_string()),
            })
    } else {
        image.save(path).map_err(|e| CliError::FileWrite {
            path: path.display().to_string(),
            error: std::io::Error::other(e.to_string()),
        })
    }
}
