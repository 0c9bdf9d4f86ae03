//! Tile pyramid output.
//!
//! Publishes cropped tiles into the directory layout a hierarchical map
//! viewer consumes: `<out>/<lod>/<normalized_x>/<normalized_z>/tile.<ext>`.
//! Published tiles are re-cropped to `crop_size - overlap` so they butt
//! exactly with no duplicated edge content; further levels of detail are
//! the viewer's own downscaling concern.

use crate::coord::WorldCoord;
use crate::registry::TileRegistry;
use crate::tile::{center_crop, TileError};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// JPEG quality for published tiles.
const JPEG_QUALITY: u8 = 95;

/// Parameters for pyramid publication.
#[derive(Debug, Clone)]
pub struct PyramidParams {
    /// Level-of-detail directory the tiles land in
    pub lod: u32,
    /// Published tile filename (without extension)
    pub tile_name: String,
    /// Published tile format extension: "jpg" or "png"
    pub format: String,
}

impl Default for PyramidParams {
    fn default() -> Self {
        PyramidParams {
            lod: 5,
            tile_name: "tile".to_string(),
            format: "jpg".to_string(),
        }
    }
}

/// Errors that can occur while publishing the pyramid.
#[derive(Debug, Error)]
pub enum PyramidError {
    /// Configuration rejected before any I/O
    #[error("invalid pyramid configuration: {0}")]
    InvalidConfig(String),

    /// A tile's cropped image could not be produced
    #[error("tile {coord} failed: {source}")]
    Tile {
        coord: WorldCoord,
        source: TileError,
    },

    /// Filesystem failure
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Image encoding failure
    #[error("failed to encode '{path}': {message}")]
    Encode { path: PathBuf, message: String },
}

/// Counters for one publication run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PyramidSummary {
    /// Tiles written this run
    pub written: usize,
    /// Tiles skipped because the output already existed
    pub skipped: usize,
}

/// Publishes every registry tile into the pyramid tree.
///
/// Tile positions are the world coordinates divided by the step size (not
/// relative to the registry minimum - the viewer's origin is the world
/// origin). Existing outputs are left alone so repeated runs only fill
/// gaps. Each tile's payload is released after it is written.
///
/// # Errors
///
/// Fails fast on the first tile whose cropped image cannot be read; already
/// written outputs are not removed.
pub fn write_initial_tiles(
    registry: &mut TileRegistry,
    output_dir: &Path,
    params: &PyramidParams,
    crop_size: u32,
    overlap: i32,
    step: i32,
) -> Result<PyramidSummary, PyramidError> {
    if step <= 0 {
        return Err(PyramidError::InvalidConfig(format!(
            "step size must be positive, got {}",
            step
        )));
    }
    let target = crop_size as i64 - overlap as i64;
    if target <= 0 {
        return Err(PyramidError::InvalidConfig(format!(
            "published tile size {} must be positive (crop {} minus overlap {})",
            target, crop_size, overlap
        )));
    }
    let target = target as u32;

    let mut summary = PyramidSummary::default();

    for coord in registry.coords() {
        let normalized_x = coord.x.div_euclid(step);
        let normalized_z = coord.z.div_euclid(step);

        let tile_path = output_dir
            .join(params.lod.to_string())
            .join(normalized_x.to_string())
            .join(normalized_z.to_string())
            .join(format!("{}.{}", params.tile_name, params.format));

        if tile_path.exists() {
            debug!(coord = %coord, path = %tile_path.display(), "Tile already published");
            summary.skipped += 1;
            continue;
        }

        let Some(tile) = registry.get_mut(&coord) else {
            continue;
        };
        let image = tile
            .tile_image()
            .map_err(|source| PyramidError::Tile { coord, source })?;

        // Trim the overlap strip off tiles cropped at the capture size
        let published = if image.width() != target || image.height() != target {
            center_crop(image, target).map_err(|source| PyramidError::Tile { coord, source })?
        } else {
            image.clone()
        };

        if let Some(parent) = tile_path.parent() {
            fs::create_dir_all(parent).map_err(|source| PyramidError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        save_tile(&published, &tile_path, &params.format)?;
        tile.unload();

        debug!(coord = %coord, path = %tile_path.display(), "Published tile");
        summary.written += 1;
    }

    info!(
        written = summary.written,
        skipped = summary.skipped,
        out = %output_dir.display(),
        "Pyramid publication complete"
    );
    Ok(summary)
}

/// Writes one published tile, JPEG at fixed quality or by extension.
fn save_tile(image: &DynamicImage, path: &Path, format: &str) -> Result<(), PyramidError> {
    if format.eq_ignore_ascii_case("jpg") || format.eq_ignore_ascii_case("jpeg") {
        let rgb = image.to_rgb8();
        let file = fs::File::create(path).map_err(|source| PyramidError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut encoder = JpegEncoder::new_with_quality(file, JPEG_QUALITY);
        encoder
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| PyramidError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    } else {
        image.save(path).map_err(|e| PyramidError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
