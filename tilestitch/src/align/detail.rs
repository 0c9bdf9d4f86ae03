//! Screenshot detail measurement.
//!
//! Alignment quality depends on the source screenshot having texture to
//! correlate against; a capture of flat ocean or bare terrain produces
//! near-degenerate rows. The detail score is the mean intensity of a 3x3
//! edge filter over the grayscale screenshot, and the estimator uses it to
//! pick a high-texture capture as the alignment source.

use super::AlignError;
use crate::coord::WorldCoord;
use crate::registry::TileRegistry;
use image::imageops;
use image::DynamicImage;
use tracing::debug;

/// Laplacian-style edge kernel, matching a standard find-edges filter.
const EDGE_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];

/// Mean edge intensity of a screenshot, higher is more detailed.
pub fn measure_detail(img: &DynamicImage) -> f64 {
    let gray = img.to_luma8();
    let edges = imageops::filter3x3(&gray, &EDGE_KERNEL);
    let (width, height) = edges.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }
    let sum: u64 = edges.as_raw().iter().map(|v| u64::from(*v)).sum();
    sum as f64 / (u64::from(width) * u64::from(height)) as f64
}

/// Finds the registry tile with the most detailed screenshot.
///
/// Tiles without a raw screenshot are skipped. Fails with
/// [`AlignError::NoSource`] when no tile has one.
pub fn find_highest_detail(registry: &TileRegistry) -> Result<(WorldCoord, f64), AlignError> {
    let mut best: Option<(WorldCoord, f64)> = None;
    for tile in registry.iter() {
        if tile.screenshot_path().is_none() {
            continue;
        }
        let img = tile.load_screenshot().map_err(|source| AlignError::Tile {
            coord: tile.coord(),
            source,
        })?;
        let detail = measure_detail(&img);
        debug!(coord = %tile.coord(), detail, "Measured screenshot detail");
        if best.map_or(true, |(_, d)| detail > d) {
            best = Some((tile.coord(), detail));
        }
    }
    best.ok_or(AlignError::NoSource)
}
