//! Alignment estimator - discovers the inter-tile overlap.
//!
//! Adjacent captures duplicate a strip of edge content. Given one raw
//! screenshot and its vertical neighbour, the estimator finds the neighbour
//! row that best matches the source's edge row via normalized
//! cross-correlation, then derives how many raw pixels the two captures
//! overlap by. The result is advisory: the CLI scales it into the cropped
//! tile's overlap setting and persists it only on explicit confirmation.

mod detail;
mod ncc;
mod preview;

pub use detail::{find_highest_detail, measure_detail};
pub use ncc::{match_row, RowMatch};
pub use preview::{preview_pair, Direction};

use crate::coord::WorldCoord;
use crate::registry::{RegistryError, TileRegistry};
use crate::tile::TileError;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during alignment estimation.
#[derive(Debug, Error)]
pub enum AlignError {
    /// The requested source row does not exist in the source image
    #[error("source row {row} is outside image height {height}")]
    RowOutOfBounds { row: u32, height: u32 },

    /// An input image has no pixels
    #[error("image has no pixels")]
    EmptyImage,

    /// The source tile has no neighbour in the examined directions
    #[error("tile {0} has no vertical neighbour to align against")]
    NoNeighbour(WorldCoord),

    /// No tile with a raw screenshot is available as an alignment source
    #[error("no tile with a raw screenshot available for alignment")]
    NoSource,

    /// The requested coordinate is not in the registry
    #[error("tile {0} is not in the registry")]
    UnknownTile(WorldCoord),

    /// A screenshot payload could not be read
    #[error("tile {coord} failed: {source}")]
    Tile {
        coord: WorldCoord,
        source: TileError,
    },

    /// Registry-level failure
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Preview configuration rejected
    #[error("invalid preview: {0}")]
    InvalidPreview(String),
}

/// Where the examined neighbour sits relative to the source tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalDirection {
    /// Neighbour is north of the source (larger world z)
    Above,
    /// Neighbour is south of the source (smaller world z)
    Below,
}

/// Outcome of one alignment estimation.
#[derive(Debug, Clone)]
pub struct AlignmentEstimate {
    /// Source tile examined
    pub source: WorldCoord,
    /// Neighbour tile matched against
    pub neighbour: WorldCoord,
    /// Neighbour position relative to the source
    pub direction: VerticalDirection,
    /// Source row that was matched (an edge row)
    pub source_row: u32,
    /// Height of the raw screenshots in pixels
    pub screenshot_height: u32,
    /// Row-by-row match result
    pub row_match: RowMatch,
    /// Duplicated rows between the two raw screenshots
    pub raw_overlap: i64,
}

impl AlignmentEstimate {
    /// Scales the raw-screenshot overlap into a cropped-tile overlap.
    ///
    /// The vertical distance between capture centers is
    /// `screenshot_height - raw_overlap` pixels; cropped tiles of
    /// `crop_size` pixels must then overlap by `crop_size` minus that
    /// pitch. The result can be negative when the crop is smaller than the
    /// capture pitch (tiles need spreading apart).
    pub fn suggested_tile_overlap(&self, crop_size: u32) -> i64 {
        let pitch = self.screenshot_height as i64 - self.raw_overlap;
        crop_size as i64 - pitch
    }
}

/// Converts a matched row index into a raw-pixel overlap.
///
/// With the neighbour above, the duplicated strip runs from the matched row
/// to the neighbour's bottom edge; below, from its top edge through the
/// matched row.
pub fn derive_overlap(direction: VerticalDirection, neighbour_height: u32, best_row: u32) -> i64 {
    match direction {
        VerticalDirection::Above => neighbour_height as i64 - best_row as i64,
        VerticalDirection::Below => best_row as i64 + 1,
    }
}

/// Estimates the overlap for a source tile against a vertical neighbour.
///
/// Prefers the neighbour above (larger world z); falls back to the one
/// below. The matched source row is the edge row facing the neighbour: row
/// 0 when the neighbour is above, the bottom row when below.
///
/// # Errors
///
/// [`AlignError::UnknownTile`] for an unregistered source coordinate and
/// [`AlignError::NoNeighbour`] when neither vertical neighbour exists.
/// Unreadable screenshots fail fast with [`AlignError::Tile`].
pub fn estimate(
    registry: &TileRegistry,
    source: WorldCoord,
    step: i32,
) -> Result<AlignmentEstimate, AlignError> {
    let source_tile = registry
        .get(&source)
        .ok_or(AlignError::UnknownTile(source))?;

    let above = registry.find_neighbour(source, 0, step);
    let below = registry.find_neighbour(source, 0, -step);
    let (neighbour_tile, direction) = match (above, below) {
        (Some(t), _) => (t, VerticalDirection::Above),
        (None, Some(t)) => (t, VerticalDirection::Below),
        (None, None) => return Err(AlignError::NoNeighbour(source)),
    };

    let source_img = source_tile
        .load_screenshot()
        .map_err(|e| AlignError::Tile {
            coord: source,
            source: e,
        })?;
    let neighbour_img = neighbour_tile
        .load_screenshot()
        .map_err(|e| AlignError::Tile {
            coord: neighbour_tile.coord(),
            source: e,
        })?;

    let source_row = match direction {
        VerticalDirection::Above => 0,
        VerticalDirection::Below => source_img.height().saturating_sub(1),
    };

    let row_match = match_row(&source_img, source_row, &neighbour_img)?;
    let raw_overlap = derive_overlap(direction, neighbour_img.height(), row_match.best_row);

    info!(
        source = %source,
        neighbour = %neighbour_tile.coord(),
        best_row = row_match.best_row,
        best_score = row_match.best_score,
        raw_overlap,
        "Alignment estimate"
    );

    Ok(AlignmentEstimate {
        source,
        neighbour: neighbour_tile.coord(),
        direction,
        source_row,
        screenshot_height: neighbour_img.height(),
        row_match,
        raw_overlap,
    })
}

/// Renders the source and neighbour side by side with the matched rows
/// painted red, for eyeballing an estimate.
pub fn visualize_match(
    source: &DynamicImage,
    source_row: u32,
    neighbour: &DynamicImage,
    matched_row: u32,
) -> RgbaImage {
    let source_rgba = source.to_rgba8();
    let neighbour_rgba = neighbour.to_rgba8();

    let width = source_rgba.width() + neighbour_rgba.width();
    let height = source_rgba.height().max(neighbour_rgba.height());
    let mut canvas = RgbaImage::new(width, height);

    preview::blit(&mut canvas, &source_rgba, 0, 0);
    preview::blit(&mut canvas, &neighbour_rgba, source_rgba.width(), 0);

    let red = Rgba([255, 0, 0, 255]);
    if source_row < source_rgba.height() {
        for x in 0..source_rgba.width() {
            canvas.put_pixel(x, source_row, red);
        }
    }
    if matched_row < neighbour_rgba.height() {
        for x in 0..neighbour_rgba.width() {
            canvas.put_pixel(source_rgba.width() + x, matched_row, red);
        }
    }

    canvas
}
