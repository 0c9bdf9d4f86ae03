//! Compositor - assembles cropped tiles into one map image.
//!
//! Tiles are placed on an integer grid derived from their world coordinates
//! and pasted onto a single canvas. Adjacent captures share duplicated edge
//! content, so each tile is shifted toward its neighbours by the configured
//! overlap; the shift scales linearly with the grid index so the cumulative
//! displacement compounds correctly across the whole row or column.
//!
//! Sign convention: positive overlap closes the gap between tiles (smaller
//! canvas), negative overlap spreads them apart. With overlap `k` and an
//! `m x n` grid of `c`-pixel tiles the canvas is exactly
//! `(m*c - (m-1)*k)` by `(n*c - (n-1)*k)` pixels.
//!
//! The compositor performs no seam detection: a miscalibrated overlap shows
//! up as visible seams or double-exposed strips in the output, not as an
//! error.

mod error;

pub use error::CompositeError;

use crate::coord::{normalize, to_grid, WorldCoord};
use crate::registry::TileRegistry;
use image::RgbaImage;
use tracing::{debug, info};

/// Parameters for one compositing run.
///
/// Passed explicitly into every call; nothing here is global state.
#[derive(Debug, Clone, Copy)]
pub struct CompositeParams {
    /// Side length of each cropped tile in pixels
    pub crop_size: u32,
    /// Signed inter-tile overlap in pixels (positive pulls tiles together)
    pub overlap: i32,
    /// Grid step size in world units
    pub step: i32,
}

impl CompositeParams {
    /// Creates parameters; call [`CompositeParams::validate`] before use.
    pub fn new(crop_size: u32, overlap: i32, step: i32) -> Self {
        CompositeParams {
            crop_size,
            overlap,
            step,
        }
    }

    /// Rejects configurations that cannot produce a canvas.
    ///
    /// Runs before any image I/O.
    pub fn validate(&self) -> Result<(), CompositeError> {
        if self.crop_size == 0 {
            return Err(CompositeError::InvalidConfig(
                "crop size must be positive".to_string(),
            ));
        }
        if self.step <= 0 {
            return Err(CompositeError::InvalidConfig(format!(
                "step size must be positive, got {}",
                self.step
            )));
        }
        if self.overlap as i64 >= self.crop_size as i64 {
            return Err(CompositeError::InvalidConfig(format!(
                "overlap {} must be smaller than crop size {}",
                self.overlap, self.crop_size
            )));
        }
        Ok(())
    }

    /// Distance in pixels between the origins of adjacent tiles.
    #[inline]
    fn pitch(&self) -> i64 {
        self.crop_size as i64 - self.overlap as i64
    }
}

/// Region selection for partial composites.
///
/// `min_x`/`min_z` drop tiles south-west of the given world coordinates;
/// `max_x_tiles`/`max_z_tiles` bound the grid extent counted from the
/// remaining minimum corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionFilter {
    pub min_x: Option<i32>,
    pub min_z: Option<i32>,
    pub max_x_tiles: Option<i32>,
    pub max_z_tiles: Option<i32>,
}

/// Selects the coordinates matching a region filter.
///
/// Returns coordinates in ascending (x, z) order. The result may be empty;
/// compositing an empty selection fails with
/// [`CompositeError::EmptyInput`].
pub fn select_region(
    registry: &TileRegistry,
    filter: &RegionFilter,
    step: i32,
) -> Result<Vec<WorldCoord>, CompositeError> {
    let candidates: Vec<WorldCoord> = registry
        .coords()
        .into_iter()
        .filter(|c| filter.min_x.map_or(true, |min| c.x >= min))
        .filter(|c| filter.min_z.map_or(true, |min| c.z >= min))
        .collect();

    if candidates.is_empty()
        || (filter.max_x_tiles.is_none() && filter.max_z_tiles.is_none())
    {
        return Ok(candidates);
    }

    let bounds = registry.bounds_of(&candidates)?;
    let mut selected = Vec::with_capacity(candidates.len());
    for coord in candidates {
        let ux = normalize(coord.x, bounds.min_x, step)?;
        let uz = normalize(coord.z, bounds.min_z, step)?;
        if filter.max_x_tiles.map_or(true, |max| ux < max)
            && filter.max_z_tiles.map_or(true, |max| uz < max)
        {
            selected.push(coord);
        }
    }
    Ok(selected)
}

/// Composites a selection of tiles into a single image.
///
/// Tiles are pasted in ascending (x, z) order (last-pasted-wins in overlap
/// strips, deterministically). The z axis is inverted for output so the
/// tile with the smallest world z lands at the bottom of the image. Each
/// tile's cached payload is released immediately after pasting.
///
/// # Errors
///
/// Fails fast: invalid parameters and empty selections abort before I/O,
/// and the first unreadable tile image aborts the whole composite.
pub fn composite(
    registry: &mut TileRegistry,
    selection: &[WorldCoord],
    params: &CompositeParams,
) -> Result<RgbaImage, CompositeError> {
    params.validate()?;
    if selection.is_empty() {
        return Err(CompositeError::EmptyInput);
    }

    let bounds = registry.bounds_of(selection)?;
    let x_units = normalize(bounds.max_x, bounds.min_x, params.step)? + 1;
    let z_units = normalize(bounds.max_z, bounds.min_z, params.step)? + 1;

    let canvas_width =
        x_units as i64 * params.crop_size as i64 - (x_units as i64 - 1) * params.overlap as i64;
    let canvas_height =
        z_units as i64 * params.crop_size as i64 - (z_units as i64 - 1) * params.overlap as i64;
    if canvas_width > u32::MAX as i64 || canvas_height > u32::MAX as i64 {
        return Err(CompositeError::CanvasTooLarge {
            width: canvas_width,
            height: canvas_height,
        });
    }

    info!(
        tiles = selection.len(),
        width = canvas_width,
        height = canvas_height,
        x_units,
        z_units,
        "Compositing map"
    );

    let mut canvas = RgbaImage::new(canvas_width as u32, canvas_height as u32);

    let mut sorted: Vec<WorldCoord> = selection.to_vec();
    sorted.sort();

    for coord in sorted {
        let grid = to_grid(coord, bounds.min(), params.step)?;
        // Flip z so the smallest world z lands in the bottom pixel rows
        let uz = z_units - grid.uz - 1;

        let paste_x = grid.ux as i64 * params.pitch();
        let paste_z = uz as i64 * params.pitch();

        let tile = registry
            .get_mut(&coord)
            .ok_or(CompositeError::UnknownTile(coord))?;
        let pixels = tile
            .composite_pixels(params.crop_size)
            .map_err(|source| CompositeError::Tile { coord, source })?;

        debug!(
            coord = %coord,
            x = paste_x,
            z = paste_z,
            unit_x = grid.ux,
            unit_z = uz,
            "Placing tile"
        );
        place_tile(&mut canvas, &pixels, paste_x as u32, paste_z as u32);
        tile.unload();
    }

    Ok(canvas)
}

/// Composites every tile in the registry, inferring the step size.
pub fn composite_all(
    registry: &mut TileRegistry,
    crop_size: u32,
    overlap: i32,
) -> Result<RgbaImage, CompositeError> {
    let step = registry.step_size()?;
    let selection = registry.coords();
    composite(registry, &selection, &CompositeParams::new(crop_size, overlap, step))
}

/// Pastes tile pixels onto the canvas at the given offset.
///
/// Overwrites prior content in the overlapped region; pixels falling
/// outside the canvas (a pre-cropped tile larger than the crop size) are
/// clipped.
fn place_tile(canvas: &mut RgbaImage, tile: &RgbaImage, x_offset: u32, y_offset: u32) {
    let width = tile.width().min(canvas.width().saturating_sub(x_offset));
    let height = tile.height().min(canvas.height().saturating_sub(y_offset));

    for y in 0..height {
        for x in 0..width {
            let pixel = tile.get_pixel(x, y);
            canvas.put_pixel(x_offset + x, y_offset + y, *pixel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;
    use image::Rgba;

    // Pixel-level assertions over real tile files live in the integration
    // tests; these cover validation, selection, and placement arithmetic.
    fn registry_of(coords: &[(i32, i32)]) -> TileRegistry {
        let mut registry = TileRegistry::new();
        for (x, z) in coords {
            registry.add(Tile::new(WorldCoord::new(*x, *z)));
        }
        registry
    }

    #[test]
    fn test_validate_rejects_zero_crop() {
        let params = CompositeParams::new(0, 0, 100);
        assert!(matches!(
            params.validate(),
            Err(CompositeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_step() {
        let params = CompositeParams::new(50, 0, 0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overlap_at_least_crop() {
        let params = CompositeParams::new(50, 50, 100);
        assert!(params.validate().is_err());
        // Negative overlap (spreading tiles apart) is fine
        assert!(CompositeParams::new(50, -10, 100).validate().is_ok());
    }

    #[test]
    fn test_empty_selection_is_error() {
        let mut registry = registry_of(&[]);
        let result = composite(&mut registry, &[], &CompositeParams::new(50, 0, 100));
        assert!(matches!(result, Err(CompositeError::EmptyInput)));
    }

    #[test]
    fn test_missing_payload_fails_fast() {
        let mut registry = registry_of(&[(0, 0)]);
        let selection = vec![WorldCoord::new(0, 0)];
        let result = composite(&mut registry, &selection, &CompositeParams::new(50, 0, 100));
        assert!(matches!(result, Err(CompositeError::Tile { .. })));
    }

    #[test]
    fn test_select_region_min_filters() {
        let registry = registry_of(&[(0, 0), (100, 0), (0, 100), (100, 100)]);
        let filter = RegionFilter {
            min_x: Some(100),
            ..Default::default()
        };
        let selected = select_region(&registry, &filter, 100).unwrap();
        assert_eq!(
            selected,
            vec![WorldCoord::new(100, 0), WorldCoord::new(100, 100)]
        );
    }

    #[test]
    fn test_select_region_tile_count_bounds() {
        let registry = registry_of(&[
            (0, 0),
            (100, 0),
            (200, 0),
            (0, 100),
            (100, 100),
            (200, 100),
        ]);
        let filter = RegionFilter {
            max_x_tiles: Some(2),
            ..Default::default()
        };
        let selected = select_region(&registry, &filter, 100).unwrap();
        assert_eq!(
            selected,
            vec![
                WorldCoord::new(0, 0),
                WorldCoord::new(0, 100),
                WorldCoord::new(100, 0),
                WorldCoord::new(100, 100),
            ]
        );
    }

    #[test]
    fn test_select_region_no_filter_returns_all() {
        let registry = registry_of(&[(0, 0), (100, 0)]);
        let selected =
            select_region(&registry, &RegionFilter::default(), 100).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_place_tile_clips_at_canvas_edge() {
        let mut canvas = RgbaImage::new(10, 10);
        let tile = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        place_tile(&mut canvas, &tile, 5, 5);

        assert_eq!(*canvas.get_pixel(5, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(9, 9), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(4, 5), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_place_tile_offset_outside_canvas() {
        let mut canvas = RgbaImage::new(10, 10);
        let tile = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        // Offset beyond the canvas must not panic
        place_tile(&mut canvas, &tile, 20, 20);
        assert_eq!(*canvas.get_pixel(9, 9), Rgba([0, 0, 0, 0]));
    }
}
