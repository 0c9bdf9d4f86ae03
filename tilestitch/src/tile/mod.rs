//! Tile entity - one captured grid cell.
//!
//! A tile is identified by the world-space coordinate it was captured at and
//! carries up to two images: the raw full-resolution screenshot and the
//! square tile cropped from its center. Both payloads are loaded from disk
//! on first access and stay cached on the entity until [`Tile::unload`] is
//! called, so large-batch compositing can bound peak memory to roughly one
//! canvas plus one tile.

mod error;

pub use error::TileError;

use crate::coord::WorldCoord;
use image::{DynamicImage, GenericImageView, RgbaImage};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A captured grid cell: coordinate identity plus optional image payloads.
///
/// Equality and hashing are defined purely by the world coordinate; file
/// paths and loaded images are attributes of the same tile, not part of its
/// identity.
#[derive(Debug, Clone, Default)]
pub struct Tile {
    coord: WorldCoord,
    screenshot_path: Option<PathBuf>,
    tile_path: Option<PathBuf>,
    screenshot_image: Option<DynamicImage>,
    tile_image: Option<DynamicImage>,
}

impl Tile {
    /// Creates a tile known only by its coordinate.
    pub fn new(coord: WorldCoord) -> Self {
        Tile {
            coord,
            ..Default::default()
        }
    }

    /// Creates a tile backed by a raw screenshot file.
    pub fn from_screenshot(coord: WorldCoord, path: impl Into<PathBuf>) -> Self {
        Tile {
            coord,
            screenshot_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Creates a tile backed by an already-cropped tile file.
    pub fn from_tile_image(coord: WorldCoord, path: impl Into<PathBuf>) -> Self {
        Tile {
            coord,
            tile_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// World coordinate this tile was captured at.
    #[inline]
    pub fn coord(&self) -> WorldCoord {
        self.coord
    }

    /// Path to the raw screenshot, if one was discovered.
    pub fn screenshot_path(&self) -> Option<&Path> {
        self.screenshot_path.as_deref()
    }

    /// Path to the cropped tile image, if one was discovered or created.
    pub fn tile_path(&self) -> Option<&Path> {
        self.tile_path.as_deref()
    }

    pub(crate) fn set_screenshot_path(&mut self, path: PathBuf) {
        self.screenshot_path = Some(path);
    }

    pub(crate) fn set_tile_path(&mut self, path: PathBuf) {
        self.tile_path = Some(path);
    }

    /// Derives the tile file path from the screenshot path.
    ///
    /// `shot.png` with suffix `tile` becomes `shot_tile.png` next to the
    /// source file. Returns `None` when the tile has no screenshot path.
    pub fn derived_tile_path(&self, suffix: &str) -> Option<PathBuf> {
        let shot = self.screenshot_path.as_deref()?;
        let stem = shot.file_stem()?.to_str()?;
        Some(shot.with_file_name(format!("{}_{}.png", stem, suffix)))
    }

    /// True when a cropped tile file exists on disk for this tile.
    pub fn tile_exists(&self, suffix: &str) -> bool {
        if let Some(path) = self.tile_path.as_deref() {
            return path.exists();
        }
        self.derived_tile_path(suffix)
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    /// The raw screenshot image, loading it from disk on first access.
    ///
    /// # Errors
    ///
    /// [`TileError::MissingScreenshot`] when no screenshot path is known;
    /// [`TileError::ImageAccess`] when the file cannot be decoded.
    pub fn screenshot_image(&mut self) -> Result<&DynamicImage, TileError> {
        if self.screenshot_image.is_none() {
            let path = self
                .screenshot_path
                .clone()
                .ok_or(TileError::MissingScreenshot(self.coord))?;
            let img = image::open(&path).map_err(|e| TileError::image_access(&path, e))?;
            debug!(coord = %self.coord, path = %path.display(), "Loaded screenshot");
            self.screenshot_image = Some(img);
        }
        self.screenshot_image
            .as_ref()
            .ok_or(TileError::MissingScreenshot(self.coord))
    }

    /// The cropped tile image, loading it from disk on first access.
    pub fn tile_image(&mut self) -> Result<&DynamicImage, TileError> {
        if self.tile_image.is_none() {
            let path = self
                .tile_path
                .clone()
                .ok_or(TileError::MissingTileImage(self.coord))?;
            let img = image::open(&path).map_err(|e| TileError::image_access(&path, e))?;
            debug!(coord = %self.coord, path = %path.display(), "Loaded tile image");
            self.tile_image = Some(img);
        }
        self.tile_image
            .as_ref()
            .ok_or(TileError::MissingTileImage(self.coord))
    }

    /// Loads the raw screenshot without caching it on the entity.
    ///
    /// Used by the alignment estimator, which reads two screenshots at once
    /// through shared references and discards them after scoring.
    pub fn load_screenshot(&self) -> Result<DynamicImage, TileError> {
        let path = self
            .screenshot_path
            .as_deref()
            .ok_or(TileError::MissingScreenshot(self.coord))?;
        image::open(path).map_err(|e| TileError::image_access(path, e))
    }

    /// Releases both cached image payloads.
    ///
    /// The compositor calls this after pasting a tile; the paths are kept so
    /// the payloads can be reloaded later.
    pub fn unload(&mut self) {
        self.screenshot_image = None;
        self.tile_image = None;
    }

    /// Crops the tile square out of the raw screenshot and writes it to disk.
    ///
    /// The output lands next to the screenshot as `<stem>_<suffix>.png` (or
    /// at the tile's existing tile path). The written path is recorded on
    /// the entity and returned.
    pub fn create_tile(&mut self, crop_size: u32, suffix: &str) -> Result<PathBuf, TileError> {
        let path = match self.tile_path.clone() {
            Some(p) => p,
            None => self
                .derived_tile_path(suffix)
                .ok_or(TileError::MissingScreenshot(self.coord))?,
        };

        let cropped = center_crop(self.screenshot_image()?, crop_size)?;
        cropped
            .save(&path)
            .map_err(|e| TileError::image_access(&path, e))?;
        debug!(coord = %self.coord, path = %path.display(), crop_size, "Created tile");

        self.tile_path = Some(path.clone());
        Ok(path)
    }

    /// Pixels to paste for this tile during compositing.
    ///
    /// Prefers the cropped tile image; falls back to center-cropping the raw
    /// screenshot in memory when only the screenshot was discovered.
    pub fn composite_pixels(&mut self, crop_size: u32) -> Result<RgbaImage, TileError> {
        if self.tile_path.is_some() {
            return Ok(self.tile_image()?.to_rgba8());
        }
        if self.screenshot_path.is_some() {
            let cropped = center_crop(self.screenshot_image()?, crop_size)?;
            return Ok(cropped.to_rgba8());
        }
        Err(TileError::MissingTileImage(self.coord))
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}

/// Crops a centered `size`-by-`size` square out of an image.
///
/// # Errors
///
/// [`TileError::InvalidCropSize`] when the square does not fit.
pub fn center_crop(img: &DynamicImage, size: u32) -> Result<DynamicImage, TileError> {
    let (width, height) = img.dimensions();
    if size == 0 || size > width || size > height {
        return Err(TileError::InvalidCropSize {
            size,
            width,
            height,
        });
    }
    let left = (width - size) / 2;
    let top = (height - size) / 2;
    Ok(img.crop_imm(left, top, size, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255])
        }))
    }

    #[test]
    fn test_equality_by_coordinate_only() {
        let a = Tile::from_screenshot(WorldCoord::new(100, 200), "/a/shot.png");
        let b = Tile::from_tile_image(WorldCoord::new(100, 200), "/b/other.png");
        assert_eq!(a, b, "Tiles with equal coordinates are the same tile");

        use std::collections::hash_map::DefaultHasher;
        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn test_derived_tile_path() {
        let tile = Tile::from_screenshot(
            WorldCoord::new(5700, 3800),
            "/maps/run1/Screenshot_5700_3800.png",
        );
        let derived = tile.derived_tile_path("tile").unwrap();
        assert_eq!(
            derived,
            PathBuf::from("/maps/run1/Screenshot_5700_3800_tile.png")
        );
    }

    #[test]
    fn test_derived_tile_path_without_screenshot() {
        let tile = Tile::new(WorldCoord::new(0, 0));
        assert!(tile.derived_tile_path("tile").is_none());
    }

    #[test]
    fn test_center_crop_dimensions() {
        let img = gradient_image(100, 60);
        let cropped = center_crop(&img, 40).unwrap();
        assert_eq!(cropped.dimensions(), (40, 40));
    }

    #[test]
    fn test_center_crop_is_centered() {
        let img = gradient_image(100, 100);
        let cropped = center_crop(&img, 50).unwrap();
        // Top-left pixel of the crop comes from (25, 25) in the source
        let pixel = cropped.to_rgba8().get_pixel(0, 0).0;
        assert_eq!(pixel[0], 25);
        assert_eq!(pixel[1], 25);
    }

    #[test]
    fn test_center_crop_too_large() {
        let img = gradient_image(32, 32);
        let result = center_crop(&img, 64);
        assert!(matches!(
            result,
            Err(TileError::InvalidCropSize { size: 64, .. })
        ));
    }

    #[test]
    fn test_center_crop_zero() {
        let img = gradient_image(32, 32);
        assert!(center_crop(&img, 0).is_err());
    }

    #[test]
    fn test_missing_screenshot_error() {
        let mut tile = Tile::new(WorldCoord::new(1, 2));
        let result = tile.screenshot_image();
        assert!(matches!(result, Err(TileError::MissingScreenshot(_))));
    }

    #[test]
    fn test_unload_clears_payloads_and_keeps_paths() {
        let mut tile = Tile::from_screenshot(WorldCoord::new(0, 0), "/maps/a.png");
        tile.unload();
        assert_eq!(tile.screenshot_path(), Some(Path::new("/maps/a.png")));
    }
}
