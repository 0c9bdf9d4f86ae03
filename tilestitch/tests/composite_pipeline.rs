//! End-to-end compositing tests over real files.
//!
//! Builds capture directories with synthetic screenshots, runs the scan ->
//! crop -> composite pipeline, and checks canvas geometry against the grid
//! layout: canvas size, overlap arithmetic, and z-axis inversion.

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tilestitch::composite::{composite, composite_all, CompositeParams};
use tilestitch::coord::WorldCoord;
use tilestitch::scan::scan_directory;

const TILE_SUFFIX: &str = "tile";

/// Writes a solid-color raw screenshot for the given coordinate.
fn write_screenshot(session: &Path, x: i32, z: i32, size: u32, color: [u8; 4]) -> PathBuf {
    let path = session.join(format!("Screenshot_{}_{}.png", x, z));
    let img = RgbaImage::from_pixel(size, size, Rgba(color));
    img.save(&path).expect("write screenshot");
    path
}

/// Capture directory with a 2x2 grid at step 100, one color per tile.
///
/// Screenshots are 60x60 so a 50-pixel crop fits.
fn grid_2x2(dir: &Path) {
    let session = dir.join("session1");
    fs::create_dir(&session).expect("create session dir");
    write_screenshot(&session, 0, 0, 60, [255, 0, 0, 255]); // red
    write_screenshot(&session, 100, 0, 60, [0, 255, 0, 255]); // green
    write_screenshot(&session, 0, 100, 60, [0, 0, 255, 255]); // blue
    write_screenshot(&session, 100, 100, 60, [255, 255, 255, 255]); // white
}

#[test]
fn composite_2x2_zero_overlap_geometry() {
    let dir = tempfile::tempdir().unwrap();
    grid_2x2(dir.path());

    let mut registry = scan_directory(dir.path(), TILE_SUFFIX).unwrap();
    let map = composite_all(&mut registry, 50, 0).unwrap();

    // 2x2 grid of 50-pixel tiles, no overlap
    assert_eq!(map.width(), 100);
    assert_eq!(map.height(), 100);

    // z inversion: the tile with the smallest world z lands at the bottom.
    // (0, 0) is red and must start at pixel (0, 50).
    assert_eq!(*map.get_pixel(0, 50), Rgba([255, 0, 0, 255]));
    assert_eq!(*map.get_pixel(0, 99), Rgba([255, 0, 0, 255]));
    // (0, 100) is blue and fills the top-left quadrant
    assert_eq!(*map.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    // (100, 0) green bottom-right, (100, 100) white top-right
    assert_eq!(*map.get_pixel(99, 99), Rgba([0, 255, 0, 255]));
    assert_eq!(*map.get_pixel(99, 0), Rgba([255, 255, 255, 255]));
}

#[test]
fn composite_positive_overlap_shrinks_canvas() {
    let dir = tempfile::tempdir().unwrap();
    grid_2x2(dir.path());

    let mut registry = scan_directory(dir.path(), TILE_SUFFIX).unwrap();
    let map = composite_all(&mut registry, 50, 10).unwrap();

    // m*crop - (m-1)*overlap = 2*50 - 1*10
    assert_eq!(map.width(), 90);
    assert_eq!(map.height(), 90);

    // Paste order is ascending (x, z), so the east tile wins the overlap
    // strip: column 45 sits inside the second column's span (40..90)
    assert_eq!(*map.get_pixel(45, 89), Rgba([0, 255, 0, 255]));
    // Bottom-left corner still belongs to (0, 0)
    assert_eq!(*map.get_pixel(0, 89), Rgba([255, 0, 0, 255]));
}

#[test]
fn composite_negative_overlap_grows_canvas() {
    let dir = tempfile::tempdir().unwrap();
    grid_2x2(dir.path());

    let mut registry = scan_directory(dir.path(), TILE_SUFFIX).unwrap();
    let map = composite_all(&mut registry, 50, -20).unwrap();

    assert_eq!(map.width(), 120);
    assert_eq!(map.height(), 120);
    // The spread leaves an unpainted gap between tiles
    assert_eq!(*map.get_pixel(60, 60), Rgba([0, 0, 0, 0]));
}

#[test]
fn composite_from_pre_cropped_tiles() {
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session1");
    fs::create_dir(&session).unwrap();

    // Pre-cropped tile files only, no raw screenshots
    for (x, z, color) in [
        (0, 0, [10u8, 0, 0, 255]),
        (100, 0, [0, 10, 0, 255]),
    ] {
        let path = session.join(format!("Screenshot_{}_{}_{}.png", x, z, TILE_SUFFIX));
        RgbaImage::from_pixel(50, 50, Rgba(color))
            .save(&path)
            .unwrap();
    }

    let mut registry = scan_directory(dir.path(), TILE_SUFFIX).unwrap();
    let map = composite_all(&mut registry, 50, 0).unwrap();

    // 2x1 grid
    assert_eq!(map.width(), 100);
    assert_eq!(map.height(), 50);
    assert_eq!(*map.get_pixel(0, 0), Rgba([10, 0, 0, 255]));
    assert_eq!(*map.get_pixel(99, 0), Rgba([0, 10, 0, 255]));
}

#[test]
fn crop_then_composite_uses_tile_files() {
    let dir = tempfile::tempdir().unwrap();
    grid_2x2(dir.path());

    let mut registry = scan_directory(dir.path(), TILE_SUFFIX).unwrap();

    // Crop every screenshot to its tile file
    for coord in registry.coords() {
        let tile = registry.get_mut(&coord).unwrap();
        let path = tile.create_tile(50, TILE_SUFFIX).unwrap();
        assert!(path.exists());
        tile.unload();
    }

    // A fresh scan now folds screenshots and tiles into the same entries
    let mut rescanned = scan_directory(dir.path(), TILE_SUFFIX).unwrap();
    assert_eq!(rescanned.len(), 4);
    let merged = rescanned.get(&WorldCoord::new(0, 0)).unwrap();
    assert!(merged.screenshot_path().is_some());
    assert!(merged.tile_path().is_some());

    let map = composite_all(&mut rescanned, 50, 0).unwrap();
    assert_eq!(map.width(), 100);
    assert_eq!(*map.get_pixel(0, 99), Rgba([255, 0, 0, 255]));
}

#[test]
fn composite_single_column_grid() {
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session1");
    fs::create_dir(&session).unwrap();
    write_screenshot(&session, 0, 0, 60, [1, 1, 1, 255]);
    write_screenshot(&session, 0, 100, 60, [2, 2, 2, 255]);
    write_screenshot(&session, 0, 200, 60, [3, 3, 3, 255]);

    let mut registry = scan_directory(dir.path(), TILE_SUFFIX).unwrap();
    let map = composite_all(&mut registry, 40, 0).unwrap();

    assert_eq!(map.width(), 40);
    assert_eq!(map.height(), 120);
    // Smallest z at the bottom, largest at the top
    assert_eq!(*map.get_pixel(0, 119), Rgba([1, 1, 1, 255]));
    assert_eq!(*map.get_pixel(0, 0), Rgba([3, 3, 3, 255]));
}

#[test]
fn composite_subset_selection() {
    let dir = tempfile::tempdir().unwrap();
    grid_2x2(dir.path());

    let mut registry = scan_directory(dir.path(), TILE_SUFFIX).unwrap();
    let selection = vec![WorldCoord::new(0, 0), WorldCoord::new(100, 0)];
    let params = CompositeParams::new(50, 0, 100);
    let map = composite(&mut registry, &selection, &params).unwrap();

    // Only the bottom row was selected
    assert_eq!(map.width(), 100);
    assert_eq!(map.height(), 50);
    assert_eq!(*map.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(*map.get_pixel(99, 0), Rgba([0, 255, 0, 255]));
}
