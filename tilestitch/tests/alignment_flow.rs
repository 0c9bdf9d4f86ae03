//! End-to-end alignment tests over real files.
//!
//! Synthesizes two vertically-shifted screenshots of the same "terrain",
//! scans them into a registry, and checks that the estimator recovers the
//! known shift and derives the matching overlap values.

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tilestitch::align::{estimate, match_row, visualize_match, VerticalDirection};
use tilestitch::coord::WorldCoord;
use tilestitch::scan::scan_directory;

const WIDTH: u32 = 32;
const HEIGHT: u32 = 64;
/// Vertical shift between the two captures in pixels.
const SHIFT: i64 = 20;

/// Deterministic terrain value for a world pixel.
///
/// Depends strongly on the row so every row is distinct.
fn terrain(x: i64, y: i64) -> u8 {
    (((y * 97) ^ (x * 13)).rem_euclid(251)) as u8
}

/// Screenshot of the terrain with its top edge at world row `top`.
fn capture(top: i64) -> RgbaImage {
    RgbaImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let v = terrain(x as i64, top + y as i64);
        Rgba([v, v, v, 255])
    })
}

/// Writes the source capture at (0, 0) and its northern neighbour at
/// (0, 100). The neighbour's content is shifted down by SHIFT pixels: its
/// row SHIFT shows the same terrain as the source's row 0.
fn write_captures(dir: &Path) {
    let session = dir.join("session1");
    fs::create_dir(&session).expect("create session dir");

    capture(0)
        .save(session.join("Screenshot_0_0.png"))
        .expect("write source");
    capture(-SHIFT)
        .save(session.join("Screenshot_0_100.png"))
        .expect("write neighbour");
}

#[test]
fn match_row_recovers_known_shift() {
    let source = image::DynamicImage::ImageRgba8(capture(0));
    let neighbour = image::DynamicImage::ImageRgba8(capture(-SHIFT));

    let result = match_row(&source, 0, &neighbour).unwrap();
    assert_eq!(result.best_row as i64, SHIFT);
    assert!(
        result.best_score > 0.999,
        "identical content must score ~1.0, got {}",
        result.best_score
    );
    assert_eq!(result.scores.len(), HEIGHT as usize);
}

#[test]
fn estimate_derives_overlap_from_files() {
    let dir = tempfile::tempdir().unwrap();
    write_captures(dir.path());

    let registry = scan_directory(dir.path(), "tile").unwrap();
    let result = estimate(&registry, WorldCoord::new(0, 0), 100).unwrap();

    assert_eq!(result.neighbour, WorldCoord::new(0, 100));
    assert_eq!(result.direction, VerticalDirection::Above);
    assert_eq!(result.source_row, 0);
    assert_eq!(result.row_match.best_row as i64, SHIFT);

    // Rows SHIFT..HEIGHT of the neighbour duplicate the source's top
    assert_eq!(result.raw_overlap, HEIGHT as i64 - SHIFT);

    // Capture pitch is SHIFT pixels, so a crop of 30 overlaps by 10
    assert_eq!(result.suggested_tile_overlap(30), 30 - SHIFT);
    // A crop smaller than the pitch needs spreading apart
    assert_eq!(result.suggested_tile_overlap(15), 15 - SHIFT);
}

#[test]
fn estimate_falls_back_to_southern_neighbour() {
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session1");
    fs::create_dir(&session).unwrap();

    // Source at (0, 100), only neighbour is south of it at (0, 0).
    // The southern capture's content is shifted up by SHIFT pixels.
    capture(0)
        .save(session.join("Screenshot_0_100.png"))
        .unwrap();
    capture(SHIFT)
        .save(session.join("Screenshot_0_0.png"))
        .unwrap();

    let registry = scan_directory(dir.path(), "tile").unwrap();
    let result = estimate(&registry, WorldCoord::new(0, 100), 100).unwrap();

    assert_eq!(result.direction, VerticalDirection::Below);
    assert_eq!(result.source_row, HEIGHT - 1);
    // Source bottom row (world row HEIGHT-1) appears in the southern
    // capture at row HEIGHT-1-SHIFT
    assert_eq!(result.row_match.best_row as i64, HEIGHT as i64 - 1 - SHIFT);
    assert_eq!(result.raw_overlap, HEIGHT as i64 - SHIFT);
}

#[test]
fn visualization_marks_matched_rows() {
    let source = image::DynamicImage::ImageRgba8(capture(0));
    let neighbour = image::DynamicImage::ImageRgba8(capture(-SHIFT));

    let vis = visualize_match(&source, 0, &neighbour, SHIFT as u32);
    assert_eq!(vis.width(), WIDTH * 2);
    assert_eq!(vis.height(), HEIGHT);
    assert_eq!(*vis.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(
        *vis.get_pixel(WIDTH, SHIFT as u32),
        Rgba([255, 0, 0, 255])
    );
}
