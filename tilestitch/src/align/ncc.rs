//! Row matching via normalized cross-correlation.
//!
//! Scores every row of a neighbour screenshot against one row of a source
//! screenshot using zero-mean normalized cross-correlation. NCC is invariant
//! to uniform brightness and contrast offsets between the two captures,
//! which raw pixel-difference metrics are not; the renderer's exposure can
//! differ between screenshots of the same terrain.

use super::AlignError;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};
use tracing::warn;

/// Result of matching one source row against every row of a neighbour.
#[derive(Debug, Clone)]
pub struct RowMatch {
    /// Row index in the neighbour image with the highest score
    pub best_row: u32,
    /// NCC score of the best row, in [-1, 1]
    pub best_score: f64,
    /// Score for every neighbour row, for diagnostic plotting
    pub scores: Vec<f64>,
}

/// Finds the neighbour row most similar to `source_row` of the source.
///
/// Color images are compared per channel and the three channel scores are
/// averaged. A degenerate row (zero variance in a channel) contributes a
/// score of `0.0` for that channel rather than NaN.
///
/// When the images differ in width the neighbour is resampled to the
/// source's width first; this is a defensive fallback for mixed-resolution
/// captures, not the common path.
///
/// # Errors
///
/// [`AlignError::RowOutOfBounds`] when `source_row` is outside the source
/// image.
pub fn match_row(
    source: &DynamicImage,
    source_row: u32,
    neighbour: &DynamicImage,
) -> Result<RowMatch, AlignError> {
    let (source_width, source_height) = source.dimensions();
    if source_row >= source_height {
        return Err(AlignError::RowOutOfBounds {
            row: source_row,
            height: source_height,
        });
    }
    if source_width == 0 || neighbour.height() == 0 {
        return Err(AlignError::EmptyImage);
    }

    let source_rgb = source.to_rgb8();
    let neighbour_rgb = if neighbour.width() != source_width {
        warn!(
            source_width,
            neighbour_width = neighbour.width(),
            "Screenshot widths differ, resampling neighbour"
        );
        neighbour
            .resize_exact(source_width, neighbour.height(), FilterType::Nearest)
            .to_rgb8()
    } else {
        neighbour.to_rgb8()
    };

    let reference = row_channels(&source_rgb, source_row);

    let mut scores = Vec::with_capacity(neighbour_rgb.height() as usize);
    for row in 0..neighbour_rgb.height() {
        let candidate = row_channels(&neighbour_rgb, row);
        let score = (0..3)
            .map(|c| ncc(&reference[c], &candidate[c]))
            .sum::<f64>()
            / 3.0;
        scores.push(score);
    }

    let mut best_row = 0u32;
    let mut best_score = f64::NEG_INFINITY;
    for (row, score) in scores.iter().enumerate() {
        if *score > best_score {
            best_score = *score;
            best_row = row as u32;
        }
    }

    Ok(RowMatch {
        best_row,
        best_score,
        scores,
    })
}

/// Extracts one image row as three per-channel f64 vectors.
fn row_channels(img: &RgbImage, row: u32) -> [Vec<f64>; 3] {
    let width = img.width() as usize;
    let mut channels = [
        Vec::with_capacity(width),
        Vec::with_capacity(width),
        Vec::with_capacity(width),
    ];
    for x in 0..img.width() {
        let pixel = img.get_pixel(x, row).0;
        for c in 0..3 {
            channels[c].push(pixel[c] as f64);
        }
    }
    channels
}

/// Zero-mean normalized cross-correlation between two equal-length signals.
///
/// Returns `0.0` when either signal has zero variance.
fn ncc(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return 0.0;
    }

    let mean_a = a.iter().sum::<f64>() / a.len() as f64;
    let mean_b = b.iter().sum::<f64>() / b.len() as f64;

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (va, vb) in a.iter().zip(b.iter()) {
        let da = va - mean_a;
        let db = vb - mean_b;
        dot += da * db;
        norm_a += da * da;
        norm_b += db * db;
    }

    let denominator = (norm_a * norm_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    dot / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    const TOLERANCE: f64 = 1e-9;

    fn image_of_rows(rows: &[Vec<u8>]) -> DynamicImage {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut img = RgbaImage::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, v) in row.iter().enumerate() {
                img.put_pixel(x as u32, y as u32, Rgba([*v, *v, *v, 255]));
            }
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_identical_rows_score_one() {
        let row = vec![10u8, 40, 90, 160, 250, 120, 60, 30];
        let source = image_of_rows(&[row.clone()]);
        let neighbour = image_of_rows(&[vec![0; 8], row, vec![255; 8]]);

        let result = match_row(&source, 0, &neighbour).unwrap();
        assert_eq!(result.best_row, 1);
        assert!((result.best_score - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_negated_row_scores_minus_one() {
        // Rows that are exact negations of each other around their means
        let a: Vec<f64> = vec![1.0, 2.0, 3.0, 4.0];
        let b: Vec<f64> = vec![4.0, 3.0, 2.0, 1.0];
        assert!((ncc(&a, &b) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_variance_row_scores_zero() {
        let flat: Vec<f64> = vec![128.0; 16];
        let varied: Vec<f64> = (0..16).map(|v| v as f64).collect();
        let score = ncc(&flat, &varied);
        assert_eq!(score, 0.0);
        assert!(!score.is_nan());
    }

    #[test]
    fn test_ncc_brightness_invariance() {
        let a: Vec<f64> = vec![10.0, 20.0, 30.0, 40.0];
        // Same signal, brighter and higher contrast
        let b: Vec<f64> = a.iter().map(|v| v * 2.0 + 50.0).collect();
        assert!((ncc(&a, &b) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_source_row_out_of_bounds() {
        let img = image_of_rows(&[vec![0, 1, 2, 3]]);
        let result = match_row(&img, 5, &img);
        assert!(matches!(
            result,
            Err(AlignError::RowOutOfBounds { row: 5, height: 1 })
        ));
    }

    #[test]
    fn test_scores_cover_every_row() {
        let source = image_of_rows(&[vec![5, 10, 20, 40]]);
        let neighbour = image_of_rows(&[vec![0; 4], vec![1; 4], vec![2; 4], vec![3; 4]]);
        let result = match_row(&source, 0, &neighbour).unwrap();
        assert_eq!(result.scores.len(), 4);
    }

    #[test]
    fn test_width_mismatch_resamples() {
        let source = image_of_rows(&[vec![10, 200, 10, 200]]);
        // Neighbour is twice as wide; nearest resampling halves it
        let mut wide = RgbaImage::new(8, 2);
        for x in 0..8 {
            let v = if (x / 2) % 2 == 0 { 10 } else { 200 };
            wide.put_pixel(x, 0, Rgba([v, v, v, 255]));
            wide.put_pixel(x, 1, Rgba([0, 0, 0, 255]));
        }
        let neighbour = DynamicImage::ImageRgba8(wide);

        let result = match_row(&source, 0, &neighbour).unwrap();
        assert_eq!(result.best_row, 0);
        assert!(result.best_score > 0.9);
    }

    #[test]
    fn test_match_row_rgb_channels_averaged() {
        // A row identical in all three channels still scores 1.0
        let mut img = image::RgbImage::new(4, 1);
        for x in 0..4 {
            img.put_pixel(x, 0, Rgb([x as u8 * 10, x as u8 * 20, 255 - x as u8]));
        }
        let dynamic = DynamicImage::ImageRgb8(img);
        let result = match_row(&dynamic, 0, &dynamic).unwrap();
        assert!((result.best_score - 1.0).abs() < TOLERANCE);
    }
}
