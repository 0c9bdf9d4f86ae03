//! Overlap preview rendering.
//!
//! A pure function from two tile images and a candidate overlap to a
//! side-by-side (or stacked) composite with guide rectangles, used by the
//! CLI to explore overlap values: recompute on every input change, no
//! retained state. Settings are committed to the config file separately,
//! only on explicit confirmation.

use super::AlignError;
use image::{Rgba, RgbaImage};

/// Which neighbour the preview pairs the tile with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Neighbour to the east, pasted to the right
    Horizontal,
    /// Neighbour to the south, pasted below
    Vertical,
}

/// Guide color around the first tile
const FIRST_OUTLINE: Rgba<u8> = Rgba([255, 255, 0, 255]);
/// Guide color around the second tile
const SECOND_OUTLINE: Rgba<u8> = Rgba([0, 255, 255, 255]);
/// Guide color around the overlapped strip
const OVERLAP_OUTLINE: Rgba<u8> = Rgba([255, 0, 0, 255]);

const OUTLINE_WIDTH: u32 = 2;

/// Renders a two-tile overlap preview.
///
/// Both images are pasted at the displacement the given overlap would
/// produce in a full composite: the second tile starts `size - overlap`
/// pixels after the first. Guide rectangles outline each tile and, for
/// positive overlaps, the overlapped strip.
///
/// # Errors
///
/// [`AlignError::InvalidPreview`] when the tiles are empty, differently
/// sized, or the overlap is not smaller than the tile size.
pub fn preview_pair(
    current: &RgbaImage,
    neighbour: &RgbaImage,
    direction: Direction,
    overlap: i32,
) -> Result<RgbaImage, AlignError> {
    let size = current.width();
    if size == 0 || current.height() != size {
        return Err(AlignError::InvalidPreview(format!(
            "preview needs square tiles, got {}x{}",
            current.width(),
            current.height()
        )));
    }
    if neighbour.width() != size || neighbour.height() != size {
        return Err(AlignError::InvalidPreview(format!(
            "tile sizes differ: {}x{} vs {}x{}",
            size,
            size,
            neighbour.width(),
            neighbour.height()
        )));
    }
    if overlap as i64 >= size as i64 {
        return Err(AlignError::InvalidPreview(format!(
            "overlap {} must be smaller than tile size {}",
            overlap, size
        )));
    }

    let pitch = (size as i64 - overlap as i64) as u32;
    let long_side = pitch + size;

    let (width, height, offset_x, offset_y) = match direction {
        Direction::Horizontal => (long_side, size, pitch, 0),
        Direction::Vertical => (size, long_side, 0, pitch),
    };

    let mut canvas = RgbaImage::new(width, height);
    blit(&mut canvas, current, 0, 0);
    blit(&mut canvas, neighbour, offset_x, offset_y);

    // Guide rectangles: first tile, second tile, then the overlap strip
    draw_rect(&mut canvas, 0, 0, size, size, FIRST_OUTLINE);
    draw_rect(
        &mut canvas,
        offset_x,
        offset_y,
        size,
        size,
        SECOND_OUTLINE,
    );
    if overlap > 0 {
        let strip = overlap as u32;
        match direction {
            Direction::Horizontal => {
                draw_rect(&mut canvas, pitch, 0, strip, size, OVERLAP_OUTLINE)
            }
            Direction::Vertical => {
                draw_rect(&mut canvas, 0, pitch, size, strip, OVERLAP_OUTLINE)
            }
        }
    }

    Ok(canvas)
}

/// Copies an image onto the canvas at the given offset, clipping at edges.
pub(super) fn blit(canvas: &mut RgbaImage, src: &RgbaImage, x_offset: u32, y_offset: u32) {
    let width = src.width().min(canvas.width().saturating_sub(x_offset));
    let height = src.height().min(canvas.height().saturating_sub(y_offset));
    for y in 0..height {
        for x in 0..width {
            canvas.put_pixel(x_offset + x, y_offset + y, *src.get_pixel(x, y));
        }
    }
}

/// Draws an unfilled rectangle outline of [`OUTLINE_WIDTH`] pixels.
fn draw_rect(canvas: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
    let x1 = (x + width).min(canvas.width());
    let y1 = (y + height).min(canvas.height());
    if x >= x1 || y >= y1 {
        return;
    }

    for yy in y..y1 {
        for xx in x..x1 {
            let near_vertical = xx < x + OUTLINE_WIDTH || xx >= x1.saturating_sub(OUTLINE_WIDTH);
            let near_horizontal = yy < y + OUTLINE_WIDTH || yy >= y1.saturating_sub(OUTLINE_WIDTH);
            if near_vertical || near_horizontal {
                canvas.put_pixel(xx, yy, color);
            }
        }
    }
}
