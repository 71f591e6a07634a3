//! Splits a score row into its ten frame cells.

use image::RgbImage;

use super::error::OcrError;
use crate::score::FRAMES_PER_GAME;

/// Column ranges `[start, end)` of the ten cells for a row `width` pixels wide.
pub fn frame_bounds(width: u32) -> [(u32, u32); FRAMES_PER_GAME] {
    let cut = |i: usize| (u64::from(width) * i as u64 / FRAMES_PER_GAME as u64) as u32;
    std::array::from_fn(|i| (cut(i), cut(i + 1)))
}

/// Cuts the row into ten equal-width cells, left to right.
pub fn split_frames(row: &RgbImage) -> Result<[RgbImage; FRAMES_PER_GAME], OcrError> {
    let (width, height) = row.dimensions();
    if width < FRAMES_PER_GAME as u32 || height == 0 {
        return Err(OcrError::ImageTooSmall { width, height });
    }

    let bounds = frame_bounds(width);
    Ok(std::array::from_fn(|i| {
        let (start, end) = bounds[i];
        image::imageops::crop_imm(row, start, 0, end - start, height).to_image()
    }))
}
