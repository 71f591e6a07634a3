use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::close;

use crate::config::BinarizeConfig;

/// Channel weights for the greyscale conversion (R, G, B).
pub const LUMA_WEIGHTS: [f32; 3] = [0.503, 0.423, 0.074];

/// Converts to greyscale using [`LUMA_WEIGHTS`].
pub fn to_gray(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        let value: f32 = p
            .0
            .iter()
            .zip(LUMA_WEIGHTS)
            .map(|(&c, weight)| f32::from(c) * weight)
            .sum();
        Luma([value.min(255.0) as u8])
    })
}

/// Global threshold at the Otsu level. Ink (dark) pixels become 255.
pub fn otsu_mask(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    invert_threshold(gray, |x, y| i32::from(gray.get_pixel(x, y)[0]) <= i32::from(level))
}

/// Local threshold against a Gaussian-weighted neighbourhood mean, then
/// closed to join broken strokes. Ink pixels become 255.
pub fn adaptive_mask(gray: &GrayImage, cfg: &BinarizeConfig) -> GrayImage {
    let block = cfg.adaptive_block.max(3) | 1;
    let sigma = 0.3 * ((block as f32 - 1.0) / 2.0 - 1.0) + 0.8;
    let mean = gaussian_blur_f32(gray, sigma);

    let mask = invert_threshold(gray, |x, y| {
        i32::from(gray.get_pixel(x, y)[0]) <= i32::from(mean.get_pixel(x, y)[0]) - cfg.adaptive_offset
    });

    if cfg.close_radius == 0 {
        mask
    } else {
        close(&mask, Norm::LInf, cfg.close_radius)
    }
}

fn invert_threshold(gray: &GrayImage, is_ink: impl Fn(u32, u32) -> bool) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if is_ink(x, y) { Luma([255]) } else { Luma([0]) }
    })
}

/// Number of ink pixels in a mask.
pub fn ink_pixels(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] > 0).count()
}

/// Produces the ink mask handed to the OCR engines.
///
/// Both the global and the adaptive mask are computed; the one with
/// strictly more ink wins, ties go to the adaptive mask.
pub fn binarize(cell: &RgbImage, cfg: &BinarizeConfig) -> GrayImage {
    let gray = to_gray(cell);
    let global = otsu_mask(&gray);
    let adaptive = adaptive_mask(&gray, cfg);

    if ink_pixels(&global) > ink_pixels(&adaptive) {
        global
    } else {
        adaptive
    }
}
