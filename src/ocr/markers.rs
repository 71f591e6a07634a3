//! Removal of the red circle markers some lanes draw over frame cells.
//!
//! Markers are selected by colour (two red hue bands, since red wraps
//! around hue 0), the mask is closed into solid blobs, and the blobs are
//! filled from the surrounding background.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::close;
use palette::{FromColor, Hsv, Srgb};

use crate::config::MarkerConfig;

/// Converts to 8-bit HSV: hue in half degrees (0..180), saturation and
/// value in 0..=255.
pub fn rgb_to_hsv(pixel: &Rgb<u8>) -> (u8, u8, u8) {
    let [r, g, b] = pixel.0;
    let hsv: Hsv = Hsv::from_color(Srgb::new(r, g, b).into_format::<f32>());

    let hue = (hsv.hue.into_positive_degrees() / 2.0).round() as u32 % 180;
    let to_byte = |unit: f32| (unit * 255.0).round().clamp(0.0, 255.0) as u8;
    (hue as u8, to_byte(hsv.saturation), to_byte(hsv.value))
}

/// 255 where a pixel falls in either red band with enough saturation and value.
pub fn marker_mask(img: &RgbImage, cfg: &MarkerConfig) -> GrayImage {
    let in_band = |hue: u8, band: &[u8; 2]| hue >= band[0] && hue <= band[1];

    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let (h, s, v) = rgb_to_hsv(img.get_pixel(x, y));
        let red = in_band(h, &cfg.low_hue) || in_band(h, &cfg.high_hue);
        if red && s >= cfg.min_saturation && v >= cfg.min_value {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Fills masked pixels from their unmasked surroundings, outside in.
///
/// Each pass colours every masked pixel touching a known one with the
/// inverse-square-distance weighted mean of the known pixels within
/// `radius`. Returns how many pixels could not be filled (non-zero only
/// when the mask leaves nothing known to start from).
pub fn inpaint(img: &mut RgbImage, mask: &GrayImage, radius: u32) -> usize {
    let (w, h) = img.dimensions();
    let idx = |x: u32, y: u32| (y * w + x) as usize;
    let radius = radius.max(1) as i64;

    let mut known: Vec<bool> = mask.pixels().map(|p| p[0] == 0).collect();
    let mut remaining = known.iter().filter(|k| !**k).count();

    while remaining > 0 {
        let touches_known = |x: u32, y: u32| {
            (-1i64..=1).any(|dy| {
                (-1i64..=1).any(|dx| {
                    let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                    nx >= 0
                        && ny >= 0
                        && nx < w as i64
                        && ny < h as i64
                        && known[idx(nx as u32, ny as u32)]
                })
            })
        };

        let mut fills = Vec::new();
        for y in 0..h {
            for x in 0..w {
                if known[idx(x, y)] || !touches_known(x, y) {
                    continue;
                }

                let mut sum = [0.0f64; 3];
                let mut weight_sum = 0.0f64;
                for dy in -radius..=radius {
                    for dx in -radius..=radius {
                        let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                        if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                            continue;
                        }
                        let (nx, ny) = (nx as u32, ny as u32);
                        if !known[idx(nx, ny)] {
                            continue;
                        }
                        let weight = 1.0 / (dx * dx + dy * dy) as f64;
                        let p = img.get_pixel(nx, ny);
                        for c in 0..3 {
                            sum[c] += weight * f64::from(p[c]);
                        }
                        weight_sum += weight;
                    }
                }

                let colour = sum.map(|s| (s / weight_sum).round().clamp(0.0, 255.0) as u8);
                fills.push((x, y, Rgb(colour)));
            }
        }

        if fills.is_empty() {
            break;
        }

        remaining -= fills.len();
        for (x, y, colour) in fills {
            img.put_pixel(x, y, colour);
            known[idx(x, y)] = true;
        }
    }

    remaining
}

/// Removes red markers from a row image and returns the cleaned image.
pub fn remove_markers(mut img: RgbImage, cfg: &MarkerConfig) -> RgbImage {
    let mask = close(&marker_mask(&img, cfg), Norm::LInf, cfg.close_radius);

    let total = (mask.width() as usize) * (mask.height() as usize);
    let masked = mask.pixels().filter(|p| p[0] > 0).count();
    if masked == 0 {
        return img;
    }

    let coverage = masked as f32 / total as f32;
    crate::log(&format!(
        "Marker mask covers {} px ({:.1}%)",
        masked,
        coverage * 100.0
    ));
    if coverage > cfg.max_coverage {
        crate::log(&format!(
            "WARNING: marker mask covers {:.1}% of the row, cleanup may be unreliable",
            coverage * 100.0
        ));
    }

    let unfilled = inpaint(&mut img, &mask, cfg.inpaint_radius);
    if unfilled > 0 {
        crate::log(&format!(
            "WARNING: {} marker pixels left untouched (no background to fill from)",
            unfilled
        ));
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::drawing::draw_hollow_circle_mut;

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(rgb_to_hsv(&Rgb([255, 0, 0])), (0, 255, 255));
        assert_eq!(rgb_to_hsv(&Rgb([0, 255, 0])), (60, 255, 255));
        assert_eq!(rgb_to_hsv(&Rgb([0, 0, 255])), (120, 255, 255));
        assert_eq!(rgb_to_hsv(&Rgb([128, 128, 128])), (0, 0, 128));
        // Magenta-leaning red lands in the high band
        let (h, _, _) = rgb_to_hsv(&Rgb([255, 0, 40]));
        assert!(h >= 170);
    }

    #[test]
    fn test_mask_selects_bright_red_only() {
        let mut img = RgbImage::from_pixel(4, 1, Rgb([255, 255, 255]));
        img.put_pixel(0, 0, Rgb([230, 20, 20]));
        img.put_pixel(1, 0, Rgb([80, 0, 0]));
        img.put_pixel(2, 0, Rgb([230, 150, 150]));
        img.put_pixel(3, 0, Rgb([240, 10, 60]));

        let mask = marker_mask(&img, &MarkerConfig::default());
        let selected: Vec<u8> = mask.pixels().map(|p| p[0]).collect();
        assert_eq!(selected, vec![255, 0, 0, 255]);
    }

    #[test]
    fn test_remove_markers_restores_background() {
        let background = Rgb([210, 210, 200]);
        let mut img = RgbImage::from_pixel(60, 40, background);
        draw_hollow_circle_mut(&mut img, (30, 20), 12, Rgb([220, 30, 30]));

        let cfg = MarkerConfig::default();
        let cleaned = remove_markers(img, &cfg);

        let mask = marker_mask(&cleaned, &cfg);
        assert!(mask.pixels().all(|p| p[0] == 0));
        let p = cleaned.get_pixel(30, 8);
        for c in 0..3 {
            assert!((i32::from(p[c]) - i32::from(background[c])).abs() <= 1);
        }
    }

    #[test]
    fn test_image_without_markers_is_untouched() {
        // Blue always dominates, so hues stay between cyan and violet
        let img = RgbImage::from_fn(20, 10, |x, y| Rgb([x as u8 * 10, y as u8 * 20, 200]));
        let mask = marker_mask(&img, &MarkerConfig::default());
        assert!(mask.pixels().all(|p| p[0] == 0));
        assert_eq!(remove_markers(img.clone(), &MarkerConfig::default()), img);
    }

    #[test]
    fn test_full_mask_cannot_be_filled() {
        let mut img = RgbImage::from_pixel(5, 5, Rgb([250, 0, 0]));
        let mask = GrayImage::from_pixel(5, 5, Luma([255]));
        assert_eq!(inpaint(&mut img, &mask, 3), 25);
        assert_eq!(*img.get_pixel(2, 2), Rgb([250, 0, 0]));
    }
}
