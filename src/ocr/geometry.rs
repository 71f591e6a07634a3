//! Row cropping and skew correction.

use image::{GrayImage, Rgb, RgbImage};
use imageproc::edges::canny;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::hough::{detect_lines, LineDetectionOptions};

use crate::config::{RowBand, SkewConfig};

/// Cuts the horizontal band where the score row is expected.
///
/// The band is a fixed fraction of the image height over the full width;
/// fractions outside 0.0..=1.0 are clamped.
pub fn crop_row(img: &RgbImage, band: &RowBand) -> RgbImage {
    let (w, h) = img.dimensions();

    let top = ((band.top.clamp(0.0, 1.0) * f64::from(h)) as u32).min(h);
    let bottom = ((band.bottom.clamp(0.0, 1.0) * f64::from(h)) as u32).min(h);
    let rows = bottom.saturating_sub(top);

    image::imageops::crop_imm(img, 0, top, w, rows).to_image()
}

/// Estimates how far the dominant near-horizontal lines are tilted, in degrees.
///
/// Positive means the row descends to the right. Returns 0.0 when no line
/// qualifies.
pub fn estimate_skew(gray: &GrayImage, cfg: &SkewConfig) -> f32 {
    if gray.width() == 0 || gray.height() == 0 {
        return 0.0;
    }

    let edges = canny(gray, cfg.canny_low, cfg.canny_high);
    let lines = detect_lines(
        &edges,
        LineDetectionOptions {
            vote_threshold: cfg.vote_threshold,
            suppression_radius: cfg.suppression_radius,
        },
    );

    // A horizontal line has its normal at 90 degrees
    let deviations: Vec<f32> = lines
        .iter()
        .map(|line| line.angle_in_degrees as f32 - 90.0)
        .collect();

    skew_from_angles(&deviations, cfg.max_deviation_deg, cfg.clamp_deg)
}

/// Median of the deviations within `max_deviation` of horizontal, clamped
/// to `[-clamp, clamp]`.
pub fn skew_from_angles(deviations: &[f32], max_deviation: f32, clamp: f32) -> f32 {
    let mut kept: Vec<f32> = deviations
        .iter()
        .copied()
        .filter(|d| d.is_finite() && d.abs() < max_deviation)
        .collect();

    if kept.is_empty() {
        return 0.0;
    }

    kept.sort_by(|a, b| a.total_cmp(b));
    let mid = kept.len() / 2;
    let median = if kept.len() % 2 == 0 {
        (kept[mid - 1] + kept[mid]) / 2.0
    } else {
        kept[mid]
    };

    let clamp = clamp.abs();
    median.clamp(-clamp, clamp)
}

/// Rotates about the centre to cancel a measured tilt of `angle` degrees.
///
/// Dimensions are kept; corners that rotate in from outside are black.
pub fn rotate(img: &RgbImage, angle: f32) -> RgbImage {
    if angle == 0.0 {
        return img.clone();
    }

    // imageproc rotates clockwise for positive theta
    rotate_about_center(
        img,
        -angle.to_radians(),
        Interpolation::Bicubic,
        Rgb([0, 0, 0]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_crop_row_uses_band() {
        let img: RgbImage = RgbImage::from_fn(40, 100, |x, y| Rgb([x as u8, y as u8, 0]));
        let band = RowBand { top: 0.25, bottom: 0.75 };

        let row = crop_row(&img, &band);

        assert_eq!(row.dimensions(), (40, 50));
        assert_eq!(row.get_pixel(0, 0)[1], 25);
        assert_eq!(row.get_pixel(5, 49)[1], 74);

        let default_row = crop_row(&img, &RowBand::default());
        // 0.30 * 100 and 0.59 * 100 land exactly on rows 30 and 59
        assert_eq!(default_row.height(), 29);
        assert_eq!(default_row.get_pixel(0, 0)[1], 30);
    }

    #[test]
    fn test_crop_row_inverted_band_is_empty() {
        let img = RgbImage::new(40, 100);
        let band = RowBand { top: 0.8, bottom: 0.2 };
        assert_eq!(crop_row(&img, &band).height(), 0);
    }

    #[test]
    fn test_skew_median_and_filter() {
        // 45 and -30 are outside the +/-10 window
        let angle = skew_from_angles(&[1.0, 2.0, 45.0, 3.0, -30.0], 10.0, 5.0);
        assert!((angle - 2.0).abs() < 1e-6);

        let even = skew_from_angles(&[1.0, 2.0, 3.0, 4.0], 10.0, 5.0);
        assert!((even - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_skew_is_clamped() {
        assert_eq!(skew_from_angles(&[8.0, 9.0, 9.5], 10.0, 5.0), 5.0);
        assert_eq!(skew_from_angles(&[-8.0, -9.0], 10.0, 5.0), -5.0);
        for d in -20..=20 {
            let angle = skew_from_angles(&[d as f32], 10.0, 5.0);
            assert!((-5.0..=5.0).contains(&angle));
        }
    }

    #[test]
    fn test_no_lines_means_no_skew() {
        assert_eq!(skew_from_angles(&[], 10.0, 5.0), 0.0);
        assert_eq!(skew_from_angles(&[40.0, -60.0], 10.0, 5.0), 0.0);

        let blank = GrayImage::from_pixel(200, 80, Luma([255]));
        assert_eq!(estimate_skew(&blank, &SkewConfig::default()), 0.0);
    }

    #[test]
    fn test_estimate_skew_of_tilted_edge() {
        // Dark below a line that drops 3 degrees to the right
        let slope = 3.0f32.to_radians().tan();
        let gray = GrayImage::from_fn(400, 120, |x, y| {
            if (y as f32) > 40.0 + x as f32 * slope {
                Luma([0])
            } else {
                Luma([255])
            }
        });

        let angle = estimate_skew(&gray, &SkewConfig::default());
        assert!((2.0..=4.0).contains(&angle), "angle was {}", angle);
    }

    #[test]
    fn test_rotate_keeps_dimensions() {
        let img = RgbImage::from_pixel(60, 30, Rgb([200, 200, 200]));
        let rotated = rotate(&img, 4.0);
        assert_eq!(rotated.dimensions(), (60, 30));
        // Centre stays inside the source
        let centre = rotated.get_pixel(30, 15)[0];
        assert!((195..=205).contains(&centre), "centre was {}", centre);

        assert_eq!(rotate(&img, 0.0), img);
    }
}
