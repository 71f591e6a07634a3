//! Recognition pipeline: photo of a score row in, ten frame tokens out.
//!
//! Stages, in order: row crop, marker removal, skew estimate, rotation of
//! the original photo, second crop and marker removal, ten-way split, and
//! per-cell recognition.

pub mod engine;
pub mod error;
pub mod geometry;
pub mod markers;
pub mod neural;
pub mod preprocess;
pub mod recognize;
pub mod segment;
pub mod setup;

pub use engine::{OcrEngine, TesseractEngine};
pub use error::OcrError;
pub use neural::NeuralEngine;
pub use recognize::{recognize, EnginePair, EngineProvider, SystemEngines};

use image::RgbImage;
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::score::FRAMES_PER_GAME;
use geometry::{crop_row, estimate_skew, rotate};
use markers::remove_markers;
use preprocess::to_gray;
use segment::split_frames;

/// Straightens the photo and cuts the score row into ten cells.
pub fn prepare_frames(
    image: RgbImage,
    cfg: &PipelineConfig,
) -> Result<[RgbImage; FRAMES_PER_GAME], OcrError> {
    let (width, height) = image.dimensions();
    if width < FRAMES_PER_GAME as u32 {
        return Err(OcrError::ImageTooSmall { width, height });
    }

    let row = crop_row(&image, &cfg.row_band);
    if row.height() == 0 {
        return Err(OcrError::ImageTooSmall { width, height });
    }

    let cleaned = remove_markers(row, &cfg.markers);
    let angle = estimate_skew(&to_gray(&cleaned), &cfg.skew);
    crate::log(&format!("Estimated skew: {:.2} deg", angle));

    let row = if angle == 0.0 {
        cleaned
    } else {
        let corrected = rotate(&image, angle);
        remove_markers(crop_row(&corrected, &cfg.row_band), &cfg.markers)
    };

    split_frames(&row)
}

/// Reads every cell. Tokens are in frame order regardless of which cell
/// finishes first.
pub fn recognize_frames(
    frames: &[RgbImage; FRAMES_PER_GAME],
    engines: &dyn EngineProvider,
    cfg: &PipelineConfig,
) -> [String; FRAMES_PER_GAME] {
    let mut tokens: [String; FRAMES_PER_GAME] = Default::default();

    if cfg.parallel_frames {
        let results: Vec<String> = frames
            .as_slice()
            .par_iter()
            .map(|cell| recognize(cell, engines, cfg))
            .collect();
        for (slot, token) in tokens.iter_mut().zip(results) {
            *slot = token;
        }
    } else {
        for (slot, cell) in tokens.iter_mut().zip(frames.iter()) {
            *slot = recognize(cell, engines, cfg);
        }
    }

    tokens
}

/// Runs the full pipeline with explicit engines and configuration.
pub fn run_pipeline_with(
    image: RgbImage,
    engines: &dyn EngineProvider,
    cfg: &PipelineConfig,
) -> Result<[String; FRAMES_PER_GAME], OcrError> {
    let frames = prepare_frames(image, cfg)?;
    let tokens = recognize_frames(&frames, engines, cfg);

    let empty = tokens.iter().filter(|t| t.is_empty()).count();
    if empty > 0 {
        crate::log(&format!("{} of {} frames unread, review needed", empty, FRAMES_PER_GAME));
    }

    Ok(tokens)
}

/// Runs the full pipeline with the process-wide engines and configuration.
pub fn run_pipeline(image: RgbImage) -> Result<[String; FRAMES_PER_GAME], OcrError> {
    run_pipeline_with(image, &SystemEngines, crate::config::get_config())
}
