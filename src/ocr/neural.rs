//! Secondary engine: `ocrs`, a pure-Rust neural OCR.
//!
//! More tolerant of faint or thin marks than Tesseract, but it has no
//! alphabet restriction, so its output is filtered to frame-mark symbols.

use image::{GrayImage, Luma, Rgb, RgbImage};
use ocrs::{DecodeMethod, ImageSource, OcrEngineParams};
use rten::Model;
use std::path::Path;
use std::sync::Mutex;

use super::engine::{sanitize_symbols, OcrEngine};
use super::error::OcrError;
use super::setup::{find_model_dir, DETECTION_MODEL, RECOGNITION_MODEL};
use crate::config::NeuralConfig;

/// Light border added around a cell so text detection sees margins.
const CELL_PADDING: u32 = 16;

pub struct NeuralEngine {
    engine: Mutex<ocrs::OcrEngine>,
}

fn backend<E: std::fmt::Display>(err: E) -> OcrError {
    OcrError::Backend {
        message: err.to_string(),
    }
}

impl NeuralEngine {
    /// Loads the detection and recognition models.
    pub fn load(cfg: &NeuralConfig) -> Result<Self, OcrError> {
        let model_dir = find_model_dir(cfg.model_dir.as_deref()).ok_or_else(|| {
            OcrError::EngineUnavailable {
                engine: "ocrs",
                reason: format!(
                    "{} and {} not found (set neural.model_dir or place them in {})",
                    DETECTION_MODEL,
                    RECOGNITION_MODEL,
                    crate::paths::get_models_dir().display()
                ),
            }
        })?;

        Self::from_dir(&model_dir, cfg.beam_width)
    }

    fn from_dir(model_dir: &Path, beam_width: u32) -> Result<Self, OcrError> {
        crate::log(&format!("Loading ocrs models from {}", model_dir.display()));

        let detection_model = Model::load_file(model_dir.join(DETECTION_MODEL)).map_err(backend)?;
        let recognition_model =
            Model::load_file(model_dir.join(RECOGNITION_MODEL)).map_err(backend)?;

        let engine = ocrs::OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            decode_method: DecodeMethod::BeamSearch {
                width: beam_width.max(1),
            },
            ..Default::default()
        })
        .map_err(backend)?;

        Ok(Self {
            engine: Mutex::new(engine),
        })
    }
}

/// Dark marks on a white page with a margin, the layout ocrs is trained on.
fn to_page(mask: &GrayImage) -> RgbImage {
    let (w, h) = mask.dimensions();
    let mut page = RgbImage::from_pixel(
        w + 2 * CELL_PADDING,
        h + 2 * CELL_PADDING,
        Rgb([255, 255, 255]),
    );
    for (x, y, Luma([v])) in mask.enumerate_pixels() {
        let shade = 255 - v;
        page.put_pixel(x + CELL_PADDING, y + CELL_PADDING, Rgb([shade, shade, shade]));
    }
    page
}

impl OcrEngine for NeuralEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn read_symbols(&self, mask: &GrayImage) -> Result<String, OcrError> {
        let page = to_page(mask);
        let engine = self.engine.lock().map_err(backend)?;

        let source = ImageSource::from_bytes(page.as_raw(), page.dimensions()).map_err(backend)?;
        let input = engine.prepare_input(source).map_err(backend)?;
        let word_rects = engine.detect_words(&input).map_err(backend)?;
        let line_rects = engine.find_text_lines(&input, &word_rects);
        let lines = engine.recognize_text(&input, &line_rects).map_err(backend)?;

        let text: String = lines
            .iter()
            .filter_map(|line| line.as_ref())
            .flat_map(|line| line.words())
            .map(|word| word.to_string())
            .collect();

        Ok(sanitize_symbols(&text))
    }
}
