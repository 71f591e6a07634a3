//! Configuration types for the recognition pipeline.
//!
//! Loads settings from config.json at startup. Provides the row band,
//! skew detection limits, marker colour bands, binarisation parameters
//! and OCR engine options. Every section falls back to its defaults
//! when omitted, so a partial config file is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global configuration instance, initialized once per process.
static CONFIG: OnceLock<PipelineConfig> = OnceLock::new();

/// Vertical band of the photo where the score row is expected.
/// Fractions of the image height (0.0 = top edge, 1.0 = bottom edge).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowBand {
    pub top: f64,
    pub bottom: f64,
}

impl Default for RowBand {
    fn default() -> Self {
        Self {
            top: 0.30,
            bottom: 0.59,
        }
    }
}

/// Edge/line detection settings for skew estimation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewConfig {
    /// Canny hysteresis thresholds
    pub canny_low: f32,
    pub canny_high: f32,
    /// Minimum Hough accumulator votes for a line
    pub vote_threshold: u32,
    /// Non-maximum suppression radius in the Hough accumulator
    pub suppression_radius: u32,
    /// Lines further than this from horizontal are ignored (degrees)
    pub max_deviation_deg: f32,
    /// Final angle is clamped to +/- this value (degrees)
    pub clamp_deg: f32,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            vote_threshold: 150,
            suppression_radius: 2,
            max_deviation_deg: 10.0,
            clamp_deg: 5.0,
        }
    }
}

/// Colour bands selecting the red circle markers drawn on some scoreboards.
///
/// Hue uses the 8-bit half-degree scale (0..180); red wraps around 0,
/// hence two bands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub low_hue: [u8; 2],
    pub high_hue: [u8; 2],
    pub min_saturation: u8,
    pub min_value: u8,
    /// Closing radius (L-infinity), 2 = 5x5 square
    pub close_radius: u8,
    /// Neighbourhood radius used when filling masked pixels
    pub inpaint_radius: u32,
    /// Mask coverage above this fraction is reported as a quality concern
    pub max_coverage: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            low_hue: [0, 10],
            high_hue: [170, 180],
            min_saturation: 100,
            min_value: 100,
            close_radius: 2,
            inpaint_radius: 3,
            max_coverage: 0.5,
        }
    }
}

/// Ink/background mask settings for a single frame cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizeConfig {
    /// Side of the local neighbourhood for the adaptive threshold (odd, >= 3)
    pub adaptive_block: u32,
    /// Subtracted from the local mean before comparing
    pub adaptive_offset: i32,
    /// Closing radius applied to the adaptive mask, 1 = 3x3 square
    pub close_radius: u8,
}

impl Default for BinarizeConfig {
    fn default() -> Self {
        Self {
            adaptive_block: 15,
            adaptive_offset: 2,
            close_radius: 1,
        }
    }
}

/// Primary engine (Tesseract CLI) options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    /// Explicit executable path; searched for when absent
    pub executable: Option<PathBuf>,
    /// Explicit tessdata directory; searched for when absent
    pub tessdata: Option<PathBuf>,
    /// Page segmentation mode (7 = single text line)
    pub psm: u8,
    /// Characters the engine may emit
    pub whitelist: String,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            executable: None,
            tessdata: None,
            psm: 7,
            whitelist: "123456789X/-F".to_string(),
        }
    }
}

/// Secondary engine (ocrs) options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuralConfig {
    /// Directory holding text-detection.rten and text-recognition.rten
    pub model_dir: Option<PathBuf>,
    /// Beam width for CTC decoding
    pub beam_width: u32,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            beam_width: 5,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub row_band: RowBand,
    pub skew: SkewConfig,
    pub markers: MarkerConfig,
    pub binarize: BinarizeConfig,
    pub tesseract: TesseractConfig,
    pub neural: NeuralConfig,
    /// Recognize the ten frame cells on worker threads
    pub parallel_frames: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            row_band: RowBand::default(),
            skew: SkewConfig::default(),
            markers: MarkerConfig::default(),
            binarize: BinarizeConfig::default(),
            tesseract: TesseractConfig::default(),
            neural: NeuralConfig::default(),
            parallel_frames: true,
        }
    }
}

impl PipelineConfig {
    /// Load config from file, or return defaults if it is missing or invalid.
    pub fn load(config_path: &Path) -> Self {
        crate::log(&format!("Looking for config at: {}", config_path.display()));

        if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(config) => {
                        crate::log(&format!("Config loaded from {}", config_path.display()));
                        return config;
                    }
                    Err(e) => {
                        crate::log(&format!(
                            "Failed to parse {}: {}. Using defaults.",
                            config_path.display(),
                            e
                        ));
                    }
                },
                Err(e) => {
                    crate::log(&format!(
                        "Failed to read {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    ));
                }
            }
        } else {
            crate::log("config.json not found. Using default config.");
        }

        Self::default()
    }
}

/// Initializes the global configuration. Later calls are ignored.
///
/// Uses `<exe_dir>/config.json` when no path is given.
pub fn init_config(path: Option<&Path>) {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(crate::paths::get_config_path);
    let _ = CONFIG.set(PipelineConfig::load(&path));
}

/// Returns a reference to the global configuration, loading it on first use.
pub fn get_config() -> &'static PipelineConfig {
    CONFIG.get_or_init(|| PipelineConfig::load(&crate::paths::get_config_path()))
}
