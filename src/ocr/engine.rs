use image::GrayImage;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

use super::error::OcrError;
use super::setup::{find_tessdata_dir, find_tesseract_executable};
use crate::config::TesseractConfig;

/// Characters a frame cell can legitimately contain.
pub const SYMBOL_ALPHABET: &str = "0123456789X/-F";

/// An OCR backend that reads the marks in one frame cell.
///
/// Input is an ink mask (ink = 255). Output has whitespace removed; it may
/// be empty when nothing was recognised.
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &'static str;
    fn read_symbols(&self, mask: &GrayImage) -> Result<String, OcrError>;
}

/// Removes all whitespace from engine output.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Upper-cases and keeps only frame-mark symbols.
pub fn sanitize_symbols(text: &str) -> String {
    text.to_uppercase()
        .chars()
        .filter(|c| SYMBOL_ALPHABET.contains(*c))
        .collect()
}

/// Tesseract CLI restricted to the mark alphabet, one text line per cell.
pub struct TesseractEngine {
    executable: PathBuf,
    tessdata: Option<PathBuf>,
    psm: u8,
    whitelist: String,
}

impl TesseractEngine {
    /// Locates the executable and language data.
    pub fn discover(cfg: &TesseractConfig) -> Result<Self, OcrError> {
        let executable = find_tesseract_executable(cfg.executable.as_deref())?;
        let tessdata = find_tessdata_dir(cfg.tessdata.as_deref());

        crate::log(&format!(
            "Tesseract at {} (tessdata: {})",
            executable.display(),
            tessdata
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in default".to_string())
        ));

        Ok(Self {
            executable,
            tessdata,
            psm: cfg.psm,
            whitelist: cfg.whitelist.clone(),
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn read_symbols(&self, mask: &GrayImage) -> Result<String, OcrError> {
        // Tesseract reads dark glyphs on a light page
        let mut page = mask.clone();
        image::imageops::invert(&mut page);

        let temp_input = NamedTempFile::with_suffix(".png")?;
        page.save(temp_input.path())?;

        let mut command = Command::new(&self.executable);
        command.arg(temp_input.path()).arg("stdout");
        if let Some(tessdata) = &self.tessdata {
            command.arg("--tessdata-dir").arg(tessdata);
        }
        let output = command
            .arg("--psm")
            .arg(self.psm.to_string())
            .arg("-c")
            .arg(format!("tessedit_char_whitelist={}", self.whitelist))
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ToolFailed {
                engine: self.name(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(strip_whitespace(&String::from_utf8_lossy(&output.stdout)))
    }
}
