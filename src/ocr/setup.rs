use std::path::{Path, PathBuf};
use std::process::Command;

use super::error::OcrError;
use crate::log;

/// Model files the neural engine needs.
pub const DETECTION_MODEL: &str = "text-detection.rten";
pub const RECOGNITION_MODEL: &str = "text-recognition.rten";

const TESSERACT_EXE: &str = if cfg!(windows) { "tesseract.exe" } else { "tesseract" };

/// Returns the per-user directory for a private Tesseract install.
pub fn get_tesseract_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bowling-ocr")
        .join("tesseract")
}

/// Finds the Tesseract executable: configured path, then our local dir,
/// then `PATH`.
pub fn find_tesseract_executable(configured: Option<&Path>) -> Result<PathBuf, OcrError> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(OcrError::EngineUnavailable {
            engine: "tesseract",
            reason: format!("configured executable {} does not exist", path.display()),
        });
    }

    let local_exe = get_tesseract_dir().join(TESSERACT_EXE);
    if local_exe.exists() {
        return Ok(local_exe);
    }

    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    Err(OcrError::EngineUnavailable {
        engine: "tesseract",
        reason: format!(
            "not found in {} or on PATH",
            get_tesseract_dir().display()
        ),
    })
}

/// Finds a tessdata directory with English data.
///
/// `None` lets Tesseract fall back to its compiled-in location.
pub fn find_tessdata_dir(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.is_dir() {
            return Some(path.to_path_buf());
        }
        log(&format!(
            "Configured tessdata {} not found, searching defaults",
            path.display()
        ));
    }

    let has_eng = |p: &Path| p.join("eng.traineddata").exists();

    let local_tessdata = get_tesseract_dir().join("tessdata");
    if has_eng(&local_tessdata) {
        return Some(local_tessdata);
    }

    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let prefix = PathBuf::from(prefix);
        if has_eng(&prefix) {
            return Some(prefix);
        }
        let nested = prefix.join("tessdata");
        if has_eng(&nested) {
            return Some(nested);
        }
    }

    None
}

/// Finds a directory holding both neural model files: configured dir,
/// `<exe_dir>/models`, then the ocrs cache.
pub fn find_model_dir(configured: Option<&Path>) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(path) = configured {
        candidates.push(path.to_path_buf());
    }
    candidates.push(crate::paths::get_models_dir());
    if let Some(cache) = dirs::cache_dir() {
        candidates.push(cache.join("ocrs"));
    }

    candidates
        .into_iter()
        .find(|dir| dir.join(DETECTION_MODEL).exists() && dir.join(RECOGNITION_MODEL).exists())
}
