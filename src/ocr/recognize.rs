//! Per-cell recognition with primary/secondary engine fallback.

use image::{GrayImage, RgbImage};
use std::sync::OnceLock;

use super::engine::{strip_whitespace, OcrEngine, TesseractEngine};
use super::neural::NeuralEngine;
use super::preprocess::binarize;
use crate::config::PipelineConfig;

/// Supplies the two engines used for a recognition pass.
pub trait EngineProvider: Sync {
    fn primary(&self) -> Option<&dyn OcrEngine>;
    /// Only asked for when the primary is unavailable or read nothing.
    fn secondary(&self) -> Option<&dyn OcrEngine>;
}

static TESSERACT: OnceLock<Option<TesseractEngine>> = OnceLock::new();
static NEURAL: OnceLock<Option<NeuralEngine>> = OnceLock::new();

/// Process-wide engines, built from the global config on first use and
/// kept for the life of the process.
pub struct SystemEngines;

impl EngineProvider for SystemEngines {
    fn primary(&self) -> Option<&dyn OcrEngine> {
        TESSERACT
            .get_or_init(|| {
                match TesseractEngine::discover(&crate::config::get_config().tesseract) {
                    Ok(engine) => Some(engine),
                    Err(e) => {
                        crate::log(&format!("Primary OCR engine disabled: {}", e));
                        None
                    }
                }
            })
            .as_ref()
            .map(|e| e as &dyn OcrEngine)
    }

    fn secondary(&self) -> Option<&dyn OcrEngine> {
        NEURAL
            .get_or_init(|| match NeuralEngine::load(&crate::config::get_config().neural) {
                Ok(engine) => Some(engine),
                Err(e) => {
                    crate::log(&format!("Secondary OCR engine disabled: {}", e));
                    None
                }
            })
            .as_ref()
            .map(|e| e as &dyn OcrEngine)
    }
}

/// An explicit engine pair, for callers that build their own engines.
#[derive(Default)]
pub struct EnginePair {
    pub primary: Option<Box<dyn OcrEngine>>,
    pub secondary: Option<Box<dyn OcrEngine>>,
}

impl EngineProvider for EnginePair {
    fn primary(&self) -> Option<&dyn OcrEngine> {
        self.primary.as_deref()
    }

    fn secondary(&self) -> Option<&dyn OcrEngine> {
        self.secondary.as_deref()
    }
}

/// Reads one cell mask. The secondary engine runs once, only when the
/// primary is missing, fails or reads nothing. Returns `""` when neither
/// engine produces anything.
pub fn read_symbols(mask: &GrayImage, engines: &dyn EngineProvider) -> String {
    if let Some(primary) = engines.primary() {
        match primary.read_symbols(mask) {
            Ok(text) => {
                let text = strip_whitespace(&text);
                if !text.is_empty() {
                    return text;
                }
            }
            Err(e) => crate::log(&format!("{} failed: {}", primary.name(), e)),
        }
    }

    let Some(secondary) = engines.secondary() else {
        return String::new();
    };
    crate::log(&format!("Falling back to {}", secondary.name()));

    match secondary.read_symbols(mask) {
        Ok(text) => strip_whitespace(&text),
        Err(e) => {
            crate::log(&format!("{} failed: {}", secondary.name(), e));
            String::new()
        }
    }
}

/// Binarises one frame cell and reads its marks.
pub fn recognize(cell: &RgbImage, engines: &dyn EngineProvider, cfg: &PipelineConfig) -> String {
    let mask = binarize(cell, &cfg.binarize);
    read_symbols(&mask, engines)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ocr::OcrError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) struct MockEngine {
        pub reply: Result<String, &'static str>,
        pub calls: AtomicUsize,
    }

    impl MockEngine {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: &'static str) -> Self {
            Self {
                reply: Err(message),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl OcrEngine for MockEngine {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn read_symbols(&self, _mask: &GrayImage) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(OcrError::ToolFailed {
                    engine: "mock",
                    message: message.to_string(),
                }),
            }
        }
    }

    struct Pair<'a> {
        primary: Option<&'a MockEngine>,
        secondary: Option<&'a MockEngine>,
    }

    impl EngineProvider for Pair<'_> {
        fn primary(&self) -> Option<&dyn OcrEngine> {
            self.primary.map(|e| e as &dyn OcrEngine)
        }

        fn secondary(&self) -> Option<&dyn OcrEngine> {
            self.secondary.map(|e| e as &dyn OcrEngine)
        }
    }

    fn mask() -> GrayImage {
        GrayImage::new(8, 8)
    }

    #[test]
    fn test_primary_result_is_used() {
        let primary = MockEngine::replying(" 7/ \n");
        let secondary = MockEngine::replying("9");
        let engines = Pair {
            primary: Some(&primary),
            secondary: Some(&secondary),
        };

        assert_eq!(read_symbols(&mask(), &engines), "7/");
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_primary_falls_back_once() {
        let primary = MockEngine::replying("  \n");
        let secondary = MockEngine::replying("X");
        let engines = Pair {
            primary: Some(&primary),
            secondary: Some(&secondary),
        };

        assert_eq!(read_symbols(&mask(), &engines), "X");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_primary_falls_back() {
        let primary = MockEngine::failing("no language data");
        let secondary = MockEngine::replying("8 -");
        let engines = Pair {
            primary: Some(&primary),
            secondary: Some(&secondary),
        };

        assert_eq!(read_symbols(&mask(), &engines), "8-");
    }

    #[test]
    fn test_missing_primary_uses_secondary() {
        let secondary = MockEngine::replying("F");
        let engines = Pair {
            primary: None,
            secondary: Some(&secondary),
        };

        assert_eq!(read_symbols(&mask(), &engines), "F");
    }

    #[test]
    fn test_nothing_recognised_is_empty_token() {
        let primary = MockEngine::replying("");
        let secondary = MockEngine::failing("model missing");
        let engines = Pair {
            primary: Some(&primary),
            secondary: Some(&secondary),
        };
        assert_eq!(read_symbols(&mask(), &engines), "");

        assert_eq!(read_symbols(&mask(), &EnginePair::default()), "");
    }

    #[test]
    fn test_recognize_binarises_before_reading() {
        let engines = EnginePair {
            primary: Some(Box::new(MockEngine::replying("9/"))),
            secondary: None,
        };
        let cell = RgbImage::new(12, 20);
        assert_eq!(recognize(&cell, &engines, &PipelineConfig::default()), "9/");
    }
}
