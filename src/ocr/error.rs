use thiserror::Error;

/// Failures in the recognition pipeline.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("image {width}x{height} is too small to hold a score row")]
    ImageTooSmall { width: u32, height: u32 },

    #[error("{engine} engine unavailable: {reason}")]
    EngineUnavailable { engine: &'static str, reason: String },

    #[error("{engine} failed: {message}")]
    ToolFailed { engine: &'static str, message: String },

    #[error("OCR backend error: {message}")]
    Backend { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
