//! OCR capability boundary.
//!
//! Recognition is an injected capability: the text fetcher creates one engine
//! instance per page unit from an [`OcrEngineFactory`] plus an [`OcrConfig`]
//! value object, and only ever talks to the [`OcrEngine`] trait.
//!
//! Cancellation is cooperative. An engine whose `cancel` was invoked reports
//! it by returning `Ok(None)` from an in-flight `recognize` call; that is a
//! normal "no result" outcome, never an error.

mod tesseract;

pub use tesseract::{TesseractEngine, TesseractFactory};

use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;
use thiserror::Error;

/// Errors from OCR engines.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Engine not available: {0}")]
    EngineUnavailable(String),

    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration handed to an [`OcrEngineFactory`] when creating engines.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Recognition language (engine-specific code, e.g. "eng").
    pub language: String,
    /// Optional override for engine model/data files.
    pub model_path: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            model_path: None,
        }
    }
}

/// A single OCR engine instance.
///
/// Engines are created per recognition unit and may be cancelled from another
/// thread while a `recognize` call is in flight.
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an image.
    ///
    /// Returns `Ok(None)` if the engine observed its own cancellation while
    /// the call was in flight.
    fn recognize(&self, image: &DynamicImage) -> Result<Option<String>, RecognitionError>;

    /// Best-effort abort of an in-flight `recognize` call.
    fn cancel(&self);
}

/// Factory for OCR engine instances.
pub trait OcrEngineFactory: Send + Sync {
    /// Create a fresh engine for one recognition unit.
    fn create(&self, config: &OcrConfig) -> Result<Arc<dyn OcrEngine>, RecognitionError>;
}
