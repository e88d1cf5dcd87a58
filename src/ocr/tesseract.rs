//! Tesseract OCR engine.
//!
//! Uses Tesseract via command-line for text recognition. This is the
//! traditional, widely-available OCR option; the page image is written to a
//! temporary PNG and handed to the binary.

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use image::DynamicImage;
use tempfile::TempDir;

use super::{OcrConfig, OcrEngine, OcrEngineFactory, RecognitionError};

/// OCR engine backed by the `tesseract` binary.
///
/// One instance serves one recognition call; `cancel` kills the child
/// process, which the in-flight call reports as "no result".
pub struct TesseractEngine {
    config: OcrConfig,
    cancelled: AtomicBool,
    child: Mutex<Option<Child>>,
}

impl TesseractEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            cancelled: AtomicBool::new(false),
            child: Mutex::new(None),
        }
    }

    /// Run Tesseract on an image file already on disk.
    fn run_tesseract(&self, image_path: &std::path::Path) -> Result<Option<String>, RecognitionError> {
        let mut cmd = Command::new("tesseract");
        cmd.arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(ref dir) = self.config.model_path {
            cmd.arg("--tessdata-dir").arg(dir);
        }

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RecognitionError::EngineUnavailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ));
            }
            Err(e) => return Err(RecognitionError::Io(e)),
        };

        *self.child.lock().unwrap() = Some(child);
        // A cancel that raced the spawn has a live child to kill now.
        if self.cancelled.load(Ordering::SeqCst) {
            self.kill_child();
        }

        let child = self.child.lock().unwrap().take();
        let output = match child {
            Some(child) => child.wait_with_output().map_err(RecognitionError::Io)?,
            None => return Ok(None),
        };

        if self.cancelled.load(Ordering::SeqCst) {
            return Ok(None);
        }

        if output.status.success() {
            Ok(Some(String::from_utf8_lossy(&output.stdout).to_string()))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(RecognitionError::RecognitionFailed(format!(
                "tesseract failed: {}",
                stderr
            )))
        }
    }

    fn kill_child(&self) {
        if let Some(child) = self.child.lock().unwrap().as_mut() {
            let _ = child.kill();
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<Option<String>, RecognitionError> {
        if self.cancelled.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let start = Instant::now();

        let temp_dir = TempDir::new()?;
        let image_path = temp_dir.path().join("page.png");
        image
            .save(&image_path)
            .map_err(|e| RecognitionError::Image(format!("failed to write page image: {}", e)))?;

        let text = self.run_tesseract(&image_path)?;

        if let Some(ref text) = text {
            tracing::debug!(
                chars = text.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "tesseract recognition complete"
            );
        }

        Ok(text)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.kill_child();
    }
}

/// Factory producing [`TesseractEngine`] instances.
#[derive(Debug, Default)]
pub struct TesseractFactory;

impl TesseractFactory {
    pub fn new() -> Self {
        Self
    }

    /// Whether the tesseract binary is on PATH.
    pub fn is_available() -> bool {
        which::which("tesseract").is_ok()
    }
}

impl OcrEngineFactory for TesseractFactory {
    fn create(&self, config: &OcrConfig) -> Result<Arc<dyn OcrEngine>, RecognitionError> {
        if !Self::is_available() {
            return Err(RecognitionError::EngineUnavailable(
                "tesseract not installed (install with: apt install tesseract-ocr)".to_string(),
            ));
        }
        Ok(Arc::new(TesseractEngine::new(config.clone())))
    }
}
