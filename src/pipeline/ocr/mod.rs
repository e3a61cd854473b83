//! OCR collaborator boundary: image bytes → ordered text lines.
//!
//! The engines only transcribe. Joining lines into the single string the
//! vital-sign extractor scans is done here, by the orchestrator's helper.

pub mod ollama_vision;
pub mod tesseract;

pub use ollama_vision::OllamaVisionOcr;
pub use tesseract::TesseractOcr;

use super::CollaboratorError;

/// OCR engine abstraction (allows mocking for tests).
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an image, one entry per visual line, top to bottom.
    fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, CollaboratorError>;
}

/// Join recognized lines with single spaces.
pub fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split raw engine output into trimmed, non-empty lines.
pub(crate) fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Mock OCR engine for testing: returns configured lines or a failure.
pub struct MockOcr {
    lines: Vec<String>,
    fail_with: Option<String>,
}

impl MockOcr {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            fail_with: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            lines: Vec::new(),
            fail_with: Some(message.to_string()),
        }
    }
}

impl OcrEngine for MockOcr {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<Vec<String>, CollaboratorError> {
        match &self.fail_with {
            Some(message) => Err(CollaboratorError::OcrProcessing(message.clone())),
            None => Ok(self.lines.clone()),
        }
    }
}
