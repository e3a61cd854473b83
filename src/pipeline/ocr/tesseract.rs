//! OCR via the `tesseract` command-line tool.
//!
//! The CLI reads from a path, so the upload is staged in a named temp file
//! that is removed when it goes out of scope, on success and on every error.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use super::{split_lines, OcrEngine};
use crate::pipeline::CollaboratorError;

pub struct TesseractOcr {
    binary: PathBuf,
    lang: String,
}

impl TesseractOcr {
    pub fn new(binary: PathBuf, lang: &str) -> Self {
        Self {
            binary,
            lang: lang.to_string(),
        }
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, CollaboratorError> {
        let _span = tracing::info_span!("tesseract_ocr", image_size = image_bytes.len()).entered();

        let mut staged = tempfile::Builder::new().prefix("medlens-scan-").tempfile()?;
        staged.write_all(image_bytes)?;
        staged.flush()?;

        let output = Command::new(&self.binary)
            .arg(staged.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|e| {
                CollaboratorError::OcrProcessing(format!(
                    "cannot run {}: {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollaboratorError::OcrProcessing(stderr.trim().to_string()));
        }

        let lines = split_lines(&String::from_utf8_lossy(&output.stdout));
        tracing::info!(lines = lines.len(), "Tesseract OCR complete");
        Ok(lines)
    }
}
