//! Vision OCR via a local Ollama multimodal model.

use std::sync::Arc;

use base64::Engine as _;

use super::{split_lines, OcrEngine};
use crate::pipeline::ollama::OllamaClient;
use crate::pipeline::CollaboratorError;

const SYSTEM_PROMPT: &str = "\
You are an OCR engine for photographs of medical devices such as blood-pressure \
monitors, glucometers, pulse oximeters and thermometers. You transcribe; you never \
interpret or comment.";

const USER_PROMPT: &str = "\
Transcribe every piece of text and every number visible in this image, \
including units such as mm Hg, mg/dL, bpm, %, and C. \
Write one line of output per line on the display, top to bottom. \
Output only the transcription.";

/// OCR engine backed by an Ollama vision model.
pub struct OllamaVisionOcr {
    client: Arc<OllamaClient>,
    model_name: String,
}

impl OllamaVisionOcr {
    pub fn new(client: Arc<OllamaClient>, model_name: String) -> Self {
        Self { client, model_name }
    }
}

impl OcrEngine for OllamaVisionOcr {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, CollaboratorError> {
        let _span = tracing::info_span!(
            "vision_ocr",
            model = %self.model_name,
            image_size = image_bytes.len()
        )
        .entered();
        let start = std::time::Instant::now();

        let images = vec![base64::engine::general_purpose::STANDARD.encode(image_bytes)];
        let raw = self.client.chat_with_images(
            &self.model_name,
            USER_PROMPT,
            &images,
            Some(SYSTEM_PROMPT),
        )?;
        let lines = split_lines(&raw);

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            lines = lines.len(),
            "Vision OCR complete"
        );
        Ok(lines)
    }
}
