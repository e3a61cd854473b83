pub mod narrative;
pub mod ocr;
pub mod ollama;
pub mod orchestrator;
pub mod taxonomy;
pub mod vitals;

use thiserror::Error;

/// Failure of an external collaborator (OCR engine, narrative model, image
/// intake). Propagated to the orchestrator, which fails the whole request.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("AI service at {0} is not reachable")]
    NotReachable(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("AI service returned an error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not read AI service response: {0}")]
    ResponseParsing(String),

    #[error("AI service returned no content")]
    EmptyResponse,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Uploaded file is not a supported image")]
    InvalidImage,

    #[error("OCR failed: {0}")]
    OcrProcessing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CollaboratorError {
    /// Classify a transport failure from an HTTP collaborator.
    pub(crate) fn from_http(err: reqwest::Error, endpoint: &str, timeout_secs: u64) -> Self {
        if err.is_connect() {
            CollaboratorError::NotReachable(endpoint.to_string())
        } else if err.is_timeout() {
            CollaboratorError::Timeout(timeout_secs)
        } else if err.is_decode() {
            CollaboratorError::ResponseParsing(err.to_string())
        } else {
            CollaboratorError::Network(err.to_string())
        }
    }
}
