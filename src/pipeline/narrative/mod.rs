//! AI narrative collaborator: free text in, commentary out.
//!
//! The narrative is opaque to the rest of the pipeline; it is returned and
//! stored verbatim.

pub mod gemini;

pub use gemini::GeminiClient;

use std::sync::Arc;

use super::ollama::OllamaClient;
use super::CollaboratorError;

pub trait NarrativeGenerator: Send + Sync {
    fn generate(&self, free_text: &str) -> Result<String, CollaboratorError>;
}

/// Narrative from a local Ollama text model.
pub struct OllamaNarrator {
    client: Arc<OllamaClient>,
    model_name: String,
}

impl OllamaNarrator {
    pub fn new(client: Arc<OllamaClient>, model_name: String) -> Self {
        Self { client, model_name }
    }
}

impl NarrativeGenerator for OllamaNarrator {
    fn generate(&self, free_text: &str) -> Result<String, CollaboratorError> {
        let _span = tracing::info_span!("ollama_narrative", model = %self.model_name).entered();
        let text = self.client.generate(&self.model_name, free_text, None)?;
        if text.trim().is_empty() {
            return Err(CollaboratorError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Mock narrative generator for testing: returns a configurable response.
pub struct MockNarrator {
    response: Result<String, String>,
}

impl MockNarrator {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
        }
    }
}

impl NarrativeGenerator for MockNarrator {
    fn generate(&self, _free_text: &str) -> Result<String, CollaboratorError> {
        self.response.clone().map_err(CollaboratorError::Network)
    }
}
