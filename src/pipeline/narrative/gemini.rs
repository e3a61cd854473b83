//! Google Gemini narrative generator (Generative Language REST API).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::NarrativeGenerator;
use crate::pipeline::CollaboratorError;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

pub struct GeminiClient {
    api_base: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        api_base: &str,
        api_key: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, CollaboratorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CollaboratorError::Network(e.to_string()))?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            model,
            client,
            timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

impl NarrativeGenerator for GeminiClient {
    fn generate(&self, free_text: &str) -> Result<String, CollaboratorError> {
        let _span = tracing::info_span!("gemini_narrative", model = %self.model).entered();
        let start = std::time::Instant::now();

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: free_text }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| CollaboratorError::from_http(e, &self.api_base, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(CollaboratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| CollaboratorError::ResponseParsing(e.to_string()))?;
        let text = parsed.text().ok_or(CollaboratorError::EmptyResponse)?;

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            chars = text.len(),
            "Gemini narrative complete"
        );
        Ok(text)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated. `None` when the model
    /// returned nothing (e.g. the prompt was blocked).
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
