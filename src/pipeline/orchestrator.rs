//! Analysis orchestration: free text and an optional device photo in, one
//! persisted analysis out.
//!
//! Order per request: boolean query, AI narrative, image (validate, OCR,
//! extract), persist. Any collaborator failure aborts the request before the
//! store is touched, except an OCR reply that is empty or malformed: that
//! yields an empty vital-sign panel.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use super::narrative::NarrativeGenerator;
use super::ocr::{join_lines, OcrEngine};
use super::taxonomy::KeywordMatcher;
use super::vitals::{extract_vitals, VitalSignPanel};
use super::CollaboratorError;
use crate::db::{AnalysisStore, DatabaseError};
use crate::models::NewAnalysis;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("Could not save analysis: {0}")]
    Database(#[from] DatabaseError),
}

/// One analysis request.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub description: String,
    /// Raw upload bytes. `None` or empty means no image was submitted.
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub record_id: Uuid,
    pub boolean_query: String,
    pub ai_analysis: String,
    pub image_analysis: VitalSignPanel,
}

pub struct AnalysisService {
    matcher: Arc<KeywordMatcher>,
    narrator: Arc<dyn NarrativeGenerator>,
    ocr: Arc<dyn OcrEngine>,
    store: Arc<dyn AnalysisStore>,
}

impl AnalysisService {
    pub fn new(
        matcher: Arc<KeywordMatcher>,
        narrator: Arc<dyn NarrativeGenerator>,
        ocr: Arc<dyn OcrEngine>,
        store: Arc<dyn AnalysisStore>,
    ) -> Self {
        Self {
            matcher,
            narrator,
            ocr,
            store,
        }
    }

    /// Number of compiled taxonomy terms.
    pub fn taxonomy_terms(&self) -> usize {
        self.matcher.pattern_count()
    }

    pub fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        let _span = tracing::info_span!(
            "analyze",
            description_chars = request.description.len(),
            has_image = request.image.as_ref().is_some_and(|b| !b.is_empty())
        )
        .entered();
        let start = std::time::Instant::now();

        let boolean_query = self.matcher.generate_boolean_query(&request.description);
        let ai_analysis = self.narrator.generate(&request.description)?;

        let image_analysis = match request.image.as_deref() {
            Some(bytes) if !bytes.is_empty() => self.analyze_image(bytes)?,
            _ => VitalSignPanel::default(),
        };

        let record = self.store.save(NewAnalysis {
            description: request.description,
            boolean_query: boolean_query.clone(),
            ai_analysis: ai_analysis.clone(),
            image_analysis: image_analysis.clone(),
        })?;

        tracing::info!(
            id = %record.id,
            vitals = image_analysis.len(),
            elapsed_ms = %start.elapsed().as_millis(),
            "Analysis complete"
        );

        Ok(AnalysisOutcome {
            record_id: record.id,
            boolean_query,
            ai_analysis,
            image_analysis,
        })
    }

    /// Validate an upload, transcribe it, and extract the vital-sign panel.
    pub fn analyze_image(&self, bytes: &[u8]) -> Result<VitalSignPanel, CollaboratorError> {
        let format = image::guess_format(bytes).map_err(|_| CollaboratorError::InvalidImage)?;
        tracing::debug!(?format, size = bytes.len(), "Image accepted");

        let lines = match self.ocr.recognize(bytes) {
            Ok(lines) => lines,
            Err(e @ (CollaboratorError::ResponseParsing(_) | CollaboratorError::EmptyResponse)) => {
                tracing::warn!(error = %e, "OCR reply unusable, no vitals extracted");
                return Ok(VitalSignPanel::default());
            }
            Err(e) => return Err(e),
        };
        let text = join_lines(&lines);
        let panel = extract_vitals(&text);
        tracing::debug!(lines = lines.len(), vitals = panel.len(), "Image analyzed");
        Ok(panel)
    }
}
