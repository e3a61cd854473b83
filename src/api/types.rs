//! Shared state and response types for the HTTP layer.

use std::sync::Arc;

use serde::Serialize;

use crate::pipeline::orchestrator::{AnalysisOutcome, AnalysisService};
use crate::pipeline::vitals::VitalSignPanel;

/// Shared context for all routes.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<AnalysisService>,
    pub max_upload_bytes: usize,
}

impl ApiContext {
    pub fn new(service: Arc<AnalysisService>, max_upload_bytes: usize) -> Self {
        Self {
            service,
            max_upload_bytes,
        }
    }
}

/// Success body of `POST /api/analyze`.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub boolean_query: String,
    pub ai_analysis: String,
    pub image_analysis: VitalSignPanel,
}

impl From<AnalysisOutcome> for AnalysisResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            success: true,
            boolean_query: outcome.boolean_query,
            ai_analysis: outcome.ai_analysis,
            image_analysis: outcome.image_analysis,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub taxonomy_terms: usize,
}
