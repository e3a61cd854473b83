use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::vitals::VitalSignPanel;

/// Fields produced by one analysis request, before the store assigns
/// identity and timestamp.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub description: String,
    pub boolean_query: String,
    pub ai_analysis: String,
    pub image_analysis: VitalSignPanel,
}

/// A persisted analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub description: String,
    pub boolean_query: String,
    pub ai_analysis: String,
    /// Panel as stored: a JSON object of panel key → display string.
    pub image_analysis: serde_json::Value,
    pub created_at: NaiveDateTime,
}
