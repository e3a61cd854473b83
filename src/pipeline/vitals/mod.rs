//! Vital-sign extraction: recognized device text to classified readings.
//!
//! Five independent scans, one per vital sign. Each scan takes the first
//! match only; a sign that is not found is simply absent from the panel.

pub mod panel;
pub mod patterns;

pub use panel::VitalSignPanel;
pub use patterns::*;

use thiserror::Error;

use crate::models::{VitalSignReading, VitalType};

/// A pattern matched but its captured number could not be parsed. Never
/// propagated out of the extractor: the affected sign is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Could not parse {vital_type:?} value from '{captured}'")]
pub struct ExtractionParseError {
    pub vital_type: VitalType,
    pub captured: String,
}

/// Scan `recognized_text` for every supported vital sign.
///
/// Pure and idempotent. Empty text yields an empty panel.
pub fn extract_vitals(recognized_text: &str) -> VitalSignPanel {
    let mut panel = VitalSignPanel::default();
    if recognized_text.trim().is_empty() {
        return panel;
    }

    for vital_type in VitalType::ALL {
        if let Some(reading) = scan_recovering(vital_type, recognized_text) {
            panel.insert(reading);
        }
    }

    tracing::debug!(found = panel.len(), "Vital-sign scan complete");
    panel
}

fn scan_recovering(vital_type: VitalType, text: &str) -> Option<VitalSignReading> {
    match scan(vital_type, text) {
        Ok(reading) => reading,
        Err(e) => {
            tracing::debug!(error = %e, "Dropping unparseable vital sign");
            None
        }
    }
}
