use std::num::IntErrorKind;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::ExtractionParseError;
use crate::models::{NormalRange, VitalSignReading, VitalStatus, VitalType, VitalValue};

// ──────────────────────────────────────────────
// Patterns
// ──────────────────────────────────────────────

static BLOOD_PRESSURE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(\d{2,3})/(\d{2,3})\s*mm\s*Hg"));

static BLOOD_SUGAR: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d{2,3})\s*mg/dL"));

static HEART_RATE: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+)\s*bpm"));

static TEMPERATURE: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+(?:\.\d+)?)\s*C"));

static OXYGEN_SATURATION: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+)\s*%"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid vital-sign regex pattern")
}

// ──────────────────────────────────────────────
// Normal ranges (inclusive)
// ──────────────────────────────────────────────

pub const SYSTOLIC_NORMAL: NormalRange = NormalRange::new(120.0, 130.0);
pub const DIASTOLIC_NORMAL: NormalRange = NormalRange::new(80.0, 85.0);
pub const BLOOD_SUGAR_NORMAL: NormalRange = NormalRange::new(70.0, 140.0);
pub const HEART_RATE_NORMAL: NormalRange = NormalRange::new(60.0, 100.0);
pub const TEMPERATURE_NORMAL: NormalRange = NormalRange::new(36.5, 37.5);
pub const OXYGEN_NORMAL: NormalRange = NormalRange::new(95.0, 100.0);

// ──────────────────────────────────────────────
// Scanning
// ──────────────────────────────────────────────

/// Find the first reading of `vital_type` in `text`.
///
/// `Ok(None)` when the pattern does not occur at all.
pub fn scan(
    vital_type: VitalType,
    text: &str,
) -> Result<Option<VitalSignReading>, ExtractionParseError> {
    let regex = match vital_type {
        VitalType::BloodPressure => &*BLOOD_PRESSURE,
        VitalType::BloodSugar => &*BLOOD_SUGAR,
        VitalType::HeartRate => &*HEART_RATE,
        VitalType::Temperature => &*TEMPERATURE,
        VitalType::OxygenSaturation => &*OXYGEN_SATURATION,
    };

    let Some(caps) = regex.captures(text) else {
        return Ok(None);
    };

    let (value, in_range) = match vital_type {
        VitalType::BloodPressure => {
            let systolic: u32 = capture(&caps, 1, vital_type)?;
            let diastolic: u32 = capture(&caps, 2, vital_type)?;
            (
                VitalValue::Pressure {
                    systolic,
                    diastolic,
                },
                SYSTOLIC_NORMAL.contains(systolic.into())
                    && DIASTOLIC_NORMAL.contains(diastolic.into()),
            )
        }
        VitalType::BloodSugar => integer(&caps, vital_type, BLOOD_SUGAR_NORMAL)?,
        VitalType::HeartRate => integer(&caps, vital_type, HEART_RATE_NORMAL)?,
        VitalType::OxygenSaturation => integer(&caps, vital_type, OXYGEN_NORMAL)?,
        VitalType::Temperature => {
            let celsius: f64 = capture(&caps, 1, vital_type)?;
            (
                VitalValue::Decimal(celsius),
                TEMPERATURE_NORMAL.contains(celsius),
            )
        }
    };

    Ok(Some(VitalSignReading {
        vital_type,
        value,
        status: VitalStatus::from_in_range(in_range),
    }))
}

/// Single-number reading. A digit run past `u32::MAX` lies above every
/// normal range, so it is kept verbatim and classified Abnormal.
fn integer(
    caps: &Captures<'_>,
    vital_type: VitalType,
    range: NormalRange,
) -> Result<(VitalValue, bool), ExtractionParseError> {
    let raw = group_text(caps, 1);
    match raw.parse::<u32>() {
        Ok(v) => Ok((VitalValue::Integer(v), range.contains(v.into()))),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
            Ok((VitalValue::Oversized(raw.to_string()), false))
        }
        Err(_) => Err(parse_error(vital_type, raw)),
    }
}

fn capture<T: FromStr>(
    caps: &Captures<'_>,
    group: usize,
    vital_type: VitalType,
) -> Result<T, ExtractionParseError> {
    let raw = group_text(caps, group);
    raw.parse().map_err(|_| parse_error(vital_type, raw))
}

fn group_text<'t>(caps: &Captures<'t>, group: usize) -> &'t str {
    caps.get(group).map(|m| m.as_str()).unwrap_or_default()
}

fn parse_error(vital_type: VitalType, raw: &str) -> ExtractionParseError {
    ExtractionParseError {
        vital_type,
        captured: raw.to_string(),
    }
}
