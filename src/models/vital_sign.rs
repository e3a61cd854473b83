use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of vital sign read off a device display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    BloodPressure,
    BloodSugar,
    HeartRate,
    Temperature,
    OxygenSaturation,
}

impl VitalType {
    /// All kinds, in the order the extractor scans for them.
    pub const ALL: [VitalType; 5] = [
        VitalType::BloodPressure,
        VitalType::BloodSugar,
        VitalType::HeartRate,
        VitalType::Temperature,
        VitalType::OxygenSaturation,
    ];

    /// Key used in the image-analysis panel returned to clients.
    pub fn panel_key(self) -> &'static str {
        match self {
            VitalType::BloodPressure => "BP",
            VitalType::BloodSugar => "Blood_Sugar",
            VitalType::HeartRate => "Heart_Rate",
            VitalType::Temperature => "Temperature",
            VitalType::OxygenSaturation => "Oxygen",
        }
    }

    /// Display unit, including the separator that precedes it.
    pub fn unit_suffix(self) -> &'static str {
        match self {
            VitalType::BloodPressure => " mmHg",
            VitalType::BloodSugar => " mg/dL",
            VitalType::HeartRate => " bpm",
            VitalType::Temperature => "°C",
            VitalType::OxygenSaturation => "%",
        }
    }
}

/// Range classification of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VitalStatus {
    Normal,
    Abnormal,
}

impl VitalStatus {
    pub fn from_in_range(in_range: bool) -> Self {
        if in_range {
            VitalStatus::Normal
        } else {
            VitalStatus::Abnormal
        }
    }
}

impl fmt::Display for VitalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VitalStatus::Normal => f.write_str("Normal"),
            VitalStatus::Abnormal => f.write_str("Abnormal"),
        }
    }
}

/// Closed numeric interval; both bounds count as in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalRange {
    pub low: f64,
    pub high: f64,
}

impl NormalRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Raw value(s) parsed from recognized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VitalValue {
    /// Systolic / diastolic.
    Pressure { systolic: u32, diastolic: u32 },
    Integer(u32),
    Decimal(f64),
    /// Digit run too large for `u32`, kept verbatim.
    Oversized(String),
}

impl fmt::Display for VitalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VitalValue::Pressure {
                systolic,
                diastolic,
            } => write!(f, "{systolic}/{diastolic}"),
            VitalValue::Integer(v) => write!(f, "{v}"),
            VitalValue::Oversized(digits) => f.write_str(digits),
            // Whole numbers keep one decimal place: 37 → "37.0".
            VitalValue::Decimal(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            VitalValue::Decimal(v) => write!(f, "{v}"),
        }
    }
}

/// One classified measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSignReading {
    pub vital_type: VitalType,
    pub value: VitalValue,
    pub status: VitalStatus,
}

impl VitalSignReading {
    /// `"<value><unit> (<status>)"`, e.g. `120/80 mmHg (Normal)`.
    pub fn display(&self) -> String {
        format!(
            "{}{} ({})",
            self.value,
            self.vital_type.unit_suffix(),
            self.status
        )
    }
}
