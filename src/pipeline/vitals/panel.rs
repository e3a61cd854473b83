use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::VitalSignReading;

/// Per-image result: panel key → rendered reading, in scan order.
///
/// Serializes as a flat JSON object (`{"BP": "120/80 mmHg (Normal)", ...}`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VitalSignPanel {
    entries: Vec<PanelEntry>,
}

#[derive(Debug, Clone, PartialEq)]
struct PanelEntry {
    reading: VitalSignReading,
    display: String,
}

impl VitalSignPanel {
    /// Add a reading. A second reading of the same kind replaces the first.
    pub fn insert(&mut self, reading: VitalSignReading) {
        let display = reading.display();
        match self
            .entries
            .iter_mut()
            .find(|e| e.reading.vital_type == reading.vital_type)
        {
            Some(existing) => *existing = PanelEntry { reading, display },
            None => self.entries.push(PanelEntry { reading, display }),
        }
    }

    /// Rendered reading for a panel key such as `"BP"`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.reading.vital_type.panel_key() == key)
            .map(|e| e.display.as_str())
    }

    #[cfg(test)]
    pub fn readings(&self) -> impl Iterator<Item = &VitalSignReading> {
        self.entries.iter().map(|e| &e.reading)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for VitalSignPanel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.reading.vital_type.panel_key(), &entry.display)?;
        }
        map.end()
    }
}
