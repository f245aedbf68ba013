//! Configurable clip field names

use serde::{Deserialize, Serialize};

/// Field names used to read and write clip documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSchema {
    /// Top-level schema version field
    pub version: String,
    /// Top-level optional metadata object
    pub metadata: String,
    /// Top-level envelope list
    pub signals: String,
    /// Envelope name field
    pub name: String,
    /// Envelope breakpoint list
    pub breakpoints: String,
    /// Breakpoint time field (seconds)
    pub time: String,
    /// Breakpoint value field
    pub value: String,
}

impl Default for ClipSchema {
    fn default() -> Self {
        ClipSchema {
            version: "version".to_string(),
            metadata: "metadata".to_string(),
            signals: "signals".to_string(),
            name: "name".to_string(),
            breakpoints: "breakpoints".to_string(),
            time: "time".to_string(),
            value: "value".to_string(),
        }
    }
}

impl ClipSchema {
    /// Field names that must be set, paired with their labels
    pub(crate) fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("version", &self.version),
            ("metadata", &self.metadata),
            ("signals", &self.signals),
            ("name", &self.name),
            ("breakpoints", &self.breakpoints),
            ("time", &self.time),
            ("value", &self.value),
        ]
    }
}
