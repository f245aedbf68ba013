//! Engine configuration
//!
//! Read from a JSON file; every field is optional and falls back to its
//! default.
//!
//! ```json
//! {
//!   "schema": { "signals": "envelopes" },
//!   "value_range": [0.0, 1.0],
//!   "cadence": "on_change",
//!   "sink": "log",
//!   "tick_rate_hz": 120.0
//! }
//! ```

use crate::clip_parser::{ClipParser, ClipSchema};
use crate::sink::SinkKind;
use crate::{HapticError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default frame rate of the CLI playback loop
pub const DEFAULT_TICK_RATE_HZ: f32 = 60.0;

/// When the engine emits samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// One sample per tick
    #[default]
    EveryTick,
    /// Only when a channel value differs from the last emitted sample
    OnChange,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticConfig {
    /// Clip field names
    pub schema: ClipSchema,
    /// Accepted breakpoint value range (inclusive)
    pub value_range: [f32; 2],
    /// Sample emission cadence
    pub cadence: Cadence,
    /// Sink adapter built when none is supplied explicitly
    pub sink: SinkKind,
    /// Frame rate of the CLI playback loop
    pub tick_rate_hz: f32,
}

impl Default for HapticConfig {
    fn default() -> Self {
        HapticConfig {
            schema: ClipSchema::default(),
            value_range: ClipParser::DEFAULT_VALUE_RANGE,
            cadence: Cadence::default(),
            sink: SinkKind::default(),
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl HapticConfig {
    /// Load and validate a configuration file.
    ///
    /// Read failures surface as [`HapticError::Io`], bad content as
    /// [`HapticError::ConfigError`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a configuration from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: HapticConfig = serde_json::from_str(content)
            .map_err(|e| HapticError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value range, tick rate and schema field names
    pub fn validate(&self) -> Result<()> {
        let [low, high] = self.value_range;
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(HapticError::ConfigError(format!(
                "value_range [{}, {}] must be finite with low <= high",
                low, high
            )));
        }

        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            return Err(HapticError::ConfigError(format!(
                "tick_rate_hz must be positive, got {}",
                self.tick_rate_hz
            )));
        }

        for (label, field) in self.schema.fields() {
            if field.trim().is_empty() {
                return Err(HapticError::ConfigError(format!(
                    "schema field '{}' must not be empty",
                    label
                )));
            }
        }

        Ok(())
    }

    /// Parser for this configuration's schema and value range
    pub fn parser(&self) -> ClipParser {
        ClipParser::new(self.schema.clone(), self.value_range)
    }

    /// Seconds between two CLI ticks
    pub fn tick_interval_secs(&self) -> f64 {
        1.0 / self.tick_rate_hz as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HapticConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cadence, Cadence::EveryTick);
        assert_eq!(config.sink, SinkKind::Log);
        assert_eq!(config.value_range, [0.0, 1.0]);
    }

    #[test]
    fn test_partial_json() {
        let config = HapticConfig::from_json_str(
            r#"{"schema": {"signals": "envelopes"}, "cadence": "on_change", "tick_rate_hz": 120}"#,
        )
        .unwrap();
        assert_eq!(config.schema.signals, "envelopes");
        assert_eq!(config.schema.time, "time");
        assert_eq!(config.cadence, Cadence::OnChange);
        assert_eq!(config.tick_rate_hz, 120.0);
        assert_eq!(config.sink, SinkKind::Log);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            HapticConfig::from_json_str(r#"{"value_range": [1.0, 0.0]}"#),
            Err(HapticError::ConfigError(_))
        ));
        assert!(matches!(
            HapticConfig::from_json_str(r#"{"tick_rate_hz": 0}"#),
            Err(HapticError::ConfigError(_))
        ));
        assert!(matches!(
            HapticConfig::from_json_str(r#"{"schema": {"time": ""}}"#),
            Err(HapticError::ConfigError(_))
        ));
        assert!(matches!(
            HapticConfig::from_json_str(r#"{"sink": "android"}"#),
            Err(HapticError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        match HapticConfig::from_file("/nonexistent/haptic-config.json") {
            Err(HapticError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_parser_uses_configured_range() {
        let config = HapticConfig {
            value_range: [-1.0, 1.0],
            ..HapticConfig::default()
        };
        let doc = config
            .parser()
            .parse(r#"{"version": "1.0.0", "signals": [{"name": "a", "breakpoints": [{"time": 0, "value": -0.5}]}]}"#)
            .unwrap();
        assert_eq!(doc.signals()[0].breakpoints()[0].value, -0.5);
    }
}
