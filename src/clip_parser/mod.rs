//! Clip Document Parser
//!
//! Parses `.haptic` clip text (UTF-8 JSON) into a validated [`ClipDocument`]
//! and writes documents back in canonical form.
//!
//! Document layout (field names are configurable through [`ClipSchema`]):
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "metadata": { "project": "door", "author": "me" },
//!   "signals": [
//!     { "name": "amplitude", "breakpoints": [ { "time": 0.0, "value": 0.2 } ] }
//!   ]
//! }
//! ```
//!
//! The version may also be an object `{"major": 1, "minor": 0, "patch": 0}`.
//!
//! Failures are reported in this order: format (not JSON / empty), version,
//! then each breakpoint in document order. A breakpoint is checked for
//! schema problems (missing or mistyped fields, negative time, out-of-range
//! value) before its time is compared with the previous one.

mod schema;

pub use schema::ClipSchema;

use crate::clip::{Breakpoint, ClipDocument, ClipMetadata, ClipVersion, Envelope};
use crate::{HapticError, Result};
use serde_json::{Map, Value};

const METADATA_PROJECT: &str = "project";
const METADATA_AUTHOR: &str = "author";
const METADATA_DESCRIPTION: &str = "description";

/// Parse clip text with the default schema and value range.
pub fn parse(text: &str) -> Result<ClipDocument> {
    ClipParser::default().parse(text)
}

/// Serialize a clip with the default schema.
pub fn to_json(doc: &ClipDocument) -> String {
    ClipParser::default().to_json(doc)
}

/// Clip parser bound to a schema and an accepted value range.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipParser {
    schema: ClipSchema,
    value_range: [f32; 2],
}

impl ClipParser {
    /// Default accepted breakpoint value range
    pub const DEFAULT_VALUE_RANGE: [f32; 2] = [0.0, 1.0];

    /// Create a parser for the given schema and value range
    pub fn new(schema: ClipSchema, value_range: [f32; 2]) -> Self {
        ClipParser {
            schema,
            value_range,
        }
    }

    /// Field names used by this parser
    pub fn schema(&self) -> &ClipSchema {
        &self.schema
    }

    /// Accepted breakpoint value range (inclusive)
    pub fn value_range(&self) -> [f32; 2] {
        self.value_range
    }

    /// Parse clip text into a validated document. Pure: no side effects.
    pub fn parse(&self, text: &str) -> Result<ClipDocument> {
        if text.trim().is_empty() {
            return Err(HapticError::FormatError("clip text is empty".to_string()));
        }

        let root: Value = serde_json::from_str(text)
            .map_err(|e| HapticError::FormatError(format!("invalid clip JSON: {}", e)))?;
        let root = root.as_object().ok_or_else(|| {
            HapticError::FormatError("clip top level must be a JSON object".to_string())
        })?;

        let version = self.parse_version(root)?;
        if !version.is_supported() {
            return Err(HapticError::VersionError(format!(
                "version {} is not supported",
                version
            )));
        }

        let metadata = self.parse_metadata(root)?;

        let signals = root
            .get(&self.schema.signals)
            .ok_or_else(|| self.missing(&self.schema.signals, "clip"))?
            .as_array()
            .ok_or_else(|| self.mistyped(&self.schema.signals, "clip", "an array"))?;

        let mut envelopes = Vec::with_capacity(signals.len());
        for (index, signal) in signals.iter().enumerate() {
            envelopes.push(self.parse_envelope(index, signal)?);
        }

        ClipDocument::new(version, metadata, envelopes)
    }

    /// Serialize a document in canonical form.
    ///
    /// Parsing the output with the same parser yields an equal document.
    pub fn to_json(&self, doc: &ClipDocument) -> String {
        let mut root = Map::new();
        root.insert(
            self.schema.version.clone(),
            Value::String(doc.version().to_string()),
        );

        let metadata = doc.metadata();
        if !metadata.is_empty() {
            let mut fields = Map::new();
            let entries = [
                (METADATA_PROJECT, &metadata.project),
                (METADATA_AUTHOR, &metadata.author),
                (METADATA_DESCRIPTION, &metadata.description),
            ];
            for (key, value) in entries {
                if let Some(value) = value {
                    fields.insert(key.to_string(), Value::String(value.clone()));
                }
            }
            root.insert(self.schema.metadata.clone(), Value::Object(fields));
        }

        let signals = doc
            .signals()
            .iter()
            .map(|envelope| {
                let breakpoints = envelope
                    .breakpoints()
                    .iter()
                    .map(|point| {
                        let mut entry = Map::new();
                        entry.insert(self.schema.time.clone(), Value::from(point.time));
                        entry.insert(self.schema.value.clone(), Value::from(point.value as f64));
                        Value::Object(entry)
                    })
                    .collect();

                let mut entry = Map::new();
                entry.insert(
                    self.schema.name.clone(),
                    Value::String(envelope.name().to_string()),
                );
                entry.insert(self.schema.breakpoints.clone(), Value::Array(breakpoints));
                Value::Object(entry)
            })
            .collect();
        root.insert(self.schema.signals.clone(), Value::Array(signals));

        // Serializing a Value tree built from strings and finite numbers cannot fail
        serde_json::to_string_pretty(&Value::Object(root)).unwrap_or_default()
    }

    fn parse_version(&self, root: &Map<String, Value>) -> Result<ClipVersion> {
        let field = &self.schema.version;
        match root.get(field) {
            None => Err(self.missing(field, "clip")),
            Some(Value::String(text)) => ClipVersion::parse(text),
            Some(Value::Object(parts)) => {
                let component = |key: &str, required: bool| -> Result<u32> {
                    match parts.get(key) {
                        None if !required => Ok(0),
                        None => Err(HapticError::VersionError(format!(
                            "version object is missing '{}'",
                            key
                        ))),
                        Some(value) => value
                            .as_u64()
                            .and_then(|v| u32::try_from(v).ok())
                            .ok_or_else(|| {
                                HapticError::VersionError(format!(
                                    "version component '{}' must be a non-negative integer",
                                    key
                                ))
                            }),
                    }
                };
                Ok(ClipVersion::new(
                    component("major", true)?,
                    component("minor", false)?,
                    component("patch", false)?,
                ))
            }
            Some(_) => Err(self.mistyped(field, "clip", "a string or an object")),
        }
    }

    fn parse_metadata(&self, root: &Map<String, Value>) -> Result<ClipMetadata> {
        let field = &self.schema.metadata;
        let fields = match root.get(field) {
            None | Some(Value::Null) => return Ok(ClipMetadata::default()),
            Some(Value::Object(fields)) => fields,
            Some(_) => return Err(self.mistyped(field, "clip", "an object")),
        };

        let text = |key: &str| -> Result<Option<String>> {
            match fields.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(value)) => Ok(Some(value.clone())),
                Some(_) => Err(self.mistyped(key, "metadata", "a string")),
            }
        };

        Ok(ClipMetadata {
            project: text(METADATA_PROJECT)?,
            author: text(METADATA_AUTHOR)?,
            description: text(METADATA_DESCRIPTION)?,
        })
    }

    fn parse_envelope(&self, index: usize, signal: &Value) -> Result<Envelope> {
        let context = format!("signal {}", index);
        let signal = signal
            .as_object()
            .ok_or_else(|| HapticError::SchemaError(format!("{} must be an object", context)))?;

        let name = signal
            .get(&self.schema.name)
            .ok_or_else(|| self.missing(&self.schema.name, &context))?
            .as_str()
            .ok_or_else(|| self.mistyped(&self.schema.name, &context, "a string"))?;

        let context = format!("envelope '{}'", name);
        let points = signal
            .get(&self.schema.breakpoints)
            .ok_or_else(|| self.missing(&self.schema.breakpoints, &context))?
            .as_array()
            .ok_or_else(|| self.mistyped(&self.schema.breakpoints, &context, "an array"))?;

        let mut breakpoints = Vec::with_capacity(points.len());
        for (point_index, point) in points.iter().enumerate() {
            let point_context = format!("{} breakpoint {}", context, point_index);
            let point = point.as_object().ok_or_else(|| {
                HapticError::SchemaError(format!("{} must be an object", point_context))
            })?;

            let time = self.number(point, &self.schema.time, &point_context)?;
            let value = self.number(point, &self.schema.value, &point_context)? as f32;

            if !time.is_finite() || time < 0.0 {
                return Err(HapticError::SchemaError(format!(
                    "{} time {} must be finite and non-negative",
                    point_context, time
                )));
            }

            let [low, high] = self.value_range;
            if !(low..=high).contains(&value) {
                return Err(HapticError::SchemaError(format!(
                    "{} value {} is outside [{}, {}]",
                    point_context, value, low, high
                )));
            }

            if let Some(previous) = breakpoints.last().map(|p: &Breakpoint| p.time) {
                if time <= previous {
                    return Err(HapticError::OrderingError {
                        envelope: name.to_string(),
                        index: point_index,
                        message: format!("time {} is not after {}", time, previous),
                    });
                }
            }

            breakpoints.push(Breakpoint::new(time, value));
        }

        Envelope::new(name, breakpoints)
    }

    fn number(&self, object: &Map<String, Value>, field: &str, context: &str) -> Result<f64> {
        object
            .get(field)
            .ok_or_else(|| self.missing(field, context))?
            .as_f64()
            .ok_or_else(|| self.mistyped(field, context, "a number"))
    }

    fn missing(&self, field: &str, context: &str) -> HapticError {
        HapticError::SchemaError(format!("{} is missing required field '{}'", context, field))
    }

    fn mistyped(&self, field: &str, context: &str, expected: &str) -> HapticError {
        HapticError::SchemaError(format!("{} field '{}' must be {}", context, field, expected))
    }
}

impl Default for ClipParser {
    fn default() -> Self {
        ClipParser::new(ClipSchema::default(), Self::DEFAULT_VALUE_RANGE)
    }
}
