//! Haptic clip data model
//!
//! A clip is a versioned set of envelopes. Each envelope is a named curve of
//! breakpoints (`time` in seconds, normalized `value`) driving one actuator
//! parameter such as amplitude or frequency.
//!
//! All types are immutable once built; constructors validate the invariants
//! that hold for every clip regardless of where it came from. Stricter,
//! format-level rules (strictly increasing times, value range) are enforced
//! by [`crate::clip_parser`].

use crate::{HapticError, Result};
use std::fmt;

/// Highest clip schema major version understood by this crate.
pub const SUPPORTED_MAJOR_VERSION: u32 = 1;

/// Semantic version of the clip schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClipVersion {
    /// Major version (breaking schema changes)
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl ClipVersion {
    /// Create a version from its components
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        ClipVersion {
            major,
            minor,
            patch,
        }
    }

    /// Parse `major[.minor[.patch]]`; missing components default to 0.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let mut parts = trimmed.split('.');
        let mut next = |required: bool| -> Result<u32> {
            match parts.next() {
                Some(part) => part.parse::<u32>().map_err(|_| {
                    HapticError::VersionError(format!("malformed version string '{}'", trimmed))
                }),
                None if required => Err(HapticError::VersionError(format!(
                    "malformed version string '{}'",
                    trimmed
                ))),
                None => Ok(0),
            }
        };

        let major = next(true)?;
        let minor = next(false)?;
        let patch = next(false)?;
        if parts.next().is_some() {
            return Err(HapticError::VersionError(format!(
                "malformed version string '{}'",
                trimmed
            )));
        }

        Ok(ClipVersion::new(major, minor, patch))
    }

    /// Whether clips of this version can be played
    pub fn is_supported(&self) -> bool {
        self.major == SUPPORTED_MAJOR_VERSION
    }
}

impl Default for ClipVersion {
    fn default() -> Self {
        ClipVersion::new(SUPPORTED_MAJOR_VERSION, 0, 0)
    }
}

impl fmt::Display for ClipVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// One control point of an envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Time in seconds from the start of the clip
    pub time: f64,
    /// Normalized parameter value
    pub value: f32,
}

impl Breakpoint {
    /// Create a breakpoint
    pub const fn new(time: f64, value: f32) -> Self {
        Breakpoint { time, value }
    }
}

/// A named, time-ordered curve of one haptic parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    name: String,
    breakpoints: Vec<Breakpoint>,
}

impl Envelope {
    /// Build an envelope.
    ///
    /// Requires at least one breakpoint, finite non-negative times in
    /// non-decreasing order and finite values. Identical times are accepted
    /// here; the schedule resolves them last-write-wins.
    pub fn new(name: impl Into<String>, breakpoints: Vec<Breakpoint>) -> Result<Self> {
        let name = name.into();

        if breakpoints.is_empty() {
            return Err(HapticError::SchemaError(format!(
                "envelope '{}' has no breakpoints",
                name
            )));
        }

        for (index, point) in breakpoints.iter().enumerate() {
            if !point.time.is_finite() || point.time < 0.0 {
                return Err(HapticError::SchemaError(format!(
                    "envelope '{}' breakpoint {} has invalid time {}",
                    name, index, point.time
                )));
            }
            if !point.value.is_finite() {
                return Err(HapticError::SchemaError(format!(
                    "envelope '{}' breakpoint {} has non-finite value",
                    name, index
                )));
            }
        }

        if let Some(index) = breakpoints
            .windows(2)
            .position(|pair| pair[1].time < pair[0].time)
        {
            return Err(HapticError::OrderingError {
                envelope: name,
                index: index + 1,
                message: format!(
                    "time {} is before {}",
                    breakpoints[index + 1].time,
                    breakpoints[index].time
                ),
            });
        }

        Ok(Envelope { name, breakpoints })
    }

    /// Channel name (e.g. `amplitude`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Breakpoints in declaration order
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Time of the last breakpoint
    pub fn end_time(&self) -> f64 {
        self.breakpoints.last().map_or(0.0, |point| point.time)
    }
}

/// Free-form descriptive fields carried by a clip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipMetadata {
    /// Project or clip name
    pub project: Option<String>,
    /// Author of the clip
    pub author: Option<String>,
    /// Free-form description
    pub description: Option<String>,
}

impl ClipMetadata {
    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        self.project.is_none() && self.author.is_none() && self.description.is_none()
    }
}

/// A parsed haptic clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipDocument {
    version: ClipVersion,
    metadata: ClipMetadata,
    signals: Vec<Envelope>,
}

impl ClipDocument {
    /// Build a clip from its envelopes.
    ///
    /// Fails with [`HapticError::VersionError`] for unsupported versions and
    /// with [`HapticError::SchemaError`] when two envelopes share a name.
    pub fn new(
        version: ClipVersion,
        metadata: ClipMetadata,
        signals: Vec<Envelope>,
    ) -> Result<Self> {
        if !version.is_supported() {
            return Err(HapticError::VersionError(format!(
                "version {} is not supported (expected major version {})",
                version, SUPPORTED_MAJOR_VERSION
            )));
        }

        for (index, envelope) in signals.iter().enumerate() {
            if signals[..index]
                .iter()
                .any(|other| other.name() == envelope.name())
            {
                return Err(HapticError::SchemaError(format!(
                    "duplicate envelope name '{}'",
                    envelope.name()
                )));
            }
        }

        Ok(ClipDocument {
            version,
            metadata,
            signals,
        })
    }

    /// Schema version
    pub fn version(&self) -> ClipVersion {
        self.version
    }

    /// Descriptive metadata
    pub fn metadata(&self) -> &ClipMetadata {
        &self.metadata
    }

    /// Envelopes in declaration order
    pub fn signals(&self) -> &[Envelope] {
        &self.signals
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.signals.len()
    }

    /// Maximum breakpoint time across all envelopes (0 for an empty clip)
    pub fn duration(&self) -> f64 {
        self.signals
            .iter()
            .map(Envelope::end_time)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        assert_eq!(ClipVersion::parse("1.2.3").unwrap(), ClipVersion::new(1, 2, 3));
        assert_eq!(ClipVersion::parse("1").unwrap(), ClipVersion::new(1, 0, 0));
        assert_eq!(ClipVersion::parse(" 1.4 ").unwrap(), ClipVersion::new(1, 4, 0));
        assert!(ClipVersion::parse("").is_err());
        assert!(ClipVersion::parse("1.x").is_err());
        assert!(ClipVersion::parse("1.0.0.0").is_err());
        assert_eq!(ClipVersion::new(1, 0, 2).to_string(), "1.0.2");
    }

    #[test]
    fn test_envelope_requires_breakpoints() {
        let err = Envelope::new("amplitude", vec![]).unwrap_err();
        assert!(matches!(err, HapticError::SchemaError(_)));
    }

    #[test]
    fn test_envelope_rejects_negative_time() {
        let err = Envelope::new("amplitude", vec![Breakpoint::new(-0.1, 0.0)]).unwrap_err();
        assert!(matches!(err, HapticError::SchemaError(_)));
    }

    #[test]
    fn test_envelope_rejects_backwards_time() {
        let err = Envelope::new(
            "amplitude",
            vec![Breakpoint::new(0.5, 0.0), Breakpoint::new(0.2, 1.0)],
        )
        .unwrap_err();
        match err {
            HapticError::OrderingError { envelope, index, .. } => {
                assert_eq!(envelope, "amplitude");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_envelope_accepts_identical_times() {
        let envelope = Envelope::new(
            "amplitude",
            vec![Breakpoint::new(0.5, 0.0), Breakpoint::new(0.5, 1.0)],
        );
        assert!(envelope.is_ok());
    }

    #[test]
    fn test_document_duration() {
        let doc = ClipDocument::new(
            ClipVersion::default(),
            ClipMetadata::default(),
            vec![
                Envelope::new(
                    "amplitude",
                    vec![Breakpoint::new(0.0, 0.0), Breakpoint::new(1.5, 1.0)],
                )
                .unwrap(),
                Envelope::new("frequency", vec![Breakpoint::new(0.25, 0.3)]).unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(doc.duration(), 1.5);
        assert_eq!(doc.channel_count(), 2);
    }

    #[test]
    fn test_document_rejects_unsupported_version() {
        let err = ClipDocument::new(ClipVersion::new(2, 0, 0), ClipMetadata::default(), vec![])
            .unwrap_err();
        assert!(matches!(err, HapticError::VersionError(_)));
    }

    #[test]
    fn test_document_rejects_duplicate_names() {
        let envelope = Envelope::new("amplitude", vec![Breakpoint::new(0.0, 0.0)]).unwrap();
        let err = ClipDocument::new(
            ClipVersion::default(),
            ClipMetadata::default(),
            vec![envelope.clone(), envelope],
        )
        .unwrap_err();
        assert!(matches!(err, HapticError::SchemaError(_)));
    }

    #[test]
    fn test_empty_document_has_zero_duration() {
        let doc =
            ClipDocument::new(ClipVersion::default(), ClipMetadata::default(), vec![]).unwrap();
        assert_eq!(doc.duration(), 0.0);
    }
}
