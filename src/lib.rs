//! Haptic clip playback engine
//!
//! Parses `.haptic` envelope documents (JSON), turns them into a time-ordered
//! schedule of control curves and plays that schedule against an externally
//! supplied wall clock, emitting normalized actuator samples to a pluggable
//! actuator sink.
//!
//! # Features
//! - Strict clip validation (format, schema, version, breakpoint ordering)
//! - Configurable clip field names
//! - Piecewise-linear envelope sampling with clamping outside each envelope
//! - Tick-driven playback state machine with restart, stop and seek
//! - Single session per registry, serialized behind one mutex
//! - Swappable actuator sinks (null, logging, recording)
//!
//! # Crate feature flags
//! - `cli` (default): command-line player (enables the optional `log4rs` dep)
//!
//! # Quick start
//! ```
//! use haptic_clip::{HapticConfig, HapticSession, ManualClock, RecordingSink, SessionRegistry};
//!
//! let registry = SessionRegistry::new();
//! let clock = ManualClock::new();
//! let sink = RecordingSink::new();
//! let session = HapticSession::builder(HapticConfig::default())
//!     .sink(Box::new(sink.clone()))
//!     .clock(Box::new(clock.clone()))
//!     .register(&registry)
//!     .unwrap();
//!
//! session
//!     .load(r#"{"version": "1.0.0", "signals": [
//!         {"name": "amplitude", "breakpoints": [{"time": 0.0, "value": 0.0}, {"time": 1.0, "value": 1.0}]}
//!     ]}"#)
//!     .unwrap();
//! session.play().unwrap();
//!
//! session.tick();
//! clock.advance(0.5);
//! session.tick();
//!
//! let frames = sink.frames();
//! assert_eq!(frames.len(), 2);
//! assert_eq!(frames[1].values, vec![0.5]);
//! ```

#![warn(missing_docs)]

// Domain modules
pub mod clip; // Clip data model
pub mod clip_parser; // Clip document parsing & canonical serialization
pub mod clock; // Wall-clock sources
pub mod config; // Engine configuration
pub mod engine; // Playback state machine
pub mod schedule; // Timeline scheduling & sampling
pub mod session; // Session manager & client binding
pub mod sink; // Actuator sinks

/// Error types for haptic clip operations
#[derive(thiserror::Error, Debug)]
pub enum HapticError {
    /// Clip text is empty or not valid structured data
    #[error("Format error: {0}")]
    FormatError(String),

    /// A required field is missing, has the wrong type or an invalid value
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// The clip schema version is malformed or unsupported
    #[error("Unsupported clip version: {0}")]
    VersionError(String),

    /// Breakpoints of an envelope are not strictly time-ordered
    #[error("Breakpoint ordering error in envelope '{envelope}' at breakpoint {index}: {message}")]
    OrderingError {
        /// Envelope name
        envelope: String,
        /// Index of the offending breakpoint
        index: usize,
        /// Description of the violation
        message: String,
    },

    /// Playback was requested before any clip was loaded
    #[error("No haptic clip loaded")]
    NoClipLoaded,

    /// A client tried to bind while no session is registered
    #[error("Unable to find a registered haptic session")]
    NoSession,

    /// A second session was registered while one is still alive
    #[error("There is more than one haptic session registered. Ensure exactly one session exists.")]
    DuplicateSession,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HapticError {
    /// Returns `true` for errors raised while parsing clip text.
    ///
    /// Parse errors are final for the load attempt; the caller has to supply
    /// corrected input.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            HapticError::FormatError(_)
                | HapticError::SchemaError(_)
                | HapticError::VersionError(_)
                | HapticError::OrderingError { .. }
        )
    }
}

/// Result type for haptic clip operations
pub type Result<T> = std::result::Result<T, HapticError>;

// Public API exports
pub use clip::{Breakpoint, ClipDocument, ClipMetadata, ClipVersion, Envelope};
pub use clip_parser::{parse, to_json, ClipParser, ClipSchema};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Cadence, HapticConfig};
pub use engine::{PlaybackEngine, PlaybackState, Playhead, PlayheadState};
pub use schedule::{ControlEvent, Schedule, ScheduleCursor};
pub use session::{HapticSession, HapticSource, SessionBuilder, SessionRegistry};
pub use sink::{ActuatorSink, LogSink, NullSink, RecordedFrame, RecordingSink, Sample, SinkKind};
