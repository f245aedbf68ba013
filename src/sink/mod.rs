//! Actuator Sinks
//!
//! The playback engine hands every emitted sample to an [`ActuatorSink`].
//! Platform adapters implement the trait; the core never branches on the
//! platform. Adapters shipped with the crate:
//!
//! - [`NullSink`] - discards everything (hosts without haptic hardware)
//! - [`LogSink`] - writes samples through the `log` facade
//! - [`RecordingSink`] - keeps samples in a shared buffer for inspection

mod log_sink;
mod recording;

pub use log_sink::LogSink;
pub use recording::{RecordedFrame, RecordingSink};

use serde::{Deserialize, Serialize};
use std::fmt;

/// One emitted actuator sample.
///
/// Borrowed from the engine for the duration of the callback only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<'a> {
    /// Clip time in seconds
    pub time: f64,
    /// One value per clip channel, in clip order
    pub values: &'a [f32],
}

/// Consumer of actuator samples.
pub trait ActuatorSink: Send {
    /// Called for every emitted sample
    fn on_sample(&mut self, sample: Sample<'_>);

    /// Called once when playback ends, by stop, cancellation or end of clip
    fn on_playback_end(&mut self);
}

/// Sink that ignores all output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ActuatorSink for NullSink {
    fn on_sample(&mut self, _sample: Sample<'_>) {}

    fn on_playback_end(&mut self) {}
}

/// Built-in sink adapters selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// [`NullSink`]
    Null,
    /// [`LogSink`]
    #[default]
    Log,
    /// [`RecordingSink`]
    Recording,
}

impl SinkKind {
    /// Parse a sink kind from its name.
    pub fn from_name(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "null" | "none" => Some(SinkKind::Null),
            "log" => Some(SinkKind::Log),
            "recording" | "record" => Some(SinkKind::Recording),
            _ => None,
        }
    }

    /// Get string representation of the sink kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Null => "null",
            SinkKind::Log => "log",
            SinkKind::Recording => "recording",
        }
    }

    /// Create a fresh sink of this kind
    pub fn build(&self) -> Box<dyn ActuatorSink> {
        match self {
            SinkKind::Null => Box::new(NullSink),
            SinkKind::Log => Box::new(LogSink::new()),
            SinkKind::Recording => Box::new(RecordingSink::new()),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
