//! Logging sink

use super::{ActuatorSink, Sample};
use log::{info, trace};

/// Sink that writes every sample to the `trace` log level.
#[derive(Debug, Default)]
pub struct LogSink {
    samples: usize,
}

impl LogSink {
    /// Create a logging sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples logged since the last playback end
    pub fn samples(&self) -> usize {
        self.samples
    }
}

impl ActuatorSink for LogSink {
    fn on_sample(&mut self, sample: Sample<'_>) {
        self.samples += 1;
        trace!("t={:.4}s values={:?}", sample.time, sample.values);
    }

    fn on_playback_end(&mut self) {
        info!("Playback ended after {} samples", self.samples);
        self.samples = 0;
    }
}
