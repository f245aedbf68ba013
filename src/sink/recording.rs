//! Recording sink

use super::{ActuatorSink, Sample};
use parking_lot::Mutex;
use std::sync::Arc;

/// Owned copy of an emitted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    /// Clip time in seconds
    pub time: f64,
    /// Channel values
    pub values: Vec<f32>,
}

#[derive(Debug, Default)]
struct Recording {
    frames: Vec<RecordedFrame>,
    playback_ends: usize,
}

/// Sink that records every sample into a shared buffer.
///
/// Clones share the buffer: hand one clone to the session and keep another
/// to inspect what was emitted.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    recording: Arc<Mutex<Recording>>,
}

impl RecordingSink {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded frames
    pub fn frames(&self) -> Vec<RecordedFrame> {
        self.recording.lock().frames.clone()
    }

    /// Remove and return all recorded frames
    pub fn take_frames(&self) -> Vec<RecordedFrame> {
        std::mem::take(&mut self.recording.lock().frames)
    }

    /// Number of recorded frames
    pub fn len(&self) -> usize {
        self.recording.lock().frames.len()
    }

    /// Whether no frame was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times playback ended
    pub fn playback_ends(&self) -> usize {
        self.recording.lock().playback_ends
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        let mut recording = self.recording.lock();
        recording.frames.clear();
        recording.playback_ends = 0;
    }
}

impl ActuatorSink for RecordingSink {
    fn on_sample(&mut self, sample: Sample<'_>) {
        self.recording.lock().frames.push(RecordedFrame {
            time: sample.time,
            values: sample.values.to_vec(),
        });
    }

    fn on_playback_end(&mut self) {
        self.recording.lock().playback_ends += 1;
    }
}
