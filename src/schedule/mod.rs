//! Timeline Scheduler
//!
//! Converts a [`ClipDocument`] into a [`Schedule`]: one sampled channel per
//! envelope plus a merged, time-ordered view of all control events.
//!
//! ## Sampling
//! Channels are piecewise-linear between bracketing breakpoints and clamped
//! to the first/last breakpoint value outside the envelope's time range.
//! Sampling exactly at a breakpoint returns that breakpoint's value.
//!
//! ## Identical timestamps
//! Breakpoints sharing a time within one envelope collapse to the one
//! declared last. Parsed clips never contain such ties; envelopes built in
//! code may.

mod channel;
mod cursor;

pub use cursor::ScheduleCursor;

use crate::clip::ClipDocument;
use channel::Channel;

/// One breakpoint of the merged timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlEvent {
    /// Time in seconds from the start of the clip
    pub time: f64,
    /// Index of the channel the event belongs to
    pub channel: usize,
    /// Value the channel reaches at `time`
    pub value: f32,
}

/// Sampled, time-ordered view of a clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    channels: Vec<Channel>,
    events: Vec<ControlEvent>,
    duration: f64,
}

impl Schedule {
    /// Build the schedule for a clip
    pub fn build(doc: &ClipDocument) -> Self {
        let channels: Vec<Channel> = doc.signals().iter().map(Channel::from_envelope).collect();

        let mut events: Vec<ControlEvent> = channels
            .iter()
            .enumerate()
            .flat_map(|(index, channel)| {
                channel.points().iter().map(move |point| ControlEvent {
                    time: point.time,
                    channel: index,
                    value: point.value,
                })
            })
            .collect();
        // Stable sort keeps ties ordered by channel index
        events.sort_by(|a, b| a.time.total_cmp(&b.time));

        let duration = channels
            .iter()
            .map(Channel::end_time)
            .fold(0.0, f64::max);

        Schedule {
            channels,
            events,
            duration,
        }
    }

    /// Maximum breakpoint time across all channels (0 without channels)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Channel names in clip order
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(Channel::name)
    }

    /// Index of the channel with the given name
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|channel| channel.name() == name)
    }

    /// Merged control events across all channels, ordered by time
    pub fn events(&self) -> &[ControlEvent] {
        &self.events
    }

    /// Value of one channel at time `t`
    pub fn sample_channel(&self, channel: usize, t: f64) -> Option<f32> {
        self.channels.get(channel).map(|channel| channel.sample(t))
    }

    /// Values of every channel at time `t`
    pub fn sample_at(&self, t: f64) -> Vec<f32> {
        let mut values = vec![0.0; self.channels.len()];
        self.sample_into(t, &mut values);
        values
    }

    /// Write the value of every channel at time `t` into `out`.
    ///
    /// Only the first `min(out.len(), channel_count())` entries are written.
    pub fn sample_into(&self, t: f64, out: &mut [f32]) {
        for (slot, channel) in out.iter_mut().zip(&self.channels) {
            *slot = channel.sample(t);
        }
    }

    pub(crate) fn channels(&self) -> &[Channel] {
        &self.channels
    }
}

impl From<&ClipDocument> for Schedule {
    fn from(doc: &ClipDocument) -> Self {
        Schedule::build(doc)
    }
}
