//! Single sampled envelope

use crate::clip::{Breakpoint, Envelope};

/// Envelope with identical timestamps collapsed, ready for sampling.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Channel {
    name: String,
    points: Vec<Breakpoint>,
}

impl Channel {
    pub(crate) fn from_envelope(envelope: &Envelope) -> Self {
        let mut points: Vec<Breakpoint> = Vec::with_capacity(envelope.breakpoints().len());
        for point in envelope.breakpoints() {
            match points.last_mut() {
                Some(last) if last.time == point.time => *last = *point,
                _ => points.push(*point),
            }
        }

        Channel {
            name: envelope.name().to_string(),
            points,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Strictly time-ordered breakpoints (never empty)
    pub(crate) fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    pub(crate) fn end_time(&self) -> f64 {
        self.points.last().map_or(0.0, |point| point.time)
    }

    /// Number of breakpoints at or before `t`
    pub(crate) fn segment_for(&self, t: f64) -> usize {
        self.points.partition_point(|point| point.time <= t)
    }

    pub(crate) fn sample(&self, t: f64) -> f32 {
        self.sample_segment(self.segment_for(t), t)
    }

    /// Sample given the result of [`Channel::segment_for`] for `t`.
    pub(crate) fn sample_segment(&self, segment: usize, t: f64) -> f32 {
        let points = &self.points;
        if segment == 0 {
            return points.first().map_or(0.0, |point| point.value);
        }
        if segment >= points.len() {
            return points.last().map_or(0.0, |point| point.value);
        }

        let left = points[segment - 1];
        let right = points[segment];
        let fraction = (t - left.time) / (right.time - left.time);
        (left.value as f64 + (right.value as f64 - left.value as f64) * fraction) as f32
    }
}
