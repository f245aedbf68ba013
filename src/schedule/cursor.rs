//! Forward Sampling Cursor
//!
//! Remembers the current segment of every channel so that playback, which
//! only moves forward between seeks, samples each channel in amortized
//! constant time instead of searching the breakpoint list on every tick.

use super::Schedule;

/// Per-channel segment cache over a [`Schedule`].
#[derive(Debug, Clone)]
pub struct ScheduleCursor {
    /// Breakpoints at or before `last_time`, per channel
    segments: Vec<usize>,
    /// Time of the previous sample
    last_time: f64,
}

impl ScheduleCursor {
    /// Create a cursor positioned at the start of the schedule
    pub fn new(schedule: &Schedule) -> Self {
        ScheduleCursor {
            segments: vec![0; schedule.channel_count()],
            last_time: 0.0,
        }
    }

    /// Rewind to the start
    pub fn reset(&mut self) {
        self.segments.iter_mut().for_each(|segment| *segment = 0);
        self.last_time = 0.0;
    }

    /// Time of the previous sample
    pub fn position(&self) -> f64 {
        self.last_time
    }

    /// Sample every channel at `t` into `out`.
    ///
    /// Moving backwards rewinds the cursor first. Results are identical to
    /// [`Schedule::sample_into`].
    pub fn sample_into(&mut self, schedule: &Schedule, t: f64, out: &mut [f32]) {
        if t < self.last_time || self.segments.len() != schedule.channel_count() {
            self.segments = vec![0; schedule.channel_count()];
        }
        self.last_time = t;

        for ((slot, segment), channel) in out
            .iter_mut()
            .zip(self.segments.iter_mut())
            .zip(schedule.channels())
        {
            let points = channel.points();
            while *segment < points.len() && points[*segment].time <= t {
                *segment += 1;
            }
            *slot = channel.sample_segment(*segment, t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip_parser::parse;

    fn schedule() -> Schedule {
        let doc = parse(
            r#"{"version": "1.0.0", "signals": [
                {"name": "amplitude", "breakpoints": [{"time": 0.0, "value": 0.0}, {"time": 0.5, "value": 1.0}, {"time": 1.0, "value": 0.0}]},
                {"name": "frequency", "breakpoints": [{"time": 0.2, "value": 0.4}, {"time": 0.8, "value": 0.1}]}
            ]}"#,
        )
        .unwrap();
        Schedule::build(&doc)
    }

    #[test]
    fn test_cursor_matches_random_access() {
        let schedule = schedule();
        let mut cursor = ScheduleCursor::new(&schedule);
        let mut values = [0.0f32; 2];

        for step in 0..=60 {
            let t = step as f64 / 50.0;
            cursor.sample_into(&schedule, t, &mut values);
            assert_eq!(values.to_vec(), schedule.sample_at(t), "mismatch at t={t}");
        }
    }

    #[test]
    fn test_cursor_rewinds_on_backward_seek() {
        let schedule = schedule();
        let mut cursor = ScheduleCursor::new(&schedule);
        let mut values = [0.0f32; 2];

        cursor.sample_into(&schedule, 0.9, &mut values);
        cursor.sample_into(&schedule, 0.25, &mut values);
        assert_eq!(values.to_vec(), schedule.sample_at(0.25));
        assert_eq!(cursor.position(), 0.25);

        cursor.reset();
        assert_eq!(cursor.position(), 0.0);
    }
}
