//! Playhead
//!
//! Cursor over a loaded schedule. Clip time is the wall-clock time elapsed
//! since `play()`, so a host that ticks late skips ahead rather than
//! delaying the clip.

use crate::schedule::{Schedule, ScheduleCursor};

/// Lifecycle of one playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayheadState {
    /// Created by `play()`, waiting for its first tick
    #[default]
    Idle,
    /// Advancing with the wall clock
    Playing,
    /// Stopped, cancelled or past the end of the clip
    Stopped,
}

/// Mutable cursor tracking playback progress through a clip.
#[derive(Debug, Clone)]
pub struct Playhead {
    /// Wall-clock time matching clip time 0
    start_wall_clock: f64,
    /// Clip time of the last tick
    current_time: f64,
    /// Lifecycle state
    state: PlayheadState,
    /// Clip time to jump to on the next tick
    pending_seek: Option<f64>,
    /// Per-channel segment cache
    cursor: ScheduleCursor,
}

impl Playhead {
    /// Create a playhead at the start of `schedule`, started at wall-clock
    /// time `start_wall_clock`
    pub fn new(schedule: &Schedule, start_wall_clock: f64) -> Self {
        Playhead {
            start_wall_clock,
            current_time: 0.0,
            state: PlayheadState::Idle,
            pending_seek: None,
            cursor: ScheduleCursor::new(schedule),
        }
    }

    /// Wall-clock time matching clip time 0
    pub fn start_wall_clock(&self) -> f64 {
        self.start_wall_clock
    }

    /// Clip time of the last tick
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Lifecycle state
    pub fn state(&self) -> PlayheadState {
        self.state
    }

    /// Whether the playhead still produces samples
    pub fn is_active(&self) -> bool {
        self.state != PlayheadState::Stopped
    }

    /// Jump to clip time `time` on the next tick
    pub fn seek(&mut self, time: f64) {
        self.pending_seek = Some(time);
    }

    /// Mark the playhead as finished
    pub fn stop(&mut self) {
        self.state = PlayheadState::Stopped;
        self.pending_seek = None;
    }

    /// Advance to wall-clock time `now` and return the clip time.
    ///
    /// Clip time never goes below 0, even for a `now` earlier than the
    /// start time.
    pub fn advance(&mut self, now: f64) -> f64 {
        if self.state == PlayheadState::Stopped {
            return self.current_time;
        }
        if let Some(offset) = self.pending_seek.take() {
            self.start_wall_clock = now - offset;
        }

        self.state = PlayheadState::Playing;
        self.current_time = (now - self.start_wall_clock).max(0.0);
        self.current_time
    }

    /// Sample every channel at the current clip time
    pub(crate) fn sample_into(&mut self, schedule: &Schedule, out: &mut [f32]) {
        self.cursor.sample_into(schedule, self.current_time, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip_parser::parse;

    fn schedule() -> Schedule {
        let doc = parse(
            r#"{"version": "1.0.0", "signals": [
                {"name": "amplitude", "breakpoints": [{"time": 0.0, "value": 0.0}, {"time": 2.0, "value": 1.0}]}
            ]}"#,
        )
        .unwrap();
        Schedule::build(&doc)
    }

    #[test]
    fn test_clip_time_measured_from_start() {
        let mut playhead = Playhead::new(&schedule(), 10.0);
        assert_eq!(playhead.state(), PlayheadState::Idle);
        assert_eq!(playhead.start_wall_clock(), 10.0);

        // The first tick may arrive late; clip time is not held back
        assert_eq!(playhead.advance(10.5), 0.5);
        assert_eq!(playhead.state(), PlayheadState::Playing);
        assert_eq!(playhead.advance(11.25), 1.25);
    }

    #[test]
    fn test_seek_shifts_start() {
        let mut playhead = Playhead::new(&schedule(), 1.0);
        playhead.advance(1.0);
        playhead.seek(1.5);
        assert_eq!(playhead.advance(3.0), 1.5);
        assert_eq!(playhead.start_wall_clock(), 1.5);
        assert_eq!(playhead.advance(3.25), 1.75);
    }

    #[test]
    fn test_time_never_negative() {
        let mut playhead = Playhead::new(&schedule(), 5.0);
        assert_eq!(playhead.advance(4.0), 0.0);
    }

    #[test]
    fn test_stop() {
        let mut playhead = Playhead::new(&schedule(), 0.0);
        playhead.advance(0.5);
        playhead.stop();
        assert!(!playhead.is_active());
        assert_eq!(playhead.state(), PlayheadState::Stopped);
        assert_eq!(playhead.advance(1.0), 0.5);
    }
}
