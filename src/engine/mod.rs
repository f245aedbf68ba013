//! Playback Engine
//!
//! Drives a [`Playhead`] over the loaded [`Schedule`] and emits one sample
//! per tick to the actuator sink.
//!
//! ```text
//! Idle --play--> Playing --stop / end of clip--> Idle
//!                   |  ^
//!                   +--+ play (restart at 0)
//! ```
//!
//! The engine owns no timer and never blocks: the host passes the wall-clock
//! time to [`PlaybackEngine::play`] and then calls [`PlaybackEngine::tick`]
//! once per frame with the current time. Clip time is `now - start`.
//! `stop()` and `load()` take effect before the next tick, so no sample from
//! a cancelled playhead ever reaches the sink.

mod playhead;

pub use playhead::{Playhead, PlayheadState};

use crate::config::Cadence;
use crate::schedule::Schedule;
use crate::sink::{ActuatorSink, Sample};
use crate::{HapticError, Result};
use log::{debug, info};

/// Engine-level playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No active playhead
    #[default]
    Idle,
    /// A playhead is active
    Playing,
}

/// Tick-driven haptic clip player.
pub struct PlaybackEngine {
    /// Currently loaded clip
    schedule: Option<Schedule>,
    /// Active playhead, if playing
    playhead: Option<Playhead>,
    /// Output adapter
    sink: Box<dyn ActuatorSink>,
    /// Emission cadence
    cadence: Cadence,
    /// Scratch buffer, one value per channel
    values: Vec<f32>,
    /// Values of the last emitted sample (used by `Cadence::OnChange`)
    last_emitted: Option<Vec<f32>>,
}

impl PlaybackEngine {
    /// Create an idle engine with no clip loaded
    pub fn new(sink: Box<dyn ActuatorSink>, cadence: Cadence) -> Self {
        PlaybackEngine {
            schedule: None,
            playhead: None,
            sink,
            cadence,
            values: Vec::new(),
            last_emitted: None,
        }
    }

    /// Replace the loaded clip, cancelling any active playhead
    pub fn load(&mut self, schedule: Schedule) {
        self.cancel();
        self.values = vec![0.0; schedule.channel_count()];
        self.schedule = Some(schedule);
    }

    /// Drop the loaded clip, cancelling any active playhead
    pub fn unload(&mut self) {
        self.cancel();
        self.schedule = None;
        self.values.clear();
    }

    /// Currently loaded clip
    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    /// Active playhead
    pub fn playhead(&self) -> Option<&Playhead> {
        self.playhead.as_ref()
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        match &self.playhead {
            Some(playhead) if playhead.is_active() => PlaybackState::Playing,
            _ => PlaybackState::Idle,
        }
    }

    /// Emission cadence
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Change the emission cadence
    pub fn set_cadence(&mut self, cadence: Cadence) {
        self.cadence = cadence;
        self.last_emitted = None;
    }

    /// Start playback at wall-clock time `now`.
    ///
    /// Restarts from clip time 0 when already playing. Fails with
    /// [`HapticError::NoClipLoaded`] when no clip is loaded.
    pub fn play(&mut self, now: f64) -> Result<()> {
        let schedule = self.schedule.as_ref().ok_or(HapticError::NoClipLoaded)?;

        if self.state() == PlaybackState::Playing {
            debug!("Restarting playback from 0");
        } else {
            info!(
                "Starting playback ({} channels, {:.3}s)",
                schedule.channel_count(),
                schedule.duration()
            );
        }

        self.playhead = Some(Playhead::new(schedule, now));
        self.last_emitted = None;
        Ok(())
    }

    /// Stop playback. No-op when idle.
    pub fn stop(&mut self) {
        if self.state() == PlaybackState::Playing {
            info!("Stopping playback");
            self.cancel();
        }
    }

    /// Move the playhead to clip time `time` (clamped to the clip).
    ///
    /// Takes effect on the next tick. Ignored when idle.
    pub fn seek(&mut self, time: f64) -> Result<()> {
        let schedule = self.schedule.as_ref().ok_or(HapticError::NoClipLoaded)?;
        if let Some(playhead) = self.playhead.as_mut() {
            let target = if time.is_finite() {
                time.clamp(0.0, schedule.duration())
            } else {
                0.0
            };
            debug!("Seeking to {:.3}s", target);
            playhead.seek(target);
            self.last_emitted = None;
        }
        Ok(())
    }

    /// Advance playback to wall-clock time `now`.
    ///
    /// Returns `true` when a sample was emitted. Past the end of the clip the
    /// engine goes idle, notifies the sink and emits nothing.
    pub fn tick(&mut self, now: f64) -> bool {
        let (playhead, schedule) = match (self.playhead.as_mut(), self.schedule.as_ref()) {
            (Some(playhead), Some(schedule)) if playhead.is_active() => (playhead, schedule),
            _ => return false,
        };

        let time = playhead.advance(now);
        if time > schedule.duration() {
            debug!("Reached end of clip at {:.3}s", time);
            self.cancel();
            return false;
        }

        playhead.sample_into(schedule, &mut self.values);

        if self.cadence == Cadence::OnChange
            && self.last_emitted.as_deref() == Some(self.values.as_slice())
        {
            return false;
        }

        self.sink.on_sample(Sample {
            time,
            values: &self.values,
        });

        match self.last_emitted.as_mut() {
            Some(last) => last.clone_from(&self.values),
            None => self.last_emitted = Some(self.values.clone()),
        }
        true
    }

    /// Drop the active playhead and notify the sink
    fn cancel(&mut self) {
        if let Some(mut playhead) = self.playhead.take() {
            playhead.stop();
            self.sink.on_playback_end();
        }
        self.last_emitted = None;
    }
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("schedule", &self.schedule)
            .field("playhead", &self.playhead)
            .field("cadence", &self.cadence)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip_parser::parse;
    use crate::sink::RecordingSink;

    fn ramp() -> Schedule {
        let doc = parse(
            r#"{"version": "1.0.0", "signals": [
                {"name": "amplitude", "breakpoints": [{"time": 0.0, "value": 0.0}, {"time": 1.0, "value": 1.0}]}
            ]}"#,
        )
        .unwrap();
        Schedule::build(&doc)
    }

    fn plateau() -> Schedule {
        let doc = parse(
            r#"{"version": "1.0.0", "signals": [
                {"name": "amplitude", "breakpoints": [
                    {"time": 0.0, "value": 0.5}, {"time": 0.5, "value": 0.5}, {"time": 1.0, "value": 1.0}
                ]}
            ]}"#,
        )
        .unwrap();
        Schedule::build(&doc)
    }

    fn engine(cadence: Cadence) -> (PlaybackEngine, RecordingSink) {
        let sink = RecordingSink::new();
        let mut engine = PlaybackEngine::new(Box::new(sink.clone()), cadence);
        engine.load(ramp());
        (engine, sink)
    }

    #[test]
    fn test_play_without_clip() {
        let mut engine = PlaybackEngine::new(Box::new(RecordingSink::new()), Cadence::EveryTick);
        assert!(matches!(engine.play(0.0), Err(HapticError::NoClipLoaded)));
        assert_eq!(engine.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_ticks_emit_samples() {
        let (mut engine, sink) = engine(Cadence::EveryTick);
        engine.play(100.0).unwrap();
        assert_eq!(engine.state(), PlaybackState::Playing);

        assert!(engine.tick(100.0));
        assert!(engine.tick(100.25));
        assert!(engine.tick(100.5));

        let frames = sink.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].time, 0.0);
        assert_eq!(frames[0].values, vec![0.0]);
        assert_eq!(frames[1].values, vec![0.25]);
        assert_eq!(frames[2].values, vec![0.5]);
    }

    #[test]
    fn test_clip_time_starts_at_play() {
        let (mut engine, sink) = engine(Cadence::EveryTick);
        engine.play(0.0).unwrap();

        assert!(engine.tick(0.5));
        assert_eq!(sink.frames()[0].time, 0.5);
        assert_eq!(sink.frames()[0].values, vec![0.5]);

        assert!(!engine.tick(1.5));
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.playback_ends(), 1);
    }

    #[test]
    fn test_late_first_tick_ends_playback() {
        let (mut engine, sink) = engine(Cadence::EveryTick);
        engine.play(0.0).unwrap();
        assert!(!engine.tick(2.0));
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(sink.is_empty());
        assert_eq!(sink.playback_ends(), 1);
    }

    #[test]
    fn test_idle_tick_emits_nothing() {
        let (mut engine, sink) = engine(Cadence::EveryTick);
        assert!(!engine.tick(0.0));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_natural_end() {
        let (mut engine, sink) = engine(Cadence::EveryTick);
        engine.play(0.0).unwrap();
        assert!(engine.tick(0.0));
        assert!(engine.tick(1.0));
        assert_eq!(sink.frames()[1].values, vec![1.0]);

        assert!(!engine.tick(1.01));
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert_eq!(sink.playback_ends(), 1);

        assert!(!engine.tick(1.5));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.playback_ends(), 1);
    }

    #[test]
    fn test_stop_suppresses_further_samples() {
        let (mut engine, sink) = engine(Cadence::EveryTick);
        engine.play(0.0).unwrap();
        engine.tick(0.0);
        engine.stop();
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(!engine.tick(0.1));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.playback_ends(), 1);

        // Stop while idle is a no-op
        engine.stop();
        assert_eq!(sink.playback_ends(), 1);
    }

    #[test]
    fn test_play_twice_restarts() {
        let (mut engine, sink) = engine(Cadence::EveryTick);
        engine.play(0.0).unwrap();
        engine.tick(0.0);
        engine.tick(0.75);

        engine.play(0.8).unwrap();
        engine.tick(0.8);
        let frames = sink.frames();
        assert_eq!(frames.last().unwrap().time, 0.0);
        assert_eq!(frames.last().unwrap().values, vec![0.0]);
        assert_eq!(sink.playback_ends(), 0);
    }

    #[test]
    fn test_load_cancels_playback() {
        let (mut engine, sink) = engine(Cadence::EveryTick);
        engine.play(0.0).unwrap();
        engine.tick(0.0);
        engine.load(ramp());
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(!engine.tick(0.1));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.playback_ends(), 1);
    }

    #[test]
    fn test_seek() {
        let (mut engine, sink) = engine(Cadence::EveryTick);
        engine.play(0.0).unwrap();
        engine.tick(0.0);
        engine.seek(0.75).unwrap();
        engine.tick(0.25);
        assert_eq!(sink.frames()[1].time, 0.75);
        assert_eq!(sink.frames()[1].values, vec![0.75]);

        engine.seek(-3.0).unwrap();
        engine.tick(0.5);
        assert_eq!(sink.frames()[2].time, 0.0);
    }

    #[test]
    fn test_on_change_cadence() {
        let sink = RecordingSink::new();
        let mut engine = PlaybackEngine::new(Box::new(sink.clone()), Cadence::OnChange);
        engine.load(plateau());
        engine.play(0.0).unwrap();

        assert!(engine.tick(0.0));
        assert!(!engine.tick(0.25));
        assert!(!engine.tick(0.5));
        assert!(engine.tick(0.75));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_set_cadence_mid_playback() {
        let sink = RecordingSink::new();
        let mut engine = PlaybackEngine::new(Box::new(sink.clone()), Cadence::EveryTick);
        engine.load(plateau());
        engine.play(0.0).unwrap();
        assert!(engine.tick(0.0));
        assert!(engine.tick(0.1));

        engine.set_cadence(Cadence::OnChange);
        assert_eq!(engine.cadence(), Cadence::OnChange);
        // The first tick after switching always emits
        assert!(engine.tick(0.2));
        assert!(!engine.tick(0.3));

        engine.set_cadence(Cadence::EveryTick);
        assert!(engine.tick(0.4));
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn test_empty_clip_plays_single_sample() {
        let doc = parse(r#"{"version": "1.0.0", "signals": []}"#).unwrap();
        let sink = RecordingSink::new();
        let mut engine = PlaybackEngine::new(Box::new(sink.clone()), Cadence::EveryTick);
        engine.load(Schedule::build(&doc));
        engine.play(3.0).unwrap();

        assert!(engine.tick(3.0));
        assert!(sink.frames()[0].values.is_empty());
        assert!(!engine.tick(3.1));
        assert_eq!(engine.state(), PlaybackState::Idle);
    }
}
