//! Session Manager
//!
//! Owns the "one active clip" invariant and mediates load/play/stop calls
//! from client code. Every operation, ticks included, runs to completion
//! behind a single mutex, so a session may be shared between a frame loop
//! and client threads.
//!
//! Exactly one session may be registered with a [`SessionRegistry`] at a
//! time. Clients bind to the registered session through [`HapticSource`]
//! instead of searching for it.

mod source;

pub use source::HapticSource;

use crate::clip::ClipMetadata;
use crate::clip_parser::ClipParser;
use crate::clock::{Clock, SystemClock};
use crate::config::HapticConfig;
use crate::engine::{PlaybackEngine, PlaybackState};
use crate::schedule::Schedule;
use crate::sink::ActuatorSink;
use crate::{HapticError, Result};
use log::{info, warn};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock, Weak};

/// State guarded by the session mutex
pub(crate) struct SessionCore {
    engine: PlaybackEngine,
    parser: ClipParser,
    clock: Box<dyn Clock>,
    metadata: Option<ClipMetadata>,
}

impl SessionCore {
    pub(crate) fn load(&mut self, text: &str) -> Result<()> {
        // The previous clip is gone even when the new text is rejected
        self.engine.unload();
        self.metadata = None;

        let doc = self.parser.parse(text).map_err(|e| {
            warn!("Rejected haptic clip: {}", e);
            e
        })?;

        info!(
            "Loaded haptic clip v{} ({} channels, {:.3}s)",
            doc.version(),
            doc.channel_count(),
            doc.duration()
        );
        self.engine.load(Schedule::build(&doc));
        self.metadata = Some(doc.metadata().clone());
        Ok(())
    }

    pub(crate) fn play(&mut self) -> Result<()> {
        let now = self.clock.now();
        self.engine.play(now)
    }

    pub(crate) fn stop(&mut self) {
        self.engine.stop();
    }

    fn tick(&mut self) -> bool {
        let now = self.clock.now();
        self.engine.tick(now)
    }
}

type SharedCore = Arc<Mutex<SessionCore>>;

/// Registration point for the single haptic session.
///
/// Clones share the same registration slot.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    slot: Arc<Mutex<Weak<Mutex<SessionCore>>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    pub fn global() -> &'static SessionRegistry {
        static GLOBAL: OnceLock<SessionRegistry> = OnceLock::new();
        GLOBAL.get_or_init(SessionRegistry::new)
    }

    /// Whether a live session is registered
    pub fn is_registered(&self) -> bool {
        self.slot.lock().strong_count() > 0
    }

    fn register(&self, core: &SharedCore) -> Result<()> {
        let mut slot = self.slot.lock();
        if slot.strong_count() > 0 {
            return Err(HapticError::DuplicateSession);
        }
        *slot = Arc::downgrade(core);
        Ok(())
    }

    fn unregister(&self, core: &SharedCore) {
        let mut slot = self.slot.lock();
        if Weak::ptr_eq(&slot, &Arc::downgrade(core)) {
            *slot = Weak::new();
        }
    }

    pub(crate) fn lookup(&self) -> Result<Weak<Mutex<SessionCore>>> {
        let slot = self.slot.lock();
        if slot.strong_count() == 0 {
            return Err(HapticError::NoSession);
        }
        Ok(slot.clone())
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// Builder for [`HapticSession`].
pub struct SessionBuilder {
    config: HapticConfig,
    sink: Option<Box<dyn ActuatorSink>>,
    clock: Option<Box<dyn Clock>>,
}

impl SessionBuilder {
    /// Use this sink instead of the one named in the configuration
    pub fn sink(mut self, sink: Box<dyn ActuatorSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Use this clock instead of [`SystemClock`]
    pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the session and register it.
    ///
    /// Fails with [`HapticError::DuplicateSession`] when the registry already
    /// holds a live session, or [`HapticError::ConfigError`] for an invalid
    /// configuration.
    pub fn register(self, registry: &SessionRegistry) -> Result<HapticSession> {
        self.config.validate()?;

        let sink = self.sink.unwrap_or_else(|| self.config.sink.build());
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock::new()));

        let core = Arc::new(Mutex::new(SessionCore {
            engine: PlaybackEngine::new(sink, self.config.cadence),
            parser: self.config.parser(),
            clock,
            metadata: None,
        }));
        registry.register(&core)?;
        info!("Registered haptic session (cadence {:?})", self.config.cadence);

        Ok(HapticSession {
            core,
            registry: registry.clone(),
        })
    }
}

/// The single haptic session.
///
/// Dropping the session unregisters it.
pub struct HapticSession {
    core: SharedCore,
    registry: SessionRegistry,
}

impl HapticSession {
    /// Start building a session
    pub fn builder(config: HapticConfig) -> SessionBuilder {
        SessionBuilder {
            config,
            sink: None,
            clock: None,
        }
    }

    /// Register a session using the configured sink and the system clock
    pub fn register(registry: &SessionRegistry, config: HapticConfig) -> Result<Self> {
        Self::builder(config).register(registry)
    }

    /// Load a clip, replacing the current one and cancelling playback.
    ///
    /// The previous clip is unloaded even when `text` is rejected.
    pub fn load(&self, text: &str) -> Result<()> {
        self.core.lock().load(text)
    }

    /// Play the loaded clip from time 0, starting now on the session clock.
    ///
    /// Restarts when already playing.
    pub fn play(&self) -> Result<()> {
        self.core.lock().play()
    }

    /// Play the loaded clip from time 0, starting at wall-clock time `now`
    pub fn play_at(&self, now: f64) -> Result<()> {
        self.core.lock().engine.play(now)
    }

    /// Stop playback; no-op when idle
    pub fn stop(&self) {
        self.core.lock().stop();
    }

    /// Move the playhead to clip time `time` on the next tick
    pub fn seek(&self, time: f64) -> Result<()> {
        self.core.lock().engine.seek(time)
    }

    /// Advance playback using the session clock.
    ///
    /// Returns `true` when a sample was emitted.
    pub fn tick(&self) -> bool {
        self.core.lock().tick()
    }

    /// Advance playback to an explicit wall-clock time
    pub fn tick_at(&self, now: f64) -> bool {
        self.core.lock().engine.tick(now)
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.core.lock().engine.state()
    }

    /// Whether a clip is loaded
    pub fn is_loaded(&self) -> bool {
        self.core.lock().engine.schedule().is_some()
    }

    /// Duration of the loaded clip
    pub fn duration(&self) -> Option<f64> {
        self.core.lock().engine.schedule().map(Schedule::duration)
    }

    /// Clip time of the active playhead
    pub fn position(&self) -> Option<f64> {
        self.core
            .lock()
            .engine
            .playhead()
            .map(|playhead| playhead.current_time())
    }

    /// Channel names of the loaded clip
    pub fn channel_names(&self) -> Vec<String> {
        self.core
            .lock()
            .engine
            .schedule()
            .map(|schedule| schedule.channel_names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Metadata of the loaded clip
    pub fn metadata(&self) -> Option<ClipMetadata> {
        self.core.lock().metadata.clone()
    }
}

impl Drop for HapticSession {
    fn drop(&mut self) {
        self.core.lock().stop();
        self.registry.unregister(&self.core);
    }
}

impl std::fmt::Debug for HapticSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HapticSession")
            .field("state", &self.state())
            .field("duration", &self.duration())
            .finish()
    }
}
