//! Haptic Source
//!
//! Client-side handle holding one clip's text and the session it plays
//! through. Binding fails when no session is registered; a source outlived
//! by its session reports [`HapticError::NoSession`] on every call.

use super::{SessionCore, SessionRegistry};
use crate::{HapticError, Result};
use log::debug;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// A named clip bound to the registered session.
#[derive(Debug, Clone)]
pub struct HapticSource {
    name: String,
    data: String,
    session: Weak<Mutex<SessionCore>>,
}

impl HapticSource {
    /// Bind a clip to the session registered with `registry`
    pub fn bind(
        registry: &SessionRegistry,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self> {
        Ok(HapticSource {
            name: name.into(),
            data: data.into(),
            session: registry.lookup()?,
        })
    }

    /// Clip name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clip text
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Load this clip into the session and play it from the start
    pub fn play(&self) -> Result<()> {
        debug!("Playing haptic clip: {}", self.name);
        let session = self.session()?;
        let mut core = session.lock();
        core.load(&self.data)?;
        core.play()
    }

    /// Stop whatever the session is playing
    pub fn stop(&self) -> Result<()> {
        self.session()?.lock().stop();
        Ok(())
    }

    fn session(&self) -> Result<Arc<Mutex<SessionCore>>> {
        self.session.upgrade().ok_or(HapticError::NoSession)
    }
}
