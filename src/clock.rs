//! Wall-clock sources
//!
//! The engine never reads time itself; a session asks its [`Clock`] once per
//! tick and hands the value to the engine.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// Source of wall-clock time in seconds.
pub trait Clock: Send {
    /// Current time in seconds. Must never decrease.
    fn now(&self) -> f64;
}

/// Monotonic clock measuring seconds since its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock starting at 0
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually advanced clock.
///
/// Clones share the same time, so a caller can keep one handle while the
/// session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Arc<Mutex<f64>>,
}

impl ManualClock {
    /// Create a clock at time 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute time
    pub fn set(&self, seconds: f64) {
        *self.time.lock() = seconds;
    }

    /// Move the clock forward
    pub fn advance(&self, seconds: f64) {
        *self.time.lock() += seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.time.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(0.25);
        handle.advance(0.25);
        assert_eq!(clock.now(), 0.5);
        clock.set(2.0);
        assert_eq!(handle.now(), 2.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
        assert!(first >= 0.0);
    }
}
