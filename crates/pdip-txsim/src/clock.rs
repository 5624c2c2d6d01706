//! # Injectable Clocks
//!
//! The simulator never calls `std::thread::sleep` directly; it asks its
//! clock to pause. Production uses [`SystemClock`]; tests use
//! [`InstantClock`], which skips the wait and records what was requested.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// A source of pauses for the simulator.
pub trait Clock {
    /// Pause for the given duration.
    fn sleep(&self, duration: Duration);
}

/// Real wall-clock pauses.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that returns immediately and records requested pauses.
///
/// Lets the time-driven stage machine run synchronously under test while
/// still asserting how much simulated time it asked for.
#[derive(Debug, Default)]
pub struct InstantClock {
    pauses: AtomicU32,
    total_millis: AtomicU64,
}

impl InstantClock {
    /// Create a fresh recording clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pauses requested so far.
    pub fn pauses(&self) -> u32 {
        self.pauses.load(Ordering::Relaxed)
    }

    /// Total requested pause time.
    pub fn total_requested(&self) -> Duration {
        Duration::from_millis(self.total_millis.load(Ordering::Relaxed))
    }
}

impl Clock for InstantClock {
    fn sleep(&self, duration: Duration) {
        self.pauses.fetch_add(1, Ordering::Relaxed);
        self.total_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_clock_records_pauses() {
        let clock = InstantClock::new();
        clock.sleep(Duration::from_millis(100));
        clock.sleep(Duration::from_millis(250));
        assert_eq!(clock.pauses(), 2);
        assert_eq!(clock.total_requested(), Duration::from_millis(350));
    }
}
