//! Clock implementations for the boot sequencer

use std::sync::Arc;
use std::time::{Duration, Instant};

use irreverso_core::SeqTime;
use parking_lot::Mutex;

/// Source of sequence time
pub trait Clock {
    /// Milliseconds since the clock was started
    fn now(&self) -> SeqTime;
}

/// Monotonic wall clock anchored at construction
/// INVARIANT: `now()` never decreases
pub struct SequenceClock {
    origin: Instant,
}

impl SequenceClock {
    pub fn start() -> Self {
        SequenceClock {
            origin: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Clock for SequenceClock {
    fn now(&self) -> SeqTime {
        SeqTime::from_duration(self.origin.elapsed())
    }
}

/// Hand-driven clock for tests and simulations.
/// Clones share the same time value.
#[derive(Clone, Default)]
pub struct ManualClock {
    value: Arc<Mutex<SeqTime>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move forward by `dt`
    pub fn advance(&self, dt: Duration) -> SeqTime {
        let mut value = self.value.lock();
        *value = *value + dt;
        *value
    }

    /// Jump to `target`; only moves forward
    pub fn set(&self, target: SeqTime) {
        let mut value = self.value.lock();
        if target > *value {
            *value = target;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SeqTime {
        *self.value.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_clock_monotonic() {
        let clock = SequenceClock::start();
        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = clock.now();
        assert!(t2 >= t1);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let view = clock.clone();

        clock.advance(Duration::from_millis(120));
        assert_eq!(view.now(), SeqTime::from_millis(120));

        // Never moves backwards
        clock.set(SeqTime::from_millis(50));
        assert_eq!(view.now(), SeqTime::from_millis(120));
    }
}
