//! Frame pacing models
//!
//! Hosts do not call back at a perfect cadence. These models generate the
//! gaps between successive `advance_to` calls:
//! - steady frames
//! - jitter around the frame interval
//! - occasional long stalls (a backgrounded tab, a GC pause)

use std::time::Duration;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::Rng;

#[derive(Clone, Debug)]
pub struct FramePacing {
    /// Nominal gap between frames
    pub base: Duration,
    /// Uniform jitter added on top, in milliseconds
    pub jitter_ms: u32,
    /// Chance that a gap becomes a stall
    pub stall_probability: f64,
    pub stall: Duration,
}

impl FramePacing {
    pub fn steady(base: Duration) -> Self {
        FramePacing {
            base,
            jitter_ms: 0,
            stall_probability: 0.0,
            stall: Duration::ZERO,
        }
    }

    /// 60 Hz with no jitter
    pub fn smooth() -> Self {
        Self::steady(Duration::from_millis(16))
    }

    pub fn jittery() -> Self {
        FramePacing {
            jitter_ms: 12,
            ..Self::smooth()
        }
    }

    pub fn stalling() -> Self {
        FramePacing {
            jitter_ms: 4,
            stall_probability: 0.02,
            stall: Duration::from_millis(700),
            ..Self::smooth()
        }
    }

    /// Very coarse ticks, several timers due per call
    pub fn coarse() -> Self {
        Self::steady(Duration::from_millis(400))
    }

    pub fn next_gap(&self, rng: &mut StdRng) -> Duration {
        if self.stall_probability > 0.0 && rng.gen_bool(self.stall_probability.min(1.0)) {
            return self.stall;
        }
        let jitter = if self.jitter_ms > 0 {
            Duration::from_millis(Uniform::new_inclusive(0, self.jitter_ms).sample(rng) as u64)
        } else {
            Duration::ZERO
        };
        (self.base + jitter).max(Duration::from_millis(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_steady_gap() {
        let mut rng = StdRng::seed_from_u64(1);
        let pacing = FramePacing::smooth();
        for _ in 0..100 {
            assert_eq!(pacing.next_gap(&mut rng), Duration::from_millis(16));
        }
    }

    #[test]
    fn test_jitter_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let pacing = FramePacing::jittery();
        for _ in 0..1_000 {
            let gap = pacing.next_gap(&mut rng);
            assert!(gap >= Duration::from_millis(16) && gap <= Duration::from_millis(28));
        }
    }

    #[test]
    fn test_stalls_happen() {
        let mut rng = StdRng::seed_from_u64(3);
        let pacing = FramePacing::stalling();
        let stalls = (0..2_000)
            .filter(|_| pacing.next_gap(&mut rng) == Duration::from_millis(700))
            .count();
        assert!(stalls > 10 && stalls < 100, "{stalls}");
    }
}
