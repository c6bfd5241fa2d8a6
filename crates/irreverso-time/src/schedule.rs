//! Phase Schedule and Phase Timer
//!
//! The schedule is drawn once per sequence instance: Orbit is fixed, Breach
//! and Reset are drawn uniformly from their ranges, Deploy takes whatever is
//! left of the requested total, floored at a minimum. The timer maps elapsed
//! sequence time onto that schedule and owns no timers of its own.

use std::time::Duration;

use irreverso_core::millis::duration_ms;
use irreverso_core::{MillisRange, Phase, SeqTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Phase schedule configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Fixed Orbit duration
    #[serde(with = "duration_ms")]
    pub orbit: Duration,
    /// Breach duration range, drawn once at start
    pub breach: MillisRange,
    /// Reset duration range, drawn once at start
    pub reset: MillisRange,
    /// Minimum Deploy duration
    #[serde(with = "duration_ms")]
    pub deploy_floor: Duration,
    /// Requested totals below this are clamped up
    #[serde(with = "duration_ms")]
    pub min_total: Duration,
    /// Cross-fade length of the continuous phase value after each boundary
    #[serde(with = "duration_ms")]
    pub blend: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            orbit: Duration::from_millis(3_000),
            breach: MillisRange::new(2_800, 4_400),
            reset: MillisRange::new(1_900, 2_800),
            deploy_floor: Duration::from_millis(6_500),
            min_total: Duration::from_millis(3_000),
            blend: Duration::from_millis(350),
        }
    }
}

/// Ordered phase durations of one sequence instance.
/// INVARIANT: every duration is > 0 and `total()` is their exact sum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseSchedule {
    durations: [Duration; 4],
    requested: Duration,
}

impl PhaseSchedule {
    /// Draw a schedule for a requested total duration
    pub fn draw<R: Rng + ?Sized>(requested: Duration, config: &ScheduleConfig, rng: &mut R) -> Self {
        let requested = requested.max(config.min_total);
        let one_ms = Duration::from_millis(1);

        let orbit = config.orbit.max(one_ms);
        let breach = config.breach.sample(rng).max(one_ms);
        let reset = config.reset.sample(rng).max(one_ms);
        let remainder = requested.saturating_sub(orbit + breach + reset);
        let deploy = remainder.max(config.deploy_floor).max(one_ms);

        PhaseSchedule {
            durations: [orbit, breach, reset, deploy],
            requested,
        }
    }

    /// Schedule from explicit durations; zero durations are bumped to 1ms
    pub fn from_durations(orbit: Duration, breach: Duration, reset: Duration, deploy: Duration) -> Self {
        let one_ms = Duration::from_millis(1);
        let durations = [orbit, breach, reset, deploy].map(|d| d.max(one_ms));
        let requested = durations.iter().sum();
        PhaseSchedule {
            durations,
            requested,
        }
    }

    #[inline]
    pub fn duration(&self, phase: Phase) -> Duration {
        self.durations[phase.index()]
    }

    /// Effective sequence length (sum of all phase durations)
    pub fn total(&self) -> Duration {
        self.durations.iter().sum()
    }

    /// Requested length after clamping to the configured minimum.
    /// `total()` exceeds it only when the Deploy floor kicked in.
    pub fn requested(&self) -> Duration {
        self.requested
    }

    /// Offset of the phase's entry from sequence start
    pub fn start_of(&self, phase: Phase) -> SeqTime {
        let before: Duration = self.durations[..phase.index()].iter().sum();
        SeqTime::ZERO + before
    }

    pub fn end_of(&self, phase: Phase) -> SeqTime {
        self.start_of(phase) + self.duration(phase)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Phase, Duration)> + '_ {
        Phase::ALL.iter().map(move |p| (*p, self.duration(*p)))
    }
}

/// Pure elapsed-time → phase mapping over a schedule
#[derive(Clone, Debug)]
pub struct PhaseTimer {
    schedule: PhaseSchedule,
    blend: Duration,
}

impl PhaseTimer {
    pub fn new(schedule: PhaseSchedule, blend: Duration) -> Self {
        PhaseTimer { schedule, blend }
    }

    pub fn schedule(&self) -> &PhaseSchedule {
        &self.schedule
    }

    /// Active phase at `t`. Past the end, Deploy stays active until
    /// completion is signalled.
    pub fn phase_at(&self, t: SeqTime) -> Phase {
        Phase::ALL
            .iter()
            .rev()
            .copied()
            .find(|p| t >= self.schedule.start_of(*p))
            .unwrap_or(Phase::Orbit)
    }

    /// Phase boundaries after Orbit, in order
    pub fn transitions(&self) -> [(Phase, SeqTime); 3] {
        [Phase::Breach, Phase::Reset, Phase::Deploy].map(|p| (p, self.schedule.start_of(p)))
    }

    /// Instant the completion signal may fire: end of schedule plus `buffer`
    pub fn finish_at(&self, buffer: Duration) -> SeqTime {
        SeqTime::ZERO + self.schedule.total() + buffer
    }

    /// Continuous phase encoding for the shader. Eases from the previous
    /// index to the current one over `blend` after each boundary.
    pub fn phase_value_at(&self, t: SeqTime) -> f32 {
        let phase = self.phase_at(t);
        let index = phase.as_value();
        if phase == Phase::Orbit || self.blend.is_zero() {
            return index;
        }

        let since = t.since(self.schedule.start_of(phase)).as_secs_f32();
        let x = (since / self.blend.as_secs_f32()).clamp(0.0, 1.0);
        index - 1.0 + x * x * (3.0 - 2.0 * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_reference_scenario() {
        let config = ScheduleConfig::default();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let schedule = PhaseSchedule::draw(ms(15_000), &config, &mut rng);

            assert_eq!(schedule.duration(Phase::Orbit), ms(3_000));
            assert!(config.breach.contains(schedule.duration(Phase::Breach)));
            assert!(config.reset.contains(schedule.duration(Phase::Reset)));

            let spent = schedule.duration(Phase::Orbit)
                + schedule.duration(Phase::Breach)
                + schedule.duration(Phase::Reset);
            let expected_deploy = ms(15_000).saturating_sub(spent).max(ms(6_500));
            assert_eq!(schedule.duration(Phase::Deploy), expected_deploy);
        }
    }

    #[test]
    fn test_short_total_is_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        let schedule = PhaseSchedule::draw(ms(500), &ScheduleConfig::default(), &mut rng);
        assert_eq!(schedule.requested(), ms(3_000));
        assert!(schedule.total() >= ms(3_000));
    }

    #[test]
    fn test_long_total_is_exact() {
        let mut rng = StdRng::seed_from_u64(9);
        let schedule = PhaseSchedule::draw(ms(30_000), &ScheduleConfig::default(), &mut rng);
        assert_eq!(schedule.total(), ms(30_000));
    }

    #[test]
    fn test_phase_at_boundaries() {
        let schedule = PhaseSchedule::from_durations(ms(1_000), ms(2_000), ms(500), ms(3_000));
        let timer = PhaseTimer::new(schedule, ms(0));

        assert_eq!(timer.phase_at(SeqTime::from_millis(0)), Phase::Orbit);
        assert_eq!(timer.phase_at(SeqTime::from_millis(999)), Phase::Orbit);
        assert_eq!(timer.phase_at(SeqTime::from_millis(1_000)), Phase::Breach);
        assert_eq!(timer.phase_at(SeqTime::from_millis(3_000)), Phase::Reset);
        assert_eq!(timer.phase_at(SeqTime::from_millis(3_500)), Phase::Deploy);
        assert_eq!(timer.phase_at(SeqTime::from_millis(99_000)), Phase::Deploy);
        assert_eq!(timer.finish_at(ms(250)), SeqTime::from_millis(6_750));
    }

    #[test]
    fn test_phase_value_blends() {
        let schedule = PhaseSchedule::from_durations(ms(1_000), ms(1_000), ms(1_000), ms(1_000));
        let timer = PhaseTimer::new(schedule, ms(200));

        assert_eq!(timer.phase_value_at(SeqTime::from_millis(500)), 0.0);
        // Right at the boundary the value still reads the previous phase
        assert_eq!(timer.phase_value_at(SeqTime::from_millis(1_000)), 0.0);
        let mid = timer.phase_value_at(SeqTime::from_millis(1_100));
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(timer.phase_value_at(SeqTime::from_millis(1_200)), 1.0);
        assert_eq!(timer.phase_value_at(SeqTime::from_millis(3_900)), 3.0);
    }

    proptest! {
        #[test]
        fn prop_schedule_invariants(total_ms in 0u64..60_000, seed in any::<u64>()) {
            let config = ScheduleConfig::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let schedule = PhaseSchedule::draw(ms(total_ms), &config, &mut rng);

            for (_, d) in schedule.iter() {
                prop_assert!(d > Duration::ZERO);
            }
            let sum: Duration = schedule.iter().map(|(_, d)| d).sum();
            prop_assert_eq!(sum, schedule.total());
            prop_assert!(schedule.total() >= schedule.requested());

            // When the deploy floor does not bind, the sum is exactly the request
            if schedule.duration(Phase::Deploy) > config.deploy_floor {
                prop_assert_eq!(schedule.total(), schedule.requested());
            }
        }

        #[test]
        fn prop_phase_order(total_ms in 3_000u64..40_000, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let schedule = PhaseSchedule::draw(ms(total_ms), &ScheduleConfig::default(), &mut rng);
            let timer = PhaseTimer::new(schedule, ms(350));

            let mut last = Phase::Orbit;
            let end = timer.finish_at(Duration::ZERO).as_millis();
            let mut t = 0;
            while t <= end {
                let phase = timer.phase_at(SeqTime::from_millis(t));
                prop_assert!(phase == last || Some(phase) == last.next());
                last = phase;
                t += 50;
            }
            prop_assert_eq!(last, Phase::Deploy);
        }
    }
}
