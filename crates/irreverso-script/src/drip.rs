//! Log Feed Drip
//!
//! Reveals the script into a visible window of at most `window` lines at a
//! cadence derived from the Deploy budget. Each tick reveals one line, or
//! two with a small burst probability. The drip is not resumable: `start`
//! always begins from an empty window.

use std::ops::Range;
use std::time::Duration;

use irreverso_core::millis::duration_ms;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::Script;

/// Drip configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DripConfig {
    /// Maximum visible lines
    pub window: usize,
    /// Lower bound on the cadence
    #[serde(with = "duration_ms")]
    pub min_interval: Duration,
    /// Divisor floor when spreading the budget over the script
    pub min_burst_target: usize,
    /// Added to the line count before dividing the budget
    pub line_pad: usize,
    /// Chance that a tick reveals two lines
    pub burst_probability: f64,
}

impl Default for DripConfig {
    fn default() -> Self {
        DripConfig {
            window: 20,
            min_interval: Duration::from_millis(55),
            min_burst_target: 18,
            line_pad: 6,
            burst_probability: 0.12,
        }
    }
}

impl DripConfig {
    /// `max(min_interval, budget / max(min_burst_target, lines + line_pad))`
    pub fn cadence(&self, script_len: usize, budget: Duration) -> Duration {
        let slots = self
            .min_burst_target
            .max(script_len.saturating_add(self.line_pad))
            .max(1);
        let divisor = u32::try_from(slots).unwrap_or(u32::MAX);
        (budget / divisor).max(self.min_interval)
    }
}

/// Outcome of one drip tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DripStep {
    /// Lines revealed; more remain
    Revealed(usize),
    /// Lines revealed and the script is now exhausted
    Finished(usize),
    /// Nothing to do: not started or already exhausted
    Idle,
}

/// Contiguous suffix `[start, end)` of the revealed script
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct VisibleWindow {
    start: usize,
    end: usize,
}

impl VisibleWindow {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Visible lines of `script`, oldest first
    pub fn lines<'a>(&self, script: &'a Script) -> &'a [String] {
        let end = self.end.min(script.len());
        let start = self.start.min(end);
        &script.lines()[start..end]
    }
}

pub struct LogDrip {
    config: DripConfig,
    seed: u64,
    rng: StdRng,
    script_len: usize,
    revealed: usize,
    cadence: Duration,
    running: bool,
}

impl LogDrip {
    pub fn new(config: DripConfig, seed: u64) -> Self {
        LogDrip {
            config,
            seed,
            rng: StdRng::seed_from_u64(seed),
            script_len: 0,
            revealed: 0,
            cadence: Duration::ZERO,
            running: false,
        }
    }

    /// Begin revealing a script of `script_len` lines over `budget`.
    /// Returns the tick cadence.
    pub fn start(&mut self, script_len: usize, budget: Duration) -> Duration {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.script_len = script_len;
        self.revealed = 0;
        self.cadence = self.config.cadence(script_len, budget);
        self.running = script_len > 0;
        self.cadence
    }

    pub fn tick(&mut self) -> DripStep {
        if !self.running {
            return DripStep::Idle;
        }

        let burst = self.rng.gen_bool(self.config.burst_probability.clamp(0.0, 1.0));
        let want = if burst { 2 } else { 1 };
        let count = want.min(self.script_len - self.revealed);
        self.revealed += count;

        if self.revealed >= self.script_len {
            self.running = false;
            DripStep::Finished(count)
        } else {
            DripStep::Revealed(count)
        }
    }

    /// Back to an empty, stopped drip
    pub fn reset(&mut self) {
        self.revealed = 0;
        self.script_len = 0;
        self.running = false;
    }

    pub fn window(&self) -> VisibleWindow {
        let start = self.revealed.saturating_sub(self.config.window);
        VisibleWindow {
            start,
            end: self.revealed,
        }
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_exhausted(&self) -> bool {
        self.script_len > 0 && self.revealed >= self.script_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate, ScriptConfig};
    use irreverso_core::{Language, Seed};
    use proptest::prelude::*;

    #[test]
    fn test_cadence() {
        let config = DripConfig::default();
        // 6500ms over max(18, 40 + 6) = 46 slots
        assert_eq!(
            config.cadence(40, Duration::from_millis(6_500)),
            Duration::from_millis(6_500) / 46
        );
        // Floor on short budgets
        assert_eq!(
            config.cadence(40, Duration::from_millis(500)),
            Duration::from_millis(55)
        );
        // Short scripts use the burst target
        assert_eq!(
            config.cadence(2, Duration::from_millis(9_000)),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_cadence_with_oversized_slots() {
        let config = DripConfig {
            min_burst_target: 1 << 32,
            ..DripConfig::default()
        };
        assert_eq!(
            config.cadence(40, Duration::from_millis(6_500)),
            Duration::from_millis(55)
        );

        let config = DripConfig {
            line_pad: usize::MAX,
            ..DripConfig::default()
        };
        assert_eq!(
            config.cadence(40, Duration::from_millis(6_500)),
            Duration::from_millis(55)
        );

        let config = DripConfig {
            min_burst_target: 0,
            line_pad: 0,
            ..DripConfig::default()
        };
        assert_eq!(
            config.cadence(0, Duration::from_millis(6_500)),
            Duration::from_millis(6_500)
        );
    }

    #[test]
    fn test_not_started_is_idle() {
        let mut drip = LogDrip::new(DripConfig::default(), 1);
        assert_eq!(drip.tick(), DripStep::Idle);
        assert!(drip.window().is_empty());
    }

    #[test]
    fn test_drip_reveals_everything_then_stops() {
        let mut drip = LogDrip::new(DripConfig::default(), 3);
        drip.start(30, Duration::from_millis(6_500));

        let mut ticks = 0;
        loop {
            ticks += 1;
            match drip.tick() {
                DripStep::Revealed(n) => assert!(n == 1 || n == 2),
                DripStep::Finished(_) => break,
                DripStep::Idle => panic!("went idle before finishing"),
            }
        }
        assert!(ticks <= 30);
        assert_eq!(drip.revealed(), 30);
        assert!(drip.is_exhausted());
        assert_eq!(drip.tick(), DripStep::Idle);
        assert_eq!(drip.window().range(), 10..30);
    }

    #[test]
    fn test_restart_is_fresh() {
        let mut drip = LogDrip::new(DripConfig::default(), 5);
        drip.start(10, Duration::from_millis(1_000));
        drip.tick();
        drip.tick();
        assert!(drip.revealed() > 0);

        drip.start(10, Duration::from_millis(1_000));
        assert_eq!(drip.revealed(), 0);
        assert!(drip.window().is_empty());
    }

    #[test]
    fn test_window_lines() {
        let script = generate(&Seed::from_label("WIN"), Language::En, &ScriptConfig::default());
        let mut drip = LogDrip::new(DripConfig::default(), 11);
        drip.start(script.len(), Duration::from_millis(6_500));
        while !matches!(drip.tick(), DripStep::Finished(_)) {}

        let visible = drip.window().lines(&script);
        assert_eq!(visible.len(), 20);
        assert_eq!(visible.last(), script.lines().last());
    }

    proptest! {
        #[test]
        fn prop_window_is_bounded_suffix(len in 1usize..80, seed in any::<u64>(), window in 1usize..30) {
            let config = DripConfig { window, ..DripConfig::default() };
            let mut drip = LogDrip::new(config, seed);
            drip.start(len, Duration::from_millis(6_500));

            let mut last_end = 0;
            loop {
                let step = drip.tick();
                let w = drip.window();
                prop_assert!(w.len() <= window);
                prop_assert_eq!(w.range().end, drip.revealed());
                prop_assert!(w.range().end >= last_end);
                prop_assert!(w.range().start == drip.revealed().saturating_sub(window));
                last_end = w.range().end;
                if step != DripStep::Revealed(1) && step != DripStep::Revealed(2) {
                    break;
                }
            }
            prop_assert_eq!(drip.revealed(), len);
        }
    }
}
