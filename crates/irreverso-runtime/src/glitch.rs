//! Glitch Scheduler
//!
//! Owns the glitch flag. What may raise it depends on the phase:
//! - Orbit: nothing
//! - Breach: the narrative track, in lockstep with its text changes
//! - Reset: nothing, and the flag is forced off
//! - Deploy: a periodic random roll
//!
//! The scheduler only decides; the sequencer owns the timers that act on
//! those decisions.

use std::time::Duration;

use irreverso_core::millis::duration_ms;
use irreverso_core::{MillisRange, Phase};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlitchConfig {
    /// Roll cadence during Deploy
    #[serde(with = "duration_ms")]
    pub deploy_interval: Duration,
    /// A roll above this raises the flag
    pub deploy_threshold: f64,
    /// Length of one random activation
    pub pulse: MillisRange,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        GlitchConfig {
            deploy_interval: Duration::from_millis(900),
            deploy_threshold: 0.72,
            pulse: MillisRange::new(100, 250),
        }
    }
}

/// How the flag behaves for the rest of a phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlitchPlan {
    Idle,
    Scripted,
    Suppressed,
    Random { interval: Duration },
}

pub struct GlitchScheduler {
    config: GlitchConfig,
    rng: StdRng,
    plan: GlitchPlan,
    on: bool,
    pulses: u64,
}

impl GlitchScheduler {
    pub fn new(config: GlitchConfig, seed: u64) -> Self {
        GlitchScheduler {
            config,
            rng: StdRng::seed_from_u64(seed),
            plan: GlitchPlan::Idle,
            on: false,
            pulses: 0,
        }
    }

    /// Switch to the plan of `phase`. Any pulse in flight belongs to the
    /// previous phase, so the flag starts every phase off.
    pub fn on_phase_enter(&mut self, phase: Phase) -> GlitchPlan {
        self.on = false;
        self.plan = match phase {
            Phase::Orbit => GlitchPlan::Idle,
            Phase::Breach => GlitchPlan::Scripted,
            Phase::Reset => GlitchPlan::Suppressed,
            Phase::Deploy => GlitchPlan::Random {
                interval: self.config.deploy_interval.max(Duration::from_millis(1)),
            },
        };
        self.plan
    }

    /// One Deploy roll: the pulse length if the flag should go up
    pub fn roll(&mut self) -> Option<Duration> {
        if !matches!(self.plan, GlitchPlan::Random { .. }) {
            return None;
        }
        let sample: f64 = self.rng.gen();
        if sample > self.config.deploy_threshold {
            Some(self.config.pulse.sample(&mut self.rng))
        } else {
            None
        }
    }

    /// Whether anything may raise the flag in the current plan
    pub fn can_pulse(&self) -> bool {
        matches!(self.plan, GlitchPlan::Scripted | GlitchPlan::Random { .. })
    }

    /// Raise the flag. True if it went from off to on.
    pub fn raise(&mut self) -> bool {
        if !self.can_pulse() || self.on {
            return false;
        }
        self.on = true;
        self.pulses += 1;
        true
    }

    /// Lower the flag. True if it was on.
    pub fn lower(&mut self) -> bool {
        std::mem::replace(&mut self.on, false)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn plan(&self) -> GlitchPlan {
        self.plan
    }

    /// Activations so far
    pub fn pulses(&self) -> u64 {
        self.pulses
    }
}
