//! Boot sequence simulator
//!
//! Drives one mounted [`BootSequencer`] with a pacing model and records
//! what a host would have observed after every call.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use irreverso_core::{Phase, SeqTime};
use irreverso_runtime::{BootConfig, BootSequencer, BootSignal};
use irreverso_time::{Clock, ManualClock};
use irreverso_visual::{GraphicsBackend, Viewport};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::FramePacing;

/// Host-visible state after one `advance_to`
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub at: SeqTime,
    pub phase: Phase,
    pub glitch: bool,
    pub visible_lines: usize,
    pub phase_value: f32,
    pub pending_timers: usize,
    pub active_frames: usize,
}

#[derive(Clone, Debug, Default)]
pub struct SequenceRecord {
    pub samples: Vec<Sample>,
    pub signals: Vec<(SeqTime, BootSignal)>,
}

impl SequenceRecord {
    /// Phase changes with the call time they were observed at
    pub fn phase_changes(&self) -> Vec<(Phase, SeqTime)> {
        self.signals
            .iter()
            .filter_map(|(at, s)| match s {
                BootSignal::PhaseChanged(p) => Some((*p, *at)),
                _ => None,
            })
            .collect()
    }

    pub fn finished_at(&self) -> Option<SeqTime> {
        self.signals
            .iter()
            .find(|(_, s)| *s == BootSignal::Finished)
            .map(|(at, _)| *at)
    }

    pub fn count(&self, signal: &BootSignal) -> usize {
        self.signals.iter().filter(|(_, s)| s == signal).count()
    }

    /// Signals without their timestamps
    pub fn signal_trace(&self) -> Vec<BootSignal> {
        self.signals.iter().map(|(_, s)| s.clone()).collect()
    }

    pub fn lines_revealed(&self) -> usize {
        self.signals
            .iter()
            .map(|(_, s)| match s {
                BootSignal::LinesRevealed(n) => *n,
                _ => 0,
            })
            .sum()
    }
}

pub struct SequenceSimulator {
    sequencer: BootSequencer,
    pacing: FramePacing,
    rng: StdRng,
    clock: ManualClock,
    record: SequenceRecord,
    finish_calls: Arc<AtomicUsize>,
}

impl SequenceSimulator {
    pub fn new(
        config: BootConfig,
        backend: &dyn GraphicsBackend,
        viewport: &Viewport,
        pacing: FramePacing,
        seed: u64,
    ) -> Self {
        let finish_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&finish_calls);
        let sequencer = BootSequencer::mount(
            config,
            backend,
            viewport,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        SequenceSimulator {
            sequencer,
            pacing,
            rng: StdRng::seed_from_u64(seed),
            clock: ManualClock::new(),
            record: SequenceRecord::default(),
            finish_calls,
        }
    }

    /// One host callback at `now`. Earlier times are clamped to the clock.
    pub fn advance_to(&mut self, now: SeqTime) -> Vec<BootSignal> {
        self.clock.set(now);
        let now = self.clock.now();
        let signals = self.sequencer.advance_to(now);
        self.record
            .signals
            .extend(signals.iter().cloned().map(|s| (now, s)));

        let uniforms = self.sequencer.uniforms();
        self.record.samples.push(Sample {
            at: now,
            phase: self.sequencer.phase(),
            glitch: self.sequencer.glitch(),
            visible_lines: self.sequencer.visible_lines().len(),
            phase_value: uniforms.phase_value,
            pending_timers: self.sequencer.pending_timers(),
            active_frames: self.sequencer.active_frames(),
        });
        signals
    }

    /// Advance by one paced gap. Returns whether the sequence still runs.
    pub fn step(&mut self) -> bool {
        let gap = self.pacing.next_gap(&mut self.rng);
        let next = self.clock.advance(gap);
        self.advance_to(next);
        self.sequencer.is_running()
    }

    pub fn run_until(&mut self, until: SeqTime) {
        while self.now() < until && self.step() {}
    }

    /// Run until completion or until `limit` of simulated time passes
    pub fn run_to_end(&mut self, limit: Duration) -> &SequenceRecord {
        let until = SeqTime::ZERO + limit;
        while self.now() < until && self.step() {}
        &self.record
    }

    pub fn unmount(&mut self) {
        self.sequencer.unmount();
    }

    pub fn sequencer(&self) -> &BootSequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut BootSequencer {
        &mut self.sequencer
    }

    pub fn record(&self) -> &SequenceRecord {
        &self.record
    }

    pub fn now(&self) -> SeqTime {
        self.clock.now()
    }

    /// Shared handle on the simulated clock
    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    /// How many times `on_finish` ran
    pub fn finish_calls(&self) -> usize {
        self.finish_calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irreverso_core::Seed;
    use irreverso_visual::SoftwareBackend;

    #[test]
    fn test_records_every_call() {
        let viewport = Viewport::new(8.0, 8.0, 1.0);
        let config = BootConfig::default().with_seed(Seed::from_label("SIM0001"));
        let mut sim = SequenceSimulator::new(config, &SoftwareBackend::new(), &viewport, FramePacing::smooth(), 1);

        for _ in 0..10 {
            assert!(sim.step());
        }
        assert_eq!(sim.record().samples.len(), 10);
        assert_eq!(sim.now(), SeqTime::from_millis(160));
        assert!(sim.record().samples.iter().all(|s| s.phase == Phase::Orbit));
    }

    #[test]
    fn test_run_to_end() {
        let viewport = Viewport::new(8.0, 8.0, 1.0);
        let config = BootConfig::default().with_seed(Seed::from_label("SIM0002"));
        let mut sim = SequenceSimulator::new(config, &SoftwareBackend::new(), &viewport, FramePacing::coarse(), 2);

        let record = sim.run_to_end(Duration::from_secs(60));
        assert!(record.finished_at().is_some());
        assert_eq!(record.count(&BootSignal::Finished), 1);
        assert_eq!(sim.finish_calls(), 1);
    }

    #[test]
    fn test_clock_handle_follows_the_run() {
        let viewport = Viewport::new(8.0, 8.0, 1.0);
        let config = BootConfig::default().with_seed(Seed::from_label("SIM0003"));
        let mut sim = SequenceSimulator::new(config, &SoftwareBackend::new(), &viewport, FramePacing::smooth(), 3);
        let clock = sim.clock();

        sim.advance_to(SeqTime::from_millis(500));
        assert_eq!(clock.now(), SeqTime::from_millis(500));
        assert_eq!(sim.sequencer().now(), SeqTime::from_millis(500));

        // Going backwards is clamped
        sim.advance_to(SeqTime::from_millis(100));
        assert_eq!(clock.now(), SeqTime::from_millis(500));
        assert_eq!(sim.record().samples.last().map(|s| s.at), Some(SeqTime::from_millis(500)));
    }
}
