//! Boot Orchestrator
//!
//! One `BootSequencer` per mount. It owns the phase state, the script, the
//! drip, the glitch flag and the renderer, and it owns every timer they
//! need in a single [`TimerQueue`]. The host feeds it time through
//! [`BootSequencer::advance_to`] and reads state back through accessors.
//!
//! Lifecycle:
//! - `mount` schedules the three phase transitions and completion up front
//! - each phase entry cancels the previous phase's narrative and glitch
//!   timers before scheduling its own
//! - completion clears every timer, releases the renderer, then invokes
//!   `on_finish` exactly once
//! - `unmount` (or drop) clears everything without invoking `on_finish`

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use irreverso_core::{Language, Phase, RenderUniforms, Seed, SeedStream, SeqTime};
use irreverso_script::{generate, DripStep, LogDrip, PhraseTable, Script};
use irreverso_time::{Fired, PhaseSchedule, PhaseTimer, TimerId, TimerQueue, TimerScope};
use irreverso_visual::{GraphicsBackend, ShaderRenderer, Viewport};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::glitch::{GlitchPlan, GlitchScheduler};
use crate::narrative::{track, NarrativeCursor};
use crate::BootConfig;

/// Completion callback handed back to the host
pub type OnFinish = Box<dyn FnOnce() + Send>;

/// Observable change produced by `advance_to`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootSignal {
    PhaseChanged(Phase),
    NarrativeChanged { phase: Phase, step: usize },
    Glitch(bool),
    /// Lines newly revealed in the log window
    LinesRevealed(usize),
    /// The whole script has been revealed
    LogExhausted,
    /// Completion fired; `on_finish` has run
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BootEvent {
    EnterPhase(Phase),
    Narrative { phase: Phase, step: usize },
    GlitchRoll,
    GlitchOff,
    DripTick,
    Finish,
    Frame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceState {
    Running,
    Finished,
    Unmounted,
}

pub struct BootSequencer {
    config: BootConfig,
    seed: Seed,
    language: Language,
    timer: PhaseTimer,
    script: Script,
    drip: LogDrip,
    glitch: GlitchScheduler,
    renderer: ShaderRenderer,
    timers: TimerQueue<BootEvent>,
    phase: Phase,
    narrative: NarrativeCursor,
    glitch_off: Option<TimerId>,
    drip_timer: Option<TimerId>,
    now: SeqTime,
    state: SequenceState,
    on_finish: Option<OnFinish>,
}

impl BootSequencer {
    pub fn mount(
        config: BootConfig,
        backend: &dyn GraphicsBackend,
        viewport: &Viewport,
        on_finish: OnFinish,
    ) -> Self {
        let seed = config
            .seed
            .clone()
            .unwrap_or_else(|| Seed::from_value(rand::random()));
        let language = config.language.unwrap_or_default();

        let mut schedule_rng = StdRng::seed_from_u64(seed.derive(SeedStream::Schedule));
        let schedule = PhaseSchedule::draw(config.duration, &config.schedule, &mut schedule_rng);
        let timer = PhaseTimer::new(schedule, config.schedule.blend);

        let script = generate(&seed, language, &config.script);
        let drip = LogDrip::new(config.drip.clone(), seed.derive(SeedStream::Drip));
        let glitch = GlitchScheduler::new(config.glitch.clone(), seed.derive(SeedStream::Glitch));

        let mut timers = TimerQueue::new();
        for (phase, at) in timer.transitions() {
            timers.set_at(at, TimerScope::Sequence, BootEvent::EnterPhase(phase));
        }
        let finish_at = timer.finish_at(config.finish_buffer);
        timers.set_at(finish_at, TimerScope::Sequence, BootEvent::Finish);

        let renderer = ShaderRenderer::mount(backend, viewport, SeqTime::ZERO);

        tracing::debug!(
            seed = %seed,
            %language,
            total = %humantime::format_duration(timer.schedule().total()),
            lines = script.len(),
            renderer = ?renderer.mode(),
            "boot sequence mounted"
        );

        let mut sequencer = BootSequencer {
            config,
            seed,
            language,
            timer,
            script,
            drip,
            glitch,
            renderer,
            timers,
            phase: Phase::Orbit,
            narrative: NarrativeCursor::start(Phase::Orbit),
            glitch_off: None,
            drip_timer: None,
            now: SeqTime::ZERO,
            state: SequenceState::Running,
            on_finish: Some(on_finish),
        };

        let mut signals = Vec::new();
        sequencer.enter_phase(Phase::Orbit, SeqTime::ZERO, &mut signals);
        if sequencer.renderer.is_active() {
            sequencer.timers.request_frame(BootEvent::Frame);
        }
        sequencer
    }

    /// Process everything due up to `now`: timers one at a time in order,
    /// then the pending frame. Time never moves backwards.
    pub fn advance_to(&mut self, now: SeqTime) -> Vec<BootSignal> {
        let mut signals = Vec::new();
        if self.state != SequenceState::Running {
            return signals;
        }
        self.now = self.now.max(now);

        while let Some(fired) = self.timers.pop_due(self.now) {
            self.handle(fired, &mut signals);
            if self.state != SequenceState::Running {
                return signals;
            }
        }

        for (_, event) in self.timers.take_frames() {
            if event == BootEvent::Frame {
                self.frame();
            }
        }
        signals
    }

    fn handle(&mut self, fired: Fired<BootEvent>, signals: &mut Vec<BootSignal>) {
        let due = fired.due;
        match fired.event {
            BootEvent::EnterPhase(phase) => self.enter_phase(phase, due, signals),
            BootEvent::Narrative { phase, step } => {
                if phase != self.phase {
                    return;
                }
                self.narrative = NarrativeCursor { phase, step };
                signals.push(BootSignal::NarrativeChanged { phase, step });
                if let Some(pulse) = track(phase).get(step).and_then(|s| s.pulse) {
                    self.pulse(due, pulse, signals);
                }
            }
            BootEvent::GlitchRoll => {
                if let Some(pulse) = self.glitch.roll() {
                    self.pulse(due, pulse, signals);
                }
            }
            BootEvent::GlitchOff => {
                self.glitch_off = None;
                if self.glitch.lower() {
                    signals.push(BootSignal::Glitch(false));
                }
            }
            BootEvent::DripTick => match self.drip.tick() {
                DripStep::Revealed(n) => signals.push(BootSignal::LinesRevealed(n)),
                DripStep::Finished(n) => {
                    signals.push(BootSignal::LinesRevealed(n));
                    signals.push(BootSignal::LogExhausted);
                    self.stop_drip();
                }
                DripStep::Idle => self.stop_drip(),
            },
            BootEvent::Finish => self.complete(signals),
            BootEvent::Frame => {}
        }
    }

    fn enter_phase(&mut self, phase: Phase, at: SeqTime, signals: &mut Vec<BootSignal>) {
        let stale = self.timers.clear_scope(TimerScope::Phase) + self.timers.clear_scope(TimerScope::Glitch);
        self.glitch_off = None;
        let was_glitching = self.glitch.is_on();

        self.phase = phase;
        self.narrative = NarrativeCursor::start(phase);
        let plan = self.glitch.on_phase_enter(phase);
        if was_glitching {
            signals.push(BootSignal::Glitch(false));
        }
        if phase != Phase::Orbit {
            signals.push(BootSignal::PhaseChanged(phase));
        }

        for (step, narrative) in track(phase).iter().enumerate() {
            self.timers.set_at(
                at + narrative.offset,
                TimerScope::Phase,
                BootEvent::Narrative { phase, step },
            );
        }

        if let GlitchPlan::Random { interval } = plan {
            self.timers
                .set_interval(at, interval, TimerScope::Glitch, BootEvent::GlitchRoll);
        }

        if phase == Phase::Deploy {
            self.start_drip(at);
        }

        tracing::debug!(%phase, at = at.as_millis(), ?plan, cancelled = stale, "phase entered");
    }

    fn start_drip(&mut self, at: SeqTime) {
        let budget = self.timer.schedule().duration(Phase::Deploy);
        let cadence = self.drip.start(self.script.len(), budget);
        self.drip_timer = Some(
            self.timers
                .set_interval(at, cadence, TimerScope::Drip, BootEvent::DripTick),
        );
        tracing::trace!(cadence_ms = cadence.as_millis() as u64, lines = self.script.len(), "drip started");
    }

    fn stop_drip(&mut self) {
        if let Some(id) = self.drip_timer.take() {
            self.timers.clear(id);
        }
    }

    /// Raise the flag now and lower it after `length`. A new pulse
    /// replaces the end of one already in flight.
    fn pulse(&mut self, at: SeqTime, length: Duration, signals: &mut Vec<BootSignal>) {
        if !self.glitch.can_pulse() {
            return;
        }
        if self.glitch.raise() {
            signals.push(BootSignal::Glitch(true));
        }
        if let Some(id) = self.glitch_off.take() {
            self.timers.clear(id);
        }
        self.glitch_off = Some(
            self.timers
                .set_at(at + length, TimerScope::Glitch, BootEvent::GlitchOff),
        );
    }

    fn frame(&mut self) {
        let phase_value = self.timer.phase_value_at(self.now);
        self.renderer.set_inputs(phase_value, self.glitch.is_on());
        self.renderer.draw_frame(self.now);
        if self.renderer.is_active() {
            self.timers.request_frame(BootEvent::Frame);
        }
    }

    fn complete(&mut self, signals: &mut Vec<BootSignal>) {
        self.state = SequenceState::Finished;
        self.release();
        signals.push(BootSignal::Finished);

        tracing::info!(
            seed = %self.seed,
            elapsed = %humantime::format_duration(self.now.since(SeqTime::ZERO)),
            frames = self.renderer.frames_drawn(),
            "boot sequence finished"
        );

        if let Some(on_finish) = self.on_finish.take() {
            if catch_unwind(AssertUnwindSafe(on_finish)).is_err() {
                tracing::error!("on_finish callback panicked");
            }
        }
    }

    /// Clear every timer and frame request and release the renderer
    fn release(&mut self) {
        self.timers.clear_all();
        self.glitch_off = None;
        self.drip_timer = None;
        self.glitch.lower();
        self.renderer.teardown();
    }

    /// Tear down without completing. `on_finish` is dropped uncalled.
    /// Idempotent.
    pub fn unmount(&mut self) {
        if self.state == SequenceState::Unmounted {
            return;
        }
        let cleared = self.timers.pending() + self.timers.active_frames();
        self.release();
        self.on_finish = None;
        if self.state == SequenceState::Running {
            tracing::debug!(at = self.now.as_millis(), cleared, "boot sequence unmounted early");
        }
        self.state = SequenceState::Unmounted;
    }

    /// Regenerate the script in another language. The seed, the revealed
    /// range and every timer are kept.
    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        self.language = language;
        self.script = generate(&self.seed, language, &self.config.script);
        tracing::debug!(%language, "boot language changed");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn glitch(&self) -> bool {
        self.glitch.is_on()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn title(&self) -> &'static str {
        PhraseTable::for_language(self.language).title
    }

    /// Narrative line under the title
    pub fn narrative(&self) -> &'static str {
        self.narrative.text(self.language)
    }

    pub fn narrative_cursor(&self) -> NarrativeCursor {
        self.narrative
    }

    pub fn footer(&self) -> String {
        PhraseTable::for_language(self.language).footer_line(self.phase)
    }

    /// The visible log window, oldest line first
    pub fn visible_lines(&self) -> &[String] {
        self.drip.window().lines(&self.script)
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Uniforms a frame would see right now
    pub fn uniforms(&self) -> RenderUniforms {
        let (w, h) = self.renderer.resolution();
        RenderUniforms::new(
            self.now.as_secs_f32(),
            self.timer.phase_value_at(self.now),
            self.glitch.is_on(),
        )
        .with_resolution(w, h)
    }

    pub fn schedule(&self) -> &PhaseSchedule {
        self.timer.schedule()
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    pub fn now(&self) -> SeqTime {
        self.now
    }

    /// Instant completion is scheduled for
    pub fn finish_at(&self) -> SeqTime {
        self.timer.finish_at(self.config.finish_buffer)
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SequenceState::Finished
    }

    pub fn is_running(&self) -> bool {
        self.state == SequenceState::Running
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn pending_in(&self, scope: TimerScope) -> usize {
        self.timers.pending_in(scope)
    }

    pub fn active_frames(&self) -> usize {
        self.timers.active_frames()
    }

    /// Earliest pending timer, if any
    pub fn next_deadline(&self) -> Option<SeqTime> {
        self.timers.next_due()
    }

    pub fn renderer(&self) -> &ShaderRenderer {
        &self.renderer
    }
}

impl Drop for BootSequencer {
    fn drop(&mut self) {
        self.unmount();
    }
}
