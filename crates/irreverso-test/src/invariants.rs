//! Sequence invariants
//!
//! Laws every recorded run must satisfy, whatever the frame pacing:
//! 1. Phases are entered in order, each exactly once
//! 2. Completion fires once, and never before the schedule end plus buffer
//! 3. The glitch flag is never up during Orbit or Reset
//! 4. The visible log never exceeds the window
//! 5. Nothing is left scheduled after completion
//! 6. At most one frame request is outstanding

use std::time::Duration;

use irreverso_core::{Phase, SeqTime};
use irreverso_runtime::BootSignal;
use irreverso_time::PhaseSchedule;
use thiserror::Error;

use crate::SequenceRecord;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("phases entered out of order: {0:?}")]
    PhaseOrder(Vec<Phase>),

    #[error("{phase} entered at {at:?}, before its boundary {boundary:?}")]
    EarlyPhase {
        phase: Phase,
        at: SeqTime,
        boundary: SeqTime,
    },

    #[error("completion observed at {at:?}, before {earliest:?}")]
    EarlyFinish { at: SeqTime, earliest: SeqTime },

    #[error("completion signalled {0} times")]
    FinishCount(usize),

    #[error("glitch up during {phase} at {at:?}")]
    ForbiddenGlitch { phase: Phase, at: SeqTime },

    #[error("{lines} visible lines exceed the window of {window}")]
    WindowOverflow { lines: usize, window: usize },

    #[error("{timers} timers and {frames} frames still pending after completion")]
    Leak { timers: usize, frames: usize },

    #[error("{0} frame requests outstanding")]
    FrameOverlap(usize),
}

/// Every law broken by `record`. `expect_finish` demands completion.
pub fn check(
    record: &SequenceRecord,
    schedule: &PhaseSchedule,
    finish_buffer: Duration,
    window: usize,
    expect_finish: bool,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let changes = record.phase_changes();
    let order: Vec<Phase> = changes.iter().map(|(p, _)| *p).collect();
    let expected = [Phase::Breach, Phase::Reset, Phase::Deploy];
    if !expected.starts_with(&order) || (expect_finish && order.len() != expected.len()) {
        violations.push(Violation::PhaseOrder(order));
    }
    for (phase, at) in &changes {
        let boundary = schedule.start_of(*phase);
        if *at < boundary {
            violations.push(Violation::EarlyPhase {
                phase: *phase,
                at: *at,
                boundary,
            });
        }
    }

    let finishes = record.count(&BootSignal::Finished);
    if finishes > 1 || (expect_finish && finishes == 0) {
        violations.push(Violation::FinishCount(finishes));
    }
    if let Some(at) = record.finished_at() {
        let earliest = SeqTime::ZERO + schedule.total() + finish_buffer;
        if at < earliest {
            violations.push(Violation::EarlyFinish { at, earliest });
        }
    }

    for sample in &record.samples {
        if sample.glitch && matches!(sample.phase, Phase::Orbit | Phase::Reset) {
            violations.push(Violation::ForbiddenGlitch {
                phase: sample.phase,
                at: sample.at,
            });
        }
        if sample.visible_lines > window {
            violations.push(Violation::WindowOverflow {
                lines: sample.visible_lines,
                window,
            });
        }
        if sample.active_frames > 1 {
            violations.push(Violation::FrameOverlap(sample.active_frames));
        }
    }

    if finishes > 0 {
        if let Some(last) = record.samples.last() {
            if last.pending_timers > 0 || last.active_frames > 0 {
                violations.push(Violation::Leak {
                    timers: last.pending_timers,
                    frames: last.active_frames,
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sample;

    fn schedule() -> PhaseSchedule {
        PhaseSchedule::from_durations(
            Duration::from_millis(3_000),
            Duration::from_millis(3_000),
            Duration::from_millis(2_000),
            Duration::from_millis(7_000),
        )
    }

    fn sample(at: i64, phase: Phase, glitch: bool) -> Sample {
        Sample {
            at: SeqTime::from_millis(at),
            phase,
            glitch,
            visible_lines: 0,
            phase_value: phase.as_value(),
            pending_timers: 0,
            active_frames: 0,
        }
    }

    #[test]
    fn test_clean_record() {
        let record = SequenceRecord {
            samples: vec![sample(0, Phase::Orbit, false), sample(15_250, Phase::Deploy, false)],
            signals: vec![
                (SeqTime::from_millis(3_000), BootSignal::PhaseChanged(Phase::Breach)),
                (SeqTime::from_millis(6_000), BootSignal::PhaseChanged(Phase::Reset)),
                (SeqTime::from_millis(8_000), BootSignal::PhaseChanged(Phase::Deploy)),
                (SeqTime::from_millis(15_250), BootSignal::Finished),
            ],
        };
        assert!(check(&record, &schedule(), Duration::from_millis(250), 20, true).is_empty());
    }

    #[test]
    fn test_detects_violations() {
        let record = SequenceRecord {
            samples: vec![sample(7_000, Phase::Reset, true)],
            signals: vec![
                (SeqTime::from_millis(3_000), BootSignal::PhaseChanged(Phase::Reset)),
                (SeqTime::from_millis(15_000), BootSignal::Finished),
            ],
        };
        let violations = check(&record, &schedule(), Duration::from_millis(250), 20, true);
        assert!(violations.iter().any(|v| matches!(v, Violation::PhaseOrder(_))));
        assert!(violations.iter().any(|v| matches!(v, Violation::EarlyPhase { .. })));
        assert!(violations.iter().any(|v| matches!(v, Violation::EarlyFinish { .. })));
        assert!(violations.iter().any(|v| matches!(v, Violation::ForbiddenGlitch { .. })));
    }
}
