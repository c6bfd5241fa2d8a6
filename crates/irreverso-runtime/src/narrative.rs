//! Phase-coupled narrative
//!
//! Each phase owns a short track of sub-messages shown under the title.
//! Steps fire at fixed offsets from phase entry; a step may also pulse the
//! glitch flag. Step texts live in the phrase tables.

use std::time::Duration;

use irreverso_core::{Language, Phase};
use irreverso_script::PhraseTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NarrativeStep {
    /// Offset from phase entry
    pub offset: Duration,
    /// Glitch pulse fired with the text change
    pub pulse: Option<Duration>,
}

impl NarrativeStep {
    const fn at(offset_ms: u64) -> Self {
        NarrativeStep {
            offset: Duration::from_millis(offset_ms),
            pulse: None,
        }
    }

    const fn pulsing(offset_ms: u64, pulse_ms: u64) -> Self {
        NarrativeStep {
            offset: Duration::from_millis(offset_ms),
            pulse: Some(Duration::from_millis(pulse_ms)),
        }
    }
}

const ORBIT: [NarrativeStep; 2] = [NarrativeStep::at(0), NarrativeStep::at(1_400)];

const BREACH: [NarrativeStep; 4] = [
    NarrativeStep::pulsing(0, 220),
    NarrativeStep::at(700),
    NarrativeStep::pulsing(1_400, 180),
    NarrativeStep::pulsing(2_100, 250),
];

const RESET: [NarrativeStep; 2] = [NarrativeStep::at(0), NarrativeStep::at(1_000)];

const DEPLOY: [NarrativeStep; 2] = [NarrativeStep::at(0), NarrativeStep::at(2_400)];

/// Steps of a phase, in firing order
pub fn track(phase: Phase) -> &'static [NarrativeStep] {
    match phase {
        Phase::Orbit => &ORBIT,
        Phase::Breach => &BREACH,
        Phase::Reset => &RESET,
        Phase::Deploy => &DEPLOY,
    }
}

/// Step currently shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NarrativeCursor {
    pub phase: Phase,
    pub step: usize,
}

impl NarrativeCursor {
    pub fn start(phase: Phase) -> Self {
        NarrativeCursor { phase, step: 0 }
    }

    pub fn text(&self, language: Language) -> &'static str {
        let lines = PhraseTable::for_language(language).narrative(self.phase);
        lines
            .get(self.step)
            .or_else(|| lines.last())
            .copied()
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_match_phrase_tables() {
        for language in Language::ALL {
            let table = PhraseTable::for_language(language);
            for phase in Phase::ALL {
                assert_eq!(track(phase).len(), table.narrative(phase).len());
            }
        }
    }

    #[test]
    fn test_breach_track() {
        let steps = track(Phase::Breach);
        let offsets: Vec<u64> = steps.iter().map(|s| s.offset.as_millis() as u64).collect();
        assert_eq!(offsets, vec![0, 700, 1_400, 2_100]);
        assert_eq!(steps.iter().filter(|s| s.pulse.is_some()).count(), 3);
        for pulse in steps.iter().filter_map(|s| s.pulse) {
            assert!(pulse >= Duration::from_millis(100) && pulse <= Duration::from_millis(250));
        }
    }

    #[test]
    fn test_only_breach_pulses() {
        for phase in [Phase::Orbit, Phase::Reset, Phase::Deploy] {
            assert!(track(phase).iter().all(|s| s.pulse.is_none()));
        }
    }

    #[test]
    fn test_offsets_are_ordered() {
        for phase in Phase::ALL {
            let steps = track(phase);
            assert!(steps.windows(2).all(|w| w[0].offset < w[1].offset));
            assert_eq!(steps[0].offset, Duration::ZERO);
        }
    }

    #[test]
    fn test_cursor_text() {
        let cursor = NarrativeCursor::start(Phase::Breach);
        assert_eq!(
            cursor.text(Language::En),
            "UNAUTHORIZED ACCESS DETECTED // BUFFER BREACH"
        );
        let out_of_range = NarrativeCursor {
            phase: Phase::Orbit,
            step: 9,
        };
        assert_eq!(
            out_of_range.text(Language::En),
            "Aligning orbit // observers standing by"
        );
    }
}
