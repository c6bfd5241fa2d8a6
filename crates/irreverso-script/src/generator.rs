//! Log Script Generator
//!
//! A script is the fixed preamble of the active language followed by a
//! procedural tail. Generation is a pure function of (seed, language,
//! config): the tail draws from the seed's own `Script` stream, so the same
//! seed reproduces the same script, and switching language only swaps the
//! wording while line count and numbers stay put.

use irreverso_core::{Language, Seed, SeedStream};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::phrases::{PhraseTable, BOOK_ENTITIES, REAL_TECH};

/// Hard ceiling on the total script length
pub const MAX_SCRIPT_LINES: usize = 512;

/// Bounds on the total script length
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub min_lines: usize,
    pub max_lines: usize,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        ScriptConfig {
            min_lines: 24,
            max_lines: 42,
        }
    }
}

impl ScriptConfig {
    /// Effective bounds once the preamble length is accounted for,
    /// capped at [`MAX_SCRIPT_LINES`]
    pub fn bounds(&self, preamble_len: usize) -> (usize, usize) {
        let cap = MAX_SCRIPT_LINES.max(preamble_len);
        let min = self.min_lines.max(preamble_len).min(cap);
        let max = self.max_lines.max(min).min(cap);
        (min, max)
    }
}

/// Full ordered log of one sequence instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    language: Language,
    lines: Vec<String>,
    preamble_len: usize,
}

impl Script {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn preamble(&self) -> &[String] {
        &self.lines[..self.preamble_len]
    }

    pub fn tail(&self) -> &[String] {
        &self.lines[self.preamble_len..]
    }
}

/// Generate the boot script for `seed` in `language`
pub fn generate(seed: &Seed, language: Language, config: &ScriptConfig) -> Script {
    let table = PhraseTable::for_language(language);
    let mut lines = table.preamble_lines(seed.label());
    let preamble_len = lines.len();

    let mut rng = StdRng::seed_from_u64(seed.derive(SeedStream::Script));
    let (min, max) = config.bounds(preamble_len);
    let total = rng.gen_range(min..=max);

    lines.reserve(total - preamble_len);
    for _ in preamble_len..total {
        lines.push(tail_line(table, &mut rng));
    }

    tracing::trace!(seed = %seed, %language, lines = lines.len(), "boot script generated");

    Script {
        language,
        lines,
        preamble_len,
    }
}

fn tail_line<R: Rng + ?Sized>(table: &PhraseTable, rng: &mut R) -> String {
    let entity = BOOK_ENTITIES.choose(rng).copied().unwrap_or("NUVE");
    let tech = REAL_TECH.choose(rng).copied().unwrap_or("edge");
    let metric: f64 = rng.gen::<f64>() * 100.0;
    let drift: f64 = rng.gen::<f64>();

    format!(
        "{}: {} :: {}={:.1}% :: {}={:.3}",
        tech,
        kebab(entity),
        table.metric_label,
        metric,
        table.drift_label,
        drift
    )
}

fn kebab(entity: &str) -> String {
    entity
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
