//! Boot configuration
//!
//! Every field has a default; a JSON document overrides any subset of them.
//! Durations are whole milliseconds.

use std::path::Path;
use std::time::Duration;

use irreverso_core::millis::duration_ms;
use irreverso_core::{IrreversoError, IrreversoResult, Language, Seed};
use irreverso_script::{DripConfig, ScriptConfig, MAX_SCRIPT_LINES};
use irreverso_time::ScheduleConfig;
use serde::{Deserialize, Serialize};

use crate::GlitchConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Requested total length; clamped up to `schedule.min_total`
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    /// Display language. The sequencer falls back to English when unset;
    /// hosts resolve it first, usually with `irreverso_shell::locale::detect`.
    pub language: Option<Language>,
    /// Pinned seed; a fresh one is drawn per mount when unset
    pub seed: Option<Seed>,
    pub schedule: ScheduleConfig,
    pub script: ScriptConfig,
    pub drip: DripConfig,
    pub glitch: GlitchConfig,
    /// Frame cadence of the async driver
    #[serde(with = "duration_ms")]
    pub frame_interval: Duration,
    /// Completion fires this long after the schedule ends
    #[serde(with = "duration_ms")]
    pub finish_buffer: Duration,
}

impl Default for BootConfig {
    fn default() -> Self {
        BootConfig {
            duration: Duration::from_millis(15_000),
            language: None,
            seed: None,
            schedule: ScheduleConfig::default(),
            script: ScriptConfig::default(),
            drip: DripConfig::default(),
            glitch: GlitchConfig::default(),
            frame_interval: Duration::from_millis(16),
            finish_buffer: Duration::from_millis(250),
        }
    }
}

impl BootConfig {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn from_json_str(json: &str) -> IrreversoResult<Self> {
        let config: BootConfig =
            serde_json::from_str(json).map_err(|e| IrreversoError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> IrreversoResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values that cannot drive a sequence
    pub fn validate(&self) -> IrreversoResult<()> {
        if self.frame_interval.is_zero() {
            return Err(IrreversoError::InvalidConfig("frame_interval must be > 0".into()));
        }
        if self.drip.window == 0 {
            return Err(IrreversoError::InvalidConfig("drip.window must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.drip.burst_probability) {
            return Err(IrreversoError::InvalidConfig(
                "drip.burst_probability must be within 0..=1".into(),
            ));
        }
        if self.script.max_lines < self.script.min_lines {
            return Err(IrreversoError::InvalidConfig(
                "script.max_lines must be >= script.min_lines".into(),
            ));
        }
        if self.script.max_lines > MAX_SCRIPT_LINES {
            return Err(IrreversoError::InvalidConfig(format!(
                "script.max_lines must be <= {MAX_SCRIPT_LINES}"
            )));
        }
        if self.drip.min_burst_target > MAX_SCRIPT_LINES || self.drip.line_pad > MAX_SCRIPT_LINES {
            return Err(IrreversoError::InvalidConfig(format!(
                "drip.min_burst_target and drip.line_pad must be <= {MAX_SCRIPT_LINES}"
            )));
        }
        Ok(())
    }
}
