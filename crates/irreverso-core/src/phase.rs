//! Boot phases
//!
//! The sequence runs Orbit → Breach → Reset → Deploy and then completes.
//! Transitions only move forward; Deploy is terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four mutually exclusive boot phases
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Orbit,
    Breach,
    Reset,
    Deploy,
}

impl Phase {
    /// All phases in entry order
    pub const ALL: [Phase; 4] = [Phase::Orbit, Phase::Breach, Phase::Reset, Phase::Deploy];

    /// Numeric encoding (0..3) used by the shader
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Phase::Orbit => 0,
            Phase::Breach => 1,
            Phase::Reset => 2,
            Phase::Deploy => 3,
        }
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn as_value(self) -> f32 {
        self.index() as f32
    }

    /// Following phase, `None` after Deploy
    #[inline]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self == Phase::Deploy
    }

    /// Upper-case mode label shown in the overlay footer
    pub fn label(self) -> &'static str {
        match self {
            Phase::Orbit => "ORBIT",
            Phase::Breach => "BREACH",
            Phase::Reset => "RESET",
            Phase::Deploy => "DEPLOY",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
