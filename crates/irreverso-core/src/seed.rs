//! Seeds for the procedural generators
//!
//! A seed has a human-readable label (shown in the bootstrap log line and
//! the telemetry rail) and a 64-bit value derived from it. Generators never
//! share a random stream: each one asks for its own sub-stream via
//! [`Seed::derive`].

use std::fmt;

use serde::{Deserialize, Serialize};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Length of generated seed labels
pub const SEED_LABEL_LEN: usize = 7;

/// Independent random streams drawn from one seed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeedStream {
    Schedule,
    Script,
    Drip,
    Glitch,
    Telemetry,
}

impl SeedStream {
    fn salt(self) -> u64 {
        match self {
            SeedStream::Schedule => 0x5343_4845_4455_4c45,
            SeedStream::Script => 0x5343_5249_5054_0001,
            SeedStream::Drip => 0x4452_4950_0000_0002,
            SeedStream::Glitch => 0x474c_4954_4348_0003,
            SeedStream::Telemetry => 0x5445_4c45_4d00_0004,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Seed {
    label: String,
    value: u64,
}

impl Seed {
    /// Seed from an arbitrary label such as `"ABC123"`
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        let value = fnv1a(label.as_bytes());
        Seed { label, value }
    }

    /// Seed from raw entropy; the label is the upper-case hex prefix
    pub fn from_value(raw: u64) -> Self {
        let hex = format!("{:016X}", splitmix64(raw));
        Self::from_label(&hex[..SEED_LABEL_LEN])
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Sub-stream seed for one generator
    pub fn derive(&self, stream: SeedStream) -> u64 {
        splitmix64(self.value ^ stream.salt())
    }
}

impl From<String> for Seed {
    fn from(label: String) -> Self {
        Seed::from_label(label)
    }
}

impl From<Seed> for String {
    fn from(seed: Seed) -> Self {
        seed.label
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({} / {:016x})", self.label, self.value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
