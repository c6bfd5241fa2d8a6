//! Millisecond helpers for configuration
//!
//! Configuration files express every duration in whole milliseconds.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `#[serde(with = "irreverso_core::millis::duration_ms")]` for `Duration` fields
pub mod duration_ms {
    use super::*;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis().min(u64::MAX as u128) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Half-open millisecond range `[min, max)` sampled uniformly
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MillisRange {
    pub min: u64,
    pub max: u64,
}

impl MillisRange {
    pub const fn new(min: u64, max: u64) -> Self {
        MillisRange { min, max }
    }

    /// Uniform draw; a degenerate range yields `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return Duration::from_millis(self.min);
        }
        Duration::from_millis(rng.gen_range(self.min..self.max))
    }

    pub fn contains(&self, d: Duration) -> bool {
        let ms = d.as_millis().min(u64::MAX as u128) as u64;
        if self.max <= self.min {
            ms == self.min
        } else {
            (self.min..self.max).contains(&ms)
        }
    }
}
