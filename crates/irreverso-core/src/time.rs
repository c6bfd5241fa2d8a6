//! Sequence time
//!
//! Every timer, phase boundary and frame timestamp is expressed as
//! milliseconds elapsed since the sequence was mounted.

use std::ops::{Add, Sub};
use std::time::Duration;

/// Milliseconds since sequence start
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SeqTime(pub i64);

impl SeqTime {
    pub const ZERO: SeqTime = SeqTime(0);
    pub const MAX: SeqTime = SeqTime(i64::MAX);

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        SeqTime(millis)
    }

    #[inline]
    pub fn from_duration(d: Duration) -> Self {
        SeqTime(d.as_millis().min(i64::MAX as u128) as i64)
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f32(self) -> f32 {
        self.0 as f32 / 1000.0
    }

    /// Elapsed duration since `earlier`, zero if `earlier` is later
    #[inline]
    pub fn since(self, earlier: SeqTime) -> Duration {
        self - earlier
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let ms = duration.as_millis().min(i64::MAX as u128) as i64;
        SeqTime(self.0.saturating_add(ms))
    }
}

impl Add<Duration> for SeqTime {
    type Output = SeqTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<SeqTime> for SeqTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: SeqTime) -> Self::Output {
        let diff = self.0 - rhs.0;
        if diff >= 0 {
            Duration::from_millis(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for SeqTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t+{}ms", self.0)
    }
}

/// Whole milliseconds of a duration, saturating
#[inline]
pub fn millis(d: Duration) -> i64 {
    d.as_millis().min(i64::MAX as u128) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_time_arithmetic() {
        let t = SeqTime::from_millis(1_000);
        assert_eq!((t + Duration::from_millis(250)).as_millis(), 1_250);
        assert_eq!(SeqTime::from_millis(1_250) - t, Duration::from_millis(250));
        // Never negative
        assert_eq!(t - SeqTime::from_millis(2_000), Duration::ZERO);
    }

    #[test]
    fn test_saturating() {
        assert_eq!(SeqTime::MAX + Duration::from_secs(1), SeqTime::MAX);
    }
}
