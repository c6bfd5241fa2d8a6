//! IRREVERSO Test Harness - boot sequence simulation and validation
//!
//! This crate provides:
//! - Frame pacing models (steady, jittery, stalling, coarse)
//! - A simulator that records what the host observes per call
//! - Invariant checks over recorded runs
//! - A recording backend that fails on demand

pub mod backends;
pub mod invariants;
pub mod pacing;
pub mod simulator;

pub use backends::*;
pub use invariants::*;
pub use pacing::*;
pub use simulator::*;
