//! IRREVERSO Time - clocks, phase schedule and timers
//!
//! This crate implements the time side of the boot sequencer:
//! - Sequence clocks (monotonic for real runs, manual for tests)
//! - Phase Schedule: per-instance phase durations, drawn once
//! - Phase Timer: pure mapping from elapsed time to phase
//! - Timer queue: one-shot timers, intervals and frame requests, all
//!   cancellable and grouped by scope

pub mod clock;
pub mod schedule;
pub mod timers;

pub use clock::*;
pub use schedule::*;
pub use timers::*;
