//! IRREVERSO Runtime - the boot sequence orchestration
//!
//! The boot sequencer runs one cooperative loop per mount:
//! 1. Pop due timers in order (phase transitions, narrative steps,
//!    glitch rolls and pulse ends, drip ticks, completion)
//! 2. Apply each one to the sequence state, emitting signals
//! 3. Run the pending frame request: draw, then request the next frame
//!
//! `BootDriver` pumps that loop from a tokio task at the frame cadence.

pub mod config;
pub mod driver;
pub mod glitch;
pub mod narrative;
pub mod sequencer;
pub mod telemetry;

pub use config::*;
pub use driver::*;
pub use glitch::*;
pub use narrative::*;
pub use sequencer::*;
pub use telemetry::*;
