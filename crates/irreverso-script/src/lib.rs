//! IRREVERSO Script - the boot log
//!
//! The boot overlay shows a log feed: a fixed, language-specific preamble
//! followed by a procedural tail of plausible telemetry lines. This crate
//! owns:
//! - Phrase tables (pt, en, es) for log, narrative and footer text
//! - The script generator, a pure function of (seed, language, config)
//! - The drip that reveals the script into a bounded visible window

pub mod drip;
pub mod generator;
pub mod phrases;

pub use drip::*;
pub use generator::*;
pub use phrases::*;
