//! IRREVERSO Core - Fundamental types for the boot sequencer
//!
//! This crate defines the types shared by every other crate:
//! - Phases of the boot sequence (Orbit, Breach, Reset, Deploy)
//! - Display languages
//! - Sequence time (milliseconds since sequence start)
//! - Seeds for the procedural generators
//! - Render uniforms consumed by the shader renderer
//! - Error taxonomy

pub mod error;
pub mod language;
pub mod millis;
pub mod phase;
pub mod seed;
pub mod time;
pub mod uniforms;

pub use error::*;
pub use language::*;
pub use millis::MillisRange;
pub use phase::*;
pub use seed::*;
pub use time::*;
pub use uniforms::*;
