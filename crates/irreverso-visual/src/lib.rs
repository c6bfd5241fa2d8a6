//! IRREVERSO Visual - the boot background
//!
//! The background is a full-viewport procedural shader, a pure function of
//! (time, phase, glitch). This crate owns:
//! - The drawable surface and the viewport it tracks
//! - Shader modules as versioned assets with a fixed uniform contract
//! - Graphics backends: a CPU rasterizer and an always-failing one
//! - The Shader Renderer, which degrades to a static background when any
//!   setup step fails
//!
//! # Degrade ladder
//!
//! - Active: program linked, one draw per frame
//! - Static: no context, or compile/link failure; nothing animates and
//!   nothing is reported upward

pub mod backend;
pub mod color;
pub mod glsl;
pub mod mesh;
pub mod renderer;
pub mod shader;
pub mod software;
pub mod surface;
pub mod viewport;

pub use backend::*;
pub use color::*;
pub use renderer::*;
pub use shader::*;
pub use software::*;
pub use surface::*;
pub use viewport::*;
