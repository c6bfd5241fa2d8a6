//! Graphics backend seam
//!
//! A backend hands out rendering contexts; a context compiles shader
//! modules, links them into programs and draws a full-viewport quad into
//! its framebuffer. The renderer only ever talks to these traits.

use irreverso_core::{IrreversoError, RenderUniforms};
use thiserror::Error;

use crate::shader::{ShaderModule, ShaderStage};
use crate::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderHandle(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramHandle(pub(crate) u32);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("{stage} shader compile failed: {reason}")]
    Compile { stage: ShaderStage, reason: String },

    #[error("program link failed: {0}")]
    Link(String),

    #[error("unknown shader {0:?}")]
    UnknownShader(ShaderHandle),

    #[error("unknown program {0:?}")]
    UnknownProgram(ProgramHandle),
}

impl From<RenderError> for IrreversoError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::ContextUnavailable(reason) => IrreversoError::ContextUnavailable(reason),
            RenderError::Compile { stage, reason } => IrreversoError::ShaderCompile {
                stage: stage.as_str(),
                reason,
            },
            other => IrreversoError::ProgramLink(other.to_string()),
        }
    }
}

/// Context creation hints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextAttributes {
    pub antialias: bool,
    pub alpha: bool,
    pub preserve_drawing_buffer: bool,
}

impl Default for ContextAttributes {
    fn default() -> Self {
        ContextAttributes {
            antialias: false,
            alpha: true,
            preserve_drawing_buffer: false,
        }
    }
}

pub trait RenderContext: Send {
    fn compile(&mut self, module: &ShaderModule) -> Result<ShaderHandle, RenderError>;

    fn link(&mut self, vertex: ShaderHandle, fragment: ShaderHandle) -> Result<ProgramHandle, RenderError>;

    fn delete_shader(&mut self, shader: ShaderHandle) -> bool;

    fn delete_program(&mut self, program: ProgramHandle) -> bool;

    /// Resize the framebuffer; no-op when unchanged
    fn resize(&mut self, width: u32, height: u32);

    fn draw(&mut self, program: ProgramHandle, uniforms: &RenderUniforms) -> Result<(), RenderError>;

    fn framebuffer(&self) -> &Surface;

    fn live_programs(&self) -> usize;

    fn live_shaders(&self) -> usize;
}

pub trait GraphicsBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn acquire(&self, attributes: &ContextAttributes) -> Result<Box<dyn RenderContext>, RenderError>;
}

/// A display with no graphics context at all
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        UnavailableBackend {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableBackend {
    fn default() -> Self {
        Self::new("no graphics context on this display")
    }
}

impl GraphicsBackend for UnavailableBackend {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn acquire(&self, _attributes: &ContextAttributes) -> Result<Box<dyn RenderContext>, RenderError> {
        Err(RenderError::ContextUnavailable(self.reason.clone()))
    }
}
