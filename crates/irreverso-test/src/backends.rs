//! Fault-injecting graphics backend
//!
//! Wraps the software rasterizer and fails one step of the pipeline on
//! demand, so degrade paths can be driven through a full sequence.

use irreverso_core::RenderUniforms;
use irreverso_visual::{
    ContextAttributes, GraphicsBackend, ProgramHandle, RenderContext, RenderError, ShaderHandle,
    ShaderModule, ShaderStage, SoftwareBackend, Surface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Compilation of this stage fails
    Compile(ShaderStage),
    /// Linking fails
    Link,
    /// Draws fail once this many frames succeeded
    Draw { after: u64 },
}

#[derive(Debug, Clone)]
pub struct FaultyBackend {
    inner: SoftwareBackend,
    fault: Fault,
}

impl FaultyBackend {
    pub fn new(fault: Fault) -> Self {
        FaultyBackend {
            inner: SoftwareBackend::new(),
            fault,
        }
    }
}

impl GraphicsBackend for FaultyBackend {
    fn name(&self) -> &'static str {
        "faulty"
    }

    fn acquire(&self, attributes: &ContextAttributes) -> Result<Box<dyn RenderContext>, RenderError> {
        Ok(Box::new(FaultyContext {
            inner: self.inner.acquire(attributes)?,
            fault: self.fault,
            draws: 0,
        }))
    }
}

struct FaultyContext {
    inner: Box<dyn RenderContext>,
    fault: Fault,
    draws: u64,
}

impl RenderContext for FaultyContext {
    fn compile(&mut self, module: &ShaderModule) -> Result<ShaderHandle, RenderError> {
        if self.fault == Fault::Compile(module.stage) {
            return Err(RenderError::Compile {
                stage: module.stage,
                reason: "injected compile fault".into(),
            });
        }
        self.inner.compile(module)
    }

    fn link(&mut self, vertex: ShaderHandle, fragment: ShaderHandle) -> Result<ProgramHandle, RenderError> {
        if self.fault == Fault::Link {
            return Err(RenderError::Link("injected link fault".into()));
        }
        self.inner.link(vertex, fragment)
    }

    fn delete_shader(&mut self, shader: ShaderHandle) -> bool {
        self.inner.delete_shader(shader)
    }

    fn delete_program(&mut self, program: ProgramHandle) -> bool {
        self.inner.delete_program(program)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.inner.resize(width, height)
    }

    fn draw(&mut self, program: ProgramHandle, uniforms: &RenderUniforms) -> Result<(), RenderError> {
        if let Fault::Draw { after } = self.fault {
            if self.draws >= after {
                return Err(RenderError::ContextUnavailable("injected context loss".into()));
            }
        }
        self.inner.draw(program, uniforms)?;
        self.draws += 1;
        Ok(())
    }

    fn framebuffer(&self) -> &Surface {
        self.inner.framebuffer()
    }

    fn live_programs(&self) -> usize {
        self.inner.live_programs()
    }

    fn live_shaders(&self) -> usize {
        self.inner.live_shaders()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irreverso_core::SeqTime;
    use irreverso_visual::{RendererMode, ShaderRenderer, Viewport};

    #[test]
    fn test_compile_fault_degrades() {
        let viewport = Viewport::new(4.0, 4.0, 1.0);
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            let renderer = ShaderRenderer::mount(&FaultyBackend::new(Fault::Compile(stage)), &viewport, SeqTime::ZERO);
            assert!(matches!(renderer.mode(), RendererMode::Static(RenderError::Compile { .. })));
        }
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn test_draw_fault_after_frames() {
        let viewport = Viewport::new(4.0, 4.0, 1.0);
        let mut renderer = ShaderRenderer::mount(&FaultyBackend::new(Fault::Draw { after: 2 }), &viewport, SeqTime::ZERO);
        assert!(renderer.draw_frame(SeqTime::from_millis(16)).is_some());
        assert!(renderer.draw_frame(SeqTime::from_millis(32)).is_some());
        assert!(renderer.draw_frame(SeqTime::from_millis(48)).is_none());
        assert!(!renderer.is_active());
        assert_eq!(renderer.frames_drawn(), 2);
        assert_eq!(viewport.listener_count(), 0);
    }
}
