//! Shader Renderer
//!
//! Owns one rendering context, one linked program and one resize listener
//! for the lifetime of a mount. Mounting never fails: if the context cannot
//! be acquired, or either stage fails to compile, or the program fails to
//! link, the renderer logs the reason and stays static. Nothing about the
//! boot sequence depends on which of the two modes it ends up in.
//!
//! Phase and glitch changes only update the inputs the next frame reads.
//! The program is compiled once per mount.

use irreverso_core::{IrreversoError, RenderUniforms, SeqTime};

use crate::backend::{ContextAttributes, GraphicsBackend, ProgramHandle, RenderContext, RenderError};
use crate::shader::ShaderModule;
use crate::viewport::{ResizeSubscription, Viewport};
use crate::Surface;

/// Why the renderer is static
pub type DegradeReason = RenderError;

#[derive(Debug, Clone, PartialEq)]
pub enum RendererMode {
    /// Program linked; one draw per frame
    Active,
    /// Setup or drawing failed; no animated background
    Static(DegradeReason),
    /// Torn down
    Released,
}

pub struct ShaderRenderer {
    context: Option<Box<dyn RenderContext>>,
    program: Option<ProgramHandle>,
    resize: Option<ResizeSubscription>,
    mode: RendererMode,
    started_at: SeqTime,
    phase_value: f32,
    glitch: bool,
    size: (u32, u32),
    frames_drawn: u64,
}

impl ShaderRenderer {
    /// Mount with the built-in quad + neural-mesh program
    pub fn mount(backend: &dyn GraphicsBackend, viewport: &Viewport, started_at: SeqTime) -> Self {
        Self::mount_with(
            backend,
            viewport,
            started_at,
            &ShaderModule::quad_vertex(),
            &ShaderModule::neural_mesh_fragment(),
        )
    }

    pub fn mount_with(
        backend: &dyn GraphicsBackend,
        viewport: &Viewport,
        started_at: SeqTime,
        vertex: &ShaderModule,
        fragment: &ShaderModule,
    ) -> Self {
        let mut renderer = ShaderRenderer {
            context: None,
            program: None,
            resize: None,
            mode: RendererMode::Active,
            started_at,
            phase_value: 0.0,
            glitch: false,
            size: viewport.device_size(),
            frames_drawn: 0,
        };

        match Self::setup(backend, vertex, fragment) {
            Ok((mut context, program)) => {
                context.resize(renderer.size.0, renderer.size.1);
                renderer.context = Some(context);
                renderer.program = Some(program);
                renderer.resize = Some(viewport.subscribe());
                tracing::debug!(
                    backend = backend.name(),
                    width = renderer.size.0,
                    height = renderer.size.1,
                    "shader renderer active"
                );
            }
            Err(reason) => {
                tracing::warn!(backend = backend.name(), %reason, "shader renderer degraded to static background");
                renderer.mode = RendererMode::Static(reason);
            }
        }
        renderer
    }

    /// Acquire, compile both stages, link. Intermediate objects are
    /// released on every exit path.
    fn setup(
        backend: &dyn GraphicsBackend,
        vertex: &ShaderModule,
        fragment: &ShaderModule,
    ) -> Result<(Box<dyn RenderContext>, ProgramHandle), RenderError> {
        let mut context = backend.acquire(&ContextAttributes::default())?;

        let vs = context.compile(vertex)?;
        let fs = match context.compile(fragment) {
            Ok(fs) => fs,
            Err(err) => {
                context.delete_shader(vs);
                return Err(err);
            }
        };

        let linked = context.link(vs, fs);
        context.delete_shader(vs);
        context.delete_shader(fs);
        Ok((context, linked?))
    }

    /// Inputs for the next frame; last writer wins
    pub fn set_inputs(&mut self, phase_value: f32, glitch: bool) {
        self.phase_value = phase_value.clamp(0.0, 3.0);
        self.glitch = glitch;
    }

    /// Uniforms a frame at `now` would see
    pub fn uniforms(&self, now: SeqTime) -> RenderUniforms {
        RenderUniforms::new(now.since(self.started_at).as_secs_f32(), self.phase_value, self.glitch)
            .with_resolution(self.size.0, self.size.1)
    }

    /// Draw one frame. Returns the uniforms used, or `None` when static.
    pub fn draw_frame(&mut self, now: SeqTime) -> Option<RenderUniforms> {
        if self.mode != RendererMode::Active {
            return None;
        }
        let program = self.program?;

        if let Some((w, h)) = self.resize.as_mut().and_then(ResizeSubscription::poll) {
            self.size = (w, h);
        }
        let uniforms = self.uniforms(now);

        let context = self.context.as_mut()?;
        context.resize(self.size.0, self.size.1);
        match context.draw(program, &uniforms) {
            Ok(()) => {
                self.frames_drawn += 1;
                Some(uniforms)
            }
            Err(reason) => {
                tracing::warn!(%reason, "draw failed, renderer going static");
                self.release();
                self.mode = RendererMode::Static(reason);
                None
            }
        }
    }

    fn release(&mut self) {
        if let (Some(context), Some(program)) = (self.context.as_mut(), self.program.take()) {
            context.delete_program(program);
        }
        self.context = None;
        self.resize = None;
    }

    /// Release the program, the context and the resize listener.
    /// Idempotent.
    pub fn teardown(&mut self) {
        if self.mode == RendererMode::Released {
            return;
        }
        self.release();
        self.mode = RendererMode::Released;
        tracing::trace!(frames = self.frames_drawn, "shader renderer released");
    }

    pub fn mode(&self) -> &RendererMode {
        &self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == RendererMode::Active
    }

    /// Why the renderer went static, as a crate-level error
    pub fn degraded(&self) -> Option<IrreversoError> {
        match &self.mode {
            RendererMode::Static(reason) => Some(reason.clone().into()),
            _ => None,
        }
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.size
    }

    /// Last drawn frame, while active
    pub fn framebuffer(&self) -> Option<&Surface> {
        self.context.as_deref().map(|c| c.framebuffer())
    }

    /// Programs alive in the owned context
    pub fn live_programs(&self) -> usize {
        self.context.as_deref().map_or(0, |c| c.live_programs())
    }
}

impl Drop for ShaderRenderer {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for ShaderRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderRenderer")
            .field("mode", &self.mode)
            .field("size", &self.size)
            .field("frames_drawn", &self.frames_drawn)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{ShaderStage, UniformDecl, UniformKind};
    use crate::{SoftwareBackend, UnavailableBackend};

    fn viewport() -> Viewport {
        Viewport::new(24.0, 12.0, 1.0)
    }

    #[test]
    fn test_mount_and_draw() {
        let viewport = viewport();
        let mut renderer = ShaderRenderer::mount(&SoftwareBackend::new(), &viewport, SeqTime::ZERO);
        assert!(renderer.is_active());
        assert!(renderer.degraded().is_none());
        assert_eq!(viewport.listener_count(), 1);
        assert_eq!(renderer.live_programs(), 1);

        let uniforms = renderer.draw_frame(SeqTime::from_millis(1_500)).unwrap();
        assert!((uniforms.elapsed_seconds - 1.5).abs() < 1e-6);
        assert_eq!(uniforms.resolution, (24, 12));
        assert_eq!(renderer.frames_drawn(), 1);
    }

    #[test]
    fn test_context_unavailable_degrades() {
        let viewport = viewport();
        let mut renderer = ShaderRenderer::mount(&UnavailableBackend::default(), &viewport, SeqTime::ZERO);
        assert!(matches!(
            renderer.mode(),
            RendererMode::Static(RenderError::ContextUnavailable(_))
        ));
        assert_eq!(renderer.draw_frame(SeqTime::from_millis(16)), None);
        assert_eq!(viewport.listener_count(), 0);
        assert!(renderer.framebuffer().is_none());
        assert!(matches!(
            renderer.degraded(),
            Some(IrreversoError::ContextUnavailable(_))
        ));
    }

    #[test]
    fn test_compile_failure_degrades() {
        let viewport = viewport();
        let broken = ShaderModule::neural_mesh_fragment()
            .with_uniforms(&[UniformDecl::new("u_time", UniformKind::Float)]);
        let renderer = ShaderRenderer::mount_with(
            &SoftwareBackend::new(),
            &viewport,
            SeqTime::ZERO,
            &ShaderModule::quad_vertex(),
            &broken,
        );
        assert!(matches!(
            renderer.mode(),
            RendererMode::Static(RenderError::Compile { stage: ShaderStage::Fragment, .. })
        ));
        assert!(matches!(
            renderer.degraded(),
            Some(IrreversoError::ShaderCompile { stage: "fragment", .. })
        ));
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn test_link_failure_degrades() {
        let viewport = viewport();
        let renderer = ShaderRenderer::mount_with(
            &SoftwareBackend::new(),
            &viewport,
            SeqTime::ZERO,
            &ShaderModule::quad_vertex().with_outputs(&[]),
            &ShaderModule::neural_mesh_fragment(),
        );
        assert!(matches!(renderer.mode(), RendererMode::Static(RenderError::Link(_))));
        assert!(matches!(renderer.degraded(), Some(IrreversoError::ProgramLink(_))));
    }

    #[test]
    fn test_resize_follows_viewport() {
        let viewport = viewport();
        let mut renderer = ShaderRenderer::mount(&SoftwareBackend::new(), &viewport, SeqTime::ZERO);
        renderer.draw_frame(SeqTime::from_millis(16));

        viewport.resize(10.0, 5.0);
        viewport.set_device_pixel_ratio(2.0);
        let uniforms = renderer.draw_frame(SeqTime::from_millis(32)).unwrap();
        assert_eq!(uniforms.resolution, (20, 10));
        assert_eq!(renderer.framebuffer().map(Surface::size), Some((20, 10)));
    }

    #[test]
    fn test_phase_and_glitch_change_the_image() {
        let viewport = viewport();
        let mut renderer = ShaderRenderer::mount(&SoftwareBackend::new(), &viewport, SeqTime::ZERO);
        let now = SeqTime::from_millis(2_000);

        renderer.set_inputs(0.0, false);
        renderer.draw_frame(now);
        let orbit = renderer.framebuffer().cloned();

        renderer.set_inputs(1.0, false);
        renderer.draw_frame(now);
        let breach = renderer.framebuffer().cloned();

        renderer.set_inputs(1.0, true);
        renderer.draw_frame(now);
        let glitched = renderer.framebuffer().cloned();

        assert_ne!(orbit, breach);
        assert_ne!(breach, glitched);
        // Same program throughout
        assert_eq!(renderer.live_programs(), 1);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let viewport = viewport();
        let mut renderer = ShaderRenderer::mount(&SoftwareBackend::new(), &viewport, SeqTime::ZERO);
        renderer.teardown();
        renderer.teardown();
        assert_eq!(renderer.mode(), &RendererMode::Released);
        assert_eq!(viewport.listener_count(), 0);
        assert_eq!(renderer.draw_frame(SeqTime::from_millis(16)), None);

        let other = ShaderRenderer::mount(&SoftwareBackend::new(), &viewport, SeqTime::ZERO);
        assert_eq!(viewport.listener_count(), 1);
        drop(other);
        assert_eq!(viewport.listener_count(), 0);
    }
}
