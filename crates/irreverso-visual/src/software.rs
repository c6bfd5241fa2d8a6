//! Software backend
//!
//! Rasterizes the full-viewport quad on the CPU into an RGBA8 surface.
//! Compile and link do real validation, so a module with a missing kernel,
//! a stage mismatch, an incomplete uniform contract or unmatched varyings
//! fails the same way a driver would reject it.

use std::collections::BTreeMap;

use irreverso_core::RenderUniforms;

use crate::backend::{
    ContextAttributes, GraphicsBackend, ProgramHandle, RenderContext, RenderError, ShaderHandle,
};
use crate::glsl::Vec2;
use crate::shader::{
    FragmentInput, FragmentKernel, Kernel, ShaderModule, ShaderStage, VertexKernel, UNIFORM_CONTRACT,
};
use crate::Surface;

/// Largest framebuffer edge the rasterizer accepts
pub const MAX_SURFACE_EDGE: u32 = 4096;

#[derive(Debug, Clone, Copy)]
pub struct SoftwareBackend {
    max_edge: u32,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self::with_max_edge(MAX_SURFACE_EDGE)
    }

    pub fn with_max_edge(max_edge: u32) -> Self {
        SoftwareBackend {
            max_edge: max_edge.max(1),
        }
    }
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for SoftwareBackend {
    fn name(&self) -> &'static str {
        "software"
    }

    fn acquire(&self, attributes: &ContextAttributes) -> Result<Box<dyn RenderContext>, RenderError> {
        Ok(Box::new(SoftwareContext::new(*attributes, self.max_edge)))
    }
}

struct Program {
    vertex: VertexKernel,
    fragment: FragmentKernel,
}

pub struct SoftwareContext {
    attributes: ContextAttributes,
    max_edge: u32,
    surface: Surface,
    shaders: BTreeMap<ShaderHandle, ShaderModule>,
    programs: BTreeMap<ProgramHandle, Program>,
    next_id: u32,
}

impl SoftwareContext {
    pub fn new(attributes: ContextAttributes, max_edge: u32) -> Self {
        SoftwareContext {
            attributes,
            max_edge,
            surface: Surface::new(1, 1),
            shaders: BTreeMap::new(),
            programs: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn attributes(&self) -> &ContextAttributes {
        &self.attributes
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn validate(module: &ShaderModule) -> Result<(), String> {
        let kernel = module
            .kernel
            .ok_or_else(|| format!("'{}' v{} has no kernel", module.label, module.version))?;
        if kernel.stage() != module.stage {
            return Err(format!(
                "'{}' declares a {} stage but carries a {} kernel",
                module.label,
                module.stage,
                kernel.stage()
            ));
        }
        if module.stage == ShaderStage::Fragment {
            if let Some(missing) = UNIFORM_CONTRACT.iter().find(|u| !module.declares(u)) {
                return Err(format!("'{}' does not declare uniform {}", module.label, missing.name));
            }
        }
        Ok(())
    }
}

impl RenderContext for SoftwareContext {
    fn compile(&mut self, module: &ShaderModule) -> Result<ShaderHandle, RenderError> {
        Self::validate(module).map_err(|reason| RenderError::Compile {
            stage: module.stage,
            reason,
        })?;
        let handle = ShaderHandle(self.next_id());
        self.shaders.insert(handle, module.clone());
        Ok(handle)
    }

    fn link(&mut self, vertex: ShaderHandle, fragment: ShaderHandle) -> Result<ProgramHandle, RenderError> {
        let vs = self.shaders.get(&vertex).ok_or(RenderError::UnknownShader(vertex))?;
        let fs = self.shaders.get(&fragment).ok_or(RenderError::UnknownShader(fragment))?;

        let (vertex_kernel, fragment_kernel) = match (vs.kernel, fs.kernel) {
            (Some(Kernel::Vertex(v)), Some(Kernel::Fragment(f))) => (v, f),
            _ => {
                return Err(RenderError::Link(format!(
                    "expected vertex + fragment, got {} + {}",
                    vs.stage, fs.stage
                )))
            }
        };

        if let Some(missing) = fs.inputs.iter().find(|input| !vs.outputs.contains(*input)) {
            return Err(RenderError::Link(format!(
                "varying {} is read by '{}' but not written by '{}'",
                missing, fs.label, vs.label
            )));
        }

        let handle = ProgramHandle(self.next_id());
        self.programs.insert(
            handle,
            Program {
                vertex: vertex_kernel,
                fragment: fragment_kernel,
            },
        );
        Ok(handle)
    }

    fn delete_shader(&mut self, shader: ShaderHandle) -> bool {
        self.shaders.remove(&shader).is_some()
    }

    fn delete_program(&mut self, program: ProgramHandle) -> bool {
        self.programs.remove(&program).is_some()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface
            .resize(width.min(self.max_edge), height.min(self.max_edge));
    }

    fn draw(&mut self, program: ProgramHandle, uniforms: &RenderUniforms) -> Result<(), RenderError> {
        let program = self
            .programs
            .get(&program)
            .ok_or(RenderError::UnknownProgram(program))?;
        let (w, h) = self.surface.size();
        let uniforms = uniforms.with_resolution(w, h);
        let (wf, hf) = (w as f32, h as f32);

        for (row, pixels) in self.surface.rows_mut().enumerate() {
            // Window coordinates have their origin bottom-left
            let fy = hf - row as f32 - 0.5;
            let ndc_y = fy / hf * 2.0 - 1.0;
            for (col, px) in pixels.chunks_exact_mut(4).enumerate() {
                let fx = col as f32 + 0.5;
                let ndc = Vec2::new(fx / wf * 2.0 - 1.0, ndc_y);
                let input = FragmentInput {
                    uv: (program.vertex)(ndc),
                    frag_coord: Vec2::new(fx, fy),
                };
                px.copy_from_slice(&(program.fragment)(&input, &uniforms).to_rgba8());
            }
        }
        Ok(())
    }

    fn framebuffer(&self) -> &Surface {
        &self.surface
    }

    fn live_programs(&self) -> usize {
        self.programs.len()
    }

    fn live_shaders(&self) -> usize {
        self.shaders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{UniformDecl, UniformKind, UV_VARYING};
    use crate::Color;

    fn context() -> Box<dyn RenderContext> {
        SoftwareBackend::new()
            .acquire(&ContextAttributes::default())
            .unwrap()
    }

    fn solid(_: &FragmentInput, u: &RenderUniforms) -> Color {
        Color::splat(u.phase_value / 3.0)
    }

    fn uv_gradient(input: &FragmentInput, _: &RenderUniforms) -> Color {
        Color::new(input.uv.x, input.uv.y, 0.0)
    }

    #[test]
    fn test_compile_and_link_builtin() {
        let mut ctx = context();
        let vs = ctx.compile(&ShaderModule::quad_vertex()).unwrap();
        let fs = ctx.compile(&ShaderModule::neural_mesh_fragment()).unwrap();
        let program = ctx.link(vs, fs).unwrap();
        assert_eq!(ctx.live_programs(), 1);

        ctx.resize(16, 9);
        ctx.draw(program, &RenderUniforms::new(1.0, 1.0, false)).unwrap();
        assert_eq!(ctx.framebuffer().size(), (16, 9));
        assert!(ctx.framebuffer().mean_luma() > 0.0);

        assert!(ctx.delete_program(program));
        assert!(!ctx.delete_program(program));
        assert_eq!(ctx.live_programs(), 0);
    }

    #[test]
    fn test_compile_rejects_missing_uniform() {
        let mut ctx = context();
        let module = ShaderModule::neural_mesh_fragment()
            .with_uniforms(&[UniformDecl::new("u_time", UniformKind::Float)]);
        let err = ctx.compile(&module).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Compile { stage: ShaderStage::Fragment, .. }
        ));
        assert_eq!(ctx.live_shaders(), 0);
    }

    #[test]
    fn test_compile_rejects_missing_kernel() {
        let mut ctx = context();
        let module = ShaderModule::new("empty", 1, ShaderStage::Vertex);
        assert!(ctx.compile(&module).is_err());
    }

    #[test]
    fn test_link_rejects_unmatched_varying() {
        let mut ctx = context();
        let vs = ctx
            .compile(&ShaderModule::quad_vertex().with_outputs(&["v_other"]))
            .unwrap();
        let fs = ctx.compile(&ShaderModule::neural_mesh_fragment()).unwrap();
        let err = ctx.link(vs, fs).unwrap_err();
        assert!(matches!(err, RenderError::Link(ref m) if m.contains(UV_VARYING)));
    }

    #[test]
    fn test_uv_orientation() {
        let mut ctx = context();
        let vs = ctx.compile(&ShaderModule::quad_vertex()).unwrap();
        let fs_module = ShaderModule::neural_mesh_fragment().with_kernel(Kernel::Fragment(uv_gradient));
        let fs = ctx.compile(&fs_module).unwrap();
        let program = ctx.link(vs, fs).unwrap();

        ctx.resize(8, 8);
        ctx.draw(program, &RenderUniforms::default()).unwrap();
        let top_left = ctx.framebuffer().pixel(0, 0).unwrap();
        let bottom_right = ctx.framebuffer().pixel(7, 7).unwrap();
        // Top row has uv.y near 1, left column uv.x near 0
        assert!(top_left[1] > 200 && top_left[0] < 50);
        assert!(bottom_right[0] > 200 && bottom_right[1] < 50);
    }

    #[test]
    fn test_resize_is_capped() {
        let mut ctx = SoftwareBackend::with_max_edge(64)
            .acquire(&ContextAttributes::default())
            .unwrap();
        ctx.resize(1000, 10);
        assert_eq!(ctx.framebuffer().size(), (64, 10));

        let vs = ctx.compile(&ShaderModule::quad_vertex()).unwrap();
        let fs = ctx
            .compile(&ShaderModule::neural_mesh_fragment().with_kernel(Kernel::Fragment(solid)))
            .unwrap();
        let program = ctx.link(vs, fs).unwrap();
        ctx.draw(program, &RenderUniforms::new(0.0, 3.0, false)).unwrap();
        assert_eq!(ctx.framebuffer().pixel(0, 0), Some([255, 255, 255, 255]));
    }
}
