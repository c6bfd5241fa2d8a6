//! Shader modules
//!
//! A shader is a versioned asset: the uniforms and varyings it declares,
//! a GLSL reference source, and the kernel a backend executes. Every
//! fragment stage must declare the uniform contract:
//!
//! | uniform    | type    | meaning                             |
//! |------------|---------|-------------------------------------|
//! | `u_time`   | `float` | seconds since the renderer mounted  |
//! | `u_phase`  | `float` | 0 orbit .. 3 deploy, blended        |
//! | `u_glitch` | `float` | 0 or 1                              |
//! | `u_res`    | `vec2`  | surface size in device pixels       |

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use irreverso_core::RenderUniforms;

use crate::glsl::Vec2;
use crate::mesh;
use crate::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    Float,
    Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformDecl {
    pub name: &'static str,
    pub kind: UniformKind,
}

impl UniformDecl {
    pub const fn new(name: &'static str, kind: UniformKind) -> Self {
        UniformDecl { name, kind }
    }
}

/// Uniforms every fragment stage must declare
pub const UNIFORM_CONTRACT: [UniformDecl; 4] = [
    UniformDecl::new("u_time", UniformKind::Float),
    UniformDecl::new("u_phase", UniformKind::Float),
    UniformDecl::new("u_glitch", UniformKind::Float),
    UniformDecl::new("u_res", UniformKind::Vec2),
];

/// Varying carrying the quad's 0..1 coordinates
pub const UV_VARYING: &str = "v_uv";

/// Per-fragment inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentInput {
    /// Interpolated `v_uv`, origin bottom-left
    pub uv: Vec2,
    /// Pixel center in window coordinates, origin bottom-left
    pub frag_coord: Vec2,
}

/// Maps a quad corner in NDC to its `v_uv`
pub type VertexKernel = fn(Vec2) -> Vec2;

pub type FragmentKernel = fn(&FragmentInput, &RenderUniforms) -> Color;

#[derive(Clone, Copy)]
pub enum Kernel {
    Vertex(VertexKernel),
    Fragment(FragmentKernel),
}

impl Kernel {
    pub fn stage(&self) -> ShaderStage {
        match self {
            Kernel::Vertex(_) => ShaderStage::Vertex,
            Kernel::Fragment(_) => ShaderStage::Fragment,
        }
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kernel({})", self.stage())
    }
}

#[derive(Debug, Clone)]
pub struct ShaderModule {
    pub label: &'static str,
    pub version: u32,
    pub stage: ShaderStage,
    pub uniforms: Vec<UniformDecl>,
    /// Varyings read
    pub inputs: Vec<&'static str>,
    /// Varyings written
    pub outputs: Vec<&'static str>,
    /// GLSL ES 1.0 reference text
    pub source: &'static str,
    pub kernel: Option<Kernel>,
}

impl ShaderModule {
    pub fn new(label: &'static str, version: u32, stage: ShaderStage) -> Self {
        ShaderModule {
            label,
            version,
            stage,
            uniforms: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            source: "",
            kernel: None,
        }
    }

    pub fn with_uniforms(mut self, uniforms: &[UniformDecl]) -> Self {
        self.uniforms = uniforms.to_vec();
        self
    }

    pub fn with_inputs(mut self, inputs: &[&'static str]) -> Self {
        self.inputs = inputs.to_vec();
        self
    }

    pub fn with_outputs(mut self, outputs: &[&'static str]) -> Self {
        self.outputs = outputs.to_vec();
        self
    }

    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = source;
        self
    }

    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = Some(kernel);
        self
    }

    pub fn declares(&self, uniform: &UniformDecl) -> bool {
        self.uniforms.contains(uniform)
    }

    /// Stable identity of (label, version, source) within one build
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.label.hash(&mut hasher);
        self.version.hash(&mut hasher);
        self.source.hash(&mut hasher);
        hasher.finish()
    }

    /// Identity quad-to-UV vertex stage
    pub fn quad_vertex() -> Self {
        ShaderModule::new("quad", 1, ShaderStage::Vertex)
            .with_outputs(&[UV_VARYING])
            .with_source(QUAD_VERTEX_GLSL)
            .with_kernel(Kernel::Vertex(mesh::quad_uv))
    }

    /// Neural-mesh background
    pub fn neural_mesh_fragment() -> Self {
        ShaderModule::new("neural-mesh", 2, ShaderStage::Fragment)
            .with_uniforms(&UNIFORM_CONTRACT)
            .with_inputs(&[UV_VARYING])
            .with_source(NEURAL_MESH_GLSL)
            .with_kernel(Kernel::Fragment(mesh::neural_mesh))
    }
}

pub const QUAD_VERTEX_GLSL: &str = r#"
attribute vec2 a_pos;
varying vec2 v_uv;
void main() {
  v_uv = (a_pos + 1.0) * 0.5;
  gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

pub const NEURAL_MESH_GLSL: &str = r#"
precision mediump float;
varying vec2 v_uv;
uniform vec2 u_res;
uniform float u_time;
uniform float u_phase;
uniform float u_glitch;

float h21(vec2 p) {
  p = fract(p * vec2(123.34, 456.21));
  p += dot(p, p + 45.32);
  return fract(p.x * p.y);
}

float n2(vec2 p) {
  vec2 i = floor(p);
  vec2 f = fract(p);
  float a = h21(i);
  float b = h21(i + vec2(1, 0));
  float c = h21(i + vec2(0, 1));
  float d = h21(i + vec2(1, 1));
  vec2 u = f * f * (3.0 - 2.0 * f);
  return mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y;
}

float mesh(vec2 uv, float t) {
  uv *= 2.0;
  vec2 p = uv + 0.25 * sin(uv.yx * 1.4 + t * 0.6);
  float n = n2(p * 3.0 + t * 0.2);
  vec2 g = abs(fract(p * 6.0) - 0.5);
  float s = (1.0 - smoothstep(0.45, 0.50, min(g.x, g.y))) * (0.15 + 0.35 * n);
  vec2 f = fract(p * 6.0) - 0.5;
  s += smoothstep(0.06, 0.0, length(f)) * (0.35 + 0.35 * sin(t + n * 6.283));
  return s;
}

float regime(float p, float k) {
  return 1.0 - smoothstep(0.4, 0.6, abs(p - k));
}

void main() {
  vec2 uv = v_uv;
  float t = u_time;
  vec4 w = vec4(regime(u_phase, 0.0), regime(u_phase, 1.0),
                regime(u_phase, 2.0), regime(u_phase, 3.0));

  float band = 0.0;
  if (u_glitch > 0.5) {
    band = step(0.93, n2(vec2(t * 3.0, uv.y * 14.0)));
    uv.x += band * 0.06 * sin(t * 80.0 + uv.y * 400.0);
  }

  vec2 ndc = uv * 2.0 - 1.0;
  ndc.x *= u_res.x / u_res.y;

  float speed = dot(w, vec4(1.0, 1.6, 0.5, 1.2));
  float glow = mesh(ndc * 0.5, t * speed) * dot(w, vec4(0.6, 1.0, 0.4, 0.8));
  vec3 ca = w.x * vec3(0.00, 0.85, 0.90) + w.y * vec3(0.55, 0.10, 0.95)
          + w.z * vec3(0.35, 0.45, 0.50) + w.w * vec3(0.00, 0.85, 0.90);
  vec3 cb = w.x * vec3(0.55, 0.10, 0.95) + w.y * vec3(0.95, 0.10, 0.45)
          + w.z * vec3(0.30, 0.30, 0.40) + w.w * vec3(0.20, 1.00, 0.75);
  float neb = pow(n2(ndc + t * 0.05), 2.0);

  vec3 bg = mix(vec3(0.00, 0.02, 0.04), vec3(0.02, 0.00, 0.06), uv.y);
  bg = mix(bg, vec3(0.00, 0.02, 0.02), uv.x * 0.35);
  vec3 col = bg + glow * mix(ca, cb, neb);

  if (u_glitch > 0.5) {
    col *= 1.0 - band * 0.35;
    col += band * vec3(0.1, 0.0, 0.2) + vec3(0.04, 0.0, 0.03);
  }

  vec2 c = uv - 0.5;
  col *= smoothstep(0.80, 0.10, dot(c, c));
  col -= 0.06 * sin(gl_FragCoord.y * 0.035 + t * 10.0);
  gl_FragColor = vec4(col, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_modules_declare_contract() {
        let fs = ShaderModule::neural_mesh_fragment();
        for uniform in &UNIFORM_CONTRACT {
            assert!(fs.declares(uniform), "{}", uniform.name);
            assert!(fs.source.contains(uniform.name));
        }
        assert_eq!(fs.inputs, vec![UV_VARYING]);
        assert_eq!(ShaderModule::quad_vertex().outputs, vec![UV_VARYING]);
    }

    #[test]
    fn test_fingerprint_tracks_version() {
        let a = ShaderModule::neural_mesh_fragment();
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.version += 1;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
