//! Per-frame render inputs

/// Uniform values handed to the shader program every frame.
/// Recomputed each frame, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderUniforms {
    /// Seconds since the renderer was mounted
    pub elapsed_seconds: f32,
    /// Phase encoding, 0.0 (Orbit) ..= 3.0 (Deploy), fractional while blending
    pub phase_value: f32,
    pub glitch: bool,
    /// Drawing surface size in device pixels
    pub resolution: (u32, u32),
}

impl RenderUniforms {
    pub fn new(elapsed_seconds: f32, phase_value: f32, glitch: bool) -> Self {
        RenderUniforms {
            elapsed_seconds,
            phase_value: phase_value.clamp(0.0, 3.0),
            glitch,
            resolution: (1, 1),
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = (width.max(1), height.max(1));
        self
    }

    /// Width over height of the drawing surface
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.resolution.0 as f32 / self.resolution.1.max(1) as f32
    }

    #[inline]
    pub fn glitch_value(&self) -> f32 {
        if self.glitch {
            1.0
        } else {
            0.0
        }
    }
}

impl Default for RenderUniforms {
    fn default() -> Self {
        Self::new(0.0, 0.0, false)
    }
}
