//! Neural-mesh kernels
//!
//! CPU rendition of the GLSL in [`crate::shader::NEURAL_MESH_GLSL`]. The
//! four phases are visual regimes; each one is fully on within 0.4 phase
//! units of its index and cross-fades over the 0.2 units around each
//! half-way point, so weights always sum to one.

use irreverso_core::RenderUniforms;

use crate::glsl::{fract, mix, smoothstep, step, Vec2};
use crate::shader::FragmentInput;
use crate::Color;

const BG_BASE: Color = Color::new(0.00, 0.02, 0.04);
const BG_TOP: Color = Color::new(0.02, 0.00, 0.06);
const BG_SIDE: Color = Color::new(0.00, 0.02, 0.02);
const GLITCH_BAND: Color = Color::new(0.1, 0.0, 0.2);
const GLITCH_CAST: Color = Color::new(0.04, 0.0, 0.03);

/// Look of one phase
#[derive(Debug, Clone, Copy)]
struct Regime {
    glow: f32,
    speed: f32,
    a: Color,
    b: Color,
}

const REGIMES: [Regime; 4] = [
    // Orbit: cyan into violet
    Regime {
        glow: 0.6,
        speed: 1.0,
        a: Color::new(0.00, 0.85, 0.90),
        b: Color::new(0.55, 0.10, 0.95),
    },
    // Breach: violet into alarm magenta
    Regime {
        glow: 1.0,
        speed: 1.6,
        a: Color::new(0.55, 0.10, 0.95),
        b: Color::new(0.95, 0.10, 0.45),
    },
    // Reset: desaturated, slow
    Regime {
        glow: 0.4,
        speed: 0.5,
        a: Color::new(0.35, 0.45, 0.50),
        b: Color::new(0.30, 0.30, 0.40),
    },
    // Deploy: bright cyan-green
    Regime {
        glow: 0.8,
        speed: 1.2,
        a: Color::new(0.00, 0.85, 0.90),
        b: Color::new(0.20, 1.00, 0.75),
    },
];

impl Regime {
    fn blend(weights: &[f32; 4]) -> Regime {
        let mut out = Regime {
            glow: 0.0,
            speed: 0.0,
            a: Color::black(),
            b: Color::black(),
        };
        for (regime, &w) in REGIMES.iter().zip(weights) {
            out.glow += regime.glow * w;
            out.speed += regime.speed * w;
            out.a += regime.a * w;
            out.b += regime.b * w;
        }
        out
    }
}

/// Weight of each phase regime at a blended phase value
pub fn phase_weights(phase_value: f32) -> [f32; 4] {
    let mut weights = [0.0; 4];
    for (k, w) in weights.iter_mut().enumerate() {
        *w = 1.0 - smoothstep(0.4, 0.6, (phase_value - k as f32).abs());
    }
    weights
}

/// Identity quad-to-UV mapping
pub fn quad_uv(a_pos: Vec2) -> Vec2 {
    (a_pos + 1.0) * 0.5
}

pub fn h21(p: Vec2) -> f32 {
    let p = (p * Vec2::new(123.34, 456.21)).fract();
    let p = p + p.dot(p + 45.32);
    fract(p.x * p.y)
}

/// Value noise
pub fn n2(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p.fract();
    let a = h21(i);
    let b = h21(i + Vec2::new(1.0, 0.0));
    let c = h21(i + Vec2::new(0.0, 1.0));
    let d = h21(i + Vec2::new(1.0, 1.0));
    let u = f * f * (Vec2::splat(3.0) - f * 2.0);
    mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y
}

/// Grid lines plus pulsing nodes over a drifting field
fn mesh(uv: Vec2, t: f32) -> f32 {
    let uv = uv * 2.0;
    let p = uv + (uv.yx() * 1.4 + t * 0.6).sin() * 0.25;
    let n = n2(p * 3.0 + t * 0.2);

    let g = ((p * 6.0).fract() - 0.5).abs();
    let lines = 1.0 - smoothstep(0.45, 0.50, g.min_element());
    let mut s = lines * (0.15 + 0.35 * n);

    let f = (p * 6.0).fract() - 0.5;
    let node = smoothstep(0.06, 0.0, f.length());
    s += node * (0.35 + 0.35 * (t + n * std::f32::consts::TAU).sin());
    s
}

pub fn neural_mesh(input: &FragmentInput, u: &RenderUniforms) -> Color {
    let t = u.elapsed_seconds;
    let regime = Regime::blend(&phase_weights(u.phase_value));
    let mut uv = input.uv;

    // Horizontal slice displacement
    let band = if u.glitch {
        let band = step(0.93, n2(Vec2::new(t * 3.0, uv.y * 14.0)));
        uv.x += band * 0.06 * (t * 80.0 + uv.y * 400.0).sin();
        band
    } else {
        0.0
    };

    let mut ndc = uv * 2.0 - 1.0;
    ndc.x *= u.aspect();

    let glow = mesh(ndc * 0.5, t * regime.speed) * regime.glow;
    let neb = n2(ndc + t * 0.05).powi(2);

    let bg = BG_BASE.lerp(&BG_TOP, uv.y).lerp(&BG_SIDE, uv.x * 0.35);
    let mut col = bg + regime.a.lerp(&regime.b, neb) * glow;

    if u.glitch {
        col *= 1.0 - band * 0.35;
        col += GLITCH_BAND * band + GLITCH_CAST;
    }

    let c = uv - 0.5;
    col *= smoothstep(0.80, 0.10, c.dot(c));
    let scan = 0.06 * (input.frag_coord.y * 0.035 + t * 10.0).sin();
    (col - scan).clamped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_weights_at_integer_phases() {
        assert_eq!(phase_weights(0.0), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(phase_weights(2.0), [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(phase_weights(3.0), [0.0, 0.0, 0.0, 1.0]);
        // Still fully Breach just short of the band
        assert_eq!(phase_weights(1.39), [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_quad_uv_corners() {
        assert_eq!(quad_uv(Vec2::new(-1.0, -1.0)), Vec2::new(0.0, 0.0));
        assert_eq!(quad_uv(Vec2::new(1.0, 1.0)), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_noise_range() {
        for i in 0..200 {
            let p = Vec2::new(i as f32 * 0.37, i as f32 * -0.11);
            let n = n2(p);
            assert!((-0.001..=1.001).contains(&n), "{n}");
        }
    }

    proptest! {
        #[test]
        fn prop_weights_partition_unity(p in 0.0f32..3.0) {
            let sum: f32 = phase_weights(p).iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-4);
        }
    }
}
