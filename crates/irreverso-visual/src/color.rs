//! Linear RGB color as the shader kernels see it

use std::ops::{Add, AddAssign, Mul, MulAssign, Sub};

/// Color in RGB (0.0 - 1.0 range, unclamped while shading)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn clamped(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Rec. 709 luma
    pub fn luma(&self) -> f32 {
        self.r * 0.2126 + self.g * 0.7152 + self.b * 0.0722
    }

    /// Opaque RGBA8
    pub fn to_rgba8(&self) -> [u8; 4] {
        let c = self.clamped();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            255,
        ]
    }

    pub fn from_rgba8(px: [u8; 4]) -> Color {
        Color::new(
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        )
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl Sub<f32> for Color {
    type Output = Color;

    fn sub(self, rhs: f32) -> Color {
        Color::new(self.r - rhs, self.g - rhs, self.b - rhs)
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Color {
        Color::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl MulAssign<f32> for Color {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        let mid = Color::black().lerp(&Color::white(), 0.5);
        assert!((mid.r - 0.5).abs() < f32::EPSILON);
        assert_eq!(Color::black().lerp(&Color::white(), 1.0), Color::white());
    }

    #[test]
    fn test_rgba8_clamps() {
        assert_eq!(Color::new(2.0, -1.0, 0.5).to_rgba8(), [255, 0, 128, 255]);
        let back = Color::from_rgba8([255, 0, 0, 255]);
        assert_eq!(back, Color::new(1.0, 0.0, 0.0));
    }
}
