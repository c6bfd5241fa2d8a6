//! Drawable surface: an RGBA8 color buffer in row-major order, top row first

use crate::Color;

#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Surface {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Resize to `width` x `height`. No-op when unchanged; otherwise the
    /// contents are cleared. Returns whether anything changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize((width as usize) * (height as usize) * 4, 0);
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn fill(&mut self, color: Color) {
        let px = color.to_rgba8();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(((y as usize) * (self.width as usize) + x as usize) * 4)
        } else {
            None
        }
    }

    pub fn put(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.to_rgba8());
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[i..i + 4]);
        Some(px)
    }

    /// Mutable rows, top first
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        let stride = self.width as usize * 4;
        self.pixels.chunks_exact_mut(stride)
    }

    /// Average color of a rectangle, clipped to the surface
    pub fn average(&self, x: u32, y: u32, w: u32, h: u32) -> Color {
        let x1 = x.saturating_add(w).min(self.width);
        let y1 = y.saturating_add(h).min(self.height);
        let mut sum = Color::black();
        let mut n = 0u32;
        for yy in y.min(y1)..y1 {
            for xx in x.min(x1)..x1 {
                if let Some(px) = self.pixel(xx, yy) {
                    sum += Color::from_rgba8(px);
                    n += 1;
                }
            }
        }
        if n == 0 {
            Color::black()
        } else {
            sum * (1.0 / n as f32)
        }
    }

    pub fn mean_luma(&self) -> f32 {
        self.average(0, 0, self.width, self.height).luma()
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
