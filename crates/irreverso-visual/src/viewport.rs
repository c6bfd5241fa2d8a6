//! Viewport - the container the background fills
//!
//! A cheap shared handle. The host resizes it; renderers hold a
//! [`ResizeSubscription`] and poll it once per frame. Dropping the
//! subscription detaches the listener, so leak checks reduce to
//! [`Viewport::listener_count`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Device pixel ratios above this are not worth the fill cost
pub const MAX_DEVICE_PIXEL_RATIO: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ViewportState {
    css_width: f32,
    css_height: f32,
    device_pixel_ratio: f32,
    generation: u64,
}

#[derive(Debug)]
struct ViewportInner {
    state: RwLock<ViewportState>,
    listeners: AtomicUsize,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    inner: Arc<ViewportInner>,
}

impl Viewport {
    pub fn new(css_width: f32, css_height: f32, device_pixel_ratio: f32) -> Self {
        Viewport {
            inner: Arc::new(ViewportInner {
                state: RwLock::new(ViewportState {
                    css_width: css_width.max(0.0),
                    css_height: css_height.max(0.0),
                    device_pixel_ratio: sanitize_dpr(device_pixel_ratio),
                    generation: 0,
                }),
                listeners: AtomicUsize::new(0),
            }),
        }
    }

    /// Host resize; bumps the generation only when something changed
    pub fn resize(&self, css_width: f32, css_height: f32) {
        let mut state = self.inner.state.write();
        let (w, h) = (css_width.max(0.0), css_height.max(0.0));
        if state.css_width != w || state.css_height != h {
            state.css_width = w;
            state.css_height = h;
            state.generation += 1;
        }
    }

    pub fn set_device_pixel_ratio(&self, ratio: f32) {
        let mut state = self.inner.state.write();
        let ratio = sanitize_dpr(ratio);
        if state.device_pixel_ratio != ratio {
            state.device_pixel_ratio = ratio;
            state.generation += 1;
        }
    }

    pub fn css_size(&self) -> (f32, f32) {
        let state = self.inner.state.read();
        (state.css_width, state.css_height)
    }

    /// `floor(css * min(dpr, 2))`, at least 1x1
    pub fn device_size(&self) -> (u32, u32) {
        let state = self.inner.state.read();
        let dpr = state.device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO);
        (
            ((state.css_width * dpr).floor() as u32).max(1),
            ((state.css_height * dpr).floor() as u32).max(1),
        )
    }

    pub fn generation(&self) -> u64 {
        self.inner.state.read().generation
    }

    pub fn subscribe(&self) -> ResizeSubscription {
        self.inner.listeners.fetch_add(1, Ordering::AcqRel);
        ResizeSubscription {
            inner: Arc::clone(&self.inner),
            seen: self.generation(),
        }
    }

    /// Attached resize listeners
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.load(Ordering::Acquire)
    }
}

fn sanitize_dpr(ratio: f32) -> f32 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

/// Attached resize listener; detaches on drop
#[derive(Debug)]
pub struct ResizeSubscription {
    inner: Arc<ViewportInner>,
    seen: u64,
}

impl ResizeSubscription {
    /// New device size if the viewport changed since the last poll
    pub fn poll(&mut self) -> Option<(u32, u32)> {
        let generation = self.inner.state.read().generation;
        if generation == self.seen {
            return None;
        }
        self.seen = generation;
        Some(self.viewport().device_size())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.inner.listeners.fetch_sub(1, Ordering::AcqRel);
    }
}
