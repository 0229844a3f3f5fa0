//! Cursor halo: a soft glow trailing the pointer.

use orrery_core::palette;

use super::{Animator, Listeners};
use crate::canvas::{Circle, ColorStop, Painter, Point, RadialGradient};
use crate::color::ease;
use crate::viewport::Viewport;

/// Where the halo waits before the first pointer event.
const OFFSCREEN: f32 = -1e4;
/// Fraction of the remaining distance covered each frame.
const FOLLOW_EASE: f32 = 0.12;
/// Disc radius in logical pixels.
const HALO_RADIUS: f32 = 26.0;
/// Gradient extent relative to the disc radius.
const GLOW_SPREAD: f32 = 2.2;
const GLOW_ALPHA: f32 = 0x44 as f32 / 255.0;

/// Soft radial glow eased toward the pointer.
#[derive(Debug)]
pub struct CursorHalo {
    pointer: Point,
    smoothed: Point,
    dpr: f32,
}

impl Default for CursorHalo {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorHalo {
    pub fn new() -> Self {
        Self {
            pointer: Point::new(OFFSCREEN, OFFSCREEN),
            smoothed: Point::new(OFFSCREEN, OFFSCREEN),
            dpr: 1.0,
        }
    }

    /// Latest pointer position in device pixels.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Eased halo center in device pixels.
    pub fn position(&self) -> Point {
        self.smoothed
    }
}

impl Animator for CursorHalo {
    fn name(&self) -> &'static str {
        "halo"
    }

    fn listeners(&self) -> Listeners {
        Listeners::RESIZE.with_pointer()
    }

    fn resize(&mut self, viewport: Viewport) {
        self.dpr = viewport.dpr();
    }

    fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = Point::new(x * self.dpr, y * self.dpr);
    }

    fn tick(&mut self, painter: &mut dyn Painter) {
        painter.clear();
        self.smoothed = Point::new(
            ease(self.smoothed.x, self.pointer.x, FOLLOW_EASE),
            ease(self.smoothed.y, self.pointer.y, FOLLOW_EASE),
        );
        let radius = HALO_RADIUS * self.dpr;
        let glow = RadialGradient::concentric(
            self.smoothed,
            radius * GLOW_SPREAD,
            ColorStop::new(palette::RED, GLOW_ALPHA),
            ColorStop::transparent(),
        );
        painter.fill_radial_gradient(&glow, Circle::new(self.smoothed, radius));
    }
}
