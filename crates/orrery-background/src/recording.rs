//! A painter that records draw calls instead of rasterizing them.

use orrery_core::Rgb;

use crate::canvas::{Circle, Painter, Point, RadialGradient};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    VerticalGradient { top: Rgb, bottom: Rgb },
    Fade { color: Rgb, alpha: f32 },
    Circle { circle: Circle, color: Rgb, alpha: f32 },
    Radial { gradient: RadialGradient, clip: Circle },
    Ellipse { center: Point, rx: f32, ry: f32, color: Rgb, alpha: f32 },
    Glyph { pos: Point, ch: char, color: Rgb },
}

#[derive(Debug, Default)]
pub struct RecordingPainter {
    pub ops: Vec<DrawOp>,
}

impl RecordingPainter {
    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Painter for RecordingPainter {
    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        self.ops.push(DrawOp::VerticalGradient { top, bottom });
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        self.ops.push(DrawOp::Fade { color, alpha });
    }

    fn fill_circle(&mut self, circle: Circle, color: Rgb, alpha: f32) {
        self.ops.push(DrawOp::Circle {
            circle,
            color,
            alpha,
        });
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient, clip: Circle) {
        self.ops.push(DrawOp::Radial {
            gradient: *gradient,
            clip,
        });
    }

    fn stroke_ellipse(
        &mut self,
        center: Point,
        rx: f32,
        ry: f32,
        _line_width: f32,
        color: Rgb,
        alpha: f32,
    ) {
        self.ops.push(DrawOp::Ellipse {
            center,
            rx,
            ry,
            color,
            alpha,
        });
    }

    fn draw_glyph(&mut self, pos: Point, ch: char, color: Rgb, _alpha: f32) {
        self.ops.push(DrawOp::Glyph { pos, ch, color });
    }
}
