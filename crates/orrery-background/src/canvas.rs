//! Drawing surface used by the animators.
//!
//! Animators paint through the [`Painter`] trait. [`PixelCanvas`] is the
//! terminal implementation: an RGBA pixel grid with a glyph overlay, shown
//! two pixels per cell with upper-half-block characters.

use std::ops::{Add, Mul, Sub};

use orrery_core::Rgb;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::chars::HALF_BLOCK;
use crate::color::{color_to_unit, lerp3, screen, unit_to_color};

/// Glyphs fainter than this are dropped from the overlay.
const GLYPH_CUTOFF: f32 = 0.05;

/// A position on the surface, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// A filled disc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Color and opacity at one end of a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub color: Rgb,
    pub alpha: f32,
}

impl ColorStop {
    pub const fn new(color: Rgb, alpha: f32) -> Self {
        Self { color, alpha }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::new(Rgb::BLACK, 0.0)
    }
}

/// Radial gradient spreading from a focal point to the edge of a circle.
///
/// At the focus the gradient takes the `inner` stop; on the circle of
/// `radius` around `center` it takes the `outer` stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub focus: Point,
    pub center: Point,
    pub radius: f32,
    pub inner: ColorStop,
    pub outer: ColorStop,
}

impl RadialGradient {
    /// Gradient whose focus sits on its center.
    pub fn concentric(center: Point, radius: f32, inner: ColorStop, outer: ColorStop) -> Self {
        Self {
            focus: center,
            center,
            radius,
            inner,
            outer,
        }
    }

    /// Gradient parameter in `0.0..=1.0` at `p`.
    pub fn param_at(&self, p: Point) -> f32 {
        if self.radius <= 0.0 {
            return 1.0;
        }
        let d = self.center - self.focus;
        let q = p - self.focus;
        let a = d.dot(d) - self.radius * self.radius;
        if a >= -f32::EPSILON {
            // Focus on or outside the circle: fall back to plain distance.
            return ((p - self.center).length() / self.radius).clamp(0.0, 1.0);
        }
        let b = -2.0 * q.dot(d);
        let c = q.dot(q);
        let disc = (b * b - 4.0 * a * c).max(0.0);
        ((-b - disc.sqrt()) / (2.0 * a)).clamp(0.0, 1.0)
    }

    /// Color and alpha at `p`.
    pub fn sample(&self, p: Point) -> ([f32; 3], f32) {
        let t = self.param_at(p);
        let rgb = lerp3(self.inner.color.to_unit(), self.outer.color.to_unit(), t);
        let alpha = self.inner.alpha + (self.outer.alpha - self.inner.alpha) * t;
        (rgb, alpha)
    }
}

/// Drawing operations available to an animator.
pub trait Painter {
    /// Reset every pixel and glyph to transparent.
    fn clear(&mut self);

    /// Paint an opaque gradient from `top` to `bottom`.
    fn fill_vertical_gradient(&mut self, top: Rgb, bottom: Rgb);

    /// Cover the whole surface with `color` at `alpha`, fading earlier strokes.
    fn fade(&mut self, color: Rgb, alpha: f32);

    fn fill_circle(&mut self, circle: Circle, color: Rgb, alpha: f32);

    /// Fill `clip` with `gradient`.
    fn fill_radial_gradient(&mut self, gradient: &RadialGradient, clip: Circle);

    /// Outline an axis-aligned ellipse.
    fn stroke_ellipse(
        &mut self,
        center: Point,
        rx: f32,
        ry: f32,
        line_width: f32,
        color: Rgb,
        alpha: f32,
    );

    /// Place a character at `pos`.
    fn draw_glyph(&mut self, pos: Point, ch: char, color: Rgb, alpha: f32);
}

/// A pixel with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub rgb: [f32; 3],
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        rgb: [0.0; 3],
        a: 0.0,
    };

    /// Source-over compositing of `rgb` at `alpha` onto this pixel.
    fn blend(&mut self, rgb: [f32; 3], alpha: f32) {
        let sa = alpha.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let da = self.a * (1.0 - sa);
        let out_a = sa + da;
        for (dst, src) in self.rgb.iter_mut().zip(rgb) {
            *dst = (src * sa + *dst * da) / out_a;
        }
        self.a = out_a;
    }

    /// The pixel flattened onto black.
    pub fn over_black(self) -> [f32; 3] {
        self.rgb.map(|c| c * self.a)
    }
}

/// A character drawn in the overlay layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub color: Rgb,
    pub alpha: f32,
}

/// RGBA pixel grid with a one-glyph-per-cell overlay.
#[derive(Debug, Clone, Default)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    glyphs: Vec<Option<Glyph>>,
}

impl PixelCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
            glyphs: vec![None; width * height.div_ceil(2)],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Glyph in terminal cell (`col`, `row`).
    pub fn glyph(&self, col: usize, row: usize) -> Option<Glyph> {
        if col >= self.width {
            return None;
        }
        self.glyphs.get(row * self.width + col).copied().flatten()
    }

    /// Apply `shade` to every pixel whose center lies in the given box.
    fn shade<F>(&mut self, min: Point, max: Point, mut shade: F)
    where
        F: FnMut(Point) -> Option<([f32; 3], f32)>,
    {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((rgb, alpha)) = shade(p) {
                    self.pixels[y * self.width + x].blend(rgb, alpha);
                }
            }
        }
    }

    /// Blend into the single pixel containing `p`, used for sub-pixel shapes.
    fn plot(&mut self, p: Point, rgb: [f32; 3], alpha: f32) {
        if p.x < 0.0 || p.y < 0.0 {
            return;
        }
        let (x, y) = (p.x as usize, p.y as usize);
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x].blend(rgb, alpha);
        }
    }

    /// Fill a disc, shading each covered pixel with `sample`.
    fn fill_disc<F>(&mut self, circle: Circle, mut sample: F)
    where
        F: FnMut(Point) -> ([f32; 3], f32),
    {
        let Circle { center, radius } = circle;
        if !(radius > 0.0) {
            return;
        }
        if radius < 0.5 {
            let (rgb, alpha) = sample(center);
            self.plot(center, rgb, alpha);
            return;
        }
        let extent = Point::new(radius + 1.0, radius + 1.0);
        self.shade(center - extent, center + extent, |p| {
            let coverage = (radius - (p - center).length() + 0.5).clamp(0.0, 1.0);
            (coverage > 0.0).then(|| {
                let (rgb, alpha) = sample(p);
                (rgb, alpha * coverage)
            })
        });
    }
}

impl Painter for PixelCanvas {
    fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
        self.glyphs.fill(None);
    }

    fn fill_vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        let span = self.height.saturating_sub(1).max(1) as f32;
        let (top, bottom) = (top.to_unit(), bottom.to_unit());
        for y in 0..self.height {
            let rgb = lerp3(top, bottom, y as f32 / span);
            let row = &mut self.pixels[y * self.width..(y + 1) * self.width];
            row.fill(Rgba { rgb, a: 1.0 });
        }
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        let rgb = color.to_unit();
        for pixel in &mut self.pixels {
            pixel.blend(rgb, alpha);
        }
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for slot in &mut self.glyphs {
            if let Some(glyph) = slot {
                glyph.alpha *= keep;
                if glyph.alpha < GLYPH_CUTOFF {
                    *slot = None;
                }
            }
        }
    }

    fn fill_circle(&mut self, circle: Circle, color: Rgb, alpha: f32) {
        let rgb = color.to_unit();
        self.fill_disc(circle, |_| (rgb, alpha));
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient, clip: Circle) {
        self.fill_disc(clip, |p| gradient.sample(p));
    }

    fn stroke_ellipse(
        &mut self,
        center: Point,
        rx: f32,
        ry: f32,
        line_width: f32,
        color: Rgb,
        alpha: f32,
    ) {
        if !(rx > 0.0 && ry > 0.0) {
            return;
        }
        let rgb = color.to_unit();
        let half = line_width.max(1.0) / 2.0;
        let extent = Point::new(rx + half + 1.0, ry + half + 1.0);
        self.shade(center - extent, center + extent, |p| {
            let d = p - center;
            let f = (d.x / rx).powi(2) + (d.y / ry).powi(2) - 1.0;
            let grad = Point::new(2.0 * d.x / (rx * rx), 2.0 * d.y / (ry * ry)).length();
            if grad <= f32::EPSILON {
                return None;
            }
            let distance = f.abs() / grad;
            let coverage = (half + 0.5 - distance).clamp(0.0, 1.0);
            (coverage > 0.0).then_some((rgb, alpha * coverage))
        });
    }

    fn draw_glyph(&mut self, pos: Point, ch: char, color: Rgb, alpha: f32) {
        if pos.x < 0.0 || pos.y < 0.0 {
            return;
        }
        let col = pos.x as usize;
        let row = pos.y as usize / 2;
        if col >= self.width || row >= self.height.div_ceil(2) {
            return;
        }
        self.glyphs[row * self.width + col] = Some(Glyph {
            ch,
            color,
            alpha: alpha.clamp(0.0, 1.0),
        });
    }
}

impl Widget for &PixelCanvas {
    /// Paint the canvas opaquely, two pixels per cell.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        for row in 0..area.height {
            for col in 0..area.width {
                let (x, y) = (col as usize, row as usize * 2);
                let Some(top) = self.pixel(x, y) else {
                    continue;
                };
                let bottom = self.pixel(x, y + 1).unwrap_or(top);
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                match self.glyph(x, row as usize) {
                    Some(glyph) => {
                        let bg = lerp3(top.over_black(), bottom.over_black(), 0.5);
                        let fg = lerp3(bg, glyph.color.to_unit(), glyph.alpha);
                        cell.set_char(glyph.ch)
                            .set_fg(unit_to_color(fg))
                            .set_bg(unit_to_color(bg));
                    }
                    None => {
                        cell.set_symbol(HALF_BLOCK)
                            .set_fg(unit_to_color(top.over_black()))
                            .set_bg(unit_to_color(bottom.over_black()));
                    }
                }
            }
        }
    }
}

/// Screen-blend `canvas` onto whatever `buf` already shows in `area`.
///
/// Transparent pixels leave the buffer untouched.
pub fn composite_screen(canvas: &PixelCanvas, buf: &mut Buffer, area: Rect, opacity: f32) {
    let area = area.intersection(buf.area);
    for row in 0..area.height {
        for col in 0..area.width {
            let (x, y) = (col as usize, row as usize * 2);
            let Some(top) = canvas.pixel(x, y) else {
                continue;
            };
            let bottom = canvas.pixel(x, y + 1).unwrap_or(top);
            if top.a <= 0.0 && bottom.a <= 0.0 {
                continue;
            }
            let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                continue;
            };
            let half_block = cell.symbol() == HALF_BLOCK;
            let bg = color_to_unit(cell.bg).unwrap_or([0.0; 3]);
            let (fg_src, bg_src) = if half_block {
                (top, bottom)
            } else {
                let mean = Rgba {
                    rgb: lerp3(top.rgb, bottom.rgb, 0.5),
                    a: (top.a + bottom.a) / 2.0,
                };
                (mean, mean)
            };
            cell.bg = unit_to_color(screen(bg, bg_src.rgb, bg_src.a * opacity));
            if let Some(fg) = color_to_unit(cell.fg) {
                cell.fg = unit_to_color(screen(fg, fg_src.rgb, fg_src.a * opacity));
            }
        }
    }
}

/// Copy the glyph overlay of `canvas` into `area`, keeping cell backgrounds.
pub fn blit_glyphs(canvas: &PixelCanvas, buf: &mut Buffer, area: Rect, opacity: f32) {
    let area = area.intersection(buf.area);
    for row in 0..area.height {
        for col in 0..area.width {
            let Some(glyph) = canvas.glyph(col as usize, row as usize) else {
                continue;
            };
            let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                continue;
            };
            let bg = color_to_unit(cell.bg).unwrap_or([0.0; 3]);
            let fg = lerp3(bg, glyph.color.to_unit(), glyph.alpha * opacity);
            cell.set_char(glyph.ch).set_fg(unit_to_color(fg));
        }
    }
}

#[cfg(test)]
mod tests {
    use orrery_core::palette;
    use ratatui::style::Color;

    use super::*;

    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = PixelCanvas::new(4, 3);
        assert_eq!((canvas.width(), canvas.height()), (4, 3));
        assert_eq!(canvas.pixel(3, 2), Some(Rgba::TRANSPARENT));
        assert_eq!(canvas.pixel(4, 0), None);
        assert_eq!(canvas.glyph(0, 1), None);
    }

    #[test]
    fn test_vertical_gradient_endpoints() {
        let mut canvas = PixelCanvas::new(2, 5);
        canvas.fill_vertical_gradient(Rgb::BLACK, Rgb::WHITE);
        assert_eq!(canvas.pixel(0, 0).map(|p| p.rgb), Some([0.0; 3]));
        assert_eq!(canvas.pixel(1, 4).map(|p| p.rgb), Some([1.0; 3]));
        assert_eq!(canvas.pixel(1, 4).map(|p| p.a), Some(1.0));
    }

    #[test]
    fn test_fill_circle_covers_center_not_corner() {
        let mut canvas = PixelCanvas::new(20, 20);
        canvas.fill_circle(Circle::new(Point::new(10.0, 10.0), 4.0), palette::RED, 1.0);
        assert_eq!(canvas.pixel(10, 10).map(|p| p.a), Some(1.0));
        assert_eq!(canvas.pixel(0, 0).map(|p| p.a), Some(0.0));
    }

    #[test]
    fn test_sub_pixel_circle_plots_one_pixel() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.fill_circle(Circle::new(Point::new(2.2, 1.7), 0.1), Rgb::WHITE, 0.5);
        assert_eq!(canvas.pixel(2, 1).map(|p| p.a), Some(0.5));
        let lit = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y).is_some_and(|p| p.a > 0.0))
            .count();
        assert_eq!(lit, 1);
    }

    #[test]
    fn test_focal_gradient_param() {
        let g = RadialGradient {
            focus: Point::new(-2.0, 0.0),
            center: Point::new(0.0, 0.0),
            radius: 10.0,
            inner: ColorStop::new(Rgb::WHITE, 1.0),
            outer: ColorStop::new(Rgb::BLACK, 0.0),
        };
        assert!(g.param_at(Point::new(-2.0, 0.0)) < 1e-4);
        assert!((g.param_at(Point::new(10.0, 0.0)) - 1.0).abs() < 1e-4);
        assert!((g.param_at(Point::new(-10.0, 0.0)) - 1.0).abs() < 1e-4);
        let concentric =
            RadialGradient::concentric(Point::default(), 4.0, g.inner, ColorStop::transparent());
        assert!((concentric.param_at(Point::new(0.0, 2.0)) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_stroke_ellipse_hits_outline_only() {
        let mut canvas = PixelCanvas::new(30, 30);
        canvas.stroke_ellipse(Point::new(15.0, 15.0), 10.0, 6.0, 1.0, Rgb::WHITE, 1.0);
        assert!(canvas.pixel(24, 14).is_some_and(|p| p.a > 0.0));
        assert_eq!(canvas.pixel(15, 15).map(|p| p.a), Some(0.0));
    }

    #[test]
    fn test_fade_drops_faint_glyphs() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.draw_glyph(Point::new(1.0, 3.0), 'A', palette::GRAY, 1.0);
        assert_eq!(canvas.glyph(1, 1).map(|g| g.ch), Some('A'));
        canvas.fade(Rgb::BLACK, 0.15);
        assert!(canvas.glyph(1, 1).is_some_and(|g| g.alpha < 1.0));
        for _ in 0..30 {
            canvas.fade(Rgb::BLACK, 0.15);
        }
        assert_eq!(canvas.glyph(1, 1), None);
    }

    #[test]
    fn test_render_uses_half_blocks() {
        let mut canvas = PixelCanvas::new(2, 2);
        canvas.fill_vertical_gradient(Rgb::WHITE, Rgb::BLACK);
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        (&canvas).render(area, &mut buf);
        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), HALF_BLOCK);
        assert_eq!(cell.fg, Color::Rgb(255, 255, 255));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_composite_screen_skips_transparent() {
        let mut canvas = PixelCanvas::new(2, 2);
        canvas.fill_circle(Circle::new(Point::new(0.5, 0.5), 0.2), Rgb::WHITE, 1.0);
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        buf[(0, 0)].set_bg(Color::Rgb(0, 0, 0));
        buf[(1, 0)].set_bg(Color::Rgb(10, 10, 10));
        composite_screen(&canvas, &mut buf, area, 1.0);
        assert_ne!(buf[(0, 0)].bg, Color::Rgb(0, 0, 0));
        assert_eq!(buf[(1, 0)].bg, Color::Rgb(10, 10, 10));
    }

    #[test]
    fn test_blit_glyphs_keeps_background() {
        let mut canvas = PixelCanvas::new(3, 2);
        canvas.draw_glyph(Point::new(2.0, 0.0), 'Z', palette::GRAY, 1.0);
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        buf[(2, 0)].set_bg(Color::Rgb(1, 2, 3));
        blit_glyphs(&canvas, &mut buf, area, 0.4);
        assert_eq!(buf[(2, 0)].symbol(), "Z");
        assert_eq!(buf[(2, 0)].bg, Color::Rgb(1, 2, 3));
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }
}
