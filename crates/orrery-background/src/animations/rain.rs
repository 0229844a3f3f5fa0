//! Falling characters behind the navigation bar.

use fastrand::Rng;
use orrery_core::{Rgb, palette};

use super::Animator;
use crate::canvas::{Painter, Point};
use crate::chars::RAIN_CHARS;
use crate::viewport::Viewport;

/// Column pitch in logical pixels.
const COLUMN_WIDTH: f32 = 12.0;
/// Row pitch in logical pixels.
const ROW_HEIGHT: f32 = 18.0;
/// The strip is never shorter than this, in logical pixels.
pub const MIN_STRIP_HEIGHT: f32 = 54.0;
/// Per-frame chance that a column past the bottom restarts at the top.
const RESET_CHANCE: f32 = 0.025;
/// Black wash applied each frame, leaving fading trails.
const TRAIL_FADE: f32 = 0.15;

/// One drop row per column, each falling one row per frame.
#[derive(Debug)]
pub struct NavRain {
    rows: Vec<u32>,
    height: f32,
    dpr: f32,
    rng: Rng,
}

impl NavRain {
    pub fn new(rng: Rng) -> Self {
        Self {
            rows: Vec::new(),
            height: 0.0,
            dpr: 1.0,
            rng,
        }
    }

    /// Current drop row of each column.
    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    /// Strip height in device pixels.
    pub fn strip_height(&self) -> f32 {
        self.height
    }
}

impl Animator for NavRain {
    fn name(&self) -> &'static str {
        "rain"
    }

    fn resize(&mut self, viewport: Viewport) {
        let viewport = viewport.with_min_height(MIN_STRIP_HEIGHT);
        let (width, height) = viewport.canvas_size();
        self.dpr = viewport.dpr();
        self.height = height as f32;
        let columns = (width as f32 / (COLUMN_WIDTH * self.dpr)).floor() as usize;
        self.rows = vec![0; columns];
    }

    fn surface_size(&self, viewport: Viewport) -> (usize, usize) {
        viewport.with_min_height(MIN_STRIP_HEIGHT).canvas_size()
    }

    fn tick(&mut self, painter: &mut dyn Painter) {
        painter.fade(Rgb::BLACK, TRAIL_FADE);
        for (i, row) in self.rows.iter_mut().enumerate() {
            let ch = RAIN_CHARS[self.rng.usize(..RAIN_CHARS.len())];
            let x = i as f32 * COLUMN_WIDTH * self.dpr;
            let y = *row as f32 * ROW_HEIGHT * self.dpr;
            painter.draw_glyph(Point::new(x, y), ch, palette::GRAY, 1.0);
            if y > self.height && self.rng.f32() < RESET_CHANCE {
                *row = 0;
            }
            *row += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawOp, RecordingPainter};

    fn rain(seed: u64) -> NavRain {
        let mut rain = NavRain::new(Rng::with_seed(seed));
        rain.resize(Viewport::new(240.0, 40.0, 1.0));
        rain
    }

    #[test]
    fn test_resize_sets_columns_and_min_height() {
        let rain = rain(1);
        assert_eq!(rain.rows().len(), 20);
        assert_eq!(rain.strip_height(), MIN_STRIP_HEIGHT);
        assert!(rain.rows().iter().all(|&r| r == 0));
    }

    #[test]
    fn test_each_column_draws_one_glyph() {
        let mut rain = rain(2);
        let mut painter = RecordingPainter::default();
        rain.tick(&mut painter);
        let ops = painter.take();
        assert!(matches!(ops[0], DrawOp::Fade { alpha, .. } if alpha == TRAIL_FADE));
        let glyphs: Vec<_> = ops[1..]
            .iter()
            .map(|op| match op {
                DrawOp::Glyph { pos, ch, color } => (*pos, *ch, *color),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(glyphs.len(), 20);
        for (i, (pos, ch, color)) in glyphs.into_iter().enumerate() {
            assert_eq!(pos, Point::new(i as f32 * COLUMN_WIDTH, 0.0));
            assert!(RAIN_CHARS.contains(&ch));
            assert_eq!(color, palette::GRAY);
        }
        assert!(rain.rows().iter().all(|&r| r == 1));
    }

    #[test]
    fn test_no_reset_before_bottom() {
        let mut rain = rain(3);
        let mut painter = RecordingPainter::default();
        // Row 3 is at y = 54, not yet past the strip.
        for _ in 0..4 {
            rain.tick(&mut painter);
        }
        assert!(rain.rows().iter().all(|&r| r == 4));
    }

    #[test]
    fn test_columns_desynchronize() {
        let mut rain = rain(4);
        let mut painter = RecordingPainter::default();
        for _ in 0..1000 {
            rain.tick(&mut painter);
            painter.ops.clear();
        }
        let rows = rain.rows();
        assert!(rows.iter().any(|&r| r != rows[0]));
        // Every column has restarted at least once.
        assert!(rows.iter().all(|&r| r < 1000));
    }

    #[test]
    fn test_resize_restarts_drops() {
        let mut rain = rain(5);
        let mut painter = RecordingPainter::default();
        rain.tick(&mut painter);
        rain.resize(Viewport::new(120.0, 80.0, 1.0));
        assert_eq!(rain.rows(), &[0; 10]);
        assert_eq!(rain.strip_height(), 80.0);
    }
}
