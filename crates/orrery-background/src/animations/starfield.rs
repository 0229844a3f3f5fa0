//! Twinkling stars for the scene backdrop.

use std::f32::consts::TAU;

use fastrand::Rng;
use orrery_core::Rgb;

use crate::canvas::{Circle, Painter, Point};

/// Phase advance per frame, scaled by each star's twinkle speed.
const TWINKLE_STEP: f32 = 0.002;
/// Opacity of the star fill color.
const STAR_FILL_ALPHA: f32 = 0.85;
/// Global alpha applied to the whole star layer.
const STAR_LAYER_ALPHA: f32 = 0.35;

/// One star in the backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub base_radius: f32,
    /// Twinkle phase in radians, kept in `0..2π`.
    pub phase: f32,
    pub twinkle_speed: f32,
}

impl Star {
    /// Brightness factor in `0.2..=1.0`.
    pub fn twinkle(&self) -> f32 {
        0.6 + self.phase.sin() * 0.4
    }
}

/// Scatter `count` stars uniformly over a `width × height` surface.
pub fn seed(rng: &mut Rng, count: usize, width: f32, height: f32, dpr: f32) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            x: rng.f32() * width,
            y: rng.f32() * height,
            base_radius: (rng.f32() * 1.4 + 0.4) * dpr,
            phase: rng.f32() * TAU,
            twinkle_speed: 0.2 + rng.f32() * 0.6,
        })
        .collect()
}

/// Advance every star's phase and paint it.
pub fn draw(stars: &mut [Star], painter: &mut dyn Painter, speed: f32) {
    for star in stars {
        star.phase = (star.phase + TWINKLE_STEP * star.twinkle_speed * speed) % TAU;
        let alpha = STAR_FILL_ALPHA * STAR_LAYER_ALPHA * star.twinkle();
        painter.fill_circle(
            Circle::new(Point::new(star.x, star.y), star.base_radius),
            Rgb::WHITE,
            alpha,
        );
    }
}
