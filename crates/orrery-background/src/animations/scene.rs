//! Scene animator: starfield, orbit guide, particle ring and planet.
//!
//! Every frame the animated parameters ease toward the preset of the active
//! section. Switching sections only retargets; the current values carry over,
//! so transitions never jump.

use std::f32::consts::TAU;
use std::f64::consts::TAU as TAU_F64;

use fastrand::Rng;
use orrery_core::{AnimationSpeed, Rgb, ScenePreset, SceneRegistry, palette};

use super::starfield::{self, Star};
use super::{Animator, Listeners};
use crate::canvas::{Circle, ColorStop, Painter, Point, RadialGradient};
use crate::color::{ease, mix};
use crate::viewport::Viewport;

/// Easing factor for planet and orbit radii.
const RADIUS_EASE: f32 = 0.02;
/// Easing factor for angular speed.
const SPEED_EASE: f32 = 0.05;
/// Weight of the previous color in each per-frame blend.
const COLOR_MIX: f32 = 0.3;
/// Orbit phase advance per frame before angular speed is applied.
const PHASE_STEP: f64 = 0.002;
/// Vertical squash of the orbit ellipse.
const ORBIT_SQUASH: f32 = 0.66;
/// Orbit center as a fraction of the surface size.
const ANCHOR: (f32, f32) = (0.7, 0.25);
const ORBIT_ALPHA: f32 = 0.06;

const RING_PARTICLES: usize = 40;
/// Ring radius relative to the planet radius.
const RING_SPREAD: f32 = 1.6;
/// Vertical squash of the particle ring.
const RING_SQUASH: f32 = 0.6;
/// Ring drift relative to the orbit phase.
const RING_DRIFT: f64 = 0.5;
const RING_JITTER: f32 = 2.0;
const PARTICLE_RADIUS: f32 = 2.5;
const PARTICLE_GLOW: f32 = 6.0;

/// Offset of the planet highlight, relative to its radius.
const HIGHLIGHT_OFFSET: f32 = 0.4;
/// Extent of the planet shading, relative to its radius.
const SHADE_EXTENT: f32 = 1.4;
const HIGHLIGHT_ALPHA: f32 = 0.8;

/// Stars seeded when none is configured.
pub const DEFAULT_STAR_COUNT: usize = 140;

/// Interpolated copy of a preset's animated fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParams {
    pub planet_radius: f32,
    pub orbit_radius: f32,
    pub angular_speed: f32,
    pub body_color: Rgb,
    pub ring_color: Rgb,
}

impl From<&ScenePreset> for SceneParams {
    fn from(p: &ScenePreset) -> Self {
        Self {
            planet_radius: p.planet_radius,
            orbit_radius: p.orbit_radius,
            angular_speed: p.angular_speed,
            body_color: p.body_color,
            ring_color: p.ring_color,
        }
    }
}

impl SceneParams {
    /// Move one frame closer to `target`.
    fn step_toward(&mut self, target: &ScenePreset) {
        self.planet_radius = ease(self.planet_radius, target.planet_radius, RADIUS_EASE);
        self.orbit_radius = ease(self.orbit_radius, target.orbit_radius, RADIUS_EASE);
        self.angular_speed = ease(self.angular_speed, target.angular_speed, SPEED_EASE);
        self.body_color = mix(target.body_color, self.body_color, COLOR_MIX);
        self.ring_color = mix(target.ring_color, self.ring_color, COLOR_MIX);
    }

    /// Largest absolute difference from `target` over the numeric fields.
    pub fn distance_to(&self, target: &ScenePreset) -> f32 {
        (self.planet_radius - target.planet_radius)
            .abs()
            .max((self.orbit_radius - target.orbit_radius).abs())
            .max((self.angular_speed - target.angular_speed).abs())
    }
}

/// The animated background scene.
#[derive(Debug)]
pub struct SceneAnimator {
    registry: SceneRegistry,
    current: SceneParams,
    target: ScenePreset,
    /// Unwrapped orbit phase. Kept in `f64` so the per-frame step never
    /// rounds away, however long the scene runs.
    phase_angle: f64,
    stars: Vec<Star>,
    star_count: usize,
    width: f32,
    height: f32,
    dpr: f32,
    speed: AnimationSpeed,
    rng: Rng,
}

impl SceneAnimator {
    /// Create an animator resting on the registry's default preset.
    pub fn new(registry: SceneRegistry, rng: Rng) -> Self {
        let target = *registry.default_preset();
        Self {
            registry,
            current: SceneParams::from(&target),
            target,
            phase_angle: 0.0,
            stars: Vec::new(),
            star_count: DEFAULT_STAR_COUNT,
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
            speed: AnimationSpeed::Medium,
            rng,
        }
    }

    pub fn with_star_count(mut self, count: usize) -> Self {
        self.star_count = count;
        self
    }

    pub fn with_speed(mut self, speed: AnimationSpeed) -> Self {
        self.speed = speed;
        self
    }

    /// Start from `key`'s preset instead of the default, without easing.
    pub fn starting_at(mut self, key: &str) -> Self {
        self.target = *self.registry.resolve(key);
        self.current = SceneParams::from(&self.target);
        self
    }

    /// Retarget the interpolation. Unknown keys select the default preset.
    pub fn set_active_scene(&mut self, key: &str) {
        let preset = *self.registry.resolve(key);
        if preset.key != key {
            log::debug!("unknown scene {key:?}, falling back to {:?}", preset.key);
        } else if preset.key != self.target.key {
            log::debug!("scene {:?} -> {:?}", self.target.key, preset.key);
        }
        self.target = preset;
    }

    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.speed = speed;
    }

    pub fn current(&self) -> &SceneParams {
        &self.current
    }

    pub fn target(&self) -> &ScenePreset {
        &self.target
    }

    /// Raw, unwrapped orbit phase.
    pub fn phase_angle(&self) -> f64 {
        self.phase_angle
    }

    /// Orbit phase reduced to `0..2π`.
    fn theta(&self) -> f32 {
        (self.phase_angle % TAU_F64) as f32
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Center of the orbit ellipse.
    pub fn anchor(&self) -> Point {
        Point::new(self.width * ANCHOR.0, self.height * ANCHOR.1)
    }

    /// Where the planet sits on its orbit this frame.
    pub fn planet_position(&self) -> Point {
        let orbit = self.current.orbit_radius * self.dpr;
        let theta = self.theta();
        self.anchor() + Point::new(theta.cos() * orbit, theta.sin() * orbit * ORBIT_SQUASH)
    }

    /// Ease the parameters and advance the phase without painting.
    fn step(&mut self) {
        self.current.step_toward(&self.target);
        let rate = self.current.angular_speed * self.speed.multiplier();
        self.phase_angle += PHASE_STEP * f64::from(rate);
    }

    fn draw_orbit(&self, painter: &mut dyn Painter) {
        let orbit = self.current.orbit_radius * self.dpr;
        painter.stroke_ellipse(
            self.anchor(),
            orbit,
            orbit * ORBIT_SQUASH,
            self.dpr,
            Rgb::WHITE,
            ORBIT_ALPHA,
        );
    }

    fn draw_ring(&self, painter: &mut dyn Painter, planet: Point) {
        let theta = self.theta();
        // The drift runs at half the orbit rate, so wrap it on its own.
        let drift = ((self.phase_angle * RING_DRIFT) % TAU_F64) as f32;
        let planet_radius = self.current.planet_radius * self.dpr;
        for i in 0..RING_PARTICLES {
            let angle = i as f32 / RING_PARTICLES as f32 * TAU + drift;
            let jitter = (i as f32 + theta).sin() * RING_JITTER * self.dpr;
            let radius = planet_radius * RING_SPREAD + jitter;
            let center =
                planet + Point::new(angle.cos() * radius, angle.sin() * radius * RING_SQUASH);
            let glow = RadialGradient::concentric(
                center,
                PARTICLE_GLOW * self.dpr,
                ColorStop::new(self.current.ring_color, 1.0),
                ColorStop::transparent(),
            );
            painter.fill_radial_gradient(&glow, Circle::new(center, PARTICLE_RADIUS * self.dpr));
        }
    }

    fn draw_planet(&self, painter: &mut dyn Painter, planet: Point) {
        let radius = self.current.planet_radius * self.dpr;
        let shading = RadialGradient {
            focus: planet - Point::new(radius * HIGHLIGHT_OFFSET, radius * HIGHLIGHT_OFFSET),
            center: planet,
            radius: radius * SHADE_EXTENT,
            inner: ColorStop::new(Rgb::WHITE, HIGHLIGHT_ALPHA),
            outer: ColorStop::new(self.current.body_color, 1.0),
        };
        painter.fill_radial_gradient(&shading, Circle::new(planet, radius));
    }
}

impl Animator for SceneAnimator {
    fn name(&self) -> &'static str {
        "scene"
    }

    fn listeners(&self) -> Listeners {
        Listeners::RESIZE.with_scene()
    }

    fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.canvas_size();
        self.width = width as f32;
        self.height = height as f32;
        self.dpr = viewport.dpr();
        if self.stars.is_empty() && width > 0 && height > 0 {
            self.stars = starfield::seed(
                &mut self.rng,
                self.star_count,
                self.width,
                self.height,
                self.dpr,
            );
            log::debug!("seeded {} stars over {width}x{height}", self.stars.len());
        }
    }

    fn tick(&mut self, painter: &mut dyn Painter) {
        painter.clear();
        painter.fill_vertical_gradient(palette::JET, palette::COAL);
        starfield::draw(&mut self.stars, painter, self.speed.multiplier());

        self.step();
        self.draw_orbit(painter);
        let planet = self.planet_position();
        self.draw_ring(painter, planet);
        self.draw_planet(painter, planet);
    }

    fn on_scene(&mut self, key: &str) {
        self.set_active_scene(key);
    }

    fn on_speed(&mut self, speed: AnimationSpeed) {
        self.set_speed(speed);
    }
}
