//! Background animation state management.

use std::time::{Duration, Instant};

use fastrand::Rng;
use orrery_core::{AnimationSpeed, SceneRegistry};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::animations::{CursorHalo, NavRain, SceneAnimator};
use crate::canvas::{blit_glyphs, composite_screen};
use crate::schedule::{FrameClock, IntervalClock, LoopId, Stage};
use crate::viewport::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Viewport};

/// Opacity of the halo layer.
const HALO_OPACITY: f32 = 0.7;
/// Opacity of the rain layer.
const RAIN_OPACITY: f32 = 0.4;

/// How the background layers are set up.
#[derive(Debug, Clone)]
pub struct BackgroundOptions {
    pub registry: SceneRegistry,
    /// Scene shown before any section becomes active.
    pub initial_scene: String,
    pub speed: AnimationSpeed,
    pub star_count: usize,
    pub fps: u32,
    pub halo: bool,
    pub rain: bool,
    /// Fixed seed for reproducible stars and rain.
    pub seed: Option<u64>,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            registry: SceneRegistry::builtin(),
            initial_scene: "hero".to_string(),
            speed: AnimationSpeed::Medium,
            star_count: 140,
            fps: 60,
            halo: true,
            rain: true,
            seed: None,
        }
    }
}

/// The mounted background loops and their frame clock.
#[derive(Debug)]
pub struct BackgroundState {
    stage: Stage,
    clock: IntervalClock,
    scene: LoopId,
    halo: Option<LoopId>,
    rain: Option<LoopId>,
    /// Terminal area covered by the scene and the halo.
    area: Rect,
    active_scene: String,
    speed: AnimationSpeed,
}

impl BackgroundState {
    /// Mount the enabled loops over `area`, with the rain confined to `nav_area`.
    pub fn new(options: BackgroundOptions, area: Rect, nav_area: Rect) -> Self {
        let mut rng = options.seed.map_or_else(Rng::new, Rng::with_seed);
        let viewport = Viewport::for_cells(area.width, area.height);
        let mut stage = Stage::new();

        let scene = SceneAnimator::new(options.registry, rng.fork())
            .with_star_count(options.star_count)
            .with_speed(options.speed)
            .starting_at(&options.initial_scene);
        let scene = stage.mount(Box::new(scene), viewport);

        let rain = options.rain.then(|| {
            let nav_viewport = Viewport::for_cells(nav_area.width, nav_area.height);
            stage.mount(Box::new(NavRain::new(rng.fork())), nav_viewport)
        });
        let halo = options
            .halo
            .then(|| stage.mount(Box::new(CursorHalo::new()), viewport));

        log::info!(
            "background mounted: {} loops at {} fps over {}x{}",
            stage.len(),
            options.fps,
            area.width,
            area.height
        );

        Self {
            stage,
            clock: IntervalClock::new(options.fps),
            scene,
            halo,
            rain,
            area,
            active_scene: options.initial_scene,
            speed: options.speed,
        }
    }

    /// Switch the scene the backdrop drifts toward.
    pub fn set_active_scene(&mut self, key: &str) {
        self.active_scene = key.to_string();
        self.stage.set_active_scene(key);
    }

    pub fn active_scene(&self) -> &str {
        &self.active_scene
    }

    /// Change how fast the orbit and stars move.
    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        log::debug!("animation speed {} -> {}", self.speed.name(), speed.name());
        self.speed = speed;
        self.stage.set_speed(speed);
    }

    pub fn speed(&self) -> AnimationSpeed {
        self.speed
    }

    /// Propagate new terminal dimensions to every loop.
    pub fn resize(&mut self, area: Rect, nav_area: Rect) {
        log::debug!("resize to {}x{}", area.width, area.height);
        self.area = area;
        let viewport = Viewport::for_cells(area.width, area.height);
        self.stage.resize(self.scene, viewport);
        if let Some(halo) = self.halo {
            self.stage.resize(halo, viewport);
        }
        if let Some(rain) = self.rain {
            self.stage
                .resize(rain, Viewport::for_cells(nav_area.width, nav_area.height));
        }
    }

    /// The pointer moved over terminal cell (`col`, `row`).
    pub fn pointer_move(&mut self, col: u16, row: u16) {
        let x = (col.saturating_sub(self.area.x) as f32 + 0.5) * CELL_WIDTH_PX;
        let y = (row.saturating_sub(self.area.y) as f32 + 0.5) * CELL_HEIGHT_PX;
        self.stage.pointer_move(x, y);
    }

    /// Run a frame if one is due at `now`. Returns whether one ran.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.clock.frame_due(now) {
            self.stage.run_frame();
            true
        } else {
            false
        }
    }

    /// Time until the next frame is due.
    pub fn until_next_frame(&self, now: Instant) -> Duration {
        self.clock.until_next(now)
    }

    /// Paint the scene layer.
    pub fn render_background(&self, buf: &mut Buffer, area: Rect) {
        if let Some(canvas) = self.stage.canvas(self.scene) {
            canvas.render(area, buf);
        }
    }

    /// Paint the rain glyphs into the navigation bar.
    pub fn render_rain(&self, buf: &mut Buffer, nav_area: Rect) {
        if let Some(canvas) = self.rain.and_then(|id| self.stage.canvas(id)) {
            blit_glyphs(canvas, buf, nav_area, RAIN_OPACITY);
        }
    }

    /// Screen-blend the halo over everything already drawn.
    pub fn render_halo(&self, buf: &mut Buffer, area: Rect) {
        if let Some(canvas) = self.halo.and_then(|id| self.stage.canvas(id)) {
            composite_screen(canvas, buf, area, HALO_OPACITY);
        }
    }

    /// Number of loops still mounted.
    pub fn loop_count(&self) -> usize {
        self.stage.len()
    }

    /// Frame requests still outstanding.
    pub fn pending_frames(&self) -> usize {
        self.stage.pending_frames()
    }

    /// Unmount every loop, cancelling their frames and listeners.
    pub fn teardown(&mut self) {
        if !self.stage.is_empty() {
            log::debug!("tearing down {} background loops", self.stage.len());
            self.stage.clear();
        }
        self.halo = None;
        self.rain = None;
    }
}

impl Drop for BackgroundState {
    fn drop(&mut self) {
        self.teardown();
    }
}
