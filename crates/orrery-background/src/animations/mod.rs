//! The animation loops and the trait the [`Stage`](crate::Stage) drives them through.

mod halo;
mod rain;
mod scene;
mod starfield;

pub use halo::CursorHalo;
pub use rain::NavRain;
pub use scene::{SceneAnimator, SceneParams};
pub use starfield::Star;

use orrery_core::AnimationSpeed;

use crate::canvas::Painter;
use crate::viewport::Viewport;

/// Host events an animator wants delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Listeners {
    pub resize: bool,
    pub pointer: bool,
    pub scene: bool,
}

impl Listeners {
    pub const RESIZE: Listeners = Listeners {
        resize: true,
        pointer: false,
        scene: false,
    };

    pub const fn with_pointer(self) -> Self {
        Self {
            pointer: true,
            ..self
        }
    }

    pub const fn with_scene(self) -> Self {
        Self {
            scene: true,
            ..self
        }
    }
}

/// A per-frame rendering loop.
pub trait Animator {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Events this loop listens to while mounted.
    fn listeners(&self) -> Listeners {
        Listeners::RESIZE
    }

    /// Adopt new viewport dimensions.
    fn resize(&mut self, viewport: Viewport);

    /// Size of the canvas this loop paints for `viewport`, in device pixels.
    fn surface_size(&self, viewport: Viewport) -> (usize, usize) {
        viewport.canvas_size()
    }

    /// Advance one frame and paint it.
    fn tick(&mut self, painter: &mut dyn Painter);

    /// Pointer moved to (`x`, `y`) in logical pixels.
    fn on_pointer_move(&mut self, _x: f32, _y: f32) {}

    /// The active content section changed.
    fn on_scene(&mut self, _key: &str) {}

    /// The global animation speed changed. Delivered to every loop.
    fn on_speed(&mut self, _speed: AnimationSpeed) {}
}
