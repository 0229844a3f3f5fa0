//! Background animation rendering for orrery.
//!
//! Three independent loops paint onto their own canvases: the scene
//! animator (starfield, orbit and planet drifting between section presets),
//! a cursor-following halo, and falling characters behind the navigation
//! bar. A [`Stage`] schedules them frame by frame and [`BackgroundState`]
//! bundles them for the terminal host.

mod animations;
mod canvas;
mod chars;
mod color;
mod schedule;
mod state;
mod viewport;

#[cfg(test)]
mod recording;

pub use animations::{
    Animator, CursorHalo, Listeners, NavRain, SceneAnimator, SceneParams, Star,
};
pub use canvas::{
    Circle, ColorStop, Glyph, PixelCanvas, Painter, Point, RadialGradient, Rgba, blit_glyphs,
    composite_screen,
};
pub use schedule::{FrameClock, FrameRequest, FrameScheduler, IntervalClock, LoopId, Stage};
pub use state::{BackgroundOptions, BackgroundState};
pub use viewport::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Viewport};
