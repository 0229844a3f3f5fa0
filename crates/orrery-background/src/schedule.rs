//! Frame scheduling and loop lifecycle.
//!
//! Loops follow request-animation-frame semantics: each mounted loop holds
//! at most one pending frame request, runs once when that frame arrives and
//! then requests the next one. Unmounting cancels the pending request and
//! drops the loop's listeners along with its state.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use orrery_core::AnimationSpeed;

use crate::animations::{Animator, Listeners};
use crate::canvas::{Painter, PixelCanvas};
use crate::viewport::Viewport;

/// Identifier of a mounted loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoopId(u64);

/// Handle of a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequest(u64);

/// Pending "run before the next repaint" callbacks.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next: u64,
    pending: BTreeMap<FrameRequest, LoopId>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for `id` to run on the next frame.
    pub fn request(&mut self, id: LoopId) -> FrameRequest {
        self.next += 1;
        let request = FrameRequest(self.next);
        self.pending.insert(request, id);
        request
    }

    /// Withdraw a request. Returns whether it was still pending.
    pub fn cancel(&mut self, request: FrameRequest) -> bool {
        self.pending.remove(&request).is_some()
    }

    /// Drain every pending request, oldest first.
    pub fn take_due(&mut self) -> Vec<LoopId> {
        std::mem::take(&mut self.pending).into_values().collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Source of frame timing.
pub trait FrameClock {
    /// Whether a frame should run at `now`. Consumes the frame if so.
    fn frame_due(&mut self, now: Instant) -> bool;

    /// Time left until the next frame is due.
    fn until_next(&self, now: Instant) -> Duration;
}

/// Fixed-rate frame pacing from the monotonic clock.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    interval: Duration,
    next_frame: Option<Instant>,
}

impl IntervalClock {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            next_frame: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameClock for IntervalClock {
    fn frame_due(&mut self, now: Instant) -> bool {
        match self.next_frame {
            Some(deadline) if now < deadline => false,
            Some(deadline) => {
                // Skip frames we are too late for rather than bursting.
                let mut next = deadline + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_frame = Some(next);
                true
            }
            None => {
                self.next_frame = Some(now + self.interval);
                true
            }
        }
    }

    fn until_next(&self, now: Instant) -> Duration {
        self.next_frame
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or_default()
    }
}

/// A mounted loop and everything it owns.
struct MountedLoop {
    animator: Box<dyn Animator>,
    canvas: PixelCanvas,
    frame: Option<FrameRequest>,
    listeners: Listeners,
}

impl MountedLoop {
    fn resize(&mut self, viewport: Viewport) {
        self.animator.resize(viewport);
        let (width, height) = self.animator.surface_size(viewport);
        self.canvas = PixelCanvas::new(width, height);
    }
}

/// Owner of mounted animation loops.
#[derive(Default)]
pub struct Stage {
    loops: BTreeMap<LoopId, MountedLoop>,
    scheduler: FrameScheduler,
    next_id: u64,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.loops.values().map(|l| l.animator.name()).collect();
        f.debug_struct("Stage")
            .field("loops", &names)
            .field("pending", &self.scheduler.pending())
            .finish()
    }
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a loop: size it, register its listeners and request its first frame.
    pub fn mount(&mut self, animator: Box<dyn Animator>, viewport: Viewport) -> LoopId {
        self.next_id += 1;
        let id = LoopId(self.next_id);
        let listeners = animator.listeners();
        let mut mounted = MountedLoop {
            animator,
            canvas: PixelCanvas::default(),
            frame: None,
            listeners,
        };
        mounted.resize(viewport);
        mounted.frame = Some(self.scheduler.request(id));
        log::debug!("mounted {} loop as {id:?}", mounted.animator.name());
        self.loops.insert(id, mounted);
        id
    }

    /// Tear a loop down. Returns whether it was mounted.
    pub fn unmount(&mut self, id: LoopId) -> bool {
        let Some(mounted) = self.loops.remove(&id) else {
            return false;
        };
        if let Some(frame) = mounted.frame {
            self.scheduler.cancel(frame);
        }
        log::debug!("unmounted {} loop {id:?}", mounted.animator.name());
        true
    }

    /// Unmount every loop.
    pub fn clear(&mut self) {
        let ids: Vec<_> = self.loops.keys().copied().collect();
        for id in ids {
            self.unmount(id);
        }
    }

    /// Run one frame: every loop with a pending request ticks once.
    ///
    /// Returns how many loops ran.
    pub fn run_frame(&mut self) -> usize {
        let due = self.scheduler.take_due();
        let mut ran = 0;
        for id in due {
            let Some(mounted) = self.loops.get_mut(&id) else {
                continue;
            };
            mounted.frame = None;
            mounted.animator.tick(&mut mounted.canvas as &mut dyn Painter);
            mounted.frame = Some(self.scheduler.request(id));
            ran += 1;
        }
        ran
    }

    /// Deliver a resize to `id`, if it listens for resizes.
    pub fn resize(&mut self, id: LoopId, viewport: Viewport) {
        if let Some(mounted) = self.loops.get_mut(&id) {
            if mounted.listeners.resize {
                mounted.resize(viewport);
            }
        }
    }

    /// Deliver a pointer move to every listening loop.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        for mounted in self.loops.values_mut().filter(|l| l.listeners.pointer) {
            mounted.animator.on_pointer_move(x, y);
        }
    }

    /// Deliver a scene change to every listening loop.
    pub fn set_active_scene(&mut self, key: &str) {
        for mounted in self.loops.values_mut().filter(|l| l.listeners.scene) {
            mounted.animator.on_scene(key);
        }
    }

    /// Change the animation speed of every mounted loop.
    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        for mounted in self.loops.values_mut() {
            mounted.animator.on_speed(speed);
        }
    }

    pub fn canvas(&self, id: LoopId) -> Option<&PixelCanvas> {
        self.loops.get(&id).map(|l| &l.canvas)
    }

    pub fn is_mounted(&self, id: LoopId) -> bool {
        self.loops.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Frame requests still outstanding.
    pub fn pending_frames(&self) -> usize {
        self.scheduler.pending()
    }
}
