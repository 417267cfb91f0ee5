//! Motion driver
//!
//! Steps all active animations each frame. Handles register animations when
//! a transition or morph starts; the host calls [`MotionDriver::advance`]
//! (or the wall-clock convenience [`MotionDriver::tick`]) from its frame
//! scheduler.
//!
//! All state is instance-scoped (there is no global driver), so multiple
//! navigation stacks can animate independently in one process.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;

use crate::completion::Completion;
use crate::easing::Easing;
use crate::geometry::Rect;
use crate::presets::PropTrack;
use crate::surface::{MorphGhost, RenderSurface};

new_key_type! {
    /// Handle to a registered motion animation
    pub struct MotionId;
}

/// Playback direction of a single animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayDirection {
    Forward,
    Reverse,
}

/// What an animation drives each frame.
pub(crate) enum MotionTarget {
    /// Interpolates property tracks on a render surface
    Surface {
        surface: Arc<dyn RenderSurface>,
        tracks: Vec<PropTrack>,
    },
    /// Interpolates a morph ghost's frame between two rect/radius pairs
    Ghost {
        ghost: Arc<dyn MorphGhost>,
        from: (Rect, f32),
        to: (Rect, f32),
    },
}

impl MotionTarget {
    fn apply(&self, eased: f32) {
        match self {
            MotionTarget::Surface { surface, tracks } => {
                for track in tracks {
                    surface.set_visual(track.prop, track.value_at(eased));
                }
            }
            MotionTarget::Ghost { ghost, from, to } => {
                let rect = from.0.lerp(&to.0, eased);
                let radius = from.1 + (to.1 - from.1) * eased;
                ghost.set_frame(rect, radius);
            }
        }
    }

    /// Strip the transient properties this animation touched so the next
    /// transition starts from a clean surface.
    fn strip(&self) {
        if let MotionTarget::Surface { surface, tracks } = self {
            for track in tracks {
                surface.clear_visual(track.prop);
            }
        }
    }
}

/// Completion bookkeeping shared by the animations started together.
///
/// The group's signal settles when the last member finishes: the logical
/// AND of every started animation.
pub(crate) struct MotionGroup {
    remaining: Mutex<usize>,
    completion: Completion,
}

impl MotionGroup {
    pub(crate) fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            remaining: Mutex::new(count),
            completion: Completion::new(),
        })
    }

    pub(crate) fn completion(&self) -> &Completion {
        &self.completion
    }

    /// Record one member finishing. Returns true when this was the last.
    pub(crate) fn complete_one(&self) -> bool {
        let mut remaining = self.remaining.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
        }
        *remaining == 0
    }
}

struct MotionAnim {
    target: MotionTarget,
    duration_ms: f32,
    easing: Easing,
    elapsed_ms: f32,
    direction: PlayDirection,
    playing: bool,
    group: Arc<MotionGroup>,
}

impl MotionAnim {
    fn progress(&self) -> f32 {
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    fn apply_at_progress(&self, progress: f32) {
        self.target.apply(self.easing.apply(progress));
    }
}

struct DriverInner {
    animations: SlotMap<MotionId, MotionAnim>,
    last_frame: Instant,
}

/// The motion driver that steps all active animations.
///
/// Typically owned by the store (or the host's app context) and shared with
/// the transition engine, gestures, and morphs via [`MotionHandle`].
pub struct MotionDriver {
    inner: Arc<Mutex<DriverInner>>,
}

impl MotionDriver {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(DriverInner {
                animations: SlotMap::with_key(),
                last_frame: Instant::now(),
            })),
        }
    }

    /// Get a handle to this driver for passing to the engine and gestures
    pub fn handle(&self) -> MotionHandle {
        MotionHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Step every playing animation by `dt_ms`.
    ///
    /// Returns true while any animation is still active (needs another
    /// frame). Finished groups settle their completion signals after the
    /// internal lock is released, so completion callbacks are free to
    /// register new animations.
    pub fn advance(&self, dt_ms: f32) -> bool {
        let mut settle: Vec<Completion> = Vec::new();
        let still_active = {
            let mut inner = self.inner.lock().unwrap();
            let mut done: SmallVec<[MotionId; 4]> = SmallVec::new();

            for (id, anim) in inner.animations.iter_mut() {
                if !anim.playing {
                    continue;
                }
                match anim.direction {
                    PlayDirection::Forward => anim.elapsed_ms += dt_ms,
                    PlayDirection::Reverse => anim.elapsed_ms -= dt_ms,
                }

                let finished = match anim.direction {
                    PlayDirection::Forward => anim.elapsed_ms >= anim.duration_ms,
                    PlayDirection::Reverse => anim.elapsed_ms <= 0.0,
                };
                anim.elapsed_ms = anim.elapsed_ms.clamp(0.0, anim.duration_ms);
                anim.apply_at_progress(anim.progress());

                if finished {
                    done.push(id);
                }
            }

            for id in done {
                if let Some(anim) = inner.animations.remove(id) {
                    anim.target.strip();
                    if anim.group.complete_one() {
                        settle.push(anim.group.completion().clone());
                    }
                }
            }

            inner.animations.values().any(|a| a.playing)
        };

        for completion in settle {
            completion.settle_finished();
        }
        still_active
    }

    /// Advance by the wall-clock time since the previous call
    pub fn tick(&self) -> bool {
        let dt_ms = {
            let mut inner = self.inner.lock().unwrap();
            let now = Instant::now();
            let dt = (now - inner.last_frame).as_secs_f32() * 1000.0;
            inner.last_frame = now;
            dt
        };
        self.advance(dt_ms)
    }

    /// Check if any animation is currently playing
    pub fn has_active_animations(&self) -> bool {
        self.inner
            .lock()
            .unwrap()
            .animations
            .values()
            .any(|a| a.playing)
    }

    /// Number of registered animations (playing or paused)
    pub fn animation_count(&self) -> usize {
        self.inner.lock().unwrap().animations.len()
    }
}

impl Default for MotionDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the motion driver.
///
/// Won't keep the driver alive; every operation safely no-ops once the
/// driver is dropped.
#[derive(Clone)]
pub struct MotionHandle {
    inner: Weak<Mutex<DriverInner>>,
}

impl MotionHandle {
    /// Register an animation.
    ///
    /// Returns `None` without inserting anything when the driver is gone or
    /// the duration is degenerate; a degenerate animation jumps straight to
    /// its resting outcome (surfaces keep no transient properties, ghosts
    /// land on their final frame). Callers must treat `None` as an
    /// instantly-finished member of the group.
    pub(crate) fn register(
        &self,
        target: MotionTarget,
        duration_ms: f32,
        easing: Easing,
        group: Arc<MotionGroup>,
    ) -> Option<MotionId> {
        let Some(inner) = self.inner.upgrade() else {
            return None;
        };
        if duration_ms <= 0.0 {
            if let MotionTarget::Ghost { ghost, to, .. } = &target {
                ghost.set_frame(to.0, to.1);
            }
            return None;
        }

        let mut inner = inner.lock().unwrap();
        // Reset the frame clock so a wall-clock tick right after
        // registration doesn't see a huge first dt
        inner.last_frame = Instant::now();
        let anim = MotionAnim {
            target,
            duration_ms,
            easing,
            elapsed_ms: 0.0,
            direction: PlayDirection::Forward,
            playing: true,
            group,
        };
        anim.apply_at_progress(0.0);
        Some(inner.animations.insert(anim))
    }

    /// Pause and position an animation at `progress`, applying its values
    pub(crate) fn seek(&self, id: MotionId, progress: f32) {
        self.with_anim(id, |anim| {
            anim.playing = false;
            anim.elapsed_ms = progress.clamp(0.0, 1.0) * anim.duration_ms;
            anim.apply_at_progress(anim.progress());
        });
    }

    pub(crate) fn set_playing(&self, id: MotionId, playing: bool) {
        self.with_anim(id, |anim| anim.playing = playing);
    }

    /// Flip playback direction in place and resume
    pub(crate) fn reverse(&self, id: MotionId) {
        self.with_anim(id, |anim| {
            anim.direction = match anim.direction {
                PlayDirection::Forward => PlayDirection::Reverse,
                PlayDirection::Reverse => PlayDirection::Forward,
            };
            anim.playing = true;
        });
    }

    /// Remove an animation, stripping the properties it touched.
    ///
    /// Does not settle the animation's group; cancellation is signalled by
    /// the owning handle.
    pub(crate) fn cancel(&self, id: MotionId) {
        if let Some(inner) = self.inner.upgrade() {
            let removed = inner.lock().unwrap().animations.remove(id);
            if let Some(anim) = removed {
                anim.target.strip();
            }
        }
    }

    fn with_anim<R>(&self, id: MotionId, f: impl FnOnce(&mut MotionAnim) -> R) -> Option<R> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().animations.get_mut(id).map(f))
    }

    /// Check if the driver is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::VisualProp;
    use crate::testing::RecordingSurface;

    fn tracked(surface: &Arc<RecordingSurface>) -> MotionTarget {
        MotionTarget::Surface {
            surface: surface.clone() as Arc<dyn RenderSurface>,
            tracks: vec![PropTrack::new(VisualProp::TranslateX, 1.0, 0.0)],
        }
    }

    #[test]
    fn test_advance_steps_and_strips_on_finish() {
        let driver = MotionDriver::new();
        let handle = driver.handle();
        let surface = RecordingSurface::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let group = MotionGroup::new(1);

        let id = handle
            .register(tracked(&surface), 100.0, Easing::Linear, group.clone())
            .unwrap();

        assert!(driver.advance(50.0));
        assert_eq!(surface.value(VisualProp::TranslateX), Some(0.5));

        assert!(!driver.advance(50.0));
        // Finished: property stripped, group settled, animation gone
        assert_eq!(surface.value(VisualProp::TranslateX), None);
        assert!(group.completion().is_finished());
        handle.seek(id, 0.5); // stale id, safely ignored
        assert_eq!(driver.animation_count(), 0);
    }

    #[test]
    fn test_seek_pauses_and_applies() {
        let driver = MotionDriver::new();
        let handle = driver.handle();
        let surface = RecordingSurface::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let group = MotionGroup::new(1);

        let id = handle
            .register(tracked(&surface), 100.0, Easing::Linear, group.clone())
            .unwrap();
        handle.seek(id, 0.25);
        assert_eq!(surface.value(VisualProp::TranslateX), Some(0.75));

        // Paused animation does not advance
        driver.advance(1000.0);
        assert_eq!(surface.value(VisualProp::TranslateX), Some(0.75));
        assert!(group.completion().is_pending());
    }

    #[test]
    fn test_reverse_finishes_at_start() {
        let driver = MotionDriver::new();
        let handle = driver.handle();
        let surface = RecordingSurface::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let group = MotionGroup::new(1);

        let id = handle
            .register(tracked(&surface), 100.0, Easing::Linear, group.clone())
            .unwrap();
        handle.seek(id, 0.4);
        handle.reverse(id);

        driver.advance(40.0);
        assert_eq!(surface.value(VisualProp::TranslateX), None);
        assert!(group.completion().is_finished());
    }

    #[test]
    fn test_cancel_strips_without_settling() {
        let driver = MotionDriver::new();
        let handle = driver.handle();
        let surface = RecordingSurface::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let group = MotionGroup::new(1);

        let id = handle
            .register(tracked(&surface), 100.0, Easing::Linear, group.clone())
            .unwrap();
        driver.advance(30.0);
        handle.cancel(id);

        assert_eq!(surface.value(VisualProp::TranslateX), None);
        assert!(group.completion().is_pending());
        assert_eq!(driver.animation_count(), 0);
    }

    #[test]
    fn test_degenerate_duration_registers_nothing() {
        let driver = MotionDriver::new();
        let handle = driver.handle();
        let surface = RecordingSurface::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let group = MotionGroup::new(1);

        assert!(handle
            .register(tracked(&surface), 0.0, Easing::Linear, group)
            .is_none());
        assert_eq!(surface.value(VisualProp::TranslateX), None);
        assert_eq!(driver.animation_count(), 0);
    }

    #[test]
    fn test_dead_driver_handle_noops() {
        let handle = {
            let driver = MotionDriver::new();
            driver.handle()
        };
        assert!(!handle.is_alive());

        let surface = RecordingSurface::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let group = MotionGroup::new(1);
        assert!(handle
            .register(tracked(&surface), 100.0, Easing::Linear, group)
            .is_none());
    }

    #[test]
    fn test_group_settles_on_last_member() {
        let driver = MotionDriver::new();
        let handle = driver.handle();
        let a = RecordingSurface::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let b = RecordingSurface::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let group = MotionGroup::new(2);

        handle
            .register(tracked(&a), 50.0, Easing::Linear, group.clone())
            .unwrap();
        handle
            .register(tracked(&b), 100.0, Easing::Linear, group.clone())
            .unwrap();

        driver.advance(50.0);
        assert!(group.completion().is_pending(), "one of two still running");
        driver.advance(50.0);
        assert!(group.completion().is_finished());
    }
}
