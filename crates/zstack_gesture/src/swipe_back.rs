//! Interactive swipe-back gesture
//!
//! A small state machine layered on [`PointerTracker`]: a pointer-down near
//! the leading edge arms tracking, horizontal intent activates the gesture,
//! and from then on the finger directly scrubs a paused pop transition.
//! Release either commits (plays the transition to its end) or cancels
//! (reverses it back to the start); both paths report the outcome through
//! [`SwipeBackCallbacks::on_swipe_end`].
//!
//! The gesture never touches the stack itself. Screen lookup and stack
//! mutation are capabilities supplied by the caller.

use std::sync::Arc;

use zstack_motion::{
    run_transition, MotionHandle, RenderSurface, TransitionDirection, TransitionHandle,
    TransitionName, TransitionPreset,
};

use crate::pointer::PointerTracker;

/// Horizontal displacement required before the gesture commits to being a
/// swipe rather than a tap.
const ACTIVATION_DEAD_ZONE: f32 = 10.0;

/// Which pointer button an event carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// The primary button (left mouse button, touch contact)
    Primary,
    Secondary,
    Other(u16),
}

/// Tunable thresholds for the swipe-back gesture.
#[derive(Clone, Copy, Debug)]
pub struct SwipeBackConfig {
    /// Width of the leading-edge hit area, in pixels (default 20)
    pub edge_width: f32,
    /// Progress fraction past which a release commits the pop (default 0.35)
    pub threshold: f32,
    /// Horizontal velocity, in position units per millisecond, past which a
    /// release commits regardless of progress (default 0.5). Flat; does
    /// not scale with surface width.
    pub velocity_threshold: f32,
    /// Transition preset the gesture scrubs (default slide)
    pub transition: TransitionName,
}

impl Default for SwipeBackConfig {
    fn default() -> Self {
        Self {
            edge_width: 20.0,
            threshold: 0.35,
            velocity_threshold: 0.5,
            transition: TransitionName::Slide,
        }
    }
}

/// Capabilities the gesture borrows from its owner.
///
/// The gesture does not own the stack: it asks permission, resolves the two
/// affected surfaces, and reports how the interaction ended.
pub trait SwipeBackCallbacks: Send + Sync {
    /// Whether a swipe may begin right now (e.g. stack depth > 1 and no
    /// transition already running)
    fn can_swipe_back(&self) -> bool;

    /// The gesture became active and is about to scrub a pop transition
    fn on_swipe_start(&self);

    /// The interaction resolved; `completed` is true when the pop should be
    /// committed to the stack
    fn on_swipe_end(&self, completed: bool);

    /// The screen that will be revealed by the pop
    fn entering_surface(&self) -> Option<Arc<dyn RenderSurface>>;

    /// The screen being swiped away
    fn exiting_surface(&self) -> Option<Arc<dyn RenderSurface>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GesturePhase {
    /// No pointer captured
    Idle,
    /// Pointer down near the edge; intent not yet disambiguated
    Tracking,
    /// Horizontal intent confirmed; scrubbing the transition
    Active,
}

/// Edge-swipe recognizer that drives a pop transition interactively.
pub struct SwipeBackGesture {
    motion: MotionHandle,
    callbacks: Arc<dyn SwipeBackCallbacks>,
    config: SwipeBackConfig,
    tracker: PointerTracker,
    phase: GesturePhase,
    handle: Option<TransitionHandle>,
    surface_width: f32,
}

impl SwipeBackGesture {
    pub fn new(
        motion: MotionHandle,
        callbacks: Arc<dyn SwipeBackCallbacks>,
        config: SwipeBackConfig,
    ) -> Self {
        Self {
            motion,
            callbacks,
            config,
            tracker: PointerTracker::new(),
            phase: GesturePhase::Idle,
            handle: None,
            surface_width: 0.0,
        }
    }

    pub fn config(&self) -> &SwipeBackConfig {
        &self.config
    }

    /// Whether the gesture is currently scrubbing a transition
    pub fn is_active(&self) -> bool {
        self.phase == GesturePhase::Active
    }

    /// Feed a pointer-down event. Arms tracking when it lands in the edge
    /// hit area with the primary button and the caller permits a swipe.
    pub fn pointer_down(&mut self, x: f32, y: f32, button: PointerButton, now_ms: f64) {
        if self.phase != GesturePhase::Idle {
            return;
        }
        if !self.callbacks.can_swipe_back() {
            return;
        }
        if x > self.config.edge_width {
            return;
        }
        if button != PointerButton::Primary {
            return;
        }

        self.tracker.start(x, y, now_ms);
        self.phase = GesturePhase::Tracking;
    }

    /// Feed a pointer-move event.
    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: f64) {
        if self.phase == GesturePhase::Idle {
            return;
        }
        self.tracker.move_to(x, y, now_ms);

        if self.phase == GesturePhase::Tracking {
            let dx = self.tracker.delta_x();
            let dy = self.tracker.delta_y();

            if dx.abs() < ACTIVATION_DEAD_ZONE {
                return;
            }
            if dy.abs() > dx.abs() {
                // Vertical motion dominates: this is a scroll, not a swipe
                tracing::debug!("swipe-back cancelled: vertical intent");
                self.cleanup();
                return;
            }
            self.activate();
        }

        if let Some(handle) = &self.handle {
            let progress = if self.surface_width > 0.0 {
                (self.tracker.delta_x() / self.surface_width).clamp(0.0, 1.0)
            } else {
                0.0
            };
            handle.seek(progress);
        }
    }

    /// Feed a pointer-up event: resolve the gesture.
    pub fn pointer_up(&mut self) {
        if self.phase != GesturePhase::Active {
            // Never activated: tear down silently, no outcome to report
            self.cleanup();
            return;
        }

        let final_state = self.tracker.end();
        let progress = if self.surface_width > 0.0 {
            self.tracker.delta_x() / self.surface_width
        } else {
            0.0
        };
        // Either signal is sufficient: far enough, or flung fast enough
        let should_complete = progress > self.config.threshold
            || final_state.velocity_x > self.config.velocity_threshold;

        tracing::debug!(
            progress,
            velocity_x = final_state.velocity_x,
            completed = should_complete,
            "swipe-back released"
        );

        if let Some(handle) = self.handle.take() {
            let callbacks = self.callbacks.clone();
            if should_complete {
                handle.play();
                handle
                    .finished()
                    .on_finished(move || callbacks.on_swipe_end(true));
            } else {
                handle.reverse();
                handle
                    .finished()
                    .on_finished(move || callbacks.on_swipe_end(false));
            }
        }

        self.phase = GesturePhase::Idle;
        self.tracker.reset();
    }

    /// Feed a pointer-cancel event (capture lost, system gesture, etc.)
    pub fn pointer_cancel(&mut self) {
        self.pointer_up();
    }

    /// Tear down any in-flight interaction without reporting an outcome
    pub fn detach(&mut self) {
        self.cleanup();
    }

    fn activate(&mut self) {
        self.phase = GesturePhase::Active;
        self.callbacks.on_swipe_start();

        let entering = self.callbacks.entering_surface();
        let exiting = self.callbacks.exiting_surface();

        self.surface_width = exiting
            .as_ref()
            .map(|s| s.bounds().width())
            .filter(|w| *w > 0.0)
            .or_else(|| entering.as_ref().map(|s| s.bounds().width()))
            .unwrap_or(0.0);

        // Both sides are required for an interactive pop; with either one
        // missing the gesture still runs, it just has nothing to scrub
        if let (Some(entering), Some(exiting)) = (entering, exiting) {
            let preset = TransitionPreset::named(self.config.transition);
            let handle = run_transition(
                &self.motion,
                &preset,
                TransitionDirection::Pop,
                Some(entering),
                Some(exiting),
                None,
            );
            // Input drives progress, not wall-clock time
            handle.pause();
            self.handle = Some(handle);
        }
    }

    fn cleanup(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
        self.phase = GesturePhase::Idle;
        self.tracker.reset();
    }
}
