//! Transition engine
//!
//! Turns a preset and a pair of optional surfaces into a controllable
//! transition: play, pause, seek, reverse, cancel. The engine starts at most
//! one animation per supplied surface and exposes a single [`Completion`]
//! that settles when the last of them finishes.
//!
//! Absent surfaces are not errors: a transition with zero animated sides
//! finishes immediately and the caller advances the stack as if the
//! (instant) transition had completed.

use smallvec::SmallVec;
use std::sync::Arc;

use crate::completion::Completion;
use crate::driver::{MotionGroup, MotionHandle, MotionId, MotionTarget};
use crate::presets::{PropTrack, TransitionKeyframes, TransitionPreset};
use crate::surface::RenderSurface;

/// Selects which keyframe table of a preset drives a run.
///
/// Pop plays the preset's reverse table: popping literally reverses the
/// animation the screen was pushed with, which is why the stack threads the
/// pushing transition's name through to pop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionDirection {
    /// Push and replace
    Push,
    /// Pop
    Pop,
}

/// A controllable handle over one running transition.
#[derive(Clone)]
pub struct TransitionHandle {
    motion: MotionHandle,
    ids: SmallVec<[MotionId; 2]>,
    finished: Completion,
    duration_ms: f32,
}

impl TransitionHandle {
    /// Settles once every started animation reaches its end.
    ///
    /// Already settled for transitions that started zero animations.
    pub fn finished(&self) -> &Completion {
        &self.finished
    }

    /// The effective duration this transition runs at
    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    /// Pause and position all animations at `progress` (clamped to 0..=1),
    /// for gesture-driven scrubbing
    pub fn seek(&self, progress: f32) {
        for id in &self.ids {
            self.motion.seek(*id, progress);
        }
    }

    pub fn pause(&self) {
        for id in &self.ids {
            self.motion.set_playing(*id, false);
        }
    }

    pub fn play(&self) {
        for id in &self.ids {
            self.motion.set_playing(*id, true);
        }
    }

    /// Flip playback direction in place and resume.
    ///
    /// A reversed transition finishes (settling [`finished`](Self::finished))
    /// when it reaches its start.
    pub fn reverse(&self) {
        for id in &self.ids {
            self.motion.reverse(*id);
        }
    }

    /// Stop immediately, strip every transient property the animations
    /// touched, and mark the completion cancelled. Finish callbacks never
    /// fire.
    pub fn cancel(&self) {
        for id in &self.ids {
            self.motion.cancel(*id);
        }
        self.finished.settle_cancelled();
    }
}

/// Start a transition on the given surfaces.
///
/// One animation per supplied surface, skipping sides whose keyframe table
/// is empty. `duration_override_ms` replaces the preset duration (gestures
/// and stores use this to retime a preset without redefining it).
pub fn run_transition(
    motion: &MotionHandle,
    preset: &TransitionPreset,
    direction: TransitionDirection,
    entering: Option<Arc<dyn RenderSurface>>,
    exiting: Option<Arc<dyn RenderSurface>>,
    duration_override_ms: Option<f32>,
) -> TransitionHandle {
    let keyframes: &TransitionKeyframes = match direction {
        TransitionDirection::Push => &preset.keyframes,
        TransitionDirection::Pop => &preset.reverse_keyframes,
    };
    let duration_ms = duration_override_ms.unwrap_or(preset.duration_ms);

    let mut planned: SmallVec<[(Arc<dyn RenderSurface>, Vec<PropTrack>); 2]> = SmallVec::new();
    if let Some(surface) = entering {
        if !keyframes.entering.is_empty() {
            planned.push((surface, keyframes.entering.clone()));
        }
    }
    if let Some(surface) = exiting {
        if !keyframes.exiting_behind.is_empty() {
            planned.push((surface, keyframes.exiting_behind.clone()));
        }
    }

    tracing::trace!(
        name = %preset.name,
        ?direction,
        sides = planned.len(),
        duration_ms,
        "starting transition"
    );

    let group = MotionGroup::new(planned.len());
    let finished = group.completion().clone();
    let mut ids = SmallVec::new();
    let mut settle_now = planned.is_empty();

    for (surface, tracks) in planned {
        let target = MotionTarget::Surface { surface, tracks };
        match motion.register(target, duration_ms, preset.easing, group.clone()) {
            Some(id) => ids.push(id),
            // Degenerate or driverless: counts as instantly finished
            None => settle_now = group.complete_one() || settle_now,
        }
    }
    if settle_now {
        finished.settle_finished();
    }

    TransitionHandle {
        motion: motion.clone(),
        ids,
        finished,
        duration_ms,
    }
}
