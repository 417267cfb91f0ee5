//! FLIP morphs for shared elements
//!
//! First-Last-Invert-Play: the real source and target surfaces are hidden
//! for the whole morph (so the stack's own transition never double-renders
//! the shared content), a detached ghost clone is framed at the source rect,
//! and the ghost animates position, size, and corner radius to the target
//! rect. Completion or cancellation removes the ghosts and restores each
//! surface's recorded visibility.

use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::completion::Completion;
use crate::driver::{MotionGroup, MotionHandle, MotionId, MotionTarget};
use crate::easing::Easing;
use crate::registry::FlipPair;
use crate::surface::{MorphGhost, RenderSurface};

/// Ghost removal + visibility restoration, run exactly once whether the
/// morph finishes or is cancelled.
struct FlipCleanup {
    ghosts: Vec<Arc<dyn MorphGhost>>,
    restores: Vec<(Arc<dyn RenderSurface>, bool)>,
    done: AtomicBool,
}

impl FlipCleanup {
    fn run(&self) {
        if self.done.swap(true, Ordering::SeqCst) {
            return;
        }
        for ghost in &self.ghosts {
            ghost.remove();
        }
        for (surface, visible) in &self.restores {
            surface.set_visible(*visible);
        }
    }
}

/// A controllable handle over one running morph.
#[derive(Clone)]
pub struct FlipHandle {
    motion: MotionHandle,
    ids: SmallVec<[MotionId; 2]>,
    finished: Completion,
    cleanup: Arc<FlipCleanup>,
}

impl FlipHandle {
    /// Settles once every pair's animation completes; already settled for
    /// an empty pair list
    pub fn finished(&self) -> &Completion {
        &self.finished
    }

    /// Stop every pair's animation immediately, remove the ghosts, and
    /// restore original visibility
    pub fn cancel(&self) {
        for id in &self.ids {
            self.motion.cancel(*id);
        }
        self.cleanup.run();
        self.finished.settle_cancelled();
    }
}

/// Run a FLIP morph for the given pairs.
///
/// Pairs with degenerate geometry were already excluded by the registry;
/// this engine animates whatever it is given and never reports partial
/// failure.
pub fn run_flip(
    motion: &MotionHandle,
    pairs: &[FlipPair],
    duration_ms: f32,
    easing: Easing,
) -> FlipHandle {
    let mut ghosts: Vec<Arc<dyn MorphGhost>> = Vec::with_capacity(pairs.len());
    let mut restores: Vec<(Arc<dyn RenderSurface>, bool)> = Vec::new();

    // Hide originals before the first ghost frame is ever shown
    for pair in pairs {
        if let Some(source) = &pair.source_surface {
            restores.push((source.clone(), source.visible()));
            source.set_visible(false);
        }
        restores.push((pair.target_surface.clone(), pair.target_surface.visible()));
        pair.target_surface.set_visible(false);

        // Clone content from the visible source, or the target when the
        // outgoing instance is already unmounted
        let donor: &Arc<dyn RenderSurface> =
            pair.source_surface.as_ref().unwrap_or(&pair.target_surface);
        let ghost = donor.spawn_ghost();
        ghost.set_frame(pair.source_rect, pair.source_corner_radius);
        ghosts.push(ghost);
    }

    tracing::trace!(pairs = pairs.len(), duration_ms, "starting FLIP morph");

    let group = MotionGroup::new(pairs.len());
    let finished = group.completion().clone();
    let mut ids = SmallVec::new();
    let mut settle_now = pairs.is_empty();

    for (pair, ghost) in pairs.iter().zip(&ghosts) {
        let target = MotionTarget::Ghost {
            ghost: ghost.clone(),
            from: (pair.source_rect, pair.source_corner_radius),
            to: (pair.target_rect, pair.target_corner_radius),
        };
        match motion.register(target, duration_ms, easing, group.clone()) {
            Some(id) => ids.push(id),
            None => settle_now = group.complete_one() || settle_now,
        }
    }
    if settle_now {
        finished.settle_finished();
    }

    let cleanup = Arc::new(FlipCleanup {
        ghosts,
        restores,
        done: AtomicBool::new(false),
    });
    {
        // Natural completion performs the same cleanup as cancel
        let cleanup = cleanup.clone();
        finished.on_finished(move || cleanup.run());
    }

    FlipHandle {
        motion: motion.clone(),
        ids,
        finished,
        cleanup,
    }
}
