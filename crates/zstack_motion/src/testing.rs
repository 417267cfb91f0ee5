//! Shared test doubles for the motion crate

use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::geometry::Rect;
use crate::surface::{ContainerFrames, MorphGhost, RenderSurface, VisualProp};

/// Records every frame a morph assigns to it.
pub(crate) struct RecordingGhost {
    frames: Mutex<Vec<(Rect, f32)>>,
    removed: AtomicBool,
}

impl RecordingGhost {
    pub(crate) fn last_frame(&self) -> Option<(Rect, f32)> {
        self.frames.lock().unwrap().last().copied()
    }

    pub(crate) fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }
}

impl MorphGhost for RecordingGhost {
    fn set_frame(&self, rect: Rect, corner_radius: f32) {
        self.frames.lock().unwrap().push((rect, corner_radius));
    }

    fn remove(&self) {
        self.removed.store(true, Ordering::SeqCst);
    }
}

/// A surface that records applied visuals and spawned ghosts.
pub(crate) struct RecordingSurface {
    bounds: Mutex<Rect>,
    corner_radius: f32,
    container_frames: Mutex<Option<ContainerFrames>>,
    values: Mutex<FxHashMap<VisualProp, f32>>,
    visible: Mutex<bool>,
    ghosts: Mutex<Vec<Arc<RecordingGhost>>>,
}

impl RecordingSurface {
    pub(crate) fn new(bounds: Rect) -> Arc<Self> {
        Self::with_radius(bounds, 0.0)
    }

    pub(crate) fn with_radius(bounds: Rect, corner_radius: f32) -> Arc<Self> {
        Arc::new(Self {
            bounds: Mutex::new(bounds),
            corner_radius,
            container_frames: Mutex::new(None),
            values: Mutex::new(FxHashMap::default()),
            visible: Mutex::new(true),
            ghosts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn value(&self, prop: VisualProp) -> Option<f32> {
        self.values.lock().unwrap().get(&prop).copied()
    }

    pub(crate) fn set_container_frames(&self, frames: ContainerFrames) {
        *self.container_frames.lock().unwrap() = Some(frames);
    }

    pub(crate) fn spawned_ghosts(&self) -> Vec<Arc<RecordingGhost>> {
        self.ghosts.lock().unwrap().clone()
    }
}

impl RenderSurface for RecordingSurface {
    fn bounds(&self) -> Rect {
        *self.bounds.lock().unwrap()
    }

    fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    fn visible(&self) -> bool {
        *self.visible.lock().unwrap()
    }

    fn set_visible(&self, visible: bool) {
        *self.visible.lock().unwrap() = visible;
    }

    fn set_visual(&self, prop: VisualProp, value: f32) {
        self.values.lock().unwrap().insert(prop, value);
    }

    fn clear_visual(&self, prop: VisualProp) {
        self.values.lock().unwrap().remove(&prop);
    }

    fn container_frames(&self) -> Option<ContainerFrames> {
        *self.container_frames.lock().unwrap()
    }

    fn spawn_ghost(&self) -> Arc<dyn MorphGhost> {
        let ghost = Arc::new(RecordingGhost {
            frames: Mutex::new(Vec::new()),
            removed: AtomicBool::new(false),
        });
        self.ghosts.lock().unwrap().push(ghost.clone());
        ghost
    }
}
