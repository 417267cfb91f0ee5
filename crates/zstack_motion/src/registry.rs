//! Shared-element registry
//!
//! Tracks which surfaces participate in shared-element morphs, keyed by a
//! caller-chosen string. Multiple activities may register the same key;
//! the morph animates between the outgoing screen's instance and the
//! entering screen's instance.
//!
//! Usage per navigation action: call [`capture_snapshots`] *before*
//! dispatching the event that changes the stack (captured geometry is
//! meaningless once the old screen starts leaving), then
//! [`resolve_pairs`] once the entering activity has mounted. A resolve that
//! pairs nothing keeps the snapshots for one more attempt after layout
//! settles; an abandoned cycle must clear them explicitly via
//! [`clear_snapshots`].
//!
//! [`capture_snapshots`]: SharedElementRegistry::capture_snapshots
//! [`resolve_pairs`]: SharedElementRegistry::resolve_pairs
//! [`clear_snapshots`]: SharedElementRegistry::clear_snapshots

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::geometry::Rect;
use crate::surface::RenderSurface;

/// Geometry and style captured for one key before a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    pub rect: Rect,
    pub corner_radius: f32,
}

/// A resolved source → target morph pair.
#[derive(Clone)]
pub struct FlipPair {
    pub key: String,
    pub source_rect: Rect,
    pub source_corner_radius: f32,
    /// The outgoing screen's surface for this key, when still mounted.
    /// Optional: the morph can run with target-only data, using the
    /// captured snapshot as the source side.
    pub source_surface: Option<Arc<dyn RenderSurface>>,
    pub target_surface: Arc<dyn RenderSurface>,
    pub target_rect: Rect,
    pub target_corner_radius: f32,
}

/// Where an element WILL BE once its screen's animation settles.
///
/// During a push the entering screen is mid-animation, so measuring a
/// surface returns the current animated position, not the final one. The
/// surface's container frames give the offset the container still has to
/// travel; applying it to the measured rect yields the resting position.
fn measure_final_rect(surface: &dyn RenderSurface) -> Rect {
    let rect = surface.bounds();
    match surface.container_frames() {
        Some(frames) => rect.offset(
            frames.resting.x() - frames.container.x(),
            frames.resting.y() - frames.container.y(),
        ),
        None => rect,
    }
}

/// Owner of shared-element participants and pending geometry snapshots.
#[derive(Default)]
pub struct SharedElementRegistry {
    /// key → activity id → surface
    surfaces: FxHashMap<String, FxHashMap<String, Arc<dyn RenderSurface>>>,
    /// key → snapshot captured before the current transition cycle
    snapshots: FxHashMap<String, Snapshot>,
}

impl SharedElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mounted participant for `key` under `activity_id`
    pub fn register(&mut self, key: &str, activity_id: &str, surface: Arc<dyn RenderSurface>) {
        self.surfaces
            .entry(key.to_string())
            .or_default()
            .insert(activity_id.to_string(), surface);
    }

    /// Remove a participant; dropping the last entry for a key drops the key
    pub fn unregister(&mut self, key: &str, activity_id: &str) {
        if let Some(map) = self.surfaces.get_mut(key) {
            map.remove(activity_id);
            if map.is_empty() {
                self.surfaces.remove(key);
            }
        }
    }

    /// Capture the current rect and corner radius of every registered
    /// surface, replacing any previous pending set.
    ///
    /// Surfaces with a zero-size rect were never actually laid out and are
    /// skipped. Call before dispatching the navigation event.
    pub fn capture_snapshots(&mut self) {
        self.snapshots.clear();
        for (key, activity_map) in &self.surfaces {
            for surface in activity_map.values() {
                let rect = surface.bounds();
                if !rect.is_empty() {
                    self.snapshots.insert(
                        key.clone(),
                        Snapshot {
                            rect,
                            corner_radius: surface.corner_radius(),
                        },
                    );
                }
            }
        }
        tracing::trace!(count = self.snapshots.len(), "captured shared-element snapshots");
    }

    pub fn has_pending_snapshots(&self) -> bool {
        !self.snapshots.is_empty()
    }

    /// Drop pending snapshots from an abandoned cycle so a later unrelated
    /// transition cannot adopt them
    pub fn clear_snapshots(&mut self) {
        self.snapshots.clear();
    }

    /// Match pending snapshots against the entering activity's surfaces.
    ///
    /// Keys without a surface under `entering_activity_id`, and targets with
    /// degenerate (zero-area) final geometry, resolve to no pair. Snapshots
    /// are cleared only when at least one pair was found; an empty resolve
    /// keeps them so the caller can retry once the entering screen finishes
    /// mounting.
    pub fn resolve_pairs(&mut self, entering_activity_id: &str) -> Vec<FlipPair> {
        let mut pairs = Vec::new();

        for (key, snapshot) in &self.snapshots {
            let Some(activity_map) = self.surfaces.get(key) else {
                continue;
            };
            let Some(target) = activity_map.get(entering_activity_id) else {
                continue;
            };

            let target_rect = measure_final_rect(target.as_ref());
            if target_rect.is_empty() {
                continue;
            }

            // The outgoing side is located opportunistically, for
            // hide/show bookkeeping only
            let source_surface = activity_map
                .iter()
                .find(|(activity_id, _)| activity_id.as_str() != entering_activity_id)
                .map(|(_, surface)| surface.clone());

            pairs.push(FlipPair {
                key: key.clone(),
                source_rect: snapshot.rect,
                source_corner_radius: snapshot.corner_radius,
                source_surface,
                target_corner_radius: target.corner_radius(),
                target_surface: target.clone(),
                target_rect,
            });
        }

        if !pairs.is_empty() {
            self.snapshots.clear();
        }
        tracing::trace!(
            entering = entering_activity_id,
            pairs = pairs.len(),
            "resolved shared-element pairs"
        );
        pairs
    }
}
