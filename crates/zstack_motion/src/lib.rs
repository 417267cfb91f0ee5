//! ZStack Motion Engine
//!
//! Transition playback for screen-navigation stacks.
//!
//! # Features
//!
//! - **Motion Driver**: Instance-scoped frame driver that steps every active
//!   animation; no global scheduler, so multiple stacks can coexist
//! - **Transition Engine**: Preset-driven enter/exit animations with
//!   play/pause/seek/reverse/cancel control (gesture-scrubbable)
//! - **Presets**: Built-in slide, fade, modal, and none transition tables
//! - **Shared Elements**: Registry of per-key morph participants with
//!   before/after geometry capture
//! - **FLIP Morphs**: Ghost-clone animations from one screen's layout
//!   position to another's
//!
//! Rendering is delegated to the host through the [`RenderSurface`] trait;
//! this crate never touches a real widget tree.

pub mod completion;
pub mod driver;
pub mod easing;
pub mod engine;
pub mod flip;
pub mod geometry;
pub mod presets;
pub mod registry;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use completion::{Completion, CompletionState};
pub use driver::{MotionDriver, MotionHandle, MotionId};
pub use easing::Easing;
pub use engine::{run_transition, TransitionDirection, TransitionHandle};
pub use flip::{run_flip, FlipHandle};
pub use geometry::{Point, Rect, Size};
pub use presets::{
    ParseTransitionError, PropTrack, TransitionKeyframes, TransitionName, TransitionPreset,
};
pub use registry::{FlipPair, SharedElementRegistry, Snapshot};
pub use surface::{ContainerFrames, MorphGhost, RenderSurface, SurfaceResolver, VisualProp};
