//! Render-surface abstraction
//!
//! The motion engine animates opaque surface handles supplied by the
//! rendering binding. A surface knows how to measure itself and how to apply
//! or clear a transient visual property; everything else (widget trees,
//! compositing, paint) stays on the host side of this seam.

use std::sync::Arc;

use crate::geometry::Rect;

/// A visual property a transition preset can animate.
///
/// Values are plain `f32`s; the unit depends on the property:
///
/// - [`TranslateX`](VisualProp::TranslateX) / [`TranslateY`](VisualProp::TranslateY):
///   fraction of the surface's own width/height (`1.0` = one full extent)
/// - [`Scale`](VisualProp::Scale): uniform scale factor
/// - [`Opacity`](VisualProp::Opacity): `0.0..=1.0`
/// - [`Brightness`](VisualProp::Brightness): `1.0` = unchanged
/// - [`CornerRadius`](VisualProp::CornerRadius): pixels
/// - [`ShadowAlpha`](VisualProp::ShadowAlpha): alpha of the surface's edge
///   shadow, `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualProp {
    TranslateX,
    TranslateY,
    Scale,
    Opacity,
    Brightness,
    CornerRadius,
    ShadowAlpha,
}

/// Geometry needed to project a surface's rect to its post-transition
/// resting position.
///
/// While a sibling enter/exit animation is in flight, measuring a surface
/// returns transient coordinates. The activity container's current rect and
/// its eventual resting frame let the caller compute the offset the
/// container still has to travel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerFrames {
    /// The activity container's current (possibly mid-animation) rect
    pub container: Rect,
    /// The frame the container will occupy once its animation settles
    pub resting: Rect,
}

/// A mounted render surface, implemented by the rendering binding.
///
/// All methods are expected to be cheap and infallible once the handle
/// exists; a surface must not call back into the motion driver from any of
/// them.
pub trait RenderSurface: Send + Sync {
    /// Current measured rect in window coordinates
    fn bounds(&self) -> Rect;

    /// Rendered corner radius in pixels
    fn corner_radius(&self) -> f32;

    /// Whether the surface is currently visible
    fn visible(&self) -> bool;

    /// Show or hide the surface without unmounting it
    fn set_visible(&self, visible: bool);

    /// Apply a transient visual property for the current frame
    fn set_visual(&self, prop: VisualProp, value: f32);

    /// Remove a transient visual property, restoring the surface's natural
    /// rendering for it
    fn clear_visual(&self, prop: VisualProp);

    /// The activity container this surface is mounted in, if any.
    ///
    /// Surfaces outside an activity container return `None` and are measured
    /// as-is.
    fn container_frames(&self) -> Option<ContainerFrames> {
        None
    }

    /// Create a detached visual clone of this surface for a morph animation.
    ///
    /// The clone must render the surface's content stretched to whatever
    /// frame [`MorphGhost::set_frame`] assigns, above both screens and
    /// outside hit testing.
    fn spawn_ghost(&self) -> Arc<dyn MorphGhost>;
}

/// A detached morph clone created by [`RenderSurface::spawn_ghost`].
///
/// Using a ghost after [`remove`](MorphGhost::remove) is a host-side
/// contract violation.
pub trait MorphGhost: Send + Sync {
    /// Position and size the ghost, with the given corner radius in pixels
    fn set_frame(&self, rect: Rect, corner_radius: f32);

    /// Remove the ghost from the scene
    fn remove(&self);
}

/// Maps an activity id to its mounted surface, or `None` while unmounted.
pub type SurfaceResolver = Arc<dyn Fn(&str) -> Option<Arc<dyn RenderSurface>> + Send + Sync>;
