//! Transition presets
//!
//! A preset is pure data: a duration, an easing curve, and two keyframe
//! tables, one for push/replace and one for pop. The engine interprets the
//! shape and is otherwise direction-agnostic, so hosts can supply their own
//! preset tables without touching engine code.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::easing::Easing;
use crate::surface::VisualProp;

/// Name of a built-in transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionName {
    /// Horizontal slide with parallax on the screen behind
    #[default]
    Slide,
    /// Crossfade
    Fade,
    /// Bottom sheet slide-up with the screen behind receding
    Modal,
    /// Instant, no animation
    None,
}

impl std::fmt::Display for TransitionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransitionName::Slide => "slide",
            TransitionName::Fade => "fade",
            TransitionName::Modal => "modal",
            TransitionName::None => "none",
        };
        f.write_str(name)
    }
}

/// Error parsing a transition name from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown transition name: {0:?}")]
pub struct ParseTransitionError(pub String);

impl FromStr for TransitionName {
    type Err = ParseTransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slide" => Ok(TransitionName::Slide),
            "fade" => Ok(TransitionName::Fade),
            "modal" => Ok(TransitionName::Modal),
            "none" => Ok(TransitionName::None),
            other => Err(ParseTransitionError(other.to_string())),
        }
    }
}

/// One animated property with its endpoint values.
///
/// `from == to` is valid and holds the property constant for the duration
/// of the transition (cleared afterwards like any other track).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropTrack {
    pub prop: VisualProp,
    pub from: f32,
    pub to: f32,
}

impl PropTrack {
    pub const fn new(prop: VisualProp, from: f32, to: f32) -> Self {
        Self { prop, from, to }
    }

    /// Value at eased progress `t`
    pub fn value_at(&self, t: f32) -> f32 {
        self.from + (self.to - self.from) * t
    }
}

/// The two animated sides of a transition.
///
/// An empty track list means that side does not animate at all.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionKeyframes {
    /// Applied to the entering surface
    pub entering: Vec<PropTrack>,
    /// Applied to the surface behind/leaving
    pub exiting_behind: Vec<PropTrack>,
}

/// A named transition curve, reversible for pop.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionPreset {
    pub name: TransitionName,
    pub duration_ms: f32,
    pub easing: Easing,
    /// Played for push and replace
    pub keyframes: TransitionKeyframes,
    /// Played for pop, which literally reverses the push animation
    pub reverse_keyframes: TransitionKeyframes,
}

impl TransitionPreset {
    /// Look up the built-in preset table.
    pub fn named(name: TransitionName) -> TransitionPreset {
        match name {
            TransitionName::Slide => slide(),
            TransitionName::Fade => fade(),
            TransitionName::Modal => modal(),
            TransitionName::None => none(),
        }
    }
}

/// Cupertino-style horizontal slide with parallax on the behind screen.
/// Entering screen slides in from the right; the screen behind drifts
/// slightly left and dims.
pub fn slide() -> TransitionPreset {
    TransitionPreset {
        name: TransitionName::Slide,
        duration_ms: 350.0,
        easing: Easing::nav(),
        keyframes: TransitionKeyframes {
            entering: vec![
                PropTrack::new(VisualProp::TranslateX, 1.0, 0.0),
                PropTrack::new(VisualProp::ShadowAlpha, 0.0, 0.15),
            ],
            exiting_behind: vec![
                PropTrack::new(VisualProp::TranslateX, 0.0, -0.3),
                PropTrack::new(VisualProp::Opacity, 1.0, 0.9),
            ],
        },
        // The revealed screen sits still on pop; only the top screen
        // slides back out
        reverse_keyframes: TransitionKeyframes {
            entering: vec![],
            exiting_behind: vec![
                PropTrack::new(VisualProp::TranslateX, 0.0, 1.0),
                PropTrack::new(VisualProp::ShadowAlpha, 0.15, 0.0),
            ],
        },
    }
}

/// Simple crossfade.
pub fn fade() -> TransitionPreset {
    let keyframes = TransitionKeyframes {
        entering: vec![PropTrack::new(VisualProp::Opacity, 0.0, 1.0)],
        exiting_behind: vec![PropTrack::new(VisualProp::Opacity, 1.0, 0.0)],
    };
    TransitionPreset {
        name: TransitionName::Fade,
        duration_ms: 300.0,
        easing: Easing::EaseInOut,
        reverse_keyframes: keyframes.clone(),
        keyframes,
    }
}

/// Bottom sheet style transition. The sheet slides up from the bottom with
/// rounded top corners while the screen behind scales down and darkens.
pub fn modal() -> TransitionPreset {
    TransitionPreset {
        name: TransitionName::Modal,
        duration_ms: 400.0,
        easing: Easing::nav(),
        keyframes: TransitionKeyframes {
            entering: vec![
                PropTrack::new(VisualProp::TranslateY, 1.0, 0.0),
                PropTrack::new(VisualProp::CornerRadius, 12.0, 12.0),
            ],
            exiting_behind: vec![
                PropTrack::new(VisualProp::Scale, 1.0, 0.94),
                PropTrack::new(VisualProp::CornerRadius, 0.0, 12.0),
                PropTrack::new(VisualProp::Brightness, 1.0, 0.8),
            ],
        },
        reverse_keyframes: TransitionKeyframes {
            entering: vec![
                PropTrack::new(VisualProp::Scale, 0.94, 1.0),
                PropTrack::new(VisualProp::CornerRadius, 12.0, 0.0),
                PropTrack::new(VisualProp::Brightness, 0.8, 1.0),
            ],
            exiting_behind: vec![
                PropTrack::new(VisualProp::TranslateY, 0.0, 1.0),
                PropTrack::new(VisualProp::CornerRadius, 12.0, 12.0),
            ],
        },
    }
}

/// Instant transition with no animation on either side.
pub fn none() -> TransitionPreset {
    TransitionPreset {
        name: TransitionName::None,
        duration_ms: 0.0,
        easing: Easing::Linear,
        keyframes: TransitionKeyframes::default(),
        reverse_keyframes: TransitionKeyframes::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_lookup_is_total() {
        for name in [
            TransitionName::Slide,
            TransitionName::Fade,
            TransitionName::Modal,
            TransitionName::None,
        ] {
            assert_eq!(TransitionPreset::named(name).name, name);
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for name in [
            TransitionName::Slide,
            TransitionName::Fade,
            TransitionName::Modal,
            TransitionName::None,
        ] {
            assert_eq!(name.to_string().parse::<TransitionName>(), Ok(name));
        }
        assert!("swoosh".parse::<TransitionName>().is_err());
    }

    #[test]
    fn test_track_value_at() {
        let track = PropTrack::new(VisualProp::TranslateX, 1.0, 0.0);
        assert_eq!(track.value_at(0.0), 1.0);
        assert_eq!(track.value_at(0.5), 0.5);
        assert_eq!(track.value_at(1.0), 0.0);
    }

    #[test]
    fn test_none_preset_has_no_tracks() {
        let preset = none();
        assert!(preset.keyframes.entering.is_empty());
        assert!(preset.keyframes.exiting_behind.is_empty());
        assert_eq!(preset.duration_ms, 0.0);
    }

    #[test]
    fn test_slide_pop_reverses_entry() {
        let preset = slide();
        let push_enter = &preset.keyframes.entering[0];
        let pop_exit = &preset.reverse_keyframes.exiting_behind[0];
        assert_eq!(push_enter.prop, VisualProp::TranslateX);
        assert_eq!(pop_exit.prop, VisualProp::TranslateX);
        assert_eq!((push_enter.from, push_enter.to), (1.0, 0.0));
        assert_eq!((pop_exit.from, pop_exit.to), (0.0, 1.0));
    }
}
