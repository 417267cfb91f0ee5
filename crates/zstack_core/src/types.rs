//! Stack data model
//!
//! Immutable snapshots of the navigation stack. The reducer in
//! [`crate::aggregate`] is the only producer of these values; everything
//! else reads them.

use serde::{Deserialize, Serialize};
use zstack_motion::{TransitionDirection, TransitionName};

/// Parameter bag attached to an activity, opaque to the core.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Lifecycle state of one activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionState {
    /// Entering; its enter animation is running
    EnterActive,
    /// Settled on the stack
    EnterDone,
    /// Leaving; its exit animation is running
    ExitActive,
    /// Fully exited; never observed outside the reducer step that
    /// produces it
    ExitDone,
}

/// One screen instance on the stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique, caller-assigned, opaque
    pub id: String,
    /// Logical screen type, resolved to a renderer externally
    pub name: String,
    pub params: Params,
    pub transition_state: TransitionState,
    /// Stacking order; assigned from the global counter, never reused
    pub z_index: u32,
    /// Which transition pushed this activity: the default reverse
    /// transition when it is popped
    pub pushed_by: TransitionName,
}

impl Activity {
    /// Visible means not leaving and not gone: what a user currently
    /// perceives as part of the stack.
    pub fn is_visible(&self) -> bool {
        !matches!(
            self.transition_state,
            TransitionState::ExitActive | TransitionState::ExitDone
        )
    }
}

/// Kind of stack change an active transition animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Push,
    Pop,
    Replace,
}

/// The one transition currently animating, if any.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveTransition {
    pub kind: TransitionKind,
    pub transition: TransitionName,
    /// Absent e.g. when a pop leaves nothing to reveal
    pub entering_id: Option<String>,
    /// Absent e.g. for the initial activity
    pub exiting_id: Option<String>,
}

impl ActiveTransition {
    /// Which keyframe table drives this transition: pop reverses the push
    /// animation, push and replace play it forward.
    pub fn direction(&self) -> TransitionDirection {
        match self.kind {
            TransitionKind::Pop => TransitionDirection::Pop,
            TransitionKind::Push | TransitionKind::Replace => TransitionDirection::Push,
        }
    }
}

/// Immutable snapshot of the whole stack.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StackState {
    /// Insertion order = stacking order; the last *visible* entry is the
    /// top the user sees
    pub activities: Vec<Activity>,
    /// Global monotonic counter; source of z-indices, never decremented
    pub counter: u32,
    /// Non-`None` from push/pop/replace until the paired completion
    pub transition: Option<ActiveTransition>,
}

impl StackState {
    fn visible(&self) -> impl DoubleEndedIterator<Item = &Activity> {
        self.activities.iter().filter(|a| a.is_visible())
    }

    /// The activity the user currently perceives as top, ignoring screens
    /// already mid-exit
    pub fn top_activity(&self) -> Option<&Activity> {
        self.visible().next_back()
    }

    /// The visible activity immediately below the top
    pub fn below_top_activity(&self) -> Option<&Activity> {
        self.visible().nth_back(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, state: TransitionState) -> Activity {
        Activity {
            id: id.into(),
            name: "Screen".into(),
            params: Params::new(),
            transition_state: state,
            z_index: 0,
            pushed_by: TransitionName::Slide,
        }
    }

    #[test]
    fn test_top_ignores_exiting_activities() {
        let state = StackState {
            activities: vec![
                activity("1", TransitionState::EnterDone),
                activity("2", TransitionState::EnterDone),
                activity("3", TransitionState::ExitActive),
            ],
            counter: 3,
            transition: None,
        };
        assert_eq!(state.top_activity().unwrap().id, "2");
        assert_eq!(state.below_top_activity().unwrap().id, "1");
    }

    #[test]
    fn test_top_of_empty_stack() {
        let state = StackState::default();
        assert!(state.top_activity().is_none());
        assert!(state.below_top_activity().is_none());
    }

    #[test]
    fn test_direction_mapping() {
        let base = ActiveTransition {
            kind: TransitionKind::Push,
            transition: TransitionName::Slide,
            entering_id: None,
            exiting_id: None,
        };
        assert_eq!(base.direction(), TransitionDirection::Push);
        let pop = ActiveTransition {
            kind: TransitionKind::Pop,
            ..base.clone()
        };
        assert_eq!(pop.direction(), TransitionDirection::Pop);
        let replace = ActiveTransition {
            kind: TransitionKind::Replace,
            ..base
        };
        assert_eq!(replace.direction(), TransitionDirection::Push);
    }
}
