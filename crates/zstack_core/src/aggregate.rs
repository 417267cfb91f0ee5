//! Stack reducer
//!
//! A pure, total function over `(state, event)`. No side effects, no I/O,
//! and referentially stable: documented no-ops return the *same*
//! `Arc<StackState>`, so callers can detect "nothing happened" with
//! [`Arc::ptr_eq`] instead of deep comparison.
//!
//! Invariants upheld after every application:
//!
//! - at most one activity is the visible top
//! - no `ExitDone` activity survives the step that produces it
//! - `counter` strictly increases by one per push/replace
//! - `transition` is non-`None` exactly between a push/pop/replace and its
//!   paired completion

use std::sync::Arc;

use zstack_motion::TransitionName;

use crate::events::StackEvent;
use crate::types::{Activity, ActiveTransition, StackState, TransitionKind, TransitionState};

/// Apply one event to the stack.
pub fn aggregate(state: &Arc<StackState>, event: &StackEvent) -> Arc<StackState> {
    match event {
        StackEvent::Init { id, name, params } => Arc::new(StackState {
            activities: vec![Activity {
                id: id.clone(),
                name: name.clone(),
                params: params.clone(),
                transition_state: TransitionState::EnterDone,
                z_index: 0,
                pushed_by: TransitionName::None,
            }],
            counter: 1,
            transition: None,
        }),

        StackEvent::Push {
            id,
            name,
            params,
            transition,
        } => {
            let exiting_id = state.top_activity().map(|top| top.id.clone());
            let mut activities = state.activities.clone();
            activities.push(Activity {
                id: id.clone(),
                name: name.clone(),
                params: params.clone(),
                transition_state: TransitionState::EnterActive,
                z_index: state.counter,
                pushed_by: *transition,
            });
            Arc::new(StackState {
                activities,
                counter: state.counter + 1,
                transition: Some(ActiveTransition {
                    kind: TransitionKind::Push,
                    transition: *transition,
                    entering_id: Some(id.clone()),
                    exiting_id,
                }),
            })
        }

        StackEvent::Pop { transition } => {
            let Some(top) = state.top_activity() else {
                return state.clone();
            };
            if state.activities.len() <= 1 {
                return state.clone();
            }

            let top_id = top.id.clone();
            let entering_id = state.below_top_activity().map(|below| below.id.clone());
            // Pop reverses the transition the screen was entered with,
            // unless told otherwise
            let transition_name = transition.unwrap_or(top.pushed_by);

            let activities = state
                .activities
                .iter()
                .map(|a| {
                    if a.id == top_id {
                        Activity {
                            transition_state: TransitionState::ExitActive,
                            ..a.clone()
                        }
                    } else {
                        a.clone()
                    }
                })
                .collect();

            Arc::new(StackState {
                activities,
                counter: state.counter,
                transition: Some(ActiveTransition {
                    kind: TransitionKind::Pop,
                    transition: transition_name,
                    entering_id,
                    exiting_id: Some(top_id),
                }),
            })
        }

        StackEvent::Replace {
            id,
            name,
            params,
            transition,
        } => {
            let exiting_id = state.top_activity().map(|top| top.id.clone());

            // The displaced top is marked exiting but stays mounted so both
            // screens can animate simultaneously; removal happens on
            // completion
            let mut activities: Vec<Activity> = state
                .activities
                .iter()
                .map(|a| {
                    if Some(&a.id) == exiting_id.as_ref() {
                        Activity {
                            transition_state: TransitionState::ExitActive,
                            ..a.clone()
                        }
                    } else {
                        a.clone()
                    }
                })
                .collect();
            activities.push(Activity {
                id: id.clone(),
                name: name.clone(),
                params: params.clone(),
                transition_state: TransitionState::EnterActive,
                z_index: state.counter,
                pushed_by: *transition,
            });

            Arc::new(StackState {
                activities,
                counter: state.counter + 1,
                transition: Some(ActiveTransition {
                    kind: TransitionKind::Replace,
                    transition: *transition,
                    entering_id: Some(id.clone()),
                    exiting_id,
                }),
            })
        }

        StackEvent::TransitionComplete => {
            let needs_settling = state.activities.iter().any(|a| {
                matches!(
                    a.transition_state,
                    TransitionState::EnterActive | TransitionState::ExitActive
                )
            });
            if state.transition.is_none() && !needs_settling {
                return state.clone();
            }

            // The only place activities settle, and the only place they are
            // removed, giving exactly-once settlement per navigation cycle
            let activities = state
                .activities
                .iter()
                .filter_map(|a| match a.transition_state {
                    TransitionState::EnterActive => Some(Activity {
                        transition_state: TransitionState::EnterDone,
                        ..a.clone()
                    }),
                    TransitionState::ExitActive | TransitionState::ExitDone => None,
                    TransitionState::EnterDone => Some(a.clone()),
                })
                .collect();

            Arc::new(StackState {
                activities,
                counter: state.counter,
                transition: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Params;

    fn init(name: &str, id: &str) -> StackEvent {
        StackEvent::Init {
            id: id.into(),
            name: name.into(),
            params: Params::new(),
        }
    }

    fn push(name: &str, id: &str, transition: TransitionName) -> StackEvent {
        StackEvent::Push {
            id: id.into(),
            name: name.into(),
            params: Params::new(),
            transition,
        }
    }

    fn pop(transition: Option<TransitionName>) -> StackEvent {
        StackEvent::Pop { transition }
    }

    fn replace(name: &str, id: &str, transition: TransitionName) -> StackEvent {
        StackEvent::Replace {
            id: id.into(),
            name: name.into(),
            params: Params::new(),
            transition,
        }
    }

    fn complete() -> StackEvent {
        StackEvent::TransitionComplete
    }

    fn empty() -> Arc<StackState> {
        Arc::new(StackState::default())
    }

    #[test]
    fn test_init_creates_single_enter_done_activity() {
        let state = aggregate(&empty(), &init("Home", "1"));
        assert_eq!(state.activities.len(), 1);
        let home = &state.activities[0];
        assert_eq!(home.id, "1");
        assert_eq!(home.name, "Home");
        assert_eq!(home.transition_state, TransitionState::EnterDone);
        assert_eq!(home.z_index, 0);
        assert_eq!(state.counter, 1);
        assert!(state.transition.is_none());
    }

    #[test]
    fn test_push_adds_enter_active_on_top_keeping_existing() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let state = aggregate(&state, &push("Detail", "2", TransitionName::Slide));

        assert_eq!(state.activities.len(), 2);
        // Home stays enter-done: it remains in the stack beneath the top
        assert_eq!(
            state.activities[0].transition_state,
            TransitionState::EnterDone
        );
        assert_eq!(state.activities[1].id, "2");
        assert_eq!(
            state.activities[1].transition_state,
            TransitionState::EnterActive
        );

        let transition = state.transition.as_ref().unwrap();
        assert_eq!(transition.kind, TransitionKind::Push);
        assert_eq!(transition.entering_id.as_deref(), Some("2"));
        assert_eq!(transition.exiting_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_push_complete_keeps_previous_screens() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let state = aggregate(&state, &push("Detail", "2", TransitionName::Slide));
        let state = aggregate(&state, &complete());

        assert_eq!(state.activities.len(), 2);
        assert!(state
            .activities
            .iter()
            .all(|a| a.transition_state == TransitionState::EnterDone));
        assert!(state.transition.is_none());
    }

    #[test]
    fn test_pop_marks_top_exit_active() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let state = aggregate(&state, &push("Detail", "2", TransitionName::Slide));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &pop(None));

        assert_eq!(state.activities.len(), 2);
        assert_eq!(
            state.activities[1].transition_state,
            TransitionState::ExitActive
        );
        assert_eq!(
            state.activities[0].transition_state,
            TransitionState::EnterDone
        );

        let transition = state.transition.as_ref().unwrap();
        assert_eq!(transition.kind, TransitionKind::Pop);
        assert_eq!(transition.entering_id.as_deref(), Some("1"));
        assert_eq!(transition.exiting_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_pop_complete_removes_popped_screen() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let state = aggregate(&state, &push("Detail", "2", TransitionName::Slide));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &pop(None));
        let state = aggregate(&state, &complete());

        assert_eq!(state.activities.len(), 1);
        assert_eq!(state.activities[0].id, "1");
        assert_eq!(
            state.activities[0].transition_state,
            TransitionState::EnterDone
        );
    }

    #[test]
    fn test_deep_stack_pops_back_to_first() {
        let state = aggregate(&empty(), &init("A", "1"));
        let state = aggregate(&state, &push("B", "2", TransitionName::Slide));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &push("C", "3", TransitionName::Slide));
        let state = aggregate(&state, &complete());
        assert_eq!(state.activities.len(), 3);

        let state = aggregate(&state, &pop(None));
        let state = aggregate(&state, &complete());
        assert_eq!(state.activities.len(), 2);
        assert_eq!(state.activities[1].name, "B");

        let state = aggregate(&state, &pop(None));
        let state = aggregate(&state, &complete());
        assert_eq!(state.activities.len(), 1);
        assert_eq!(state.activities[0].name, "A");
    }

    #[test]
    fn test_replace_marks_old_top_exit_active_and_adds_new() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let state = aggregate(&state, &replace("Settings", "2", TransitionName::Fade));

        // Both mounted so they can animate simultaneously
        assert_eq!(state.activities.len(), 2);
        assert_eq!(
            state.activities[0].transition_state,
            TransitionState::ExitActive
        );
        assert_eq!(state.activities[1].id, "2");
        assert_eq!(
            state.activities[1].transition_state,
            TransitionState::EnterActive
        );

        let transition = state.transition.as_ref().unwrap();
        assert_eq!(transition.kind, TransitionKind::Replace);
        assert_eq!(transition.entering_id.as_deref(), Some("2"));
        assert_eq!(transition.exiting_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_replace_complete_removes_old_screen() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let state = aggregate(&state, &replace("Settings", "2", TransitionName::Fade));
        let state = aggregate(&state, &complete());

        assert_eq!(state.activities.len(), 1);
        assert_eq!(state.activities[0].id, "2");
        assert_eq!(
            state.activities[0].transition_state,
            TransitionState::EnterDone
        );
    }

    #[test]
    fn test_pop_is_identity_noop_with_single_activity() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let popped = aggregate(&state, &pop(None));
        assert!(Arc::ptr_eq(&state, &popped));
    }

    #[test]
    fn test_pop_is_identity_noop_on_empty_state() {
        let state = empty();
        let popped = aggregate(&state, &pop(None));
        assert!(Arc::ptr_eq(&state, &popped));
    }

    #[test]
    fn test_pop_defaults_to_pushed_by_transition() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let state = aggregate(&state, &push("Settings", "2", TransitionName::Modal));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &pop(None));

        let transition = state.transition.as_ref().unwrap();
        assert_eq!(transition.kind, TransitionKind::Pop);
        assert_eq!(transition.transition, TransitionName::Modal);
    }

    #[test]
    fn test_pop_transition_can_be_overridden() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let state = aggregate(&state, &push("Settings", "2", TransitionName::Modal));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &pop(Some(TransitionName::Fade)));

        assert_eq!(
            state.transition.as_ref().unwrap().transition,
            TransitionName::Fade
        );
    }

    #[test]
    fn test_params_are_preserved_through_push() {
        let mut params = Params::new();
        params.insert("id".into(), "123".into());
        params.insert("title".into(), "Hello".into());

        let state = aggregate(&empty(), &init("Home", "1"));
        let state = aggregate(
            &state,
            &StackEvent::Push {
                id: "2".into(),
                name: "Detail".into(),
                params: params.clone(),
                transition: TransitionName::Slide,
            },
        );
        assert_eq!(state.activities[1].params, params);
    }

    #[test]
    fn test_counter_increments_only_on_push_and_replace() {
        let state = aggregate(&empty(), &init("Home", "1"));
        assert_eq!(state.counter, 1);

        let state = aggregate(&state, &push("A", "2", TransitionName::Slide));
        assert_eq!(state.counter, 2);
        let state = aggregate(&state, &complete());
        assert_eq!(state.counter, 2);

        let state = aggregate(&state, &replace("B", "3", TransitionName::Fade));
        assert_eq!(state.counter, 3);
        let state = aggregate(&state, &complete());

        let state = aggregate(&state, &push("C", "4", TransitionName::Slide));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &pop(None));
        let state = aggregate(&state, &complete());
        assert_eq!(state.counter, 4);
    }

    #[test]
    fn test_z_index_follows_counter_and_is_never_reused() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let state = aggregate(&state, &push("A", "2", TransitionName::Slide));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &pop(None));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &push("B", "3", TransitionName::Slide));

        // "B" gets z-index 2 even though "A" (z-index 1) is gone
        assert_eq!(state.activities[1].z_index, 2);
    }

    #[test]
    fn test_complete_is_identity_noop_when_nothing_to_settle() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let settled = aggregate(&state, &complete());
        assert!(Arc::ptr_eq(&state, &settled));
    }

    #[test]
    fn test_push_complete_pop_complete_round_trips() {
        let state = aggregate(&empty(), &init("Home", "1"));
        let before: Vec<String> = state.activities.iter().map(|a| a.id.clone()).collect();

        let state = aggregate(&state, &push("Detail", "2", TransitionName::Modal));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &pop(None));
        // The pop animates with the transition the screen was pushed with
        assert_eq!(
            state.transition.as_ref().unwrap().transition,
            TransitionName::Modal
        );
        let state = aggregate(&state, &complete());

        let after: Vec<String> = state.activities.iter().map(|a| a.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_pop_ignores_screen_already_exiting() {
        // With the top mid-exit, pop computes its pair against what the
        // user actually sees
        let state = aggregate(&empty(), &init("A", "1"));
        let state = aggregate(&state, &push("B", "2", TransitionName::Slide));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &push("C", "3", TransitionName::Slide));
        let state = aggregate(&state, &complete());
        let state = aggregate(&state, &pop(None));

        // "C" is exit-active; a further pop targets "B" over "A"
        let state = aggregate(&state, &pop(None));
        let transition = state.transition.as_ref().unwrap();
        assert_eq!(transition.exiting_id.as_deref(), Some("2"));
        assert_eq!(transition.entering_id.as_deref(), Some("1"));
    }
}
