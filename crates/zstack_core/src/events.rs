//! Stack events
//!
//! The closed set of inputs the reducer understands. Constructors generate
//! unique activity ids so hosts normally never mint their own; direct
//! variant construction is available for callers that do.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use zstack_motion::TransitionName;

use crate::types::Params;

static NEXT_ACTIVITY_ID: AtomicU64 = AtomicU64::new(1);

/// Mint a process-unique activity id.
pub fn generate_activity_id() -> String {
    format!("act-{}", NEXT_ACTIVITY_ID.fetch_add(1, Ordering::Relaxed))
}

/// An input to the stack reducer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StackEvent {
    /// Seed the stack with its first activity. Applied exactly once at
    /// store creation; discards any prior state.
    Init {
        id: String,
        name: String,
        params: Params,
    },
    /// Add a new top activity; everything beneath stays mounted
    Push {
        id: String,
        name: String,
        params: Params,
        transition: TransitionName,
    },
    /// Remove the top activity. `transition` overrides the default of
    /// reversing the transition the activity was pushed with.
    Pop { transition: Option<TransitionName> },
    /// Swap the top activity for a new one; both stay mounted until the
    /// transition completes
    Replace {
        id: String,
        name: String,
        params: Params,
        transition: TransitionName,
    },
    /// Settle the running transition: enter-active activities land,
    /// exit-active activities are removed
    TransitionComplete,
}

impl StackEvent {
    pub fn init(name: impl Into<String>, params: Params) -> Self {
        StackEvent::Init {
            id: generate_activity_id(),
            name: name.into(),
            params,
        }
    }

    pub fn push(name: impl Into<String>, params: Params, transition: TransitionName) -> Self {
        StackEvent::Push {
            id: generate_activity_id(),
            name: name.into(),
            params,
            transition,
        }
    }

    pub fn pop(transition: Option<TransitionName>) -> Self {
        StackEvent::Pop { transition }
    }

    pub fn replace(name: impl Into<String>, params: Params, transition: TransitionName) -> Self {
        StackEvent::Replace {
            id: generate_activity_id(),
            name: name.into(),
            params,
            transition,
        }
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            StackEvent::Init { .. } => "INIT",
            StackEvent::Push { .. } => "PUSH",
            StackEvent::Pop { .. } => "POP",
            StackEvent::Replace { .. } => "REPLACE",
            StackEvent::TransitionComplete => "TRANSITION_COMPLETE",
        }
    }
}
