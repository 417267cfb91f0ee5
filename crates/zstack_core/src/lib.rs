//! ZStack Core
//!
//! A screen-navigation stack for interactive surfaces: a pure event-sourced
//! stack model coordinated with animated enter/exit transitions.
//!
//! # Features
//!
//! - **Stack Reducer**: Pure `(state, event) → state` with exactly-once
//!   transition settlement and identity-preserving no-ops
//! - **Store**: Thin orchestrator owning the canonical state, sequencing
//!   transition runs, and guarding against overlapping navigation
//! - **Plugin Protocol**: Event/state stream for collaborators such as
//!   history synchronization
//! - **History Sync**: Keeps a host history (e.g. the browser's) aligned
//!   with the stack
//!
//! Animation lives in `zstack_motion`; gestures in `zstack_gesture`.

pub mod aggregate;
pub mod events;
pub mod history_sync;
pub mod plugin;
pub mod store;
pub mod types;

pub use aggregate::aggregate;
pub use events::{generate_activity_id, StackEvent};
pub use history_sync::{HistoryEntry, HistoryHost, HistorySyncPlugin};
pub use plugin::Plugin;
pub use store::{Store, StoreOptions, SubscriptionId};
pub use types::{Activity, ActiveTransition, Params, StackState, TransitionKind, TransitionState};
pub use zstack_motion::TransitionName;
