//! Plugin protocol
//!
//! Collaborators observe the event/state stream and may call stack
//! operations back through the store handle they receive at init. The store
//! invokes plugins outside its state lock, so reentrant dispatch from a
//! plugin is safe.

use crate::events::StackEvent;
use crate::store::Store;
use crate::types::StackState;

/// A store collaborator.
///
/// All methods default to no-ops; implement the ones the plugin needs.
pub trait Plugin: Send + Sync {
    /// Stable name, for logging
    fn name(&self) -> &str;

    /// Called once at store creation, after the initial activity is seeded
    fn init(&self, store: Store) {
        let _ = store;
    }

    /// Called after every reducer application, including the synthetic
    /// initial INIT
    fn on_event(&self, event: &StackEvent, state: &StackState) {
        let _ = (event, state);
    }

    /// Called at store teardown; drop any held store handle here
    fn destroy(&self) {}
}
