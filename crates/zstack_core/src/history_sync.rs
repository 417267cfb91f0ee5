//! History synchronization plugin
//!
//! Mirrors the stack into a host-owned history (the browser's, or any
//! linear back-stack): push adds an entry, replace rewrites the current
//! one, and a store-initiated pop walks the host history back. The host
//! wires its back-navigation signal to [`HistorySyncPlugin::on_external_pop`],
//! which pops the stack in turn; a skip flag breaks the echo loop between
//! the two directions.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::events::StackEvent;
use crate::plugin::Plugin;
use crate::store::Store;
use crate::types::StackState;

/// One entry in the host history, serializable for hosts that persist
/// history state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub activity_id: String,
    /// Depth of the entry in the stack at the time it was written
    pub index: usize,
}

/// The linear history this plugin mirrors the stack into.
pub trait HistoryHost: Send + Sync {
    fn push_entry(&self, entry: HistoryEntry);
    fn replace_entry(&self, entry: HistoryEntry);
    /// Navigate one entry back; the host is expected to report the
    /// resulting back-navigation through
    /// [`HistorySyncPlugin::on_external_pop`]
    fn back(&self);
}

/// Keeps a [`HistoryHost`] aligned with the navigation stack.
pub struct HistorySyncPlugin<H: HistoryHost> {
    host: H,
    store: Mutex<Option<Store>>,
    skip_next_pop: AtomicBool,
}

impl<H: HistoryHost> HistorySyncPlugin<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            store: Mutex::new(None),
            skip_next_pop: AtomicBool::new(false),
        }
    }

    /// The host observed a back navigation (e.g. a popstate). Pops the
    /// stack unless this is the echo of a pop the stack itself initiated.
    pub fn on_external_pop(&self) {
        if self.skip_next_pop.swap(false, Ordering::SeqCst) {
            return;
        }
        let store = self.store.lock().unwrap().clone();
        if let Some(store) = store {
            store.pop(None);
        }
    }
}

impl<H: HistoryHost> Plugin for HistorySyncPlugin<H> {
    fn name(&self) -> &str {
        "history-sync"
    }

    fn init(&self, store: Store) {
        // Rewrite the host's current entry to the seeded activity
        let state = store.get_state();
        if let Some(top) = state.activities.last() {
            self.host.replace_entry(HistoryEntry {
                activity_id: top.id.clone(),
                index: 0,
            });
        }
        *self.store.lock().unwrap() = Some(store);
    }

    fn on_event(&self, event: &StackEvent, state: &StackState) {
        match event {
            StackEvent::Push { .. } => {
                if let Some(top) = state.activities.last() {
                    self.host.push_entry(HistoryEntry {
                        activity_id: top.id.clone(),
                        index: state.activities.len() - 1,
                    });
                }
            }
            StackEvent::Pop { .. } => {
                // The stack popped; walk the host back and swallow the
                // back-navigation it will echo
                self.skip_next_pop.store(true, Ordering::SeqCst);
                self.host.back();
            }
            StackEvent::Replace { .. } => {
                if let Some(top) = state.activities.last() {
                    self.host.replace_entry(HistoryEntry {
                        activity_id: top.id.clone(),
                        index: state.activities.len() - 1,
                    });
                }
            }
            StackEvent::Init { .. } | StackEvent::TransitionComplete => {}
        }
    }

    fn destroy(&self) {
        self.store.lock().unwrap().take();
    }
}
