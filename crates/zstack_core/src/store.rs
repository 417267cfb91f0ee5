//! Store - the thin orchestrator around the reducer and the motion engine
//!
//! Owns the canonical [`StackState`], drives the reducer, notifies plugins
//! and subscribers, and sequences transition runs so that at most one
//! enter/exit pair animates at a time. Navigation requests arriving while a
//! transition is active are ignored (with a debug log), which is what keeps
//! the reducer's single-transition invariant true in practice.

use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use zstack_motion::{
    run_transition, MotionDriver, MotionHandle, RenderSurface, SurfaceResolver, TransitionHandle,
    TransitionName, TransitionPreset,
};

use crate::aggregate::aggregate;
use crate::events::StackEvent;
use crate::plugin::Plugin;
use crate::types::{Params, StackState};

type Listener = Arc<dyn Fn(&StackState) + Send + Sync>;

/// Handle returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Configuration for [`Store::new`].
pub struct StoreOptions {
    /// Name of the activity the stack is seeded with
    pub initial_name: String,
    /// Params of the initial activity
    pub initial_params: Params,
    /// Replaces every preset's duration when set (useful for tests and
    /// reduced-motion settings)
    pub transition_duration_ms: Option<f32>,
    /// Transition used by push/replace when the caller names none
    pub default_transition: TransitionName,
    pub plugins: Vec<Arc<dyn Plugin>>,
}

impl StoreOptions {
    pub fn new(initial_name: impl Into<String>) -> Self {
        Self {
            initial_name: initial_name.into(),
            initial_params: Params::new(),
            transition_duration_ms: None,
            default_transition: TransitionName::Slide,
            plugins: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.initial_params = params;
        self
    }

    pub fn with_transition_duration(mut self, duration_ms: f32) -> Self {
        self.transition_duration_ms = Some(duration_ms);
        self
    }

    pub fn with_default_transition(mut self, transition: TransitionName) -> Self {
        self.default_transition = transition;
        self
    }

    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }
}

struct StoreShared {
    state: Mutex<Arc<StackState>>,
    listeners: Mutex<FxHashMap<u64, Listener>>,
    next_listener_id: AtomicU64,
    plugins: Mutex<Vec<Arc<dyn Plugin>>>,
    resolver: Mutex<Option<SurfaceResolver>>,
    current_handle: Mutex<Option<TransitionHandle>>,
    driver: MotionDriver,
    transition_duration_ms: Option<f32>,
    default_transition: TransitionName,
}

/// Cheap-clone handle to one navigation stack.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreShared>,
}

impl Store {
    /// Create a store seeded with the initial activity.
    ///
    /// The synthetic INIT is reported to plugins first, then each plugin's
    /// `init` runs with a store handle. Collaborators rely on that order.
    pub fn new(options: StoreOptions) -> Store {
        let store = Store {
            inner: Arc::new(StoreShared {
                state: Mutex::new(Arc::new(StackState::default())),
                listeners: Mutex::new(FxHashMap::default()),
                next_listener_id: AtomicU64::new(1),
                plugins: Mutex::new(options.plugins),
                resolver: Mutex::new(None),
                current_handle: Mutex::new(None),
                driver: MotionDriver::new(),
                transition_duration_ms: options.transition_duration_ms,
                default_transition: options.default_transition,
            }),
        };

        let init = StackEvent::init(options.initial_name, options.initial_params);
        let state = {
            let mut state = store.inner.state.lock().unwrap();
            let next = aggregate(&state, &init);
            *state = next.clone();
            next
        };

        let plugins = store.inner.plugins.lock().unwrap().clone();
        for plugin in &plugins {
            plugin.on_event(&init, &state);
        }
        for plugin in &plugins {
            plugin.init(store.clone());
        }
        store
    }

    /// Current immutable snapshot
    pub fn get_state(&self) -> Arc<StackState> {
        self.inner.state.lock().unwrap().clone()
    }

    /// The driver the host must advance from its frame scheduler
    pub fn motion_driver(&self) -> &MotionDriver {
        &self.inner.driver
    }

    /// Handle for wiring gestures and morphs to this store's driver
    pub fn motion(&self) -> MotionHandle {
        self.inner.driver.handle()
    }

    /// Install the id → surface lookup used to resolve transition sides.
    /// Set by the rendering binding once screens can be measured.
    pub fn set_surface_resolver(&self, resolver: SurfaceResolver) {
        *self.inner.resolver.lock().unwrap() = Some(resolver);
    }

    /// Observe every state change. The listener runs after plugins, outside
    /// the state lock.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StackState) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap()
            .insert(id, Arc::new(listener));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.listeners.lock().unwrap().remove(&id.0);
    }

    /// Push a new activity. Ignored while a transition is active.
    pub fn push(&self, name: &str, params: Params, transition: Option<TransitionName>) {
        if self.transition_active() {
            tracing::debug!(name, "push ignored: transition in progress");
            return;
        }
        let transition = transition.unwrap_or(self.inner.default_transition);
        self.dispatch(StackEvent::push(name, params, transition));
    }

    /// Pop the top activity. Ignored while a transition is active.
    pub fn pop(&self, transition: Option<TransitionName>) {
        if self.transition_active() {
            tracing::debug!("pop ignored: transition in progress");
            return;
        }
        self.dispatch(StackEvent::pop(transition));
    }

    /// Replace the top activity. Ignored while a transition is active.
    pub fn replace(&self, name: &str, params: Params, transition: Option<TransitionName>) {
        if self.transition_active() {
            tracing::debug!(name, "replace ignored: transition in progress");
            return;
        }
        let transition = transition.unwrap_or(self.inner.default_transition);
        self.dispatch(StackEvent::replace(name, params, transition));
    }

    /// Apply an event directly. Low-level: performs no transition-active
    /// guarding.
    pub fn dispatch(&self, event: StackEvent) {
        let state = {
            let mut state = self.inner.state.lock().unwrap();
            let next = aggregate(&state, &event);
            *state = next.clone();
            next
        };
        tracing::debug!(event = event.kind(), "dispatched");

        let plugins = self.inner.plugins.lock().unwrap().clone();
        for plugin in &plugins {
            plugin.on_event(&event, &state);
        }
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect();
        for listener in &listeners {
            listener(&state);
        }

        let starts_transition = matches!(
            event,
            StackEvent::Push { .. } | StackEvent::Pop { .. } | StackEvent::Replace { .. }
        );
        if starts_transition && state.transition.is_some() {
            self.run_active_transition(&state);
        }
    }

    /// Tear down: cancel any running transition and destroy plugins.
    pub fn destroy(&self) {
        if let Some(handle) = self.inner.current_handle.lock().unwrap().take() {
            handle.cancel();
        }
        let plugins = std::mem::take(&mut *self.inner.plugins.lock().unwrap());
        for plugin in &plugins {
            plugin.destroy();
        }
    }

    fn transition_active(&self) -> bool {
        self.inner.state.lock().unwrap().transition.is_some()
    }

    fn run_active_transition(&self, state: &StackState) {
        let Some(active) = &state.transition else {
            return;
        };

        // A superseded handle must be cancelled before its replacement
        // starts, or its leftover properties bleed into the new animation
        if let Some(previous) = self.inner.current_handle.lock().unwrap().take() {
            previous.cancel();
        }

        let resolver = self.inner.resolver.lock().unwrap().clone();
        let resolve = |id: Option<&String>| -> Option<Arc<dyn RenderSurface>> {
            match (id, &resolver) {
                (Some(id), Some(resolver)) => resolver(id),
                _ => None,
            }
        };
        let entering = resolve(active.entering_id.as_ref());
        let exiting = resolve(active.exiting_id.as_ref());

        if entering.is_none() && exiting.is_none() {
            // Nothing mounted yet (first render): degrade to an instant
            // transition and advance the state machine now
            tracing::debug!("no surfaces mounted; completing transition immediately");
            self.dispatch(StackEvent::TransitionComplete);
            return;
        }

        let preset = TransitionPreset::named(active.transition);
        let handle = run_transition(
            &self.inner.driver.handle(),
            &preset,
            active.direction(),
            entering,
            exiting,
            self.inner.transition_duration_ms,
        );
        *self.inner.current_handle.lock().unwrap() = Some(handle.clone());

        let weak: Weak<StoreShared> = Arc::downgrade(&self.inner);
        handle.finished().on_finished(move || {
            if let Some(inner) = weak.upgrade() {
                inner.current_handle.lock().unwrap().take();
                Store { inner }.dispatch(StackEvent::TransitionComplete);
            }
        });
    }
}
