//! Completion signals for animation handles
//!
//! Every animation handle exposes a [`Completion`] instead of a promise:
//! an explicitly-stated future that is either pending, finished, or
//! cancelled. Cancellation and natural completion are distinct terminal
//! states, so callers never have to infer "cancelled" from a rejection.

use std::sync::{Arc, Mutex};

/// Terminal state of a [`Completion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionState {
    /// The animation is still running (or paused)
    Pending,
    /// Every underlying animation reached its end
    Finished,
    /// The handle was cancelled before finishing; finish callbacks will
    /// never fire
    Cancelled,
}

struct CompletionInner {
    state: CompletionState,
    callbacks: Vec<Box<dyn FnOnce() + Send>>,
}

/// A settle-once completion signal shared between an animation handle and
/// its observers.
#[derive(Clone)]
pub struct Completion {
    inner: Arc<Mutex<CompletionInner>>,
}

impl Completion {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CompletionInner {
                state: CompletionState::Pending,
                callbacks: Vec::new(),
            })),
        }
    }

    pub fn state(&self) -> CompletionState {
        self.inner.lock().unwrap().state
    }

    pub fn is_pending(&self) -> bool {
        self.state() == CompletionState::Pending
    }

    pub fn is_finished(&self) -> bool {
        self.state() == CompletionState::Finished
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == CompletionState::Cancelled
    }

    /// Run `f` once the signal settles as finished.
    ///
    /// Fires immediately when already finished; never fires when cancelled.
    pub fn on_finished<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let run_now = {
            let mut inner = self.inner.lock().unwrap();
            match inner.state {
                CompletionState::Pending => {
                    inner.callbacks.push(Box::new(f));
                    return;
                }
                CompletionState::Finished => true,
                CompletionState::Cancelled => false,
            }
        };
        if run_now {
            f();
        }
    }

    /// Settle as finished and drain callbacks. First settle wins.
    ///
    /// Callbacks run outside the internal lock so they may register further
    /// observers or start new animations.
    pub(crate) fn settle_finished(&self) {
        let callbacks = {
            let mut inner = self.inner.lock().unwrap();
            if inner.state != CompletionState::Pending {
                return;
            }
            inner.state = CompletionState::Finished;
            std::mem::take(&mut inner.callbacks)
        };
        for callback in callbacks {
            callback();
        }
    }

    /// Settle as cancelled, dropping any registered callbacks.
    pub(crate) fn settle_cancelled(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state == CompletionState::Pending {
            inner.state = CompletionState::Cancelled;
            inner.callbacks.clear();
        }
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Completion").field(&self.state()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_finish_fires_callbacks_once() {
        let completion = Completion::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        completion.on_finished(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(completion.is_pending());
        completion.settle_finished();
        completion.settle_finished();
        assert!(completion.is_finished());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_after_finish_fires_immediately() {
        let completion = Completion::new();
        completion.settle_finished();

        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        completion.on_finished(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_suppresses_callbacks() {
        let completion = Completion::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        completion.on_finished(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        completion.settle_cancelled();
        assert!(completion.is_cancelled());
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // Cancelled is terminal: a later finish is ignored
        completion.settle_finished();
        assert!(completion.is_cancelled());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_may_register_another() {
        let completion = Completion::new();
        let count = Arc::new(AtomicUsize::new(0));

        let outer = completion.clone();
        let c = count.clone();
        completion.on_finished(move || {
            // Settled by now, so this fires inline
            outer.on_finished(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        });

        completion.settle_finished();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
