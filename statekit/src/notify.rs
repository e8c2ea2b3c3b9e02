//! Listener registry used by every observable controller in this crate.
//!
//! DESIGN
//! ======
//! Subscribers are keyed by a monotonically increasing [`Subscription`] handle
//! in a `BTreeMap`, so notification order is subscription order. `notify`
//! clones the current set of callbacks and releases the lock before invoking
//! them, which makes subscribe/unsubscribe from inside a callback safe: the
//! change applies to the next notification, not the one in flight.
//!
//! ERROR HANDLING
//! ==============
//! A panicking listener unwinds out of `notify`; the remaining listeners in
//! that pass are skipped. There is no isolation between subscribers.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback invoked on every state change of an observable.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`Listeners::subscribe`], consumed by [`Listeners::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: BTreeMap<u64, Listener>,
    disposed: bool,
}

/// Subscription-ordered set of change listeners.
#[derive(Default)]
pub struct Listeners {
    inner: Mutex<Registry>,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `listener` and return the handle that removes it.
    ///
    /// # Panics
    ///
    /// Panics if the registry was already disposed.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let mut registry = self.registry();
        assert!(!registry.disposed, "subscribe called on a disposed observable");
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.insert(id, listener);
        Subscription(id)
    }

    /// Remove the listener behind `subscription`. Returns `false` if it was
    /// not registered (already removed, or the registry was disposed).
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.registry().entries.remove(&subscription.0).is_some()
    }

    /// Invoke every current listener before returning.
    pub fn notify(&self) {
        let snapshot: Vec<Listener> = self.registry().entries.values().cloned().collect();
        for listener in snapshot {
            listener();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registry().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every listener; later `subscribe` calls panic, `notify` becomes a no-op.
    pub fn dispose(&self) {
        let mut registry = self.registry();
        registry.disposed = true;
        registry.entries.clear();
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.registry().disposed
    }
}

/// A controller whose state changes can be observed.
///
/// Implementors only expose their [`Listeners`]; subscription management and
/// disposal default to the registry. Override [`Observable::dispose`] to
/// release additional resources, keeping the call to `listeners().dispose()`.
pub trait Observable: Send + Sync {
    fn listeners(&self) -> &Listeners;

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners().subscribe(listener)
    }

    fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.listeners().unsubscribe(subscription)
    }

    fn dispose(&self) {
        self.listeners().dispose();
    }
}
