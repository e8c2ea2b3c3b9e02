//! Component-scoped controller binding.
//!
//! DESIGN
//! ======
//! Drives a [`ControllerBinding`] from the Leptos owner lifecycle: bind when
//! the hook runs (component mount), reconfigure from an effect that tracks the
//! externally supplied controller, unbind in `on_cleanup` (component unmount).
//! The default rebuild callback bumps a revision signal; anything that reads
//! [`UseController::track`] re-renders on controller notifications.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use leptos::prelude::*;
use statekit::{ControllerBinding, Observable, Ownership};

/// Shared handle to a binding owned by the current component.
pub struct ControllerHandle<T: Observable + 'static> {
    binding: Arc<Mutex<ControllerBinding<T>>>,
}

impl<T: Observable + 'static> Clone for ControllerHandle<T> {
    fn clone(&self) -> Self {
        Self { binding: Arc::clone(&self.binding) }
    }
}

impl<T: Observable + 'static> ControllerHandle<T> {
    fn lock(&self) -> MutexGuard<'_, ControllerBinding<T>> {
        self.binding.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The currently bound controller.
    ///
    /// # Panics
    ///
    /// Panics after the component was cleaned up.
    pub fn controller(&self) -> Arc<T> {
        Arc::clone(self.lock().controller())
    }

    pub fn ownership(&self) -> Option<Ownership> {
        self.lock().ownership()
    }
}

/// [`ControllerHandle`] plus the revision signal bumped on every notification.
pub struct UseController<T: Observable + 'static> {
    handle: ControllerHandle<T>,
    revision: RwSignal<u64>,
}

impl<T: Observable + 'static> Clone for UseController<T> {
    fn clone(&self) -> Self {
        Self { handle: self.handle.clone(), revision: self.revision }
    }
}

impl<T: Observable + 'static> UseController<T> {
    pub fn controller(&self) -> Arc<T> {
        self.handle.controller()
    }

    pub fn handle(&self) -> &ControllerHandle<T> {
        &self.handle
    }

    /// Subscribe the current reactive scope to controller notifications.
    pub fn track(&self) {
        self.revision.track();
    }
}

/// Bind a controller to the current component, re-rendering on every notification.
///
/// `external` is read reactively: when it yields a different controller
/// (by identity), the binding unbinds the old one and binds the new one.
/// `factory` builds the controller whenever `external` yields `None`.
pub fn use_controller<T, E, F>(external: E, factory: F) -> UseController<T>
where
    T: Observable + 'static,
    E: Fn() -> Option<Arc<T>> + Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    let revision = RwSignal::new(0_u64);
    let handle = use_controller_with(external, factory, move || {
        revision.update(|n| *n = n.wrapping_add(1));
    });
    UseController { handle, revision }
}

/// Like [`use_controller`] with a caller-supplied rebuild callback in place of
/// the revision signal. `rebuild` may run any number of times.
pub fn use_controller_with<T, E, F, R>(external: E, factory: F, rebuild: R) -> ControllerHandle<T>
where
    T: Observable + 'static,
    E: Fn() -> Option<Arc<T>> + Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
    R: Fn() + Send + Sync + 'static,
{
    let mut binding = ControllerBinding::new(factory, rebuild);
    binding.bind(untrack(&external));
    let handle = ControllerHandle { binding: Arc::new(Mutex::new(binding)) };

    let reconfigure = handle.clone();
    Effect::new(move || {
        let next = external();
        reconfigure.lock().reconfigure(next);
    });

    let cleanup = handle.clone();
    on_cleanup(move || cleanup.lock().unbind());

    handle
}
