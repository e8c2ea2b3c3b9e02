//! Controller lifecycle binding for UI components.
//!
//! DESIGN
//! ======
//! A component owns one `ControllerBinding` and calls it at its own lifecycle
//! points: [`ControllerBinding::bind`] on mount,
//! [`ControllerBinding::reconfigure`] whenever its inputs change, and
//! [`ControllerBinding::unbind`] on unmount (dropping the binding also
//! unbinds).
//!
//! The bound controller is either supplied by the parent (`External`) or
//! built by the binding's factory (`SelfCreated`). Both are held as
//! `Arc<T>`; ownership decides only who calls `dispose`. External controllers
//! are unsubscribed from, never disposed.
//!
//! Reconfiguration compares the supplied controller by pointer identity and
//! rebinds only on an actual change. Handing back the bound instance is not a
//! change; it only moves ownership to the host. A rebind is always a full unbind followed
//! by a bind; there is no partial swap.

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use std::sync::Arc;

use tracing::debug;

use crate::notify::{Listener, Observable, Subscription};

/// Who is responsible for disposing the bound controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// Built by the binding's factory; disposed on unbind.
    SelfCreated,
    /// Supplied by the host; only unsubscribed from on unbind.
    External,
}

struct Bound<T> {
    controller: Arc<T>,
    ownership: Ownership,
    subscription: Subscription,
}

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Binds at most one observable controller to a component's lifecycle.
pub struct ControllerBinding<T: Observable> {
    factory: Factory<T>,
    rebuild: Listener,
    bound: Option<Bound<T>>,
}

impl<T: Observable> ControllerBinding<T> {
    /// `factory` builds a controller when the host supplies none. `rebuild`
    /// runs on every controller notification; it must tolerate being called
    /// any number of times and should do nothing beyond scheduling a render.
    pub fn new<F, R>(factory: F, rebuild: R) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        R: Fn() + Send + Sync + 'static,
    {
        Self { factory: Box::new(factory), rebuild: Arc::new(rebuild), bound: None }
    }

    /// Mount: adopt `external`, or build one through the factory, and
    /// subscribe the rebuild callback. Returns the bound controller.
    ///
    /// # Panics
    ///
    /// Panics if a controller is already bound; unbind first.
    pub fn bind(&mut self, external: Option<Arc<T>>) -> Arc<T> {
        assert!(self.bound.is_none(), "ControllerBinding::bind called while a controller is already bound");
        let (controller, ownership) = match external {
            Some(controller) => (controller, Ownership::External),
            None => (Arc::new((self.factory)()), Ownership::SelfCreated),
        };
        let subscription = controller.subscribe(Arc::clone(&self.rebuild));
        debug!(?ownership, "controller bound");
        self.bound = Some(Bound { controller: Arc::clone(&controller), ownership, subscription });
        controller
    }

    /// Reconfigure pass: rebind if the supplied controller changed identity.
    ///
    /// A self-created controller stays bound while the host keeps supplying
    /// `None`. If the host hands back the instance that is already bound, the
    /// subscription is kept and ownership passes to the host, so the binding
    /// no longer disposes it. Returns `true` when a rebind happened. On an
    /// unbound binding this behaves like [`Self::bind`].
    pub fn reconfigure(&mut self, external: Option<Arc<T>>) -> bool {
        let unchanged = match (&mut self.bound, &external) {
            (None, _) => false,
            (Some(bound), None) => bound.ownership == Ownership::SelfCreated,
            (Some(bound), Some(next)) => {
                let same = Arc::ptr_eq(&bound.controller, next);
                if same && bound.ownership == Ownership::SelfCreated {
                    bound.ownership = Ownership::External;
                    debug!("bound controller adopted as external");
                }
                same
            }
        };
        if unchanged {
            return false;
        }
        self.unbind();
        self.bind(external);
        true
    }

    /// Unmount: unsubscribe the rebuild callback and dispose the controller
    /// if this binding created it. No-op when nothing is bound.
    pub fn unbind(&mut self) {
        let Some(bound) = self.bound.take() else {
            return;
        };
        bound.controller.unsubscribe(bound.subscription);
        if bound.ownership == Ownership::SelfCreated {
            bound.controller.dispose();
        }
        debug!(ownership = ?bound.ownership, "controller unbound");
    }

    /// The bound controller.
    ///
    /// # Panics
    ///
    /// Panics when called outside mount..unmount.
    #[must_use]
    pub fn controller(&self) -> &Arc<T> {
        &self
            .bound
            .as_ref()
            .expect("ControllerBinding::controller called with no controller bound")
            .controller
    }

    #[must_use]
    pub fn try_controller(&self) -> Option<&Arc<T>> {
        self.bound.as_ref().map(|b| &b.controller)
    }

    #[must_use]
    pub fn ownership(&self) -> Option<Ownership> {
        self.bound.as_ref().map(|b| b.ownership)
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }
}

impl<T: Observable> Drop for ControllerBinding<T> {
    fn drop(&mut self) {
        self.unbind();
    }
}
