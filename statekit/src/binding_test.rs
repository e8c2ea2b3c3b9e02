use super::*;
use crate::notify::Listeners;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================
// Counting controller
// =============================================================

#[derive(Default)]
struct Counted {
    listeners: Listeners,
    subscribes: AtomicUsize,
    unsubscribes: AtomicUsize,
    disposals: AtomicUsize,
}

impl Counted {
    fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl Observable for Counted {
    fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.subscribes.fetch_add(1, Ordering::SeqCst);
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.unsubscribes.fetch_add(1, Ordering::SeqCst);
        self.listeners.unsubscribe(subscription)
    }

    fn dispose(&self) {
        self.disposals.fetch_add(1, Ordering::SeqCst);
        self.listeners.dispose();
    }
}

struct Harness {
    binding: ControllerBinding<Counted>,
    built: Arc<AtomicUsize>,
    rebuilds: Arc<AtomicUsize>,
}

fn harness() -> Harness {
    let built = Arc::new(AtomicUsize::new(0));
    let rebuilds = Arc::new(AtomicUsize::new(0));
    let built_in_factory = built.clone();
    let rebuilds_in_callback = rebuilds.clone();
    let binding = ControllerBinding::new(
        move || {
            built_in_factory.fetch_add(1, Ordering::SeqCst);
            Counted::default()
        },
        move || {
            rebuilds_in_callback.fetch_add(1, Ordering::SeqCst);
        },
    );
    Harness { binding, built, rebuilds }
}

// =============================================================
// Self-created lifecycle
// =============================================================

#[test]
fn self_created_is_built_once_across_mount_reconfigure_unmount() {
    let mut h = harness();

    let controller = h.binding.bind(None);
    assert!(!h.binding.reconfigure(None));
    assert!(!h.binding.reconfigure(None));
    h.binding.unbind();

    assert_eq!(h.built.load(Ordering::SeqCst), 1);
    assert_eq!(Counted::count(&controller.disposals), 1);
    assert_eq!(Counted::count(&controller.subscribes), 1);
    assert_eq!(Counted::count(&controller.unsubscribes), 1);
}

#[test]
fn self_created_ownership_is_reported() {
    let mut h = harness();
    h.binding.bind(None);
    assert_eq!(h.binding.ownership(), Some(Ownership::SelfCreated));
    assert!(h.binding.is_bound());
}

#[test]
fn notifications_reach_rebuild_callback() {
    let mut h = harness();
    let controller = h.binding.bind(None);

    controller.listeners().notify();
    controller.listeners().notify();

    assert_eq!(h.rebuilds.load(Ordering::SeqCst), 2);
}

#[test]
fn no_rebuild_after_unbind() {
    let mut h = harness();
    let external = Arc::new(Counted::default());
    h.binding.bind(Some(external.clone()));
    h.binding.unbind();

    external.listeners().notify();

    assert_eq!(h.rebuilds.load(Ordering::SeqCst), 0);
}

// =============================================================
// External lifecycle
// =============================================================

#[test]
fn external_is_adopted_without_factory() {
    let mut h = harness();
    let external = Arc::new(Counted::default());

    let bound = h.binding.bind(Some(external.clone()));

    assert!(Arc::ptr_eq(&bound, &external));
    assert_eq!(h.binding.ownership(), Some(Ownership::External));
    assert_eq!(h.built.load(Ordering::SeqCst), 0);
}

#[test]
fn external_is_never_disposed_on_unmount() {
    let mut h = harness();
    let external = Arc::new(Counted::default());
    h.binding.bind(Some(external.clone()));

    h.binding.unbind();

    assert_eq!(Counted::count(&external.disposals), 0);
    assert_eq!(Counted::count(&external.unsubscribes), 1);
    assert!(external.listeners().is_empty());
}

#[test]
fn same_external_instance_is_not_rebound() {
    let mut h = harness();
    let external = Arc::new(Counted::default());
    h.binding.bind(Some(external.clone()));

    assert!(!h.binding.reconfigure(Some(external.clone())));

    assert_eq!(Counted::count(&external.subscribes), 1);
    assert_eq!(Counted::count(&external.unsubscribes), 0);
}

#[test]
fn replacing_external_moves_subscription_without_disposal() {
    let mut h = harness();
    let old = Arc::new(Counted::default());
    let new = Arc::new(Counted::default());
    h.binding.bind(Some(old.clone()));

    assert!(h.binding.reconfigure(Some(new.clone())));

    assert_eq!(Counted::count(&old.unsubscribes), 1);
    assert_eq!(Counted::count(&old.disposals), 0);
    assert_eq!(Counted::count(&new.subscribes), 1);
    assert!(Arc::ptr_eq(h.binding.controller(), &new));
    assert_eq!(h.built.load(Ordering::SeqCst), 0);
}

#[test]
fn external_removed_falls_back_to_factory() {
    let mut h = harness();
    let external = Arc::new(Counted::default());
    h.binding.bind(Some(external.clone()));

    assert!(h.binding.reconfigure(None));

    assert_eq!(Counted::count(&external.disposals), 0);
    assert_eq!(h.built.load(Ordering::SeqCst), 1);
    assert_eq!(h.binding.ownership(), Some(Ownership::SelfCreated));
}

#[test]
fn external_supplied_after_self_created_disposes_the_old_one() {
    let mut h = harness();
    let own = h.binding.bind(None);
    let external = Arc::new(Counted::default());

    assert!(h.binding.reconfigure(Some(external.clone())));

    assert_eq!(Counted::count(&own.disposals), 1);
    assert_eq!(h.binding.ownership(), Some(Ownership::External));
}

#[test]
fn bound_instance_supplied_as_external_is_adopted_without_rebind() {
    let mut h = harness();
    let own = h.binding.bind(None);

    assert!(!h.binding.reconfigure(Some(Arc::clone(&own))));

    assert_eq!(h.binding.ownership(), Some(Ownership::External));
    assert!(Arc::ptr_eq(h.binding.controller(), &own));
    assert_eq!(Counted::count(&own.subscribes), 1);
    assert_eq!(Counted::count(&own.unsubscribes), 0);
    assert_eq!(Counted::count(&own.disposals), 0);

    own.listeners().notify();
    assert_eq!(h.rebuilds.load(Ordering::SeqCst), 1);

    h.binding.unbind();
    assert_eq!(Counted::count(&own.unsubscribes), 1);
    assert_eq!(Counted::count(&own.disposals), 0);
    assert_eq!(h.built.load(Ordering::SeqCst), 1);
}

// =============================================================
// Drop / contract violations
// =============================================================

#[test]
fn drop_unbinds_self_created() {
    let mut h = harness();
    let controller = h.binding.bind(None);

    drop(h);

    assert_eq!(Counted::count(&controller.disposals), 1);
}

#[test]
fn unbind_twice_disposes_once() {
    let mut h = harness();
    let controller = h.binding.bind(None);
    h.binding.unbind();
    h.binding.unbind();
    assert_eq!(Counted::count(&controller.disposals), 1);
}

#[test]
fn reconfigure_unbound_binds() {
    let mut h = harness();
    assert!(h.binding.reconfigure(None));
    assert!(h.binding.is_bound());
}

#[test]
#[should_panic(expected = "already")]
fn double_bind_panics() {
    let mut h = harness();
    h.binding.bind(None);
    h.binding.bind(None);
}

#[test]
#[should_panic(expected = "no controller bound")]
fn controller_before_mount_panics() {
    let h = harness();
    let _ = h.binding.controller();
}

#[test]
fn try_controller_is_none_before_mount() {
    let h = harness();
    assert!(h.binding.try_controller().is_none());
    assert_eq!(h.binding.ownership(), None);
}
