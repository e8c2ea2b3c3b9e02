//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior
//! and observe the session through the same binding.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use statekit::{Ownership, StorageConfig};

use super::controller::use_controller;
use crate::state::auth::{AuthState, ClientSession, ClientStorage};

/// Whether a route guard should send the user to `/login`.
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}

/// Redirect to `/login` whenever auth has loaded and no user is present.
pub fn install_unauth_redirect<F>(auth: Signal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let state = auth.get();
        if should_redirect_unauth(&state) {
            navigate("/login", NavigateOptions::default());
        }
    });
}

/// Session built when no parent supplies one: browser storage under the
/// default key prefix.
pub fn new_client_session() -> ClientSession {
    ClientSession::new(ClientStorage::new(&StorageConfig::default()))
}

/// Bind the auth session to the current component and expose it as a signal.
///
/// With `external` the parent owns (and has initialized) the session. Without
/// it the component creates its own, restores it from storage, and disposes
/// it on unmount; until the restore finishes the state reports `loading`.
///
/// Either way the bound session is provided as `Arc<ClientSession>` context,
/// so descendants such as the sign-in page act on the same instance.
pub fn use_auth_session(external: Option<Arc<ClientSession>>) -> Signal<AuthState> {
    let session = use_controller(move || external.clone(), new_client_session);
    provide_context(session.controller());
    let restoring = RwSignal::new(session.handle().ownership() == Some(Ownership::SelfCreated));

    if restoring.get_untracked() {
        #[cfg(feature = "hydrate")]
        {
            let controller = session.controller();
            leptos::task::spawn_local(async move {
                if let Err(e) = controller.initialize().await {
                    log::warn!("session restore failed: {e}");
                }
                restoring.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        restoring.set(false);
    }

    Signal::derive(move || {
        session.track();
        if restoring.get() {
            return AuthState::loading();
        }
        AuthState::from_snapshot(&session.controller().snapshot())
    })
}
