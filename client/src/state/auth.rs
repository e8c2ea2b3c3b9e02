//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. `AuthState` is a plain snapshot derived
//! from the shared [`ClientSession`]; components never mutate it directly.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::{Deserialize, Serialize};
use statekit::{AuthSession, SessionSnapshot};

use crate::util::session_storage::LocalSessionStorage;

/// Signed-in user record persisted in the `user` slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub name: String,
}

impl SessionUser {
    /// User record for `email`, named after its local part.
    #[must_use]
    pub fn from_email(email: &str) -> Self {
        let email = email.trim();
        let name = email.split_once('@').map_or(email, |(local, _)| local);
        Self { email: email.to_owned(), name: name.to_owned() }
    }
}

pub type ClientStorage = LocalSessionStorage<SessionUser, String>;
pub type ClientSession = AuthSession<ClientStorage>;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    pub loading: bool,
}

impl AuthState {
    /// State shown before the session has been restored from storage.
    #[must_use]
    pub fn loading() -> Self {
        Self { user: None, loading: true }
    }

    /// Loaded state for `snapshot`. A user without a token counts as signed out.
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot<SessionUser, String>) -> Self {
        let user = if snapshot.is_signed_in() { snapshot.user.clone() } else { None };
        Self { user, loading: false }
    }
}
