//! Auth-session state for the current application user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `AuthSession` holds at most one user/token pair, restores it from a
//! [`SessionStorage`] at startup, and notifies its listeners on every
//! transition. Components bind to it through
//! [`crate::binding::ControllerBinding`].
//!
//! ERROR HANDLING
//! ==============
//! Local state changes only after storage succeeds. A failed `sign_in` or
//! `sign_out` leaves the in-memory session exactly as it was and fires no
//! notification; storage slots already written before the failure are not
//! rolled back. Storage errors are returned as-is.
//!
//! TRADE-OFFS
//! ==========
//! Operations are not mutually exclusive. Two overlapping calls on the same
//! session interleave at their storage awaits and the last assignment wins.
//! Callers that can issue concurrent sign-in/sign-out must serialize them.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::notify::{Listeners, Observable};
use crate::storage::SessionStorage;

/// Point-in-time copy of the session pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot<U, T> {
    pub user: Option<U>,
    pub token: Option<T>,
}

impl<U, T> SessionSnapshot<U, T> {
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }
}

impl<U, T> Default for SessionSnapshot<U, T> {
    fn default() -> Self {
        Self { user: None, token: None }
    }
}

/// Observable holder of the signed-in user and its token.
pub struct AuthSession<S: SessionStorage> {
    storage: S,
    state: Mutex<SessionSnapshot<S::User, S::Token>>,
    listeners: Listeners,
}

impl<S: SessionStorage> AuthSession<S> {
    /// Create a signed-out session over `storage`. Call [`Self::initialize`]
    /// to restore persisted state.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self { storage, state: Mutex::new(SessionSnapshot::default()), listeners: Listeners::new() }
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn state(&self) -> MutexGuard<'_, SessionSnapshot<S::User, S::Token>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load both slots from storage and replace the in-memory pair.
    ///
    /// All-or-nothing: if either read fails, nothing is assigned and no
    /// listener runs. On success listeners are always notified, whether or
    /// not anyone was subscribed yet.
    ///
    /// # Errors
    ///
    /// Returns the storage error from whichever read failed first.
    pub async fn initialize(&self) -> Result<(), S::Error> {
        let user = self.storage.read_user().await?;
        let token = self.storage.read_token().await?;
        let signed_in = token.is_some();
        *self.state() = SessionSnapshot { user, token };
        debug!(signed_in, "session restored from storage");
        self.listeners.notify();
        Ok(())
    }

    /// Persist `user` then `token`, then adopt them and notify.
    ///
    /// If saving the user fails the token write is not attempted.
    ///
    /// # Errors
    ///
    /// Returns the storage error; in-memory state is unchanged and no
    /// notification fires.
    pub async fn sign_in(&self, user: S::User, token: S::Token) -> Result<(), S::Error> {
        self.storage.save_user(&user).await?;
        self.storage.save_token(&token).await?;
        *self.state() = SessionSnapshot { user: Some(user), token: Some(token) };
        info!("session signed in");
        self.listeners.notify();
        Ok(())
    }

    /// Clear the user slot then the token slot, then drop the in-memory pair
    /// and notify.
    ///
    /// # Errors
    ///
    /// Returns the storage error; in-memory state is unchanged and no
    /// notification fires.
    pub async fn sign_out(&self) -> Result<(), S::Error> {
        self.storage.clear_user().await?;
        self.storage.clear_token().await?;
        *self.state() = SessionSnapshot::default();
        info!("session signed out");
        self.listeners.notify();
        Ok(())
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.state().token.is_some()
    }
}

impl<S> AuthSession<S>
where
    S: SessionStorage,
    S::User: Clone,
    S::Token: Clone,
{
    /// Current user.
    ///
    /// # Panics
    ///
    /// Panics when no user is held. Reading the user of a signed-out session
    /// is a programming error; use [`Self::try_user`] to check first.
    #[must_use]
    pub fn user(&self) -> S::User {
        self.try_user().expect("AuthSession::user read while signed out")
    }

    /// Current token.
    ///
    /// # Panics
    ///
    /// Panics when signed out. Use [`Self::try_token`] to check first.
    #[must_use]
    pub fn token(&self) -> S::Token {
        self.try_token().expect("AuthSession::token read while signed out")
    }

    #[must_use]
    pub fn try_user(&self) -> Option<S::User> {
        self.state().user.clone()
    }

    #[must_use]
    pub fn try_token(&self) -> Option<S::Token> {
        self.state().token.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot<S::User, S::Token> {
        self.state().clone()
    }
}

impl<S: SessionStorage> Observable for AuthSession<S> {
    fn listeners(&self) -> &Listeners {
        &self.listeners
    }
}
