//! In-process storage. Clones share the same slots.

use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::SessionStorage;

struct Slots<U, T> {
    user: Option<U>,
    token: Option<T>,
}

/// Cloneable handle over shared in-memory user/token slots.
pub struct MemoryStorage<U, T> {
    slots: Arc<Mutex<Slots<U, T>>>,
}

impl<U, T> MemoryStorage<U, T> {
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Arc::new(Mutex::new(Slots { user: None, token: None })) }
    }

    /// Storage pre-populated with both slots.
    #[must_use]
    pub fn with_session(user: U, token: T) -> Self {
        Self { slots: Arc::new(Mutex::new(Slots { user: Some(user), token: Some(token) })) }
    }

    fn with_slots<R>(&self, f: impl FnOnce(&mut Slots<U, T>) -> R) -> R {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut slots)
    }
}

impl<U, T> Default for MemoryStorage<U, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U, T> Clone for MemoryStorage<U, T> {
    fn clone(&self) -> Self {
        Self { slots: Arc::clone(&self.slots) }
    }
}

#[async_trait]
impl<U, T> SessionStorage for MemoryStorage<U, T>
where
    U: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    type User = U;
    type Token = T;
    type Error = Infallible;

    async fn read_user(&self) -> Result<Option<U>, Infallible> {
        Ok(self.with_slots(|s| s.user.clone()))
    }

    async fn read_token(&self) -> Result<Option<T>, Infallible> {
        Ok(self.with_slots(|s| s.token.clone()))
    }

    async fn save_user(&self, user: &U) -> Result<(), Infallible> {
        self.with_slots(|s| s.user = Some(user.clone()));
        Ok(())
    }

    async fn save_token(&self, token: &T) -> Result<(), Infallible> {
        self.with_slots(|s| s.token = Some(token.clone()));
        Ok(())
    }

    async fn clear_user(&self) -> Result<(), Infallible> {
        self.with_slots(|s| s.user = None);
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), Infallible> {
        self.with_slots(|s| s.token = None);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
