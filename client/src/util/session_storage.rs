//! Browser `localStorage` backend for the auth session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each slot is one JSON-encoded `localStorage` entry, keyed by the configured
//! prefix (`statekit_user`, `statekit_token`). Outside the `hydrate` build
//! there is no browser: reads return nothing and writes are accepted and
//! dropped, which keeps server rendering deterministic.

#[cfg(test)]
#[path = "session_storage_test.rs"]
mod session_storage_test;

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use statekit::{SessionStorage, StorageConfig};

/// Error returned by [`LocalSessionStorage`] operations.
#[derive(Debug, thiserror::Error)]
pub enum LocalStorageError {
    /// No window, or the browser denied access to `localStorage`.
    #[error("browser localStorage is unavailable")]
    Unavailable,
    /// The browser refused the operation (quota, privacy mode).
    #[error("localStorage {op} failed for `{key}`")]
    Rejected { op: &'static str, key: String },
    /// A stored slot does not decode as the expected type.
    #[error("stored session value is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// [`SessionStorage`] over two `localStorage` entries.
pub struct LocalSessionStorage<U, T> {
    user_key: String,
    token_key: String,
    _slots: PhantomData<fn() -> (U, T)>,
}

impl<U, T> LocalSessionStorage<U, T> {
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self { user_key: config.user_key(), token_key: config.token_key(), _slots: PhantomData }
    }

    #[must_use]
    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    #[must_use]
    pub fn token_key(&self) -> &str {
        &self.token_key
    }
}

impl<U, T> Default for LocalSessionStorage<U, T> {
    fn default() -> Self {
        Self::new(&StorageConfig::default())
    }
}

pub(crate) fn decode<V: DeserializeOwned>(raw: Option<String>) -> Result<Option<V>, LocalStorageError> {
    Ok(raw.as_deref().map(serde_json::from_str).transpose()?)
}

pub(crate) fn encode<V: Serialize>(value: &V) -> Result<String, LocalStorageError> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, LocalStorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(LocalStorageError::Unavailable)
}

fn read_raw(key: &str) -> Result<Option<String>, LocalStorageError> {
    #[cfg(feature = "hydrate")]
    {
        local_storage()?
            .get_item(key)
            .map_err(|_| LocalStorageError::Rejected { op: "read", key: key.to_owned() })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
        Ok(None)
    }
}

fn write_raw(key: &str, raw: &str) -> Result<(), LocalStorageError> {
    #[cfg(feature = "hydrate")]
    {
        local_storage()?.set_item(key, raw).map_err(|_| {
            log::warn!("localStorage write rejected for {key}");
            LocalStorageError::Rejected { op: "write", key: key.to_owned() }
        })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (key, raw);
        Ok(())
    }
}

fn remove_raw(key: &str) -> Result<(), LocalStorageError> {
    #[cfg(feature = "hydrate")]
    {
        local_storage()?
            .remove_item(key)
            .map_err(|_| LocalStorageError::Rejected { op: "remove", key: key.to_owned() })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
        Ok(())
    }
}

#[async_trait]
impl<U, T> SessionStorage for LocalSessionStorage<U, T>
where
    U: Serialize + DeserializeOwned + Send + Sync + 'static,
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    type User = U;
    type Token = T;
    type Error = LocalStorageError;

    async fn read_user(&self) -> Result<Option<U>, LocalStorageError> {
        decode(read_raw(&self.user_key)?)
    }

    async fn read_token(&self) -> Result<Option<T>, LocalStorageError> {
        decode(read_raw(&self.token_key)?)
    }

    async fn save_user(&self, user: &U) -> Result<(), LocalStorageError> {
        write_raw(&self.user_key, &encode(user)?)
    }

    async fn save_token(&self, token: &T) -> Result<(), LocalStorageError> {
        write_raw(&self.token_key, &encode(token)?)
    }

    async fn clear_user(&self) -> Result<(), LocalStorageError> {
        remove_raw(&self.user_key)
    }

    async fn clear_token(&self) -> Result<(), LocalStorageError> {
        remove_raw(&self.token_key)
    }
}
