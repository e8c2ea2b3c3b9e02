//! Session slots persisted as one JSON document on disk.
//!
//! DESIGN
//! ======
//! The file holds `{"user": ..., "token": ...}` with empty slots omitted. A
//! missing or empty file reads as an empty session. Every mutation is a
//! read-modify-write of the whole document under an async mutex, written to a
//! sibling `.tmp` file and renamed into place so a crash mid-write leaves the
//! previous document intact.
//!
//! A value that serializes to JSON `null` is indistinguishable from an empty
//! slot once stored.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use super::SessionStorage;
use crate::config::StorageConfig;

/// Error returned by [`JsonFileStorage`] operations.
#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    /// Reading, writing, or renaming the session file failed.
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The session file or one of its slots is not valid JSON for the slot type.
    #[error("session file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SlotFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<Value>,
}

/// File-backed [`SessionStorage`] for any serde-serializable user and token.
pub struct JsonFileStorage<U, T> {
    path: PathBuf,
    io: Mutex<()>,
    _slots: PhantomData<fn() -> (U, T)>,
}

impl<U, T> JsonFileStorage<U, T> {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), io: Mutex::new(()), _slots: PhantomData }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.session_path.clone())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn load(&self) -> Result<SlotFile, FileStorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(SlotFile::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SlotFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, file: &SlotFile) -> Result<(), FileStorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_vec_pretty(file)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "session file written");
        Ok(())
    }

    async fn read_slot<V: DeserializeOwned>(
        &self,
        pick: impl FnOnce(SlotFile) -> Option<Value>,
    ) -> Result<Option<V>, FileStorageError> {
        let _guard = self.io.lock().await;
        let file = self.load().await?;
        Ok(pick(file).map(serde_json::from_value).transpose()?)
    }

    async fn update(&self, apply: impl FnOnce(&mut SlotFile)) -> Result<(), FileStorageError> {
        let _guard = self.io.lock().await;
        let mut file = self.load().await?;
        apply(&mut file);
        self.store(&file).await
    }
}

#[async_trait]
impl<U, T> SessionStorage for JsonFileStorage<U, T>
where
    U: Serialize + DeserializeOwned + Send + Sync + 'static,
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    type User = U;
    type Token = T;
    type Error = FileStorageError;

    async fn read_user(&self) -> Result<Option<U>, FileStorageError> {
        self.read_slot(|f| f.user).await
    }

    async fn read_token(&self) -> Result<Option<T>, FileStorageError> {
        self.read_slot(|f| f.token).await
    }

    async fn save_user(&self, user: &U) -> Result<(), FileStorageError> {
        let value = serde_json::to_value(user)?;
        self.update(|f| f.user = Some(value)).await
    }

    async fn save_token(&self, token: &T) -> Result<(), FileStorageError> {
        let value = serde_json::to_value(token)?;
        self.update(|f| f.token = Some(value)).await
    }

    async fn clear_user(&self) -> Result<(), FileStorageError> {
        self.update(|f| f.user = None).await
    }

    async fn clear_token(&self) -> Result<(), FileStorageError> {
        self.update(|f| f.token = None).await
    }
}

#[cfg(test)]
#[path = "json_file_test.rs"]
mod tests;
