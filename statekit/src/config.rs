//! Session storage configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_SESSION_PATH: &str = ".statekit/session.json";
pub const DEFAULT_KEY_PREFIX: &str = "statekit";

/// Where persisted session slots live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// File used by [`crate::storage::JsonFileStorage`].
    pub session_path: PathBuf,
    /// Prefix for key/value backends (browser `localStorage`), e.g. `statekit_user`.
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { session_path: PathBuf::from(DEFAULT_SESSION_PATH), key_prefix: DEFAULT_KEY_PREFIX.to_owned() }
    }
}

impl StorageConfig {
    /// Build storage config from environment variables.
    ///
    /// Optional:
    /// - `STATEKIT_SESSION_PATH`: default `.statekit/session.json`
    /// - `STATEKIT_KEY_PREFIX`: default `statekit`
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            session_path: PathBuf::from(env_or("STATEKIT_SESSION_PATH", DEFAULT_SESSION_PATH)),
            key_prefix: env_or("STATEKIT_KEY_PREFIX", DEFAULT_KEY_PREFIX),
        }
    }

    /// Storage key for the user slot.
    #[must_use]
    pub fn user_key(&self) -> String {
        format!("{}_user", self.key_prefix)
    }

    /// Storage key for the token slot.
    #[must_use]
    pub fn token_key(&self) -> String {
        format!("{}_token", self.key_prefix)
    }
}

pub(crate) fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}
