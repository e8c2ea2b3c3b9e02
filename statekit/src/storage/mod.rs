//! Persistence contract for the session's two slots: `user` and `token`.
//!
//! ARCHITECTURE
//! ============
//! [`SessionStorage`] is the only seam between [`crate::auth::AuthSession`]
//! and whatever medium keeps credentials across restarts. The session knows
//! nothing about that medium; each implementation names its own `Error` and
//! that error reaches callers unmodified.
//!
//! Implementations must serialize their own internal state. The session never
//! issues overlapping calls itself, but callers driving two session operations
//! at once can.

mod json_file;
mod memory;

pub use json_file::{FileStorageError, JsonFileStorage};
pub use memory::MemoryStorage;

use async_trait::async_trait;

/// Asynchronous storage for exactly one user record and one token record.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Opaque user record.
    type User: Send + Sync + 'static;
    /// Opaque credential artifact.
    type Token: Send + Sync + 'static;
    /// Failure model of the backing medium.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the stored user, if any.
    async fn read_user(&self) -> Result<Option<Self::User>, Self::Error>;

    /// Read the stored token, if any.
    async fn read_token(&self) -> Result<Option<Self::Token>, Self::Error>;

    /// Replace the stored user.
    async fn save_user(&self, user: &Self::User) -> Result<(), Self::Error>;

    /// Replace the stored token.
    async fn save_token(&self, token: &Self::Token) -> Result<(), Self::Error>;

    /// Remove the stored user. Clearing an empty slot succeeds.
    async fn clear_user(&self) -> Result<(), Self::Error>;

    /// Remove the stored token. Clearing an empty slot succeeds.
    async fn clear_token(&self) -> Result<(), Self::Error>;
}
