//! Session state, controller lifecycle binding, and form helpers for UI clients.
//!
//! This crate is UI-framework agnostic. The `client` crate wires these types
//! into Leptos components; anything else that can call "rebuild" can use them
//! the same way.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mount creates or adopts a controller through [`binding::ControllerBinding`],
//! the controller (typically [`auth::AuthSession`]) restores itself from a
//! [`storage::SessionStorage`], and every state change is fanned out through
//! [`notify::Listeners`] back to the bound component.

pub mod auth;
pub mod binding;
pub mod config;
pub mod forms;
pub mod notify;
pub mod storage;

pub use auth::{AuthSession, SessionSnapshot};
pub use binding::{ControllerBinding, Ownership};
pub use config::StorageConfig;
pub use notify::{Listener, Listeners, Observable, Subscription};
pub use storage::SessionStorage;
