//! # client
//!
//! Leptos glue for `statekit`: browser `localStorage` session storage,
//! component-scoped controller binding, a reactive view of the auth session,
//! and the sign-in page built on top of them.

pub mod pages;
pub mod state;
pub mod util;
