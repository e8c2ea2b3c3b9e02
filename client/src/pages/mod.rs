//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and binds its controllers through
//! `util::controller`.

pub mod sign_in;
