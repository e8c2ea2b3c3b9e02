//! Form helpers: declarative field validators and an observable submission
//! controller.
//!
//! The submission controller is an [`crate::notify::Observable`], so a form
//! component binds it with [`crate::binding::ControllerBinding`] exactly like
//! a session.

pub mod submit;
pub mod validators;

pub use submit::{FormController, FormHooks, SubmitOutcome};
pub use validators::{FieldValidator, Rule, ValidationError, is_blank, is_email, validate_fields};
