//! Observable form-submission controller.
//!
//! DESIGN
//! ======
//! The form supplies two hooks: a synchronous `validate` over its current
//! field values and an async `save`. `FormController::submit` runs validate,
//! and only on success runs save, publishing `submitting` transitions to its
//! listeners so the bound component can disable inputs and render errors.
//!
//! A second `submit` while one is in flight returns [`SubmitOutcome::Busy`]
//! without touching the hooks.

#[cfg(test)]
#[path = "submit_test.rs"]
mod submit_test;

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::validators::ValidationError;
use crate::notify::{Listeners, Observable};

/// Callbacks a form provides to [`FormController`].
#[async_trait]
pub trait FormHooks: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Check the current field values.
    ///
    /// # Errors
    ///
    /// Returns every field error to display.
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Persist the validated values.
    async fn save(&self) -> Result<(), Self::Error>;
}

/// Result of a completed `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Invalid(Vec<ValidationError>),
    /// Another submission was still in flight.
    Busy,
}

#[derive(Default)]
struct FormState {
    submitting: bool,
    errors: Vec<ValidationError>,
    save_error: Option<String>,
}

/// Runs a form's validate/save hooks and publishes progress.
pub struct FormController<H: FormHooks> {
    hooks: H,
    state: Mutex<FormState>,
    listeners: Listeners,
}

impl<H: FormHooks> FormController<H> {
    #[must_use]
    pub fn new(hooks: H) -> Self {
        Self { hooks, state: Mutex::new(FormState::default()), listeners: Listeners::new() }
    }

    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.state().submitting
    }

    /// Field errors from the most recent validation.
    #[must_use]
    pub fn errors(&self) -> Vec<ValidationError> {
        self.state().errors.clone()
    }

    /// Display text of the most recent save failure.
    #[must_use]
    pub fn save_error(&self) -> Option<String> {
        self.state().save_error.clone()
    }

    /// Validate, then save.
    ///
    /// # Errors
    ///
    /// Returns the `save` hook's error unchanged; its text is also kept for
    /// [`Self::save_error`].
    pub async fn submit(&self) -> Result<SubmitOutcome, H::Error> {
        if self.is_submitting() {
            debug!("submit ignored while a submission is in flight");
            return Ok(SubmitOutcome::Busy);
        }

        if let Err(errors) = self.hooks.validate() {
            debug!(count = errors.len(), "form validation failed");
            self.state().errors.clone_from(&errors);
            self.listeners.notify();
            return Ok(SubmitOutcome::Invalid(errors));
        }

        {
            let mut state = self.state();
            state.submitting = true;
            state.errors.clear();
            state.save_error = None;
        }
        self.listeners.notify();

        let result = self.hooks.save().await;

        {
            let mut state = self.state();
            state.submitting = false;
            if let Err(e) = &result {
                warn!(error = %e, "form save failed");
                state.save_error = Some(e.to_string());
            }
        }
        self.listeners.notify();

        result.map(|()| SubmitOutcome::Saved)
    }
}

impl<H: FormHooks> Observable for FormController<H> {
    fn listeners(&self) -> &Listeners {
        &self.listeners
    }
}
