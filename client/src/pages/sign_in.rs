//! Sign-in page: email + access token stored in the shared auth session.
//!
//! The form is a [`FormController`] bound to the page, so field errors and the
//! busy state re-render through the same notification path as the session.

#[cfg(test)]
#[path = "sign_in_test.rs"]
mod sign_in_test;

use std::sync::Arc;

use async_trait::async_trait;
use leptos::prelude::*;
use statekit::forms::{FieldValidator, FormController, FormHooks, ValidationError, validate_fields};

use crate::state::auth::{ClientSession, SessionUser};
use crate::util::controller::use_controller;
use crate::util::session_storage::LocalStorageError;

const MIN_TOKEN_LEN: usize = 6;

fn email_field() -> FieldValidator {
    FieldValidator::new("Email").required().email()
}

fn token_field() -> FieldValidator {
    FieldValidator::new("Access token").required().min_length(MIN_TOKEN_LEN)
}

/// Validate raw inputs, returning the trimmed `(email, token)` pair.
///
/// # Errors
///
/// Returns one error per invalid field.
pub fn validate_sign_in_input(email: &str, token: &str) -> Result<(String, String), Vec<ValidationError>> {
    let email = email.trim();
    let token = token.trim();
    validate_fields(&[(&email_field(), email), (&token_field(), token)])?;
    Ok((email.to_owned(), token.to_owned()))
}

/// Join field errors into the single line shown under the form.
pub fn error_line(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

/// Form hooks reading the page's input signals and signing in on save.
///
/// `save` only runs right after `validate` passed on the same values.
pub struct SignInHooks {
    email: RwSignal<String>,
    token: RwSignal<String>,
    session: Arc<ClientSession>,
}

#[async_trait]
impl FormHooks for SignInHooks {
    type Error = LocalStorageError;

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validate_sign_in_input(&self.email.get_untracked(), &self.token.get_untracked()).map(|_| ())
    }

    async fn save(&self) -> Result<(), LocalStorageError> {
        let user = SessionUser::from_email(&self.email.get_untracked());
        let token = self.token.get_untracked().trim().to_owned();
        self.session.sign_in(user, token).await
    }
}

/// Sign-in form. Reads the session an ancestor bound with
/// [`use_auth_session`](crate::util::auth::use_auth_session).
#[component]
pub fn SignInPage() -> impl IntoView {
    let session = expect_context::<Arc<ClientSession>>();
    let email = RwSignal::new(String::new());
    let token = RwSignal::new(String::new());

    let form = use_controller(
        || None,
        move || FormController::new(SignInHooks { email, token, session: session.clone() }),
    );

    let submitting = {
        let form = form.clone();
        move || {
            form.track();
            form.controller().is_submitting()
        }
    };
    let message = {
        let form = form.clone();
        move || {
            form.track();
            let controller = form.controller();
            controller.save_error().unwrap_or_else(|| error_line(&controller.errors()))
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let controller = form.controller();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let _ = controller.submit().await;
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = controller;
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Sign in"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Access token"
                        prop:value=move || token.get()
                        on:input=move |ev| token.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=submitting>
                        "Sign In"
                    </button>
                </form>
                <p class="login-message">{message}</p>
            </div>
        </div>
    }
}
