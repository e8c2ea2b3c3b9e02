use super::*;
use crate::forms::validators::FieldValidator;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Debug, thiserror::Error)]
#[error("backend rejected the form")]
struct Rejected;

#[derive(Default)]
struct SignupHooks {
    email: Mutex<String>,
    saves: AtomicUsize,
    reject: bool,
    gate: Option<Arc<Notify>>,
}

impl SignupHooks {
    fn with_email(email: &str) -> Self {
        Self { email: Mutex::new(email.to_owned()), ..Self::default() }
    }
}

#[async_trait]
impl FormHooks for SignupHooks {
    type Error = Rejected;

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let email = FieldValidator::new("Email").required().email();
        let value = self.email.lock().unwrap().clone();
        email.validate(&value).map_err(|e| vec![e])
    }

    async fn save(&self) -> Result<(), Rejected> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.reject { Err(Rejected) } else { Ok(()) }
    }
}

fn count_notifications<H: FormHooks>(form: &FormController<H>) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let hits = count.clone();
    form.subscribe(Arc::new(move || {
        hits.fetch_add(1, Ordering::SeqCst);
    }));
    count
}

// =============================================================
// submit
// =============================================================

#[tokio::test]
async fn valid_form_saves_once_and_notifies_twice() {
    let form = FormController::new(SignupHooks::with_email("alice@example.com"));
    let notified = count_notifications(&form);

    let outcome = form.submit().await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Saved);
    assert_eq!(form.hooks().saves.load(Ordering::SeqCst), 1);
    assert_eq!(notified.load(Ordering::SeqCst), 2);
    assert!(!form.is_submitting());
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn invalid_form_never_saves() {
    let form = FormController::new(SignupHooks::with_email("not-an-email"));
    let notified = count_notifications(&form);

    let outcome = form.submit().await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Invalid(vec![ValidationError::InvalidEmail { label: "Email".into() }]));
    assert_eq!(form.hooks().saves.load(Ordering::SeqCst), 0);
    assert_eq!(form.errors().len(), 1);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fixing_fields_clears_previous_errors() {
    let form = FormController::new(SignupHooks::with_email(""));
    assert!(matches!(form.submit().await.unwrap(), SubmitOutcome::Invalid(_)));

    *form.hooks().email.lock().unwrap() = "alice@example.com".to_owned();

    assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Saved);
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn save_failure_is_returned_and_recorded() {
    let hooks = SignupHooks { reject: true, ..SignupHooks::with_email("alice@example.com") };
    let form = FormController::new(hooks);

    let err = form.submit().await.unwrap_err();

    assert_eq!(err.to_string(), "backend rejected the form");
    assert_eq!(form.save_error().as_deref(), Some("backend rejected the form"));
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn overlapping_submit_reports_busy() {
    let gate = Arc::new(Notify::new());
    let hooks = SignupHooks { gate: Some(gate.clone()), ..SignupHooks::with_email("alice@example.com") };
    let form = FormController::new(hooks);

    let (first, second) = tokio::join!(form.submit(), async {
        tokio::task::yield_now().await;
        assert!(form.is_submitting());
        let outcome = form.submit().await;
        gate.notify_one();
        outcome
    });

    assert_eq!(first.unwrap(), SubmitOutcome::Saved);
    assert_eq!(second.unwrap(), SubmitOutcome::Busy);
    assert_eq!(form.hooks().saves.load(Ordering::SeqCst), 1);
}
