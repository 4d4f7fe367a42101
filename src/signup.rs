//! Trial signup form.
//!
//! Validation runs locally; a valid submission is acknowledged after a
//! simulated round-trip scheduled on the injected [`Scheduler`].

use crate::events::{EventName, EventSink};
use crate::scheduler::Scheduler;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Message shown when the email field loses focus with a bad address.
pub const INVALID_EMAIL_ON_BLUR: &str = "Please enter a valid email address.";
/// Message for a blank name on submit.
pub const MISSING_NAME: &str = "Please enter your full name.";
/// Message for a bad email on submit.
pub const INVALID_WORK_EMAIL: &str = "Please enter a valid work email.";
/// Message once the simulated signup completes.
pub const WELCOME: &str = "Welcome aboard! Check your inbox for setup instructions.";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

/// Loose email shape check: something, `@`, something, `.`, something.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Submitted form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    /// Visitor's full name.
    pub full_name: String,
    /// Work email.
    pub email: String,
    /// Selected plan, if any.
    pub plan: Option<String>,
}

/// The form field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignupField {
    /// `fullName`
    #[serde(rename = "fullName")]
    FullName,
    /// `email`
    #[serde(rename = "email")]
    Email,
}

impl SignupField {
    /// Field name as used in the form and in events.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
        }
    }
}

/// Why a submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Offending field.
    pub field: SignupField,
    /// Inline message for the visitor.
    pub message: &'static str,
}

impl SignupForm {
    /// Check the form, reporting the first failing field.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationFailure`] for a blank name or a malformed
    /// email.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationFailure {
                field: SignupField::FullName,
                message: MISSING_NAME,
            });
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationFailure {
                field: SignupField::Email,
                message: INVALID_WORK_EMAIL,
            });
        }
        Ok(())
    }
}

/// Inline status line under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    /// Text shown.
    pub text: String,
    /// Rendered as an error.
    pub is_error: bool,
}

/// Result of pressing submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Rejected(ValidationFailure),
    /// A previous submission is still in flight.
    Busy,
    /// Accepted; completion is scheduled.
    Submitted,
}

#[derive(Debug, Default)]
struct FormState {
    submitting: bool,
    message: Option<FormMessage>,
    completed: usize,
}

/// Signup form controller.
#[derive(Debug)]
pub struct SignupFlow<E, T> {
    sink: E,
    scheduler: T,
    delay: Duration,
    state: Arc<Mutex<FormState>>,
}

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<E, T> SignupFlow<E, T>
where
    E: EventSink + Clone + Send + 'static,
    T: Scheduler,
{
    /// Create the controller with the simulated round-trip `delay`.
    pub fn new(sink: E, scheduler: T, delay: Duration) -> Self {
        Self {
            sink,
            scheduler,
            delay,
            state: Arc::default(),
        }
    }

    /// Validate the email field when it loses focus.
    ///
    /// Empty input is not an error yet; returns the message to show, or
    /// `None` to clear it.
    pub fn check_email_on_blur(&self, value: &str) -> Option<&'static str> {
        let email = value.trim();
        let message = (!email.is_empty() && !is_valid_email(email)).then_some(INVALID_EMAIL_ON_BLUR);
        lock(&self.state).message = message.map(|text| FormMessage {
            text: text.to_string(),
            is_error: true,
        });
        message
    }

    /// Submit the form.
    ///
    /// `variant` is the currently active CTA variant, reported with the
    /// attempt.
    pub fn submit(&self, form: &SignupForm, variant: Option<&str>) -> SubmitOutcome {
        if lock(&self.state).submitting {
            return SubmitOutcome::Busy;
        }

        if let Err(failure) = form.validate() {
            lock(&self.state).message = Some(FormMessage {
                text: failure.message.to_string(),
                is_error: true,
            });
            self.sink.record(
                EventName::SignupValidationFailed,
                json!({ "field": failure.field.as_str() }),
            );
            return SubmitOutcome::Rejected(failure);
        }

        self.sink.record(
            EventName::SignupAttempt,
            json!({ "email": form.email, "plan": form.plan, "variant": variant }),
        );
        lock(&self.state).submitting = true;

        let state = Arc::clone(&self.state);
        let sink = self.sink.clone();
        let email = form.email.clone();
        self.scheduler.schedule(
            self.delay,
            Box::new(move || {
                {
                    let mut state = lock(&state);
                    state.submitting = false;
                    state.completed += 1;
                    state.message = Some(FormMessage {
                        text: WELCOME.to_string(),
                        is_error: false,
                    });
                }
                sink.record(EventName::SignupSuccess, json!({ "email": email }));
            }),
        );

        SubmitOutcome::Submitted
    }

    /// Whether a submission is in flight (submit button disabled).
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        lock(&self.state).submitting
    }

    /// Message currently shown under the form.
    #[must_use]
    pub fn message(&self) -> Option<FormMessage> {
        lock(&self.state).message.clone()
    }

    /// Number of completed signups.
    #[must_use]
    pub fn completed(&self) -> usize {
        lock(&self.state).completed
    }
}
