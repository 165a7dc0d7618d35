//! Credentialed sign-in controller.
//!
//! Drives one form through validate → credential check → classify, and
//! reports the result through an injected [`SignInEvents`] sink instead of
//! rendering or logging anything itself.
//!
//! ```text
//! Idle ──submit──▶ Validating ──ok──▶ Submitting ──resolved──▶ Succeeded
//!                      │                   │
//!                      └─invalid─▶ Idle    └──rejected──▶ Failed(kind)
//! ```
//!
//! `Succeeded` and `Failed` end an attempt. The next `submit` starts a new
//! one. A `submit` while `Submitting` is refused, so at most one credential
//! check is outstanding per controller.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

use crate::classify::{classify, FailureKind};
use crate::validation::{validate, Credentials, FieldErrors, RawCredentials};

/// Rejection returned by a [`CredentialCheck`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("sign-in rejected by identity provider ({})", .code.as_deref().unwrap_or("no code"))]
pub struct ProviderError {
    code: Option<String>,
}

impl ProviderError {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
        }
    }

    /// Rejection that carries no provider code
    pub fn uncoded() -> Self {
        Self { code: None }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

/// Verifies an email/password pair against an identity provider
#[async_trait]
pub trait CredentialCheck: Send + Sync {
    async fn check(&self, credentials: &Credentials) -> Result<(), ProviderError>;
}

/// Receives what the controller decided. Implementations render it.
///
/// Emissions happen while the controller's state lock is held, so a sink
/// must not call back into the controller that emitted.
pub trait SignInEvents: Send + Sync {
    fn on_validation_error(&self, errors: &FieldErrors);
    fn on_failure(&self, kind: FailureKind);
    fn on_success(&self, route: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(FailureKind),
}

/// What a single `submit` call ended with
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; no credential check was issued
    Invalid(FieldErrors),
    /// Another attempt is still awaiting its credential check
    Busy,
    /// Credential check resolved; carries the navigation target
    Succeeded(String),
    Failed(FailureKind),
    /// The controller was disposed; nothing was emitted
    Discarded,
}

struct Attempt {
    state: SubmissionState,
    id: u64,
    disposed: bool,
}

pub struct SignInController {
    check: Arc<dyn CredentialCheck>,
    events: Arc<dyn SignInEvents>,
    protected_route: String,
    attempt: Mutex<Attempt>,
}

impl SignInController {
    pub fn new(
        check: Arc<dyn CredentialCheck>,
        events: Arc<dyn SignInEvents>,
        protected_route: impl Into<String>,
    ) -> Self {
        Self {
            check,
            events,
            protected_route: protected_route.into(),
            attempt: Mutex::new(Attempt {
                state: SubmissionState::Idle,
                id: 0,
                disposed: false,
            }),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.attempt.lock().state.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.attempt.lock().disposed
    }

    /// Detach the controller from its view. Later resolutions of an
    /// outstanding check neither mutate state nor emit.
    pub fn dispose(&self) {
        self.attempt.lock().disposed = true;
    }

    /// Run one sign-in attempt
    pub async fn submit(&self, raw: &RawCredentials) -> SubmitOutcome {
        let (attempt_id, credentials) = {
            let mut attempt = self.attempt.lock();
            if attempt.disposed {
                return SubmitOutcome::Discarded;
            }
            if attempt.state == SubmissionState::Submitting {
                return SubmitOutcome::Busy;
            }

            attempt.id += 1;
            attempt.state = SubmissionState::Validating;

            match validate(raw) {
                Ok(credentials) => {
                    attempt.state = SubmissionState::Submitting;
                    (attempt.id, credentials)
                }
                Err(errors) => {
                    attempt.state = SubmissionState::Idle;
                    self.events.on_validation_error(&errors);
                    return SubmitOutcome::Invalid(errors);
                }
            }
        };

        let result = self.check.check(&credentials).await;

        let mut attempt = self.attempt.lock();
        if attempt.disposed || attempt.id != attempt_id {
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(()) => {
                attempt.state = SubmissionState::Succeeded;
                self.events.on_success(&self.protected_route);
                SubmitOutcome::Succeeded(self.protected_route.clone())
            }
            Err(e) => {
                let kind = classify(e.code());
                attempt.state = SubmissionState::Failed(kind);
                self.events.on_failure(kind);
                SubmitOutcome::Failed(kind)
            }
        }
    }
}
