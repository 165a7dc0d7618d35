//! Gatehouse Authentication Library
//!
//! Email/password sign-in and route protection for the Gatehouse server.
//!
//! # Features
//!
//! - Sign-in form validation that reports every field problem at once
//! - A sign-in controller that issues one credential check per submission,
//!   classifies provider rejections, and emits the outcome for rendering
//! - A session gate deciding whether a protected route may be entered
//! - Config-backed email/password provider with bcrypt support
//! - Middleware for protecting routes
//! - Configurable via TOML configuration files
//!
//! # Example
//!
//! ```no_run
//! use gatehouse_auth::{AuthConfig, AuthService, AuthState};
//! use std::sync::Arc;
//!
//! let config = AuthConfig::default();
//! let auth_service = Arc::new(AuthService::new(config).unwrap());
//! let auth_state = AuthState::new(auth_service);
//! // Use auth_state in your application
//! ```

pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod providers;
pub mod routes;
pub mod service;
pub mod session;
pub mod validation;
pub mod views;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::ops::Deref;
use std::sync::Arc;

// Re-export commonly used types
pub use classify::{classify, FailureKind};
pub use config::AuthConfig;
pub use controller::{
    CredentialCheck, ProviderError, SignInController, SignInEvents, SubmissionState,
    SubmitOutcome,
};
pub use error::AuthError;
pub use gate::{Access, SessionGate, SessionQuery};
pub use middleware::require_auth;
pub use routes::auth_routes;
pub use service::AuthService;
pub use session::SessionData;
pub use validation::{validate, Credentials, FieldErrors, RawCredentials};

/// State wrapper for AuthService that implements FromRef for Key
/// This allows PrivateCookieJar to extract the cookie key from state
#[derive(Clone)]
pub struct AuthState {
    inner: Arc<AuthService>,
}

impl AuthState {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self {
            inner: auth_service,
        }
    }
}

impl Deref for AuthState {
    type Target = AuthService;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<Arc<AuthService>> for AuthState {
    fn from(service: Arc<AuthService>) -> Self {
        Self::new(service)
    }
}

/// Implement FromRef to allow PrivateCookieJar to extract Key from AuthState
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key()
    }
}
