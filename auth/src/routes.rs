use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::classify::FailureKind;
use crate::controller::SignInEvents;
use crate::validation::{FieldErrors, RawCredentials};
use crate::views::{login_page_html, LoginView};
use crate::AuthState;

/// Create authentication routes
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// The single emission a sign-in controller produced for one request
enum Feedback {
    FieldErrors(FieldErrors),
    Failure(FailureKind),
    Navigate(String),
}

#[derive(Default)]
struct FormFeedback {
    emitted: Mutex<Option<Feedback>>,
}

impl FormFeedback {
    fn take(&self) -> Option<Feedback> {
        self.emitted.lock().take()
    }
}

impl SignInEvents for FormFeedback {
    fn on_validation_error(&self, errors: &FieldErrors) {
        *self.emitted.lock() = Some(Feedback::FieldErrors(errors.clone()));
    }

    fn on_failure(&self, kind: FailureKind) {
        *self.emitted.lock() = Some(Feedback::Failure(kind));
    }

    fn on_success(&self, route: &str) {
        *self.emitted.lock() = Some(Feedback::Navigate(route.to_string()));
    }
}

async fn login_page() -> Html<String> {
    Html(login_page_html(&LoginView::default()))
}

/// Helper to create session cookie
fn create_session_cookie(auth_state: &AuthState, session_id: String) -> Cookie<'static> {
    let cookie_name = auth_state.config.session.cookie_name.clone();
    let mut cookie = Cookie::new(cookie_name, session_id);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    if auth_state.config.session.secure {
        cookie.set_secure(true);
    }
    cookie.set_max_age(cookie_max_age(auth_state.config.session.timeout_seconds));
    cookie
}

/// Session timeout as a cookie max age, saturating at `i64::MAX` seconds
fn cookie_max_age(timeout_seconds: u64) -> time::Duration {
    time::Duration::seconds(i64::try_from(timeout_seconds).unwrap_or(i64::MAX))
}

async fn login(
    State(auth_state): State<AuthState>,
    jar: PrivateCookieJar,
    Form(form): Form<RawCredentials>,
) -> Result<(PrivateCookieJar, Response), StatusCode> {
    let feedback = Arc::new(FormFeedback::default());
    let controller = auth_state
        .sign_in_controller(feedback.clone())
        .map_err(|e| {
            tracing::error!("Sign-in unavailable: {}", e);
            StatusCode::from(e)
        })?;

    controller.submit(&form).await;

    let response = match feedback.take() {
        Some(Feedback::FieldErrors(errors)) => {
            tracing::debug!("Sign-in form rejected: {}", errors);
            let view = LoginView {
                email: &form.email,
                field_errors: Some(&errors),
                failure: None,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Html(login_page_html(&view))).into_response()
        }
        Some(Feedback::Failure(kind)) => {
            tracing::warn!("Sign-in failed: {}", kind);
            let view = LoginView {
                email: &form.email,
                field_errors: None,
                failure: Some(kind),
            };
            (StatusCode::UNAUTHORIZED, Html(login_page_html(&view))).into_response()
        }
        Some(Feedback::Navigate(route)) => {
            tracing::info!("Sign-in succeeded, redirecting to {}", route);
            let session_id = auth_state.create_session(&form.email).await;
            let cookie = create_session_cookie(&auth_state, session_id);
            return Ok((jar.add(cookie), Redirect::to(&route).into_response()));
        }
        None => {
            tracing::error!("Sign-in controller finished without emitting");
            StatusCode::CONFLICT.into_response()
        }
    };

    Ok((jar, response))
}

async fn logout(
    State(auth_state): State<AuthState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    let cookie_name = auth_state.config.session.cookie_name.clone();
    if let Some(cookie) = jar.get(&cookie_name) {
        auth_state.remove_session(cookie.value()).await;
    }

    let mut removal = Cookie::new(cookie_name, "");
    removal.set_path("/");
    (
        jar.remove(removal),
        Redirect::to(&auth_state.config.routes.sign_in),
    )
}
