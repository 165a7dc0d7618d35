use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::gate::Access;
use crate::AuthState;

/// Middleware to require authentication.
///
/// Denied requests are redirected to the sign-in entry route. Allowed ones
/// carry the visitor's [`SessionData`](crate::SessionData) in the request
/// extensions when a session exists.
pub async fn require_auth(
    State(auth_state): State<AuthState>,
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    // Skip authentication if disabled
    if !auth_state.is_enabled() {
        return next.run(request).await;
    }

    let session_id = jar
        .get(&auth_state.config.session.cookie_name)
        .map(|cookie| cookie.value().to_string());

    let access = auth_state
        .session_gate(session_id.clone())
        .can_enter(request.uri().path())
        .await;

    match access {
        Access::Allowed => {
            if let Some(session_id) = session_id {
                if let Some(session_data) = auth_state.get_session(&session_id).await {
                    request.extensions_mut().insert(session_data);
                }
            }
            next.run(request).await
        }
        Access::Denied => Redirect::to(&auth_state.config.routes.sign_in).into_response(),
    }
}
