use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Session expired")]
    SessionExpired,

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<AuthError> for StatusCode {
    fn from(error: AuthError) -> StatusCode {
        match error {
            AuthError::SessionNotFound | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::PasswordHash(_) | AuthError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
