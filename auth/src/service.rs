use async_trait::async_trait;
use axum_extra::extract::cookie::Key;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::controller::{CredentialCheck, SignInController, SignInEvents};
use crate::error::AuthError;
use crate::gate::{SessionGate, SessionQuery};
use crate::providers::PlainLoginProvider;
use crate::session::SessionData;

/// Main authentication service
pub struct AuthService {
    pub config: AuthConfig,
    sessions: RwLock<HashMap<String, SessionData>>,
    plain_login_provider: Option<Arc<PlainLoginProvider>>,
    cookie_key: Key,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let plain_login_provider = if config.plain_login.enabled {
            Some(Arc::new(PlainLoginProvider::new(&config.plain_login)?))
        } else {
            None
        };

        let cookie_key = match &config.session.cookie_secret {
            Some(secret) => Key::try_from(secret.as_bytes()).map_err(|_| {
                AuthError::ConfigError("cookie_secret must be at least 64 bytes".to_string())
            })?,
            None => {
                tracing::warn!("No cookie_secret configured, sessions will not survive a restart");
                Key::generate()
            }
        };

        Ok(Self {
            config,
            sessions: RwLock::new(HashMap::new()),
            plain_login_provider,
            cookie_key,
        })
    }

    /// Check if authentication is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enable_auth
    }

    /// Check if any provider is enabled
    pub fn has_enabled_providers(&self) -> bool {
        self.plain_login_provider.is_some()
    }

    pub fn cookie_key(&self) -> Key {
        self.cookie_key.clone()
    }

    pub fn credential_check(&self) -> Result<Arc<dyn CredentialCheck>, AuthError> {
        let provider = self
            .plain_login_provider
            .clone()
            .ok_or_else(|| AuthError::ConfigError("Plain login provider not enabled".to_string()))?;
        Ok(provider)
    }

    /// Build a controller for one sign-in form
    pub fn sign_in_controller(
        &self,
        events: Arc<dyn SignInEvents>,
    ) -> Result<SignInController, AuthError> {
        Ok(SignInController::new(
            self.credential_check()?,
            events,
            self.config.routes.after_sign_in.clone(),
        ))
    }

    /// Build a gate that checks the given session id
    pub fn session_gate(&self, session_id: Option<String>) -> SessionGate<ActiveSession<'_>> {
        SessionGate::new(
            ActiveSession {
                service: self,
                session_id,
            },
            self.config.routes.protected.iter().cloned(),
        )
    }

    /// Start a session for a user that just signed in, returning its id
    pub async fn create_session(&self, email: &str) -> String {
        let display_name = self
            .plain_login_provider
            .as_ref()
            .and_then(|provider| provider.user(email))
            .and_then(|user| user.display_name.clone());

        let session_id = Uuid::new_v4().to_string();
        let session_data = SessionData::new(email.to_string(), display_name);
        self.store_session(session_id.clone(), session_data).await;
        session_id
    }

    /// Store session data
    pub async fn store_session(&self, session_id: String, session_data: SessionData) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id, session_data);
    }

    /// Get session data
    pub async fn get_session(&self, session_id: &str) -> Option<SessionData> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Remove session (logout)
    pub async fn remove_session(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
    }

    /// Validate session and check expiration
    pub async fn validate_session(&self, session_id: &str) -> Result<SessionData, AuthError> {
        let session_data = self
            .get_session(session_id)
            .await
            .ok_or(AuthError::SessionNotFound)?;

        if session_data.is_expired(self.config.session.timeout_seconds) {
            self.remove_session(session_id).await;
            return Err(AuthError::SessionExpired);
        }

        Ok(session_data)
    }

    /// Clean up expired sessions, returning how many were dropped
    pub async fn cleanup_expired_sessions(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let timeout = self.config.session.timeout_seconds;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(timeout));
        before - sessions.len()
    }
}

/// Session query for one visitor's session id
pub struct ActiveSession<'a> {
    service: &'a AuthService,
    session_id: Option<String>,
}

#[async_trait]
impl<'a> SessionQuery for ActiveSession<'a> {
    async fn has_active_session(&self) -> bool {
        let Some(session_id) = &self.session_id else {
            return false;
        };

        match self.service.validate_session(session_id).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Session validation failed: {}", e);
                false
            }
        }
    }
}
