use async_trait::async_trait;
use std::collections::HashMap;

use crate::classify::codes;
use crate::config::{PlainLoginConfig, UserCredentials};
use crate::controller::{CredentialCheck, ProviderError};
use crate::error::AuthError;
use crate::validation::Credentials;

/// Plain login (email/password) provider backed by the configured user list
pub struct PlainLoginProvider {
    users: HashMap<String, UserCredentials>,
}

impl PlainLoginProvider {
    pub fn new(config: &PlainLoginConfig) -> Result<Self, AuthError> {
        if config.users.is_empty() {
            return Err(AuthError::ConfigError(
                "Plain login enabled but no users configured".to_string(),
            ));
        }

        let mut users = HashMap::new();
        for user in &config.users {
            users.insert(user.email.to_lowercase(), user.clone());
        }

        Ok(Self { users })
    }

    /// Look up a user by email, ignoring case
    pub fn user(&self, email: &str) -> Option<&UserCredentials> {
        self.users.get(&email.to_lowercase())
    }

    fn verify(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        if !email.contains('@') {
            return Err(ProviderError::new(codes::INVALID_EMAIL));
        }

        let user = self
            .user(email)
            .ok_or_else(|| ProviderError::new(codes::USER_NOT_FOUND))?;

        if user.disabled {
            return Err(ProviderError::new(codes::USER_DISABLED));
        }

        // Check if password is bcrypt hashed (starts with $2)
        let password_valid = if user.password.starts_with("$2") {
            bcrypt::verify(password, &user.password).map_err(|e| {
                tracing::error!("Password verification failed for '{}': {}", email, e);
                ProviderError::uncoded()
            })?
        } else {
            tracing::warn!(
                "Plain text password used for user '{}'. Consider using bcrypt hashed passwords.",
                email
            );
            password == user.password
        };

        if !password_valid {
            return Err(ProviderError::new(codes::WRONG_PASSWORD));
        }

        Ok(())
    }
}

#[async_trait]
impl CredentialCheck for PlainLoginProvider {
    async fn check(&self, credentials: &Credentials) -> Result<(), ProviderError> {
        self.verify(credentials.email(), credentials.password())
    }
}

/// Helper function to hash a password with bcrypt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}
