use serde::{Deserialize, Serialize};

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Enable authentication globally
    #[serde(default)]
    pub enable_auth: bool,

    /// Email/password login against a configured user list
    #[serde(default)]
    pub plain_login: PlainLoginConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Sign-in entry point and protected routes
    #[serde(default)]
    pub routes: RoutesConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlainLoginConfig {
    /// Enable plain login (email/password)
    #[serde(default)]
    pub enabled: bool,

    /// List of allowed users with passwords
    #[serde(default)]
    pub users: Vec<UserCredentials>,
}

/// User credentials for file-based authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredentials {
    pub email: String,

    /// Bcrypt hash, or plain text (not recommended for production)
    pub password: String,

    /// Optional display name
    #[serde(default)]
    pub display_name: Option<String>,

    /// Disabled accounts are known but may not sign in
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session cookie name
    #[serde(default = "default_session_cookie_name")]
    pub cookie_name: String,

    /// Session timeout in seconds (default: 24 hours)
    #[serde(default = "default_session_timeout")]
    pub timeout_seconds: u64,

    /// Secure cookie (HTTPS only)
    #[serde(default)]
    pub secure: bool,

    /// Secret for encrypting the session cookie, at least 64 bytes.
    /// A random key is generated when unset, which logs everyone out on restart.
    #[serde(default)]
    pub cookie_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Where denied visitors are sent
    #[serde(default = "default_sign_in_route")]
    pub sign_in: String,

    /// Where a successful sign-in navigates to
    #[serde(default = "default_protected_route")]
    pub after_sign_in: String,

    /// Route prefixes that need an active session
    #[serde(default = "default_protected_routes")]
    pub protected: Vec<String>,
}

fn default_session_cookie_name() -> String {
    "session_id".to_string()
}

fn default_session_timeout() -> u64 {
    86400 // 24 hours
}

fn default_sign_in_route() -> String {
    "/auth/login".to_string()
}

fn default_protected_route() -> String {
    "/dashboard".to_string()
}

fn default_protected_routes() -> Vec<String> {
    vec![default_protected_route()]
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_session_cookie_name(),
            timeout_seconds: default_session_timeout(),
            secure: false,
            cookie_secret: None,
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            sign_in: default_sign_in_route(),
            after_sign_in: default_protected_route(),
            protected: default_protected_routes(),
        }
    }
}
