use gatehouse_auth::AuthConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Seconds between sweeps of expired sessions
    #[serde(default = "default_session_cleanup_interval")]
    pub session_cleanup_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_session_cleanup_interval() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            session_cleanup_interval: default_session_cleanup_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("server_config").required(false))
            .add_source(config::Environment::with_prefix("GATEHOUSE").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config file: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Tracing level for `logging.level`, INFO when unrecognized
    pub fn log_level(&self) -> tracing::Level {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(source: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.http_port, 3000);
        assert_eq!(config.log_level(), tracing::Level::INFO);
        assert!(!config.auth.enable_auth);
    }

    #[test]
    fn test_auth_section() {
        let config = from_toml(
            r#"
            [logging]
            level = "DEBUG"

            [auth]
            enable_auth = true

            [auth.plain_login]
            enabled = true
            users = [{ email = "ana@barber.shop", password = "secret1", display_name = "Ana" }]

            [auth.routes]
            protected = ["/dashboard", "/reports"]
            "#,
        );
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
        assert!(config.auth.enable_auth);
        assert_eq!(config.auth.plain_login.users[0].email, "ana@barber.shop");
        assert_eq!(config.auth.routes.protected.len(), 2);
        assert_eq!(config.auth.routes.sign_in, "/auth/login");
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert_eq!(config.log_level(), tracing::Level::INFO);
    }
}
