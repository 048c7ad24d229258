//! Server configuration from the environment (and `.env` via dotenvy).

use std::path::PathBuf;

use account::AccountConfig;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_FILE: &str = "logs/app.log";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    /// `NODE_ENV` or `APP_ENV` is `production`
    pub production: bool,
    pub session_secret: Option<String>,
    pub password_pepper: Option<String>,
    pub log_file: PathBuf,
    pub log_level: String,
    pub frontend_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| get(name).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let database_max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_MAX_CONNECTIONS",
                value: raw,
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let production = ["APP_ENV", "NODE_ENV"]
            .iter()
            .any(|name| var(name).is_some_and(|v| v.eq_ignore_ascii_case("production")));

        Ok(Self {
            database_url,
            database_max_connections,
            port,
            production,
            session_secret: var("SESSION_SECRET"),
            password_pepper: var("PASSWORD_PEPPER"),
            log_file: var("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            frontend_origins: var("FRONTEND_ORIGINS")
                .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        })
    }

    /// Session and password settings for the account crate.
    ///
    /// Release builds refuse to start without `SESSION_SECRET`; debug builds
    /// fall back to a random key, which signs everyone out on restart.
    pub fn account_config(&self) -> Result<AccountConfig, ConfigError> {
        let mut config = match &self.session_secret {
            Some(secret) => AccountConfig::with_secret(secret),
            None if cfg!(debug_assertions) => {
                tracing::warn!("SESSION_SECRET not set, using a random session key");
                AccountConfig::with_random_secret()
            }
            None => return Err(ConfigError::Missing("SESSION_SECRET")),
        };

        config.session_cookie.secure = self.production;
        config.password_pepper = self
            .password_pepper
            .as_ref()
            .map(|p| p.as_bytes().to_vec());

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/board")]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.log_file, PathBuf::from("logs/app.log"));
        assert!(!config.production);
        assert!(config.session_secret.is_none());
        assert_eq!(config.frontend_origins.len(), 2);
    }

    #[test]
    fn test_database_url_required() {
        assert!(matches!(
            load(&[("PORT", "8080")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("DATABASE_URL", "postgres://x"), ("PORT", "http")]).unwrap_err();
        assert_eq!(err.to_string(), "PORT is not valid: http");
    }

    #[test]
    fn test_production_flag() {
        let config = load(&[("DATABASE_URL", "postgres://x"), ("NODE_ENV", "production")]).unwrap();
        assert!(config.production);

        let config = load(&[("DATABASE_URL", "postgres://x"), ("APP_ENV", "Production")]).unwrap();
        assert!(config.production);
    }

    #[test]
    fn test_account_config_cookie_follows_environment() {
        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("SESSION_SECRET", "correct horse battery staple"),
            ("NODE_ENV", "production"),
        ])
        .unwrap();
        let account = config.account_config().unwrap();
        assert!(account.session_cookie.secure);
        assert_eq!(
            account.session_secret,
            AccountConfig::with_secret("correct horse battery staple").session_secret
        );

        let config = load(&[("DATABASE_URL", "postgres://x"), ("SESSION_SECRET", "s")]).unwrap();
        assert!(!config.account_config().unwrap().session_cookie.secure);
    }
}
