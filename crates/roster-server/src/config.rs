//! Server configuration loaded from the environment.

use std::net::SocketAddr;

use roster_db::DbConfig;
use thiserror::Error;

pub const BIND_ADDR: &str = "ROSTER_BIND_ADDR";
pub const DB_URL: &str = "ROSTER_DB_URL";
pub const DB_NAMESPACE: &str = "ROSTER_DB_NAMESPACE";
pub const DB_DATABASE: &str = "ROSTER_DB_DATABASE";
pub const DB_USERNAME: &str = "ROSTER_DB_USERNAME";
pub const DB_PASSWORD: &str = "ROSTER_DB_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Top-level configuration for the server binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP listener binds to (default: `0.0.0.0:8080`).
    pub bind_addr: SocketAddr,
    pub db: DbConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db: DbConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment, reading a `.env`
    /// file first if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset or blank keys
    /// fall back to [`AppConfig::default`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(BIND_ADDR) {
            config.bind_addr = value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    key: BIND_ADDR,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(url) = get(DB_URL) {
            config.db.url = url;
        }
        if let Some(namespace) = get(DB_NAMESPACE) {
            config.db.namespace = namespace;
        }
        if let Some(database) = get(DB_DATABASE) {
            config.db.database = database;
        }
        config.db.username = get(DB_USERNAME);
        config.db.password = get(DB_PASSWORD);

        Ok(config)
    }
}
