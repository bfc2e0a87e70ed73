//! # configs
//!
//! Layered settings: built-in defaults, then `config/default.toml`, then an
//! optional `config/local.toml`, then environment variables with the `APP`
//! prefix (`APP__SERVER__PORT=9000`). A `.env` file is honored in
//! development via dotenvy.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HS256 signing secret. The development default is deliberately
    /// worthless; deployments must override it.
    pub jwt_secret: SecretString,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

/// Loads settings from files and the environment.
pub fn load() -> Result<Settings, ConfigsError> {
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "postgres://localhost/circleshare")?
        .set_default("database.max_connections", 5)?
        .set_default("auth.jwt_secret", "dev-secret-change-me")?
        .set_default("auth.access_ttl_secs", 900)?
        .set_default("auth.refresh_ttl_secs", 86_400)?
        .set_default("log.json", false)?
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name("config/local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    tracing::debug!(host = %settings.server.host, port = settings.server.port, "settings loaded");
    Ok(settings)
}
