//! Server configuration loading from file and environment variables.

use policydesk_db::DbRuntimeSettings;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Busy timeout for SQLite connections, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,

    /// Enforce `policies.memberId -> members.id`. Off unless asked for.
    #[serde(default)]
    pub enforce_foreign_keys: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "policydesk_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "database.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
            enforce_foreign_keys: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl DatabaseConfig {
    /// Pool settings derived from this section.
    pub fn runtime_settings(&self) -> DbRuntimeSettings {
        DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
            enforce_foreign_keys: self.enforce_foreign_keys,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `POLICYDESK_HOST` overrides `server.host`
/// - `POLICYDESK_PORT` (or plain `PORT`) overrides `server.port`
/// - `POLICYDESK_DB_PATH` overrides `database.path`
/// - `POLICYDESK_DB_BUSY_TIMEOUT_MS` overrides `database.busy_timeout_ms`
/// - `POLICYDESK_DB_POOL_MAX_SIZE` overrides `database.pool_max_size`
/// - `POLICYDESK_ENFORCE_FOREIGN_KEYS` overrides `database.enforce_foreign_keys`
/// - `POLICYDESK_LOG_LEVEL` overrides `logging.level`
/// - `POLICYDESK_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// Unparseable override values are ignored.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    value == "true" || value == "1"
}

/// Applies overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(parsed) = lookup("POLICYDESK_HOST").and_then(|v| v.parse().ok()) {
        config.server.host = parsed;
    }
    if let Some(parsed) = lookup("POLICYDESK_PORT")
        .or_else(|| lookup("PORT"))
        .and_then(|v| v.parse().ok())
    {
        config.server.port = parsed;
    }
    if let Some(db_path) = lookup("POLICYDESK_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(parsed) = lookup("POLICYDESK_DB_BUSY_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        config.database.busy_timeout_ms = parsed;
    }
    if let Some(parsed) = lookup("POLICYDESK_DB_POOL_MAX_SIZE").and_then(|v| v.parse().ok()) {
        config.database.pool_max_size = parsed;
    }
    if let Some(flag) = lookup("POLICYDESK_ENFORCE_FOREIGN_KEYS") {
        config.database.enforce_foreign_keys = parse_flag(&flag);
    }
    if let Some(level) = lookup("POLICYDESK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("POLICYDESK_LOG_JSON") {
        config.logging.json = parse_flag(&json);
    }
}
