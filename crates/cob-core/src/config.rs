use crate::error::ConfigError;
use std::env;

const DEFAULT_REPL_LOG_PATH: &str = "/var/log/postgresql/postgresql.log";

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub repl_log_path: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub remote: RemoteConfig,
    pub store: StoreConfig,
    pub bot: BotConfig,
}

impl Config {
    /// Reads the whole configuration surface from the environment.
    /// `.env` loading happens at the binary boundary before this runs.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            remote: RemoteConfig {
                host: require("RM_HOST")?,
                port: require_port("RM_PORT")?,
                username: require("RM_USER")?,
                password: require("RM_PASSWORD")?,
            },
            store: StoreConfig {
                host: require("DB_HOST")?,
                port: require_port("DB_PORT")?,
                user: require("DB_USER")?,
                password: require("DB_PASSWORD")?,
                database: require("DB_DATABASE")?,
            },
            bot: BotConfig {
                token: require("TOKEN")?,
                repl_log_path: env::var("REPL_LOG_PATH")
                    .unwrap_or_else(|_| DEFAULT_REPL_LOG_PATH.to_string()),
            },
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn require_port(var: &'static str) -> Result<u16, ConfigError> {
    let raw = require(var)?;
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidVar { var, value: raw })
}
