use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project config file, merged when present.
pub const DEFAULT_CONFIG_FILE: &str = ".todo-mcp/config.yaml";

/// Prefix for environment overrides, e.g. `TODO_MCP_STORAGE__FILE`.
pub const ENV_PREFIX: &str = "TODO_MCP_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Storage file path cannot be empty")]
    EmptyStoragePath,

    #[error("Server name cannot be empty")]
    EmptyServerName,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `explicit_file` if given, otherwise .todo-mcp/config.yaml (optional)
    /// 3. Environment variables (TODO_MCP_* prefix, `__` separates nesting)
    pub fn load(explicit_file: Option<&Path>) -> Result<Config> {
        let file = explicit_file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if explicit_file.is_some() && !file.exists() {
            anyhow::bail!("Config file not found: {}", file.display());
        }

        let config: Config = Self::figment(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if let Some(ref file) = config.storage.file {
            if file.as_os_str().is_empty() {
                return Err(ConfigError::EmptyStoragePath);
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        if config.server.name.trim().is_empty() {
            return Err(ConfigError::EmptyServerName);
        }

        Ok(())
    }
}
