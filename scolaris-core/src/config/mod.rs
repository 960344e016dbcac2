//! Configuration management for Scolaris
//!
//! This module provides file and environment based configuration with
//! defaults and validation.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::{LogConfig, LogFormat, LogLevel};

mod error;

pub use error::ConfigError;

/// Upper bound for `source.simulated_latency`
pub const MAX_SIMULATED_LATENCY: Duration = Duration::from_secs(60);

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Data source configuration
    pub source: SourceConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (full, compact, json)
    pub format: LogFormat,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,

    /// Extra per-target filter directives
    pub directives: Vec<String>,
}

/// Data source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Serve calls from local data when the remote fails
    pub fallback_to_local: bool,

    /// JSON array used to seed the local source
    pub seed_path: Option<PathBuf>,

    /// Delay added to every local call
    #[serde(with = "humantime_serde")]
    pub simulated_latency: Duration,

    /// Origin flag reported by the local source
    pub report_from_api: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            with_timestamp: true,
            with_target: true,
            directives: Vec::new(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            fallback_to_local: true,
            seed_path: None,
            simulated_latency: Duration::ZERO,
            report_from_api: false,
        }
    }
}

impl LoggingConfig {
    /// Logging subsystem settings for this configuration
    ///
    /// Unknown levels fall back to the default level; `validate` rejects them
    /// before this point in normal use.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level.parse::<LogLevel>().unwrap_or_default(),
            format: self.format,
            with_timestamp: self.with_timestamp,
            with_target: self.with_target,
            directives: self.directives.clone(),
        }
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue { var, reason: e.to_string() })
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: SCOLARIS_<SECTION>_<KEY>
    /// Example: SCOLARIS_SOURCE_FALLBACK=false
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup` on top of `self`, then validate
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Logging config
        if let Some(level) = lookup("SCOLARIS_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        if let Some(format) = lookup("SCOLARIS_LOG_FORMAT") {
            self.logging.format = parse_var("SCOLARIS_LOG_FORMAT", &format)?;
        }
        if let Some(directives) = lookup("SCOLARIS_LOG_DIRECTIVES") {
            self.logging.directives = directives
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(timestamp) = lookup("SCOLARIS_LOG_TIMESTAMP") {
            self.logging.with_timestamp = parse_var("SCOLARIS_LOG_TIMESTAMP", &timestamp)?;
        }

        // Source config
        if let Some(fallback) = lookup("SCOLARIS_SOURCE_FALLBACK") {
            self.source.fallback_to_local = parse_var("SCOLARIS_SOURCE_FALLBACK", &fallback)?;
        }
        if let Some(seed) = lookup("SCOLARIS_SOURCE_SEED_PATH") {
            self.source.seed_path = Some(PathBuf::from(seed));
        }
        if let Some(latency) = lookup("SCOLARIS_SOURCE_LATENCY") {
            self.source.simulated_latency = humantime_serde::re::humantime::parse_duration(&latency)
                .map_err(|e| ConfigError::InvalidValue {
                    var: "SCOLARIS_SOURCE_LATENCY",
                    reason: e.to_string(),
                })?;
        }
        if let Some(from_api) = lookup("SCOLARIS_SOURCE_FROM_API") {
            self.source.report_from_api = parse_var("SCOLARIS_SOURCE_FROM_API", &from_api)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        let config: Self = toml::from_str(&contents)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate logging config
        if self.logging.level.parse::<LogLevel>().is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }
        if let Err(e) = self.logging.to_log_config().filter() {
            return Err(ConfigError::ValidationFailed(e.to_string()));
        }

        // Validate source config
        if self.source.simulated_latency > MAX_SIMULATED_LATENCY {
            return Err(ConfigError::ValidationFailed(format!(
                "simulated_latency must not exceed {}s",
                MAX_SIMULATED_LATENCY.as_secs()
            )));
        }

        if let Some(path) = &self.source.seed_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "seed_path must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;

        std::fs::write(path, contents)
            .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })?;

        Ok(())
    }
}
