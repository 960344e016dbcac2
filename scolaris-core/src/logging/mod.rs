//! Logging setup
//!
//! Library code only emits `tracing` events. Binaries pick the rendering by
//! calling [`init_logging`] or [`init_logging_with_config`] once at startup.
//! When `RUST_LOG` is set it replaces the configured level and directives.
//!
//! Per-target directives narrow or widen the base level, e.g.
//! `scolaris_core::sync=debug` to trace every list write.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod format;
mod level;

pub use error::LoggingError;
pub use format::{LogFormat, ParseFormatError};
pub use level::{LogLevel, ParseLevelError};

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Base level for every target
    pub level: LogLevel,
    pub format: LogFormat,
    pub with_timestamp: bool,
    pub with_target: bool,
    /// Extra `EnvFilter` directives, applied after the base level
    pub directives: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Full,
            with_timestamp: true,
            with_target: true,
            directives: Vec::new(),
        }
    }
}

impl LogConfig {
    pub fn new(level: LogLevel) -> Self {
        Self { level, ..Default::default() }
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.with_timestamp = enabled;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Add a directive such as `scolaris_core::sources=warn`
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Filter built from the level and directives, ignoring `RUST_LOG`
    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        let mut filter = EnvFilter::new(self.level.as_str());
        for directive in &self.directives {
            let parsed = directive.parse().map_err(|source| LoggingError::InvalidDirective {
                directive: directive.clone(),
                source,
            })?;
            filter = filter.add_directive(parsed);
        }
        Ok(filter)
    }
}

/// Install a subscriber with the default configuration
///
/// # Example
/// ```
/// use scolaris_core::logging::init_logging;
///
/// init_logging().expect("Failed to initialize logging");
/// ```
pub fn init_logging() -> Result<(), LoggingError> {
    init_logging_with_config(LogConfig::default())
}

/// Install a subscriber for `config`
///
/// Fails on an invalid directive or when a global subscriber is already set.
///
/// # Example
/// ```
/// use scolaris_core::logging::{init_logging_with_config, LogConfig, LogFormat, LogLevel};
///
/// let config = LogConfig::new(LogLevel::Warn)
///     .format(LogFormat::Compact)
///     .directive("scolaris_core::sync=debug");
///
/// init_logging_with_config(config).expect("Failed to initialize logging");
/// ```
pub fn init_logging_with_config(config: LogConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => config.filter()?,
    };
    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_target(config.with_target);

    let result = match (config.format, config.with_timestamp) {
        (LogFormat::Full, true) => registry.with(layer).try_init(),
        (LogFormat::Full, false) => registry.with(layer.without_time()).try_init(),
        (LogFormat::Compact, true) => registry.with(layer.compact()).try_init(),
        (LogFormat::Compact, false) => registry.with(layer.compact().without_time()).try_init(),
        (LogFormat::Json, true) => registry.with(layer.json()).try_init(),
        (LogFormat::Json, false) => registry.with(layer.json().without_time()).try_init(),
    };

    result.map_err(|e| LoggingError::InitializationFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Full);
        assert!(config.with_timestamp);
        assert!(config.directives.is_empty());
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new(LogLevel::Debug)
            .format(LogFormat::Json)
            .with_timestamp(false)
            .with_target(false)
            .directive("scolaris_core::sources=warn");

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.with_timestamp);
        assert!(!config.with_target);
        assert_eq!(config.directives, vec!["scolaris_core::sources=warn"]);
    }

    #[test]
    fn test_filter_rejects_bad_directive() {
        let config = LogConfig::default().directive("scolaris_core=loud");
        let err = config.filter().unwrap_err();
        assert!(matches!(err, LoggingError::InvalidDirective { ref directive, .. } if directive == "scolaris_core=loud"));
    }

    #[test]
    fn test_filter_accepts_targets() {
        let config = LogConfig::new(LogLevel::Warn).directive("scolaris_core::sync=trace");
        assert!(config.filter().is_ok());
    }

    #[test]
    fn test_second_init_fails() {
        // Only one of these can win the global subscriber slot
        let first = init_logging_with_config(LogConfig::new(LogLevel::Warn).with_timestamp(false));
        let second = init_logging();
        assert!(first.is_err() || second.is_err());
    }
}
