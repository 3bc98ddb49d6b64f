//! Diagnostics for the key generator
//!
//! Built on `tracing` with a `tracing-subscriber` formatter writing to stderr,
//! so nothing ever lands on stdout. Key material is never passed to these
//! macros anywhere in the crate.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter, Layer,
};

mod error;
mod level;

pub use error::LoggingError;
pub use level::LogLevel;

/// Configuration for the logging subsystem
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub with_timestamp: bool,
    pub with_target: bool,
    pub json_format: bool,
    /// Let `RUST_LOG` override `level` when it is set.
    pub use_env_filter: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            with_timestamp: true,
            with_target: true,
            json_format: false,
            use_env_filter: true,
        }
    }
}

impl LogConfig {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.with_timestamp = enabled;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    pub fn with_env_filter(mut self, enabled: bool) -> Self {
        self.use_env_filter = enabled;
        self
    }

    /// Resolve the level filter, consulting `RUST_LOG` only when allowed.
    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        if self.use_env_filter {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return Ok(filter);
            }
        }
        EnvFilter::try_new(self.level.as_str())
            .map_err(|e| LoggingError::InvalidConfiguration(e.to_string()))
    }

    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(self.with_target);

        match (self.json_format, self.with_timestamp) {
            (true, true) => layer.json().boxed(),
            (true, false) => layer.json().without_time().boxed(),
            (false, true) => layer.boxed(),
            (false, false) => layer.without_time().boxed(),
        }
    }
}

/// Install the global subscriber with default settings.
///
/// # Example
/// ```
/// use dhgen_core::logging::init_logging;
///
/// let _ = init_logging();
/// ```
pub fn init_logging() -> Result<(), LoggingError> {
    init_logging_with_config(LogConfig::default())
}

/// Install the global subscriber.
///
/// Fails with [`LoggingError::InitializationFailed`] if a subscriber is
/// already installed for this process.
///
/// # Example
/// ```
/// use dhgen_core::logging::{init_logging_with_config, LogConfig, LogLevel};
///
/// let config = LogConfig::new(LogLevel::Warn)
///     .with_timestamp(false)
///     .with_env_filter(false);
///
/// let _ = init_logging_with_config(config);
/// ```
pub fn init_logging_with_config(config: LogConfig) -> Result<(), LoggingError> {
    let filter = config.filter()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(config.fmt_layer())
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert!(config.with_timestamp);
        assert!(config.with_target);
        assert!(!config.json_format);
        assert!(config.use_env_filter);
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new(LogLevel::Debug)
            .with_timestamp(false)
            .with_target(false)
            .json_format(true)
            .with_env_filter(false);

        assert_eq!(config.level, LogLevel::Debug);
        assert!(!config.with_timestamp);
        assert!(!config.with_target);
        assert!(config.json_format);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn test_filter_without_env_uses_configured_level() {
        let filter = LogConfig::new(LogLevel::Error)
            .with_env_filter(false)
            .filter()
            .unwrap();
        assert_eq!(filter.to_string(), "error");
    }

    #[test]
    fn test_second_init_fails() {
        let config = LogConfig::new(LogLevel::Trace).with_env_filter(false);
        // The first call may lose a race with another test; either way a
        // subscriber is installed afterwards.
        let _ = init_logging_with_config(config.clone());

        let err = init_logging_with_config(config).unwrap_err();
        assert!(matches!(err, LoggingError::InitializationFailed(_)));
    }
}
