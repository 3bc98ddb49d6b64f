//! Run configuration
//!
//! A run needs very little: where to put the document, how to indent it, and
//! the diagnostics level. The CLI builds this from defaults plus its single
//! optional argument. Neither the environment nor any file is consulted.

use std::path::PathBuf;

use crate::logging::{LogConfig, LogLevel};

mod error;

pub use error::ConfigError;

/// File name used when no output path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "keypair.json";

/// Indentation of the persisted document, in spaces.
pub const DEFAULT_INDENT: usize = 4;

/// Upper bound on indentation; anything wider is almost certainly a typo.
pub const MAX_INDENT: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Where and how the key-pair document is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub indent: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            indent: DEFAULT_INDENT,
        }
    }
}

impl OutputConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputPath);
        }

        if self.indent > MAX_INDENT {
            return Err(ConfigError::IndentTooWide {
                indent: self.indent,
                max: MAX_INDENT,
            });
        }

        Ok(())
    }
}

impl LoggingConfig {
    /// Subscriber settings for a run. `RUST_LOG` is ignored so a run depends
    /// only on this struct.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig::new(self.level).with_env_filter(false)
    }
}

impl Config {
    /// Defaults with the output path replaced, as the CLI builds it.
    pub fn with_output_path(path: impl Into<PathBuf>) -> Self {
        Self {
            output: OutputConfig::new(path),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.output.validate()
    }
}
