use thiserror::Error;

/// A run configuration that cannot be used. Detected before any key
/// material is generated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("output path must not be empty")]
    EmptyOutputPath,

    #[error("indent must be at most {max} spaces, got {indent}")]
    IndentTooWide { indent: usize, max: usize },
}
