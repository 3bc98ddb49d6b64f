//! Crate-level error, one variant per way a run can end badly.

use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;
use crate::keygen::KeygenError;
use crate::writer::PersistenceError;

/// Process exit status for any failed run.
pub const FAILURE_EXIT_CODE: u8 = 1;

#[derive(Debug, Error)]
pub enum Error {
    /// The secure randomness source could not supply entropy.
    #[error(transparent)]
    RandomnessFailure(KeygenError),

    /// The derived key was rejected.
    #[error(transparent)]
    InvalidKey(KeygenError),

    /// The document could not be created or written.
    #[error(transparent)]
    PersistenceFailure(#[from] PersistenceError),

    /// Detected before anything was generated.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Coarse classification of [`Error`], for logs and exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RandomnessFailure,
    InvalidKey,
    PersistenceFailure,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::RandomnessFailure => "randomness failure",
            ErrorKind::InvalidKey => "invalid key",
            ErrorKind::PersistenceFailure => "persistence failure",
            ErrorKind::Config => "configuration error",
        })
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RandomnessFailure(_) => ErrorKind::RandomnessFailure,
            Error::InvalidKey(_) => ErrorKind::InvalidKey,
            Error::PersistenceFailure(_) => ErrorKind::PersistenceFailure,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Every failure is terminal and reported the same way.
    pub fn exit_code(&self) -> u8 {
        FAILURE_EXIT_CODE
    }
}

impl From<KeygenError> for Error {
    fn from(err: KeygenError) -> Self {
        match err {
            KeygenError::RandomnessFailure { .. } => Error::RandomnessFailure(err),
            KeygenError::InvalidKey { .. } => Error::InvalidKey(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
