//! Common error types for BookBuddy

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the file-backed feedback store
///
/// Never shown to HTTP clients verbatim; paths stay in the server log.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Document does not exist (store never initialized, or file removed)
    #[error("feedback document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Filesystem operation failed (permissions, disk full, ...)
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON of the expected shape
    #[error("feedback document {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Document could not be serialized
    #[error("failed to encode feedback document: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration errors. All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `.env` file missing; reported before any per-variable check
    #[error(".env file not found: {}", .0.display())]
    EnvFileNotFound(PathBuf),

    /// `.env` file present but unreadable or malformed
    #[error("failed to parse {}: {message}", .path.display())]
    EnvFileParse { path: PathBuf, message: String },

    /// One or more variables failed validation
    #[error("environment validation failed with {} error(s)", .0.len())]
    Invalid(Vec<String>),

    /// Two descriptors share the same name
    #[error("duplicate variable descriptor: {0}")]
    DuplicateDescriptor(String),

    /// TOML bootstrap file could not be read or parsed
    #[error("failed to load config file {}: {message}", .path.display())]
    Toml { path: PathBuf, message: String },
}
