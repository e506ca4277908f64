//! Core error types for rehab-core.
//!
//! The tracker and stores are fail-soft at their public surface, but every
//! layer underneath reports failures through these types so the `try_*`
//! variants and the CLI can surface them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rehab-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised by a key-value backend or while (de)serializing its values.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A read or write against the backend did not complete
    #[error("Backend operation '{op}' failed for key '{key}': {message}")]
    Backend {
        op: &'static str,
        key: String,
        message: String,
    },

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// Stored value could not be decoded, or a value could not be encoded
    #[error("Malformed value under '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Date string is not `YYYY-MM-DD`
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Time string is not `HH:MM`
    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    /// Weekday index outside 0..=6
    #[error("Weekday index {0} out of range (0 = Sunday .. 6 = Saturday)")]
    InvalidWeekday(u32),

    /// Reference to an id that does not exist
    #[error("Unknown {kind} id '{id}'")]
    UnknownId { kind: &'static str, id: String },
}

impl StorageError {
    pub(crate) fn backend(op: &'static str, key: &str, err: impl std::fmt::Display) -> Self {
        StorageError::Backend {
            op,
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                StorageError::Locked
            }
            _ => StorageError::Backend {
                op: "query",
                key: String::new(),
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
