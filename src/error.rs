//! Error types for hostscan.
//!
//! Uses `thiserror` for ergonomic error definitions. Scan-level failures never
//! leave the engine as errors: they are folded into the report's `status`.
//! The types here cover probe classification and the outer layers
//! (configuration, storage, CLI).

use std::path::PathBuf;
use thiserror::Error;

pub use crate::types::{PortError, ScanIdError, TargetError};

/// Classification of a single failed connection attempt.
///
/// Probes swallow these and report the port closed; the variants exist so the
/// failure reason can be logged.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("connection to {target}:{port} failed: {reason}")]
    ConnectionFailed {
        target: String,
        port: u16,
        reason: String,
    },

    #[error("Connection timed out")]
    Timeout,

    #[error("Connection refused")]
    ConnectionRefused,

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Host unreachable")]
    HostUnreachable,
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised while loading settings or preparing directories.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a home directory for configuration")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by the scan record store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("scan not found: {0}")]
    ScanNotFound(String),

    #[error("ambiguous prefix '{prefix}': {matches} matches")]
    AmbiguousPrefix { prefix: String, matches: usize },

    #[error("failed to save scan: {0}")]
    SaveFailed(String),

    #[error("failed to load scan: {0}")]
    LoadFailed(String),

    #[error("storage directory error: {0}")]
    DirectoryError(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Top-level error for command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type CliResult<T> = Result<T, CliError>;
