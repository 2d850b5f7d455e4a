//! Unified error types for hostwatch
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from collecting host statistics
    #[error("Collection error: {0}")]
    Collect(#[from] CollectError),

    /// Error from a notification channel
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// A scheduled job failed
    #[error("Job '{name}' failed: {message}")]
    Job { name: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from stat collection
#[derive(Error, Debug)]
pub enum CollectError {
    /// No submodules were enabled for polling
    #[error("No stat modules enabled")]
    NoModules,

    /// Unknown submodule name
    #[error("Unknown stat module: {0}")]
    UnknownModule(String),

    /// A stat source could not read its backing data
    #[error("Failed to read {what}: {source}")]
    Read {
        what: String,
        #[source]
        source: std::io::Error,
    },

    /// A scripted source ran out of snapshots
    #[error("Stat source exhausted")]
    Exhausted,
}

/// Errors from notification delivery
#[derive(Error, Debug)]
pub enum NotifyError {
    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote API rejected the message
    #[error("{service} returned status {status}: {body}")]
    Rejected {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Channel is not configured
    #[error("Notification channel '{0}' is not configured")]
    NotConfigured(&'static str),

    /// IO error while writing locally (terminal, failure log)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Failed to parse config file
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

impl ConfigError {
    /// Shorthand for an invalid value error
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
