//! Error types module
//!
//! All failures a view can hit are unified under [`AppError`]. None of them is
//! fatal: each one ends only the action that was attempted, and the caller
//! keeps its local state so the user can retry.
//!
//! - `Validation`: bad file or form input, reported immediately.
//! - `Network`: the remote API could not be reached or answered with a
//!   non-success status.
//! - `Auth`: the owner credentials did not match.

use std::io;

use crate::auth::AuthError;
use crate::validation::ValidationError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a failed request
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "NETWORK_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same action may succeed
    fn is_recoverable(&self) -> bool;

    /// Message shown to the user (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Wrap a failed remote call, keeping the underlying error as the source.
    pub fn network(message: impl Into<String>, source: anyhow::Error) -> Self {
        AppError::Network {
            message: message.into(),
            source,
        }
    }

    /// Emit this error through `tracing` at the level its metadata names.
    pub fn log(&self) {
        let code = self.error_code();
        match self.log_level() {
            LogLevel::Debug => tracing::debug!(code, error = %self, "Action rejected"),
            LogLevel::Warn => tracing::warn!(code, error = ?self, "Action failed"),
            LogLevel::Error => tracing::error!(code, error = ?self, "Action failed"),
        }
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Network { .. } => "NETWORK_ERROR",
            AppError::Auth(_) => "AUTH_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            AppError::Validation(_) | AppError::Auth(_) => false,
            AppError::Network { .. } | AppError::Io(_) => true,
            AppError::Config(_) => false,
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(err) => err.to_string(),
            AppError::Network { message, .. } => message.clone(),
            AppError::Auth(err) => err.to_string(),
            AppError::Io(err) => format!("Could not access file: {}", err),
            AppError::Config(msg) => msg.clone(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Validation(_) | AppError::Auth(_) => LogLevel::Debug,
            AppError::Network { .. } | AppError::Io(_) => LogLevel::Warn,
            AppError::Config(_) => LogLevel::Error,
        }
    }
}
