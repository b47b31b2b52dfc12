//! Error types for the job-finder-bot library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use thiserror::Error;

/// Errors that can occur in the job-finder-bot application.
#[derive(Error, Debug)]
pub enum BotError {
    /// One job source failed to fetch or parse; isolated to that source
    #[error("source '{source_name}' unavailable: {reason}")]
    SourceUnavailable {
        /// Name of the failing job source
        source_name: &'static str,
        /// Underlying transport or parse failure
        reason: String,
    },

    /// Malformed user input, rejected before any state mutation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Sending a message to a user failed
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// Database-related errors
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Connection pool errors
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with BotError
pub type Result<T> = std::result::Result<T, BotError>;

impl From<anyhow::Error> for BotError {
    fn from(err: anyhow::Error) -> Self {
        BotError::Other(err.to_string())
    }
}

impl BotError {
    /// Whether this error came from the persistence layer.
    ///
    /// Store failures are fatal for the operation in progress and must be
    /// reported upward rather than swallowed.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Pool(_))
    }
}
