//! Error types for jotter-core

use std::fmt;

use thiserror::Error;

/// Result type alias using jotter-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// The only message a user ever sees when a note operation fails.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again";

/// Errors that can occur in jotter-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error (unreachable host, timeout, broken body)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage service answered with a non-success status
    #[error("Storage API error: {message} ({status})")]
    Api { status: u16, message: String },

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A failed note operation as seen by the editor dialog.
///
/// The display message is always the same generic text; the underlying cause
/// only goes to diagnostics so callers cannot grow an error taxonomy on top of
/// the dialog.
#[derive(Clone, PartialEq, Eq)]
pub struct OperationFailure {
    diagnostic_cause: String,
}

impl OperationFailure {
    pub fn new(diagnostic_cause: impl Into<String>) -> Self {
        Self {
            diagnostic_cause: diagnostic_cause.into(),
        }
    }

    #[must_use]
    pub const fn display_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }

    #[must_use]
    pub fn diagnostic_cause(&self) -> &str {
        &self.diagnostic_cause
    }
}

impl From<Error> for OperationFailure {
    fn from(error: Error) -> Self {
        Self::new(error.to_string())
    }
}

impl fmt::Debug for OperationFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OperationFailure")
            .field("diagnostic_cause", &self.diagnostic_cause)
            .finish()
    }
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.display_message())
    }
}

impl std::error::Error for OperationFailure {}
