use std::io;

use jotter_core::{FieldErrors, OperationFailure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] jotter_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Note not found for id/prefix: {0}")]
    NoteNotFound(String),
    #[error("{0}")]
    AmbiguousNoteId(String),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Note is invalid: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Operation(#[from] OperationFailure),
    #[error("Editor refused the request: {0}")]
    Refused(String),
}

impl CliError {
    /// Whether the message was already shown to the user while running.
    pub const fn already_reported(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::Operation(_))
    }
}
