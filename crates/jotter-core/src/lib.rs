//! jotter-core - Core library for Jotter
//!
//! This crate contains the note model, the editor dialog state machine, the
//! note card view, and the storage clients shared by the API service and CLI.

pub mod card;
pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod storage;
pub mod util;
pub mod validation;

pub use card::{CardView, NoteCard};
pub use editor::{
    EditorContext, EditorDialog, EditorMode, EditorState, FailureNotifier, NoteEditor, Outcome,
    ViewRefresh,
};
pub use error::{Error, OperationFailure, Result};
pub use models::{Note, NoteDraft, NoteId};
pub use storage::{HttpNoteStorage, MemoryNoteStore, NoteStorage};
pub use validation::{Field, FieldErrors, NoteSchema};
