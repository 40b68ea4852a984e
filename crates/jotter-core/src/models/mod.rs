//! Data models for Jotter

mod note;
mod requests;

pub use note::{Note, NoteDraft, NoteId};
pub use requests::{CreateNoteRequest, DeleteNoteRequest, NoteRequest, UpdateNoteRequest};
