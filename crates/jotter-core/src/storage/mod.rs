//! Note storage collaborators
//!
//! The editor dialog never talks to a database; every mutation is a round trip
//! through a [`NoteStorage`] implementation.

mod http;
mod memory;

use std::future::Future;

pub use http::HttpNoteStorage;
pub use memory::MemoryNoteStore;

use crate::models::{CreateNoteRequest, DeleteNoteRequest, Note, NoteRequest, UpdateNoteRequest};
use crate::Result;

/// Trait for note storage operations
pub trait NoteStorage: Send + Sync {
    /// List notes, most recently updated first
    fn list(&self) -> impl Future<Output = Result<Vec<Note>>> + Send;

    /// Create a note
    fn create(&self, request: CreateNoteRequest) -> impl Future<Output = Result<Note>> + Send;

    /// Replace a note's title and content
    fn update(&self, request: UpdateNoteRequest) -> impl Future<Output = Result<Note>> + Send;

    /// Remove a note
    fn delete(&self, request: DeleteNoteRequest) -> impl Future<Output = Result<()>> + Send;

    /// Dispatch one editor request, returning the stored note when there is one.
    fn execute(&self, request: NoteRequest) -> impl Future<Output = Result<Option<Note>>> + Send {
        async move {
            match request {
                NoteRequest::Create(body) => self.create(body).await.map(Some),
                NoteRequest::Update(body) => self.update(body).await.map(Some),
                NoteRequest::Delete(body) => self.delete(body).await.map(|()| None),
            }
        }
    }
}
