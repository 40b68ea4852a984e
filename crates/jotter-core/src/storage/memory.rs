//! In-process note store backing the API service and tests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::NoteStorage;
use crate::models::{
    CreateNoteRequest, DeleteNoteRequest, Note, NoteDraft, NoteId, UpdateNoteRequest,
};
use crate::{Error, Result};

/// Thread-safe in-memory note store.
#[derive(Clone, Default)]
pub struct MemoryNoteStore {
    notes: Arc<RwLock<HashMap<NoteId, Note>>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, e.g. from a persisted snapshot.
    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let notes = notes.into_iter().map(|note| (note.id, note)).collect();
        Self {
            notes: Arc::new(RwLock::new(notes)),
        }
    }

    /// All notes, most recently updated first.
    pub async fn snapshot(&self) -> Vec<Note> {
        let notes = self.notes.read().await;
        let mut listed = notes.values().cloned().collect::<Vec<_>>();
        listed.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        listed
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }

    pub async fn get(&self, id: &NoteId) -> Option<Note> {
        self.notes.read().await.get(id).cloned()
    }

    /// Put a note back exactly as given, replacing any note with its id.
    pub async fn restore(&self, note: Note) {
        self.notes.write().await.insert(note.id, note);
    }

    /// Drop a note if present; returns whether it was there.
    pub async fn discard(&self, id: &NoteId) -> bool {
        self.notes.write().await.remove(id).is_some()
    }
}

impl NoteStorage for MemoryNoteStore {
    async fn list(&self) -> Result<Vec<Note>> {
        Ok(self.snapshot().await)
    }

    async fn create(&self, request: CreateNoteRequest) -> Result<Note> {
        let note = Note::new(request.title, request.content);
        self.notes.write().await.insert(note.id, note.clone());
        tracing::debug!("Created note: {}", note.id);
        Ok(note)
    }

    async fn update(&self, request: UpdateNoteRequest) -> Result<Note> {
        let mut notes = self.notes.write().await;
        let note = notes
            .get_mut(&request.id)
            .ok_or_else(|| Error::NotFound(request.id.to_string()))?;
        note.apply_update(NoteDraft::new(request.title, request.content), Utc::now());
        tracing::debug!("Updated note: {}", note.id);
        Ok(note.clone())
    }

    async fn delete(&self, request: DeleteNoteRequest) -> Result<()> {
        let removed = self.notes.write().await.remove(&request.id);
        if removed.is_none() {
            return Err(Error::NotFound(request.id.to_string()));
        }
        tracing::debug!("Deleted note: {}", request.id);
        Ok(())
    }
}
