//! Note store owned by the service, optionally mirrored to a JSON snapshot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use jotter_core::models::{CreateNoteRequest, DeleteNoteRequest, UpdateNoteRequest};
use jotter_core::{MemoryNoteStore, Note, NoteStorage};
use tokio::sync::Mutex;

use crate::error::AppError;

/// In-memory notes plus the file they are persisted to, if any.
///
/// Mutations are serialized. A mutation whose snapshot write fails is undone
/// in memory before the error is returned.
pub struct NoteRepository {
    store: MemoryNoteStore,
    snapshot: Option<SnapshotFile>,
    mutation_lock: Mutex<()>,
}

impl NoteRepository {
    pub fn in_memory() -> Self {
        Self {
            store: MemoryNoteStore::new(),
            snapshot: None,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Load the snapshot at `path`; a missing file starts an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let snapshot = SnapshotFile::new(path.into());
        let notes = snapshot.load().await?;
        tracing::info!(
            "Loaded {} notes from {}",
            notes.len(),
            snapshot.path.display()
        );
        Ok(Self {
            store: MemoryNoteStore::from_notes(notes),
            snapshot: Some(snapshot),
            mutation_lock: Mutex::new(()),
        })
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }

    pub async fn list(&self) -> Result<Vec<Note>, AppError> {
        Ok(self.store.list().await?)
    }

    pub async fn create(&self, request: CreateNoteRequest) -> Result<Note, AppError> {
        let _guard = self.mutation_lock.lock().await;
        let note = self.store.create(request).await?;
        if let Err(error) = self.persist().await {
            self.store.discard(&note.id).await;
            return Err(error);
        }
        Ok(note)
    }

    pub async fn update(&self, request: UpdateNoteRequest) -> Result<Note, AppError> {
        let _guard = self.mutation_lock.lock().await;
        let previous = self.store.get(&request.id).await;
        let note = self.store.update(request).await?;
        if let Err(error) = self.persist().await {
            if let Some(previous) = previous {
                self.store.restore(previous).await;
            }
            return Err(error);
        }
        Ok(note)
    }

    pub async fn delete(&self, request: DeleteNoteRequest) -> Result<(), AppError> {
        let _guard = self.mutation_lock.lock().await;
        let previous = self.store.get(&request.id).await;
        self.store.delete(request).await?;
        if let Err(error) = self.persist().await {
            if let Some(previous) = previous {
                self.store.restore(previous).await;
            }
            return Err(error);
        }
        Ok(())
    }

    async fn persist(&self) -> Result<(), AppError> {
        match &self.snapshot {
            Some(snapshot) => snapshot.save(&self.store.snapshot().await).await,
            None => Ok(()),
        }
    }
}

struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn load(&self) -> Result<Vec<Note>, AppError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(AppError::internal(format!(
                    "Failed to read {}: {error}",
                    self.path.display()
                )))
            }
        };
        serde_json::from_slice(&raw).map_err(|error| {
            AppError::internal(format!(
                "Snapshot {} is not valid: {error}",
                self.path.display()
            ))
        })
    }

    /// Rewrite the whole snapshot through a temp file and rename.
    async fn save(&self, notes: &[Note]) -> Result<(), AppError> {
        let raw = serde_json::to_vec_pretty(notes)
            .map_err(|error| AppError::internal(format!("Failed to encode notes: {error}")))?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|error| write_error(parent, &error))?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, raw)
            .await
            .map_err(|error| write_error(&temp_path, &error))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|error| write_error(&self.path, &error))?;
        tracing::debug!("Saved {} notes to {}", notes.len(), self.path.display());
        Ok(())
    }
}

fn write_error(path: &Path, error: &std::io::Error) -> AppError {
    AppError::internal(format!("Failed to write {}: {error}", path.display()))
}
