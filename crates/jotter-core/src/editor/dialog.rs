//! Async driver for the editor dialog.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::machine::{EditorMode, EditorView, NoteEditor, Outcome, PendingRequest};
use crate::error::OperationFailure;
use crate::storage::NoteStorage;
use crate::validation::NoteSchema;

/// "Re-fetch and re-render the current view" signal.
pub trait ViewRefresh: Send + Sync {
    fn refresh(&self);
}

/// Surfaces the generic failure message to the user.
pub trait FailureNotifier: Send + Sync {
    fn notify_failure(&self, message: &str);
}

/// Shared collaborators every dialog of a view talks to.
pub struct EditorContext<S> {
    storage: Arc<S>,
    refresh: Arc<dyn ViewRefresh>,
    notifier: Arc<dyn FailureNotifier>,
    schema: NoteSchema,
}

impl<S> Clone for EditorContext<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            refresh: Arc::clone(&self.refresh),
            notifier: Arc::clone(&self.notifier),
            schema: self.schema,
        }
    }
}

impl<S: NoteStorage> EditorContext<S> {
    pub fn new(
        storage: Arc<S>,
        refresh: Arc<dyn ViewRefresh>,
        notifier: Arc<dyn FailureNotifier>,
    ) -> Self {
        Self {
            storage,
            refresh,
            notifier,
            schema: NoteSchema::new(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: NoteSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// A fresh, closed dialog bound to this context.
    pub fn dialog(&self) -> EditorDialog<S> {
        EditorDialog {
            editor: Arc::new(Mutex::new(NoteEditor::new(self.schema))),
            context: self.clone(),
        }
    }
}

/// Editor dialog wired to storage, refresh and notification.
///
/// Cloning yields another handle to the same dialog, so a surface can keep
/// typing into it while a request is in flight.
pub struct EditorDialog<S> {
    editor: Arc<Mutex<NoteEditor>>,
    context: EditorContext<S>,
}

impl<S> Clone for EditorDialog<S> {
    fn clone(&self) -> Self {
        Self {
            editor: Arc::clone(&self.editor),
            context: self.context.clone(),
        }
    }
}

impl<S: NoteStorage> EditorDialog<S> {
    pub async fn open(&self, mode: EditorMode) {
        self.editor.lock().await.open(mode);
    }

    pub async fn dismiss(&self) {
        self.editor.lock().await.dismiss();
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        self.editor.lock().await.set_title(title);
    }

    pub async fn set_content(&self, content: impl Into<String>) {
        self.editor.lock().await.set_content(content);
    }

    pub async fn is_open(&self) -> bool {
        self.editor.lock().await.is_open()
    }

    pub async fn view(&self) -> EditorView {
        self.editor.lock().await.view()
    }

    /// Validate and send a create or update.
    pub async fn submit(&self) -> Outcome {
        let started = self.editor.lock().await.begin_submit();
        match started {
            Ok(pending) => self.run(pending).await,
            Err(outcome) => outcome,
        }
    }

    /// Delete the note being edited.
    pub async fn delete(&self) -> Outcome {
        let started = self.editor.lock().await.begin_delete();
        match started {
            Ok(pending) => self.run(pending).await,
            Err(outcome) => outcome,
        }
    }

    async fn run(&self, pending: PendingRequest) -> Outcome {
        let PendingRequest { ticket, request } = pending;
        let method = request.method();

        // The lock is released here; only the settle step re-acquires it.
        let result = self
            .context
            .storage
            .execute(request)
            .await
            .map_err(|error| {
                tracing::warn!("Note {} request failed: {}", method, error);
                OperationFailure::from(error)
            });

        let outcome = self.editor.lock().await.complete(ticket, result);
        match &outcome {
            Outcome::Saved(note) => {
                tracing::info!("Note {} succeeded: {}", method, note.id);
                self.context.refresh.refresh();
            }
            Outcome::Deleted => {
                tracing::info!("Note {} succeeded", method);
                self.context.refresh.refresh();
            }
            Outcome::Failed(failure) => {
                self.context
                    .notifier
                    .notify_failure(failure.display_message());
            }
            Outcome::Invalid(_) | Outcome::Blocked(_) | Outcome::Discarded => {}
        }
        outcome
    }
}
