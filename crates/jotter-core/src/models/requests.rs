//! Request bodies for the note-storage HTTP interface

use serde::{Deserialize, Serialize};

use super::note::{NoteDraft, NoteId};

/// `POST /notes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

/// `PUT /notes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    pub id: NoteId,
    pub title: String,
    pub content: String,
}

/// `DELETE /notes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteNoteRequest {
    pub id: NoteId,
}

impl From<NoteDraft> for CreateNoteRequest {
    fn from(draft: NoteDraft) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
        }
    }
}

impl UpdateNoteRequest {
    pub fn new(id: NoteId, draft: NoteDraft) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
        }
    }

    #[must_use]
    pub fn draft(&self) -> NoteDraft {
        NoteDraft::new(self.title.clone(), self.content.clone())
    }
}

/// One mutation the editor dialog asks the storage collaborator to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteRequest {
    Create(CreateNoteRequest),
    Update(UpdateNoteRequest),
    Delete(DeleteNoteRequest),
}

impl NoteRequest {
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Create(_) => "POST",
            Self::Update(_) => "PUT",
            Self::Delete(_) => "DELETE",
        }
    }
}
