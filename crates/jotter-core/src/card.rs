//! Note card: a single note rendered in the list, opening the editor on activation.

use chrono::{DateTime, Utc};

use crate::editor::{EditorContext, EditorDialog, EditorMode};
use crate::models::{Note, NoteId};
use crate::storage::NoteStorage;

const UPDATED_SUFFIX: &str = " (updated)";

/// What a surface draws for one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub timestamp_label: String,
    pub is_edited: bool,
}

impl CardView {
    #[must_use]
    pub fn render(note: &Note) -> Self {
        let is_edited = note.is_edited();
        let mut timestamp_label = format_card_date(note.last_touched_at());
        if is_edited {
            timestamp_label.push_str(UPDATED_SUFFIX);
        }

        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            timestamp_label,
            is_edited,
        }
    }
}

/// Calendar date in the `Mon Jan 01 2024` shape.
#[must_use]
pub fn format_card_date(at: DateTime<Utc>) -> String {
    at.format("%a %b %d %Y").to_string()
}

/// A note card owning its own editor dialog.
pub struct NoteCard<S> {
    note: Note,
    dialog: EditorDialog<S>,
}

impl<S: NoteStorage> NoteCard<S> {
    pub fn new(note: Note, context: &EditorContext<S>) -> Self {
        Self {
            note,
            dialog: context.dialog(),
        }
    }

    pub const fn note(&self) -> &Note {
        &self.note
    }

    pub fn render(&self) -> CardView {
        CardView::render(&self.note)
    }

    /// Open the editor in edit mode seeded with this card's note.
    pub async fn activate(&self) -> &EditorDialog<S> {
        self.dialog.open(EditorMode::Edit(self.note.clone())).await;
        &self.dialog
    }

    pub const fn dialog(&self) -> &EditorDialog<S> {
        &self.dialog
    }

    pub async fn is_dialog_open(&self) -> bool {
        self.dialog.is_open().await
    }
}
