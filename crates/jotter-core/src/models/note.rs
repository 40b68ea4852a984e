//! Note model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a note, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Create a new unique note ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// A note as stored by the note service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Short title shown on the card header
    pub title: String,
    /// Plain text body
    pub content: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, never earlier than `created_at`
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a new note stamped with the current time
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new_at(title, content, Utc::now())
    }

    /// Create a new note stamped with `now`
    #[must_use]
    pub fn new_at(title: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: NoteId::new(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the note was changed after it was created.
    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }

    /// The more recent of the two timestamps.
    #[must_use]
    pub fn last_touched_at(&self) -> DateTime<Utc> {
        if self.is_edited() {
            self.updated_at
        } else {
            self.created_at
        }
    }

    /// Replace title and content, bumping `updated_at`.
    ///
    /// A clock that went backwards is clamped so `updated_at >= created_at`
    /// keeps holding.
    pub fn apply_update(&mut self, draft: NoteDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.content = draft.content;
        self.updated_at = now.max(self.created_at);
    }

    /// Current title and content as an editable draft
    #[must_use]
    pub fn draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// Title and content of a note before it has an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
