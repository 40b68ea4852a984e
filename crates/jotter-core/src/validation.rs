//! Note input validation shared by the editor dialog and the storage service.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::NoteDraft;

/// Form field a validation message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Content,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to message map produced by a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&rendered)
    }
}

/// Validation rules for a note's title and content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteSchema {
    max_title_chars: Option<usize>,
}

impl NoteSchema {
    /// Both fields required, no length cap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_title_chars: None,
        }
    }

    #[must_use]
    pub const fn with_max_title_chars(mut self, max: usize) -> Self {
        self.max_title_chars = Some(max);
        self
    }

    /// Validate a draft, returning it unchanged on success.
    ///
    /// Values are checked after trimming but passed through as entered.
    pub fn validate(&self, draft: &NoteDraft) -> Result<NoteDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        let title = draft.title.trim();
        if title.is_empty() {
            errors.insert(Field::Title, "Title is required");
        } else if let Some(max) = self.max_title_chars {
            if title.chars().count() > max {
                errors.insert(Field::Title, format!("Title must be at most {max} characters"));
            }
        }

        if draft.content.trim().is_empty() {
            errors.insert(Field::Content, "Content is required");
        }

        if errors.is_empty() {
            Ok(draft.clone())
        } else {
            Err(errors)
        }
    }
}
